//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fixcol::{LineFilter, Schema};

/// Read an input file into memory, or stdin when `-` is provided.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a schema file, rejecting structurally invalid layouts.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let schema = Schema::load(path)?;
    schema
        .validate()
        .with_context(|| format!("invalid schema {}", path.display()))?;
    Ok(schema)
}

/// Build the line filter the skip flags imply, if any.
pub fn skip_filter(skip_blank: bool, skip_short: bool, width: usize) -> Option<LineFilter> {
    if !skip_blank && !skip_short {
        return None;
    }
    Some(Arc::new(move |line: &str| {
        (skip_blank && line.trim().is_empty()) || (skip_short && line.chars().count() < width)
    }))
}
