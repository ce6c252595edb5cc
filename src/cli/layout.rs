//! Layout inspection commands (`fixcol layout ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fixcol::{Alignment, ColumnDef, FieldKind, FieldSpec, Schema};

use crate::cli::utils::{load_schema, write_output};

/// Layout subcommands.
#[derive(Subcommand, Debug)]
pub enum LayoutCommand {
    /// Write a starter schema to build from.
    Init(LayoutInitArgs),
    /// Print the column map for a schema.
    Show(LayoutShowArgs),
    /// Validate a schema file.
    Check(LayoutCheckArgs),
}

/// Arguments for `fixcol layout init`.
#[derive(Args, Debug)]
pub struct LayoutInitArgs {
    /// Destination path (`-` for stdout).
    #[arg(long, default_value = "-")]
    pub out: PathBuf,
}

/// Arguments for `fixcol layout show`.
#[derive(Args, Debug)]
pub struct LayoutShowArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Sample line to print under the column ruler.
    #[arg(long)]
    pub sample: Option<String>,
}

/// Arguments for `fixcol layout check`.
#[derive(Args, Debug)]
pub struct LayoutCheckArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
}

/// Execute a layout command.
pub fn handle(command: LayoutCommand) -> Result<()> {
    match command {
        LayoutCommand::Init(args) => init(args),
        LayoutCommand::Show(args) => show(args),
        LayoutCommand::Check(args) => check(args),
    }
}

fn starter_schema() -> Schema {
    Schema::new(vec![
        ColumnDef {
            name: "id".to_string(),
            kind: FieldKind::U32,
            spec: FieldSpec::new(6),
        },
        ColumnDef {
            name: "name".to_string(),
            kind: FieldKind::Text,
            spec: FieldSpec::new(20),
        },
        ColumnDef {
            name: "balance".to_string(),
            kind: FieldKind::Decimal,
            spec: FieldSpec::new(12).align(Alignment::Right),
        },
        ColumnDef {
            name: "opened".to_string(),
            kind: FieldKind::Date,
            spec: FieldSpec::new(10),
        },
    ])
}

fn init(args: LayoutInitArgs) -> Result<()> {
    let schema = starter_schema();
    if args.out.as_os_str() == "-" {
        let mut content =
            serde_json::to_string_pretty(&schema).context("failed to serialize schema")?;
        content.push('\n');
        return write_output(&args.out, &content);
    }
    schema.save(&args.out)?;
    println!("Wrote starter schema to {}", args.out.display());
    Ok(())
}

fn show(args: LayoutShowArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let width = schema.total_width();
    println!("Layout: {} columns over {} positions", schema.len(), width);
    let mut position = 0usize;
    for (index, column) in schema.columns.iter().enumerate() {
        let gap = column.spec.skip_gap();
        position += gap;
        let start = position + 1;
        position += column.spec.length();
        let note = if gap > 0 {
            format!("  (+{} skip)", gap)
        } else {
            String::new()
        };
        if column.spec.length() == 0 {
            println!(
                "  {:>3}  {:<20} {:<12} {:>9}{}",
                index,
                column.name,
                column.kind.name(),
                "(empty)",
                note
            );
        } else {
            println!(
                "  {:>3}  {:<20} {:<12} {:>4}-{:<4}{}",
                index,
                column.name,
                column.kind.name(),
                start,
                position,
                note
            );
        }
    }
    println!();
    println!("  {}", ruler(width));
    println!("  {}", bands(&schema));
    if let Some(sample) = &args.sample {
        println!("  {}", sample);
    }
    Ok(())
}

fn check(args: LayoutCheckArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    for column in &schema.columns {
        if column.spec.length() == 0 {
            println!("note: column '{}' has zero width", column.name);
        }
    }
    println!(
        "Schema OK: {} columns spanning {} positions",
        schema.len(),
        schema.total_width()
    );
    Ok(())
}

/// Column ruler with a decade digit every tenth position.
fn ruler(width: usize) -> String {
    let mut line = String::with_capacity(width);
    for col in 1..=width {
        if col % 10 == 0 {
            line.push((b'0' + ((col / 10) % 10) as u8) as char);
        } else if col % 5 == 0 {
            line.push('+');
        } else {
            line.push('-');
        }
    }
    line
}

/// Mark each column span with its index digit and skip gaps with dots.
fn bands(schema: &Schema) -> String {
    let mut line = String::with_capacity(schema.total_width());
    for (index, column) in schema.columns.iter().enumerate() {
        for _ in 0..column.spec.skip_gap() {
            line.push('.');
        }
        let marker = (b'0' + (index % 10) as u8) as char;
        for _ in 0..column.spec.length() {
            line.push(marker);
        }
    }
    line
}
