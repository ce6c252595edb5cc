//! Encoding commands (`fixcol encode ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use fixcol::{CodecOptions, LineEncoder};

use crate::cli::common::AlignmentArg;
use crate::cli::utils::{load_schema, read_input, write_output};

/// Encode subcommands.
#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Encode JSON lines into a fixed-width file.
    File(EncodeFileArgs),
    /// Encode one row of raw values into a line.
    Values(EncodeValuesArgs),
}

/// Arguments for `fixcol encode file`.
#[derive(Args, Debug)]
pub struct EncodeFileArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Input file of JSON objects, one per line (`-` for stdin).
    pub input: PathBuf,
    /// Output file (`-` for stdout).
    #[arg(long, default_value = "-")]
    pub out: PathBuf,
    /// Default alignment for fields without an override.
    #[arg(long, default_value_t = AlignmentArg::Left, value_enum)]
    pub align: AlignmentArg,
    /// Default pad character.
    #[arg(long, default_value = " ")]
    pub pad: char,
    /// Truncate overlong values instead of failing.
    #[arg(long)]
    pub truncate: bool,
}

/// Arguments for `fixcol encode values`.
#[derive(Args, Debug)]
pub struct EncodeValuesArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Field values in layout order.
    #[arg(required = true)]
    pub values: Vec<String>,
    /// Default alignment for fields without an override.
    #[arg(long, default_value_t = AlignmentArg::Left, value_enum)]
    pub align: AlignmentArg,
    /// Default pad character.
    #[arg(long, default_value = " ")]
    pub pad: char,
    /// Truncate overlong values instead of failing.
    #[arg(long)]
    pub truncate: bool,
}

/// Execute an encode command.
pub fn handle(command: EncodeCommand) -> Result<()> {
    match command {
        EncodeCommand::File(args) => file(args),
        EncodeCommand::Values(args) => values(args),
    }
}

fn file(args: EncodeFileArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let options = CodecOptions {
        default_alignment: args.align.into(),
        default_pad: args.pad,
        fail_on_overflow: !args.truncate,
        ..CodecOptions::default()
    };
    let encoder = LineEncoder::new(schema.layout(), options);
    let input = read_input(&args.input)?;
    let mut output = String::new();
    let mut line = String::new();
    let mut encoded = 0usize;
    for (number, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(raw)
            .with_context(|| format!("line {} is not valid JSON", number + 1))?;
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("line {} is not a JSON object", number + 1))?;
        let row = schema
            .row_from_json(object)
            .with_context(|| format!("failed to convert line {}", number + 1))?;
        encoder
            .encode_into(&row, &mut line)
            .with_context(|| format!("failed to encode line {}", number + 1))?;
        output.push_str(&line);
        output.push('\n');
        encoded += 1;
    }
    write_output(&args.out, &output)?;
    eprintln!("Encoded {} records", encoded);
    Ok(())
}

fn values(args: EncodeValuesArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let options = CodecOptions {
        default_alignment: args.align.into(),
        default_pad: args.pad,
        fail_on_overflow: !args.truncate,
        ..CodecOptions::default()
    };
    let encoder = LineEncoder::new(schema.layout(), options);
    let line = encoder.encode(&args.values)?;
    println!("{}", line);
    Ok(())
}
