//! Decoding commands (`fixcol decode ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fixcol::{CodecOptions, LineDecoder, Schema};

use crate::cli::utils::{load_schema, read_input, skip_filter, write_output};

/// Decode subcommands.
#[derive(Subcommand, Debug)]
pub enum DecodeCommand {
    /// Decode a fixed-width file into JSON lines.
    File(DecodeFileArgs),
    /// Decode a single line and pretty-print the result.
    Line(DecodeLineArgs),
}

/// Arguments for `fixcol decode file`.
#[derive(Args, Debug)]
pub struct DecodeFileArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Input file (`-` for stdin).
    pub input: PathBuf,
    /// Output file (`-` for stdout).
    #[arg(long, default_value = "-")]
    pub out: PathBuf,
    /// Emit raw field strings instead of typed values.
    #[arg(long)]
    pub raw: bool,
    /// Default pad character trimmed from field edges.
    #[arg(long, default_value = " ")]
    pub pad: char,
    /// Keep pad characters instead of trimming them.
    #[arg(long)]
    pub no_trim: bool,
    /// Treat fields past the end of a short line as empty.
    #[arg(long)]
    pub clamp: bool,
    /// Emit null for values that fail conversion instead of failing.
    #[arg(long)]
    pub nullify: bool,
    /// Skip blank lines.
    #[arg(long)]
    pub skip_blank: bool,
    /// Skip lines shorter than the layout width.
    #[arg(long)]
    pub skip_short: bool,
}

/// Arguments for `fixcol decode line`.
#[derive(Args, Debug)]
pub struct DecodeLineArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// The line to decode.
    pub line: String,
    /// Emit raw field strings instead of typed values.
    #[arg(long)]
    pub raw: bool,
    /// Default pad character trimmed from field edges.
    #[arg(long, default_value = " ")]
    pub pad: char,
    /// Keep pad characters instead of trimming them.
    #[arg(long)]
    pub no_trim: bool,
    /// Treat fields past the end of a short line as empty.
    #[arg(long)]
    pub clamp: bool,
    /// Emit null for values that fail conversion instead of failing.
    #[arg(long)]
    pub nullify: bool,
}

/// Execute a decode command.
pub fn handle(command: DecodeCommand) -> Result<()> {
    match command {
        DecodeCommand::File(args) => file(args),
        DecodeCommand::Line(args) => line(args),
    }
}

fn file(args: DecodeFileArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let mut options = CodecOptions {
        default_pad: args.pad,
        trim_fields: !args.no_trim,
        fail_on_out_of_range: !args.clamp,
        fail_on_data_error: !args.nullify,
        ..CodecOptions::default()
    };
    options.line_filter = skip_filter(args.skip_blank, args.skip_short, schema.total_width());
    let decoder = LineDecoder::new(schema.layout(), options);
    let input = read_input(&args.input)?;
    let mut output = String::new();
    let mut values: Vec<String> = Vec::new();
    let mut decoded = 0usize;
    let mut skipped = 0usize;
    for (number, raw) in input.lines().enumerate() {
        let kept = decoder
            .decode_into(raw, &mut values)
            .with_context(|| format!("failed to decode line {}", number + 1))?;
        if !kept {
            skipped += 1;
            continue;
        }
        let object = if args.raw {
            raw_object(&schema, &values)
        } else {
            typed_object(&schema, &values, decoder.options())
                .with_context(|| format!("failed to convert line {}", number + 1))?
        };
        output.push_str(&serde_json::to_string(&object)?);
        output.push('\n');
        decoded += 1;
    }
    write_output(&args.out, &output)?;
    eprintln!("Decoded {} records ({} lines skipped)", decoded, skipped);
    Ok(())
}

fn line(args: DecodeLineArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let options = CodecOptions {
        default_pad: args.pad,
        trim_fields: !args.no_trim,
        fail_on_out_of_range: !args.clamp,
        fail_on_data_error: !args.nullify,
        ..CodecOptions::default()
    };
    let decoder = LineDecoder::new(schema.layout(), options);
    match decoder.decode(&args.line)? {
        Some(values) => {
            let object = if args.raw {
                raw_object(&schema, &values)
            } else {
                typed_object(&schema, &values, decoder.options())?
            };
            let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(object))?;
            println!("{}", rendered);
        }
        None => println!("Line skipped by filter"),
    }
    Ok(())
}

fn raw_object(schema: &Schema, values: &[String]) -> serde_json::Map<String, serde_json::Value> {
    let mut object = serde_json::Map::new();
    for (column, value) in schema.columns.iter().zip(values) {
        object.insert(column.name.clone(), serde_json::Value::String(value.clone()));
    }
    object
}

fn typed_object(
    schema: &Schema,
    values: &[String],
    options: &CodecOptions,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let row = schema.typed_row(values, options)?;
    let mut object = serde_json::Map::new();
    for (column, value) in schema.columns.iter().zip(row) {
        let json = match value {
            Some(typed) => serde_json::to_value(&typed)?,
            None => serde_json::Value::Null,
        };
        object.insert(column.name.clone(), json);
    }
    Ok(object)
}
