//! Verification commands (`fixcol verify ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use fixcol::{CodecOptions, LineDecoder, LineEncoder};
use sha2::{Digest, Sha256};

use crate::cli::utils::{load_schema, read_input, skip_filter};

/// Verification subcommands.
#[derive(Subcommand, Debug)]
pub enum VerifyCommand {
    /// Check every line against the layout width.
    Scan(VerifyScanArgs),
    /// Fingerprint the canonical re-encoding of a file.
    Digest(VerifyDigestArgs),
}

/// Arguments for `fixcol verify scan`.
#[derive(Args, Debug)]
pub struct VerifyScanArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Input file (`-` for stdin).
    pub input: PathBuf,
    /// Skip blank lines.
    #[arg(long)]
    pub skip_blank: bool,
    /// Skip lines shorter than the layout width.
    #[arg(long)]
    pub skip_short: bool,
    /// Fail when any counted line does not conform.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `fixcol verify digest`.
#[derive(Args, Debug)]
pub struct VerifyDigestArgs {
    /// Schema file describing the layout.
    pub schema: PathBuf,
    /// Input file (`-` for stdin).
    pub input: PathBuf,
    /// Expected SHA-256 digest to compare against.
    #[arg(long)]
    pub against: Option<String>,
    /// Skip blank lines.
    #[arg(long)]
    pub skip_blank: bool,
    /// Skip lines shorter than the layout width.
    #[arg(long)]
    pub skip_short: bool,
}

/// Execute a verification command.
pub fn handle(command: VerifyCommand) -> Result<()> {
    match command {
        VerifyCommand::Scan(args) => scan(args),
        VerifyCommand::Digest(args) => digest(args),
    }
}

fn scan(args: VerifyScanArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let width = schema.total_width();
    let mut options = CodecOptions::default();
    options.line_filter = skip_filter(args.skip_blank, args.skip_short, width);
    let input = read_input(&args.input)?;
    let mut exact = 0usize;
    let mut short = 0usize;
    let mut long = 0usize;
    let mut filtered = 0usize;
    let mut offenders: Vec<(usize, usize)> = Vec::new();
    for (number, line) in input.lines().enumerate() {
        if !options.admits(line) {
            filtered += 1;
            continue;
        }
        let count = line.chars().count();
        if count == width {
            exact += 1;
            continue;
        }
        if count < width {
            short += 1;
        } else {
            long += 1;
        }
        if offenders.len() < 5 {
            offenders.push((number + 1, count));
        }
    }
    let total = exact + short + long + filtered;
    println!("Scanned {} lines against a {}-position layout", total, width);
    println!("  exact:    {}", exact);
    println!("  short:    {}", short);
    println!("  long:     {}", long);
    println!("  filtered: {}", filtered);
    for (number, count) in &offenders {
        println!("  line {} has {} positions", number, count);
    }
    if args.strict && short + long > 0 {
        return Err(anyhow!("{} lines do not conform to the layout", short + long));
    }
    Ok(())
}

fn digest(args: VerifyDigestArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let layout = schema.layout();
    let mut options = CodecOptions::default();
    options.line_filter = skip_filter(args.skip_blank, args.skip_short, schema.total_width());
    let decoder = LineDecoder::new(layout.clone(), options.clone());
    let encoder = LineEncoder::new(layout, options);
    let input = read_input(&args.input)?;
    let mut hasher = Sha256::new();
    let mut values: Vec<String> = Vec::new();
    let mut line_buf = String::new();
    let mut hashed = 0usize;
    for (number, line) in input.lines().enumerate() {
        let kept = decoder
            .decode_into(line, &mut values)
            .with_context(|| format!("failed to decode line {}", number + 1))?;
        if !kept {
            continue;
        }
        encoder
            .encode_into(&values, &mut line_buf)
            .with_context(|| format!("failed to re-encode line {}", number + 1))?;
        hasher.update(line_buf.as_bytes());
        hasher.update(b"\n");
        hashed += 1;
    }
    let digest = hasher.finalize();
    let hex = format!("{digest:x}");
    println!("sha256:{} ({} lines)", hex, hashed);
    if let Some(expected) = &args.against {
        let expected = expected.trim_start_matches("sha256:");
        if expected.eq_ignore_ascii_case(&hex) {
            println!("Digest matches");
        } else {
            return Err(anyhow!("digest mismatch: expected {}", expected));
        }
    }
    Ok(())
}
