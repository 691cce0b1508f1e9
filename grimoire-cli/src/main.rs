//! Command-line proof generator for the tamper-evident log.
//!
//! Reads hex-encoded records from stdin, appends each to a fresh tree,
//! then prints one JSON membership proof per record to stdout in append
//! order. Diagnostics go to stderr so stdout stays machine-readable.
//!
//! Usage:
//!   printf '6131\n6232\n' | grimoire --count 2
//!   grimoire --count 4 --aggregator blake3 < records.hex

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use grimoire_core::{encoding, Aggregator, Blake3Aggregator, Sha256Aggregator};
use grimoire_tree::HashTree;

/// Aggregation scheme
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Scheme {
    /// HMAC-SHA-256 with single-byte domain keys
    #[default]
    Sha256,
    /// Keyed BLAKE3 with the domain tag in the key
    Blake3,
}

/// Append hex records to a tamper-evident log and emit membership proofs
#[derive(Parser, Debug)]
#[command(name = "grimoire")]
#[command(about = "Append hex records to a tamper-evident log and emit membership proofs", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of records to read from stdin
    #[arg(short = 'n', long, default_value = "10")]
    count: u64,

    /// Aggregation scheme
    #[arg(long, value_enum, default_value = "sha256")]
    aggregator: Scheme,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout is reserved for proof output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.aggregator {
        Scheme::Sha256 => run(Sha256Aggregator, cli.count),
        Scheme::Blake3 => run(Blake3Aggregator, cli.count),
    }
}

fn run<A: Aggregator>(aggregator: A, count: u64) -> anyhow::Result<()> {
    let mut tree = HashTree::new(aggregator);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    for record_no in 1..=count {
        let line = lines
            .next()
            .transpose()
            .with_context(|| format!("failed reading record {}", record_no))?
            .ok_or_else(|| anyhow!("stdin ended after {} of {} records", record_no - 1, count))?;
        let bytes = encoding::decode_string(line.trim())
            .with_context(|| format!("record {} is not valid hex", record_no))?;
        let index = tree.append(&bytes);
        debug!(record = record_no, leaf_index = index, size = bytes.len(), "appended");
    }

    if let Some(root) = tree.root_commitment() {
        info!(records = tree.leaf_count(), root = %root, "log sealed");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for index in 0..tree.leaf_count() {
        let proof = tree.proof(index)?;
        writeln!(out, "{}", proof.to_json()?)?;
    }

    Ok(())
}
