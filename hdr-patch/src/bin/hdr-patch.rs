//! CLI entry point for hdr-patch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use hdr_patch::config::DEFAULT_HEADER;

/// hdr-patch — make the `Database` connection field opaque in a generated header.
#[derive(Parser, Debug)]
#[command(name = "hdr-patch", version, about)]
struct Cli {
    /// Header to patch [default: target/release/FirmNetter.h].
    header: Option<PathBuf>,

    /// Output file path (defaults to patching the header in place).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read header paths from an hdr-patch.toml file instead.
    #[arg(short, long, conflicts_with = "header")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hdr_patch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let written = match &cli.config {
        Some(config) => hdr_patch::run(config, cli.output.as_deref())?,
        None => {
            let header = cli.header.unwrap_or_else(|| PathBuf::from(DEFAULT_HEADER));
            let output = cli.output.unwrap_or_else(|| header.clone());
            hdr_patch::patch(&header, &output)?;
            output
        }
    };

    println!("Modified file saved to {}", written.display());
    Ok(())
}
