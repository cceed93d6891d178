//! anchorlink - Locate delimited titles in structured documents

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = anchorlink::cli::Cli::parse();
    anchorlink::cli::run(cli)
}
