//! Perform a single registry lookup and print the normalized metadata.
//!
//! Debugging helper: shows exactly what the resolution engine would see for
//! one package, wildcard normalization included.
//!
//! Usage:
//!   registry-info jquery 2.1.4
//!   registry-info normalize-css
//!   VENDORCAT_REGISTRY_CLI=./mock-registry registry-info foo '*'

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vendorcat::{Options, RegistryClient};

#[derive(Parser, Debug)]
#[command(name = "registry-info")]
#[command(about = "Look up one package in the configured registry")]
struct Cli {
    /// Package name to look up.
    name: String,
    /// Version range; the registry resolves wildcards to the latest release.
    #[arg(default_value = "*")]
    range: String,
    /// Config file supplying the registry command selection.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let options = Options::load(cli.config.as_deref())?;
    let registry = RegistryClient::from_options(&options);

    let info = registry.lookup(&cli.name, &cli.range)?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
