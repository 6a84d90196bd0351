//! Resolve declared dependencies into a typed vendor catalog and emit the
//! generated module.
//!
//! The run always completes and writes the artifact, even when some
//! dependencies end up unclassified; only configuration errors (unreadable
//! config or manifest, unknown serializer, schema violations) abort before
//! output. Diagnostics go to stderr; the artifact goes to the configured
//! destination.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use vendorcat::{
    Options, RegistryClient, Serializer, load_manifest, load_template, render, resolve,
    write_artifact,
};

#[derive(Parser, Debug)]
#[command(name = "vendorcat")]
#[command(about = "Resolve a dependency manifest into a typed vendor-asset catalog")]
struct Cli {
    /// Config file path; defaults to vendorcat.json when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Manifest document path (overrides the config file).
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Output artifact path (overrides the config file).
    #[arg(long)]
    dest: Option<PathBuf>,
    /// Serializer strategy (overrides the config file).
    #[arg(long, value_parser = ["json", "json-pretty"])]
    serializer: Option<String>,
    /// Catalog name (overrides the manifest's name field).
    #[arg(long)]
    name: Option<String>,
    /// Print the rendered module to stdout instead of writing the artifact.
    #[arg(long)]
    stdout: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut options = Options::load(cli.config.as_deref())?;
    if let Some(manifest) = cli.manifest {
        options.manifest = manifest;
    }
    if let Some(dest) = cli.dest {
        options.dest = dest;
    }
    if let Some(name) = cli.name {
        options.name = Some(name);
    }
    if let Some(name) = cli.serializer.as_deref() {
        match Serializer::from_name(name) {
            Some(serializer) => options.serializer = serializer,
            None => bail!("unknown serializer '{name}'"),
        }
    }

    let manifest = load_manifest(&options.manifest)?;
    let catalog_name = options
        .name
        .clone()
        .unwrap_or_else(|| manifest.name.clone());

    eprintln!(
        "resolving {} dependency(ies) for '{catalog_name}'",
        manifest.entries.len()
    );

    let registry = RegistryClient::from_options(&options);
    let (catalog, report) = resolve(&manifest, &options, &registry);

    for notice in &report.notices {
        eprintln!("  - {notice}");
    }
    for warning in &report.warnings {
        eprintln!("  ! {warning}");
    }

    let template = load_template(options.template.as_deref())?;
    let rendered = render(&catalog_name, &catalog, options.serializer, &template)?;

    if cli.stdout {
        print!("{rendered}");
    } else {
        write_artifact(&options.dest, &rendered)?;
        eprintln!("wrote {}", options.dest.display());
    }

    let unresolved = catalog.unresolved_count();
    if unresolved > 0 {
        eprintln!("{unresolved} dependency(ies) could not be resolved");
    }

    Ok(())
}
