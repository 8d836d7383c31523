use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use regex::Regex;

use denoup::config::{self, UpdateConfig};
use denoup::import_map::ImportMapFile;
use denoup::update::{UpdateOptions, update_dependency_map};
use denoup::version::source::RegistrySource;

#[derive(Parser)]
#[command(name = "denoup")]
#[command(version, about = "Update dependency specifiers in Deno import maps")]
struct Cli {
    /// Import map files to update (deno.json, import_map.json, ...)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only consider aliases matching this regular expression
    #[arg(long)]
    include: Option<String>,

    /// Forced minimum version for an alias (repeatable)
    #[arg(long = "pin", value_name = "ALIAS=VERSION")]
    pins: Vec<String>,

    /// JSON file providing include/pins defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rewrite entries whose current version is not semver
    #[arg(long)]
    force: bool,

    /// Consider pre-release versions when picking the latest
    #[arg(long)]
    allow_prerelease: bool,

    /// Report changes without writing any file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    denoup::log::init();
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file_config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<UpdateConfig>(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => UpdateConfig::default(),
    };

    let options = build_options(&cli, file_config)?;
    let source = RegistrySource::new();

    for path in &cli.files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut document = ImportMapFile::parse(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let mut imports = document
            .imports()
            .with_context(|| format!("unusable imports in {}", path.display()))?;

        let changed = update_dependency_map(&mut imports, &options, &source)
            .await
            .with_context(|| format!("failed to update {}", path.display()))?;

        if changed && !cli.dry_run {
            document.set_imports(&imports);
            fs::write(path, document.to_json_string()?)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    Ok(())
}

/// Merge command-line flags over the config file; flags win.
fn build_options(cli: &Cli, file_config: UpdateConfig) -> anyhow::Result<UpdateOptions> {
    let pattern = cli
        .include
        .clone()
        .or(file_config.include)
        .unwrap_or_else(|| config::DEFAULT_INCLUDE_PATTERN.to_string());
    let include =
        Regex::new(&pattern).with_context(|| format!("invalid include pattern: {pattern}"))?;

    let mut pins: HashMap<String, String> = file_config.pins;
    for pin in &cli.pins {
        let (alias, version) = pin
            .split_once('=')
            .with_context(|| format!("invalid --pin {pin}, expected ALIAS=VERSION"))?;
        pins.insert(alias.to_string(), version.to_string());
    }

    Ok(UpdateOptions {
        include,
        pins,
        force: cli.force,
        allow_prerelease: cli.allow_prerelease,
        ..Default::default()
    })
}
