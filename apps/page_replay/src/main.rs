use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use behavior_core::Page;
use clap::Parser;
use page_dom::{Document, ElementSpec};
use tracing_subscriber::EnvFilter;

mod config;
mod scenario;

use config::load_settings;
use scenario::{run_scenario, ReplayOptions, Step};

/// Replays scripted browser events against a page fixture and prints what the
/// page behaviors did.
#[derive(Parser, Debug)]
struct Args {
    /// JSON element tree of the page.
    #[arg(long)]
    page: PathBuf,
    /// JSON array of replay steps.
    #[arg(long)]
    script: PathBuf,
    /// Behavior settings; `page.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wall-clock speed-up applied to `wait` steps; 0 replays instantly.
    #[arg(long, default_value_t = 0.0)]
    speed: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let spec: ElementSpec = read_json(&args.page)?;
    let steps: Vec<Step> = read_json(&args.script)?;

    let document = Document::from_spec(&spec).context("failed to build page document")?;
    let mut page = Page::new(document, settings)?;
    page.initialize()?;

    let report = run_scenario(&mut page, &steps, ReplayOptions { speed: args.speed }).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}
