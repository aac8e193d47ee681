use anyhow::{Context, Result};
use clap::Parser;
use docsgen::{DocsGenerator, TemplateData, DEFAULT_SUFFIX};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search for templates (defaults to the current directory)
    root: Option<PathBuf>,

    /// File name suffix marking a template; it is stripped from the output name
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Dry run mode - render templates but don't write files
    #[arg(long)]
    dry_run: bool,

    /// Print the data passed to templates as JSON and exit
    #[arg(long)]
    dump_data: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.dump_data {
        let data = TemplateData::assemble().context("Failed to assemble template data")?;
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    if cli.dry_run {
        info!("=== DRY RUN MODE ===");
    }

    let count = DocsGenerator::new(root)
        .with_suffix(cli.suffix)
        .with_dry_run(cli.dry_run)
        .run()?;

    if cli.dry_run {
        info!("=== DRY RUN COMPLETE ===");
    }
    info!("Rendered {} template(s)", count);

    Ok(())
}
