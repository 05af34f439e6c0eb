//! Folio CLI - ask questions about a single PDF.

use clap::Parser;
use folio_cli::commands;
use folio_cli::config::load_env_file;
use folio_cli::{Cli, Command, Config, Formatter};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> folio_cli::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    load_env_file(Path::new("."))?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &config, &formatter)?,
        Command::Chunk(args) => commands::execute_chunk(args, &config, &formatter)?,
        Command::Index(args) => commands::execute_index(args, &config, &formatter)?,
        Command::Search(args) => commands::execute_search(args, &config, &formatter)?,
        Command::Ask(args) => commands::execute_ask(args, &config, &formatter)?,
        Command::Evaluate(args) => commands::execute_evaluate(args, &config, &formatter)?,
    }

    Ok(())
}
