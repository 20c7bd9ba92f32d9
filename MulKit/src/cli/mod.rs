//! MulKit CLI - Command-line interface for MUL texture map archives

pub mod commands;
pub mod progress;

use std::path::{Path, PathBuf};

use clap::Parser;
use commands::Commands;

use crate::config::LoaderConfig;

#[derive(Parser)]
#[command(name = "mulkit")]
#[command(about = "MulKit: inspect and export MUL texture map archives", long_about = None)]
struct Cli {
    /// Directory containing texmaps.mul, texidx.mul and TexTerr.def
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML config file (default: mulkit.toml in the data directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Run the MulKit CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.data_dir.as_deref())?;
    cli.command.execute(config)?;

    Ok(())
}

/// An explicit `--config` must parse; `--data-dir` always wins over the
/// directory named in a config file.
fn resolve_config(config: Option<&Path>, data_dir: Option<&Path>) -> anyhow::Result<LoaderConfig> {
    match config {
        Some(path) => {
            let mut config = LoaderConfig::from_file(path)?;
            if let Some(dir) = data_dir {
                config.data_dir = dir.to_path_buf();
            }
            Ok(config)
        }
        None => Ok(LoaderConfig::discover(data_dir.unwrap_or(Path::new(".")))),
    }
}
