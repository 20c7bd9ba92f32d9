use clap::Subcommand;
use std::path::PathBuf;

use crate::config::LoaderConfig;
use crate::loader::TexmapsLoader;

pub mod export;
pub mod info;
pub mod list;

#[derive(Subcommand)]
pub enum Commands {
    /// Show entry and override statistics for the archive
    Info,

    /// List index entries
    List {
        /// Include entries without data
        #[arg(short, long)]
        all: bool,
    },

    /// Export one texture map as PNG
    Export {
        /// Texture index (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_index)]
        index: u32,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export every texture map as PNG
    ExportAll {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Commands {
    pub fn execute(&self, config: LoaderConfig) -> anyhow::Result<()> {
        match self {
            Commands::Info => info::execute(config),
            Commands::List { all } => list::execute(config, *all),
            Commands::Export { index, output } => export::single(config, *index, output),
            Commands::ExportAll { output, quiet } => export::all(config, output, !*quiet),
        }
    }
}

fn parse_index(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("Invalid index '{s}': {e}"))
}

/// Load the archive on the calling thread
fn open_loader(config: LoaderConfig) -> anyhow::Result<TexmapsLoader> {
    let mut loader = TexmapsLoader::new(config);
    loader.load_blocking()?;
    Ok(loader)
}
