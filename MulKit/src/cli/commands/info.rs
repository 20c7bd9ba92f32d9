//! CLI command for summarising a texture map archive

use std::time::Instant;

use super::open_loader;
use crate::cli::progress::{LINK, LOOKING_GLASS, print_done, print_step};
use crate::config::LoaderConfig;
use crate::texture::{LARGE_TEXMAP_SIZE, SMALL_TEXMAP_SIZE, texmap_size};

pub fn execute(config: LoaderConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let data_dir = config.data_dir.clone();
    let format = config.index_format;

    print_step(1, 2, LOOKING_GLASS, &format!("Reading index from {}...", data_dir.display()));
    let mut loader = open_loader(config)?;
    let texmaps = loader.require()?;

    print_step(2, 2, LINK, "Summarising entries...");
    let entries = texmaps.entries();
    let (small, large) = entries
        .iter()
        .filter(|(_, e)| e.is_valid())
        .fold((0usize, 0usize), |(s, l), (_, e)| {
            if texmap_size(e.extra) == SMALL_TEXMAP_SIZE {
                (s + 1, l)
            } else {
                (s, l + 1)
            }
        });
    let overrides = texmaps.override_stats();

    println!();
    println!("Texture maps: {}", data_dir.display());
    println!("Index format: {}", format.as_str());
    println!("Capacity: {}", entries.capacity());
    println!("Records read: {}", texmaps.records_read());
    println!("Valid entries: {}", entries.valid_count());
    println!("  {SMALL_TEXMAP_SIZE}x{SMALL_TEXMAP_SIZE}: {small}");
    println!("  {LARGE_TEXMAP_SIZE}x{LARGE_TEXMAP_SIZE}: {large}");
    println!(
        "Overrides: {} applied from {} records ({} bad targets, {} bad sources)",
        overrides.applied, overrides.records, overrides.skipped_targets, overrides.skipped_sources
    );

    loader.clean_resources();
    print_done(start.elapsed());
    Ok(())
}
