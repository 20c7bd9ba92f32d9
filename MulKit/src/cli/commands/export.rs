//! CLI commands for exporting texture maps to PNG

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use super::open_loader;
use crate::cli::progress::{DISK, LOOKING_GLASS, PICTURE, print_done, print_step, simple_bar};
use crate::config::LoaderConfig;
use crate::converter::save_texture_png;
use crate::texture::Texture;

/// Textures decoded before each parallel encode pass
const EXPORT_CHUNK: usize = 256;

/// Export a single texture map
pub fn single(config: LoaderConfig, index: u32, output: &Path) -> anyhow::Result<()> {
    let mut loader = open_loader(config)?;
    let texture = loader
        .get_texture(index, false)
        .ok_or_else(|| anyhow::anyhow!("Texture {index} has no data"))?;

    save_texture_png(&texture, output)?;
    println!(
        "{}Exported texture {} ({}x{}) to {}",
        PICTURE,
        index,
        texture.width(),
        texture.height(),
        output.display()
    );

    loader.clean_resources();
    Ok(())
}

/// Export every texture map with data to `output/<index>.png`
pub fn all(config: LoaderConfig, output: &Path, show_progress: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    std::fs::create_dir_all(output)?;

    if show_progress {
        print_step(1, 2, LOOKING_GLASS, "Reading index...");
    }
    let mut loader = open_loader(config)?;
    let texmaps = loader.require()?;

    let indices: Vec<u32> = texmaps
        .entries()
        .iter()
        .filter(|(_, e)| e.is_valid())
        .map(|(i, _)| i as u32)
        .collect();

    if show_progress {
        print_step(2, 2, DISK, &format!("Exporting {} textures...", indices.len()));
    }
    let pb = show_progress.then(|| simple_bar(indices.len() as u64, "Exporting"));

    let mut exported = 0usize;
    let mut failed = Vec::new();
    for chunk in indices.chunks(EXPORT_CHUNK) {
        // Decoding shares the cache's scratch buffers, so it stays serial.
        let decoded: Vec<(u32, Option<Arc<Texture>>)> = chunk
            .iter()
            .map(|&index| (index, texmaps.get_texture(index, false)))
            .collect();

        let results: Vec<(u32, bool)> = decoded
            .par_iter()
            .map(|(index, texture)| {
                let ok = texture.as_ref().is_some_and(|tex| {
                    save_texture_png(tex, output.join(format!("{index}.png")))
                        .inspect_err(|e| tracing::warn!("Failed to export texture {index}: {e}"))
                        .is_ok()
                });
                (*index, ok)
            })
            .collect();

        for (index, ok) in results {
            if ok {
                exported += 1;
            } else {
                failed.push(index);
            }
        }

        texmaps.dispose_all();
        if let Some(pb) = &pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    println!("Exported {exported} textures to {}", output.display());
    if !failed.is_empty() {
        println!("{} textures could not be decoded or written: {:?}", failed.len(), failed);
    }

    loader.clean_resources();
    if show_progress {
        print_done(start.elapsed());
    }
    Ok(())
}
