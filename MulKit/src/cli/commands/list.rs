//! CLI command for listing index entries

use super::open_loader;
use crate::config::LoaderConfig;
use crate::texture::texmap_size;

/// Format byte size for human-readable output
fn format_size(bytes: i32) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", f64::from(bytes) / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", f64::from(bytes) / 1024.0)
    } else {
        format!("{bytes}")
    }
}

pub fn execute(config: LoaderConfig, all: bool) -> anyhow::Result<()> {
    let mut loader = open_loader(config)?;
    let texmaps = loader.require()?;

    println!("{:>6}  {:>10}  {:>8}  {:>5}  size", "index", "offset", "length", "extra");
    let mut shown = 0;
    for (index, entry) in texmaps.entries().iter() {
        let valid = entry.is_valid();
        if !valid && !all {
            continue;
        }
        let size = if valid {
            let side = texmap_size(entry.extra);
            format!("{side}x{side}")
        } else {
            "-".to_string()
        };
        println!(
            "{:>6}  {:>#10x}  {:>8}  {:>5}  {}",
            index,
            entry.offset,
            format_size(entry.length),
            entry.extra,
            size
        );
        shown += 1;
    }

    println!("\n{shown} entries");
    loader.clean_resources();
    Ok(())
}
