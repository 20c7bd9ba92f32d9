//! # MulKit
//!
//! A pure-Rust loader for legacy MUL game archives.
//!
//! ## Supported Formats
//!
//! - **MUL archive pairs** - a data file plus an index file of fixed-size
//!   records (classic 12-byte and extended 16-byte layouts)
//! - **DEF override files** - line-oriented definitions that alias one
//!   index onto another, including `{...}` groups
//! - **Texture maps** (`texmaps.mul`) - 64x64 and 128x128 1-5-5-5 pixel
//!   maps, decoded lazily and cached per index
//! - **PNG** - export of decoded texture maps
//!
//! ## Quick Start
//!
//! ```no_run
//! use mulkit::prelude::*;
//!
//! let config = LoaderConfig::with_data_dir("/games/uo");
//! let mut loader = TexmapsLoader::new(config);
//! loader.load_blocking()?;
//!
//! if let Some(texture) = loader.get_texture(0x10, false) {
//!     mulkit::converter::save_texture_png(&texture, "texmap_16.png")?;
//! }
//!
//! loader.clean_resources();
//! # Ok::<(), mulkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `mulkit` command-line binary

pub mod config;
pub mod converter;
pub mod def;
pub mod error;
pub mod loader;
pub mod mul;
pub mod paths;
pub mod texmaps;
pub mod texture;

// Re-exports for convenience
pub use config::LoaderConfig;
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::LoaderConfig;
    pub use crate::def::{DefReader, DefRecord, OverrideResolver, OverrideStats};
    pub use crate::error::{Error, Result};
    pub use crate::loader::{LoadState, TexmapsLoader};
    pub use crate::mul::{Entry, EntryTable, IndexFormat, MulReader, TEXMAPS_INDEX_COUNT};
    pub use crate::paths::{DirectoryResolver, PathResolver};
    pub use crate::texmaps::Texmaps;
    pub use crate::texture::{CacheStats, NullLedger, ResourceLedger, TexmapCache, Texture};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
