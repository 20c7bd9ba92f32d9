//! MUL archive pair reader and index entry table
//!
//! A MUL archive is two files: a data file holding raw payloads and an
//! index file of fixed-size little-endian records that say where each
//! payload lives. Index positions are the resource IDs.

mod entry_table;
mod reader;
mod types;

pub use entry_table::EntryTable;
pub use reader::MulReader;
pub use types::*;

/// Number of index records in `texidx.mul`
pub const TEXMAPS_INDEX_COUNT: usize = 0x4000;

/// Offset value written by legacy tools for unused index slots
pub const UNUSED_OFFSET: u64 = 0xFFFF_FFFF;

/// Default data file name for texture maps
pub const TEXMAPS_FILE: &str = "texmaps.mul";

/// Default index file name for texture maps
pub const TEXMAPS_INDEX_FILE: &str = "texidx.mul";

/// Default override definitions file name for texture maps
pub const TEXMAPS_DEF_FILE: &str = "TexTerr.def";
