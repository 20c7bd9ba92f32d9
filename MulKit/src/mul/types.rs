//! Types for MUL index handling

use serde::{Deserialize, Serialize};

use super::UNUSED_OFFSET;

/// Layout of one record in an index file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    /// `u32` offset, `i32` length, `i32` extra (12 bytes)
    #[default]
    Classic,
    /// `u64` offset, `i32` length, `i32` extra (16 bytes)
    Extended,
}

impl IndexFormat {
    /// Size of one index record in bytes
    #[must_use]
    pub fn record_size(self) -> usize {
        match self {
            IndexFormat::Classic => 12,
            IndexFormat::Extended => 16,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IndexFormat::Classic => "classic",
            IndexFormat::Extended => "extended",
        }
    }
}

/// One index record: where a payload lives and how to interpret it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Byte offset of the payload in the data file
    pub offset: u64,
    /// Payload length in bytes; `<= 0` means no data
    pub length: i32,
    /// Format-specific flag. For texture maps, `0` selects 64x64 and
    /// anything else selects 128x128.
    pub extra: i32,
}

impl Entry {
    /// The sentinel returned for any index that has no usable entry
    pub const EMPTY: Entry = Entry {
        offset: 0,
        length: 0,
        extra: 0,
    };

    #[must_use]
    pub const fn new(offset: u64, length: i32, extra: i32) -> Self {
        Self {
            offset,
            length,
            extra,
        }
    }

    /// Whether this entry points at decodable data
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.length > 0 && self.offset != UNUSED_OFFSET
    }
}
