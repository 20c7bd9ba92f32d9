//! Lazily decoded texture map cache
//!
//! One slot per index. A slot is filled on the first successful decode and
//! emptied only by an explicit dispose (`dispose`, `dispose_all`,
//! `release_unused`); lookups never evict.

use std::io::{Read, Seek};
use std::sync::Arc;

use super::{
    LARGE_TEXMAP_SIZE, NullLedger, OPAQUE_BIT, ResourceLedger, SMALL_TEXMAP_SIZE, Texture,
    texmap_size,
};
use crate::error::Result;
use crate::mul::{Entry, EntryTable, MulReader};

/// Cache statistics for debugging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a live cached texture
    pub hits: usize,
    /// Lookups that had to consult the entry table
    pub misses: usize,
    /// Successful decodes
    pub decodes: usize,
    /// Decodes that failed on I/O
    pub failures: usize,
}

#[derive(Debug)]
struct Slot {
    texture: Arc<Texture>,
    last_access: u64,
}

/// Per-index cache of decoded texture maps
///
/// Owns the two scratch buffers used while decoding. Because decoding takes
/// `&mut self`, a cache never runs two decodes at once; callers that want
/// parallel decoding need one cache per thread.
pub struct TexmapCache {
    slots: Vec<Option<Slot>>,
    small: Vec<u16>,
    large: Vec<u16>,
    ledger: Box<dyn ResourceLedger>,
    stats: CacheStats,
    /// Incremented on every in-range lookup; used for idle sweeps
    tick: u64,
}

impl std::fmt::Debug for TexmapCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TexmapCache")
            .field("capacity", &self.slots.len())
            .field("loaded", &self.loaded_count())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl TexmapCache {
    /// Create an empty cache with `capacity` slots and no ledger
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_ledger(capacity, Box::new(NullLedger))
    }

    /// Create an empty cache reporting loads and releases to `ledger`
    #[must_use]
    pub fn with_ledger(capacity: usize, ledger: Box<dyn ResourceLedger>) -> Self {
        let small = (SMALL_TEXMAP_SIZE * SMALL_TEXMAP_SIZE) as usize;
        let large = (LARGE_TEXMAP_SIZE * LARGE_TEXMAP_SIZE) as usize;
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            small: vec![0; small],
            large: vec![0; large],
            ledger,
            stats: CacheStats::default(),
            tick: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Return the texture for `index`, decoding it on first use.
    ///
    /// Returns `None` when `index` is outside the cache, when its entry has
    /// no data, or when the payload cannot be read. Failures are not cached,
    /// so a later call retries.
    pub fn get_texture<R: Read + Seek>(
        &mut self,
        index: u32,
        entries: &EntryTable,
        reader: &mut MulReader<R>,
        keep_raw: bool,
    ) -> Option<Arc<Texture>> {
        let slot_index = index as usize;
        if slot_index >= self.slots.len() {
            return None;
        }

        self.tick += 1;
        let tick = self.tick;

        if let Some(slot) = self.slots[slot_index].as_mut() {
            if !slot.texture.is_disposed() {
                slot.last_access = tick;
                self.stats.hits += 1;
                return Some(Arc::clone(&slot.texture));
            }
        }

        self.stats.misses += 1;

        let entry = *entries.valid_entry(slot_index);
        if entry.length <= 0 {
            return None;
        }

        match self.decode(index, entry, reader, keep_raw) {
            Ok(texture) => {
                let texture = Arc::new(texture);
                let previous = self.slots[slot_index].replace(Slot {
                    texture: Arc::clone(&texture),
                    last_access: tick,
                });
                // The holder disposed the old texture; close out its load first
                if previous.is_some() {
                    self.ledger.record_released(index);
                }
                self.stats.decodes += 1;
                self.ledger.record_loaded(index);
                Some(texture)
            }
            Err(e) => {
                tracing::debug!("Failed to decode texmap {index} at offset {}: {e}", entry.offset);
                self.stats.failures += 1;
                None
            }
        }
    }

    /// Cached texture for `index` without decoding. Disposed textures are
    /// not returned.
    pub fn cached(&self, index: u32) -> Option<&Arc<Texture>> {
        self.slots
            .get(index as usize)?
            .as_ref()
            .map(|slot| &slot.texture)
            .filter(|texture| !texture.is_disposed())
    }

    fn decode<R: Read + Seek>(
        &mut self,
        index: u32,
        entry: Entry,
        reader: &mut MulReader<R>,
        keep_raw: bool,
    ) -> Result<Texture> {
        let size = texmap_size(entry.extra);
        let scratch = if size == SMALL_TEXMAP_SIZE {
            &mut self.small
        } else {
            &mut self.large
        };

        reader.seek(entry.offset)?;
        reader.read_u16_into(scratch)?;

        let raw = keep_raw.then(|| scratch.clone());
        for px in scratch.iter_mut() {
            *px |= OPAQUE_BIT;
        }

        Ok(Texture::new(index, size, scratch.clone(), raw))
    }

    pub fn is_loaded(&self, index: u32) -> bool {
        self.cached(index).is_some()
    }

    /// Number of slots holding a live texture
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| !slot.texture.is_disposed())
            .count()
    }

    /// Indices holding a live texture, ascending
    pub fn loaded_indices(&self) -> Vec<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref()
                    .filter(|s| !s.texture.is_disposed())
                    .map(|_| i as u32)
            })
            .collect()
    }

    /// Dispose the texture at `index`. Returns whether a slot was emptied.
    pub fn dispose(&mut self, index: u32) -> bool {
        let Some(slot) = self.slots.get_mut(index as usize).and_then(Option::take) else {
            return false;
        };
        slot.texture.dispose();
        self.ledger.record_released(index);
        true
    }

    /// Dispose textures not looked up during the last `max_idle` lookups.
    ///
    /// Returns the number of textures disposed.
    pub fn release_unused(&mut self, max_idle: u64) -> usize {
        let tick = self.tick;
        let stale: Vec<u32> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref()
                    .filter(|s| tick - s.last_access > max_idle)
                    .map(|_| i as u32)
            })
            .collect();

        for &index in &stale {
            self.dispose(index);
        }
        if !stale.is_empty() {
            tracing::debug!("Released {} idle texmaps", stale.len());
        }
        stale.len()
    }

    /// Dispose every cached texture. Returns the number disposed.
    pub fn dispose_all(&mut self) -> usize {
        let mut count = 0;
        for index in 0..self.slots.len() {
            if self.dispose(index as u32) {
                count += 1;
            }
        }
        count
    }
}
