//! Texture map archive: reader, entry table and cache bundled together
//!
//! This is what a finished load produces. It owns the open archive, the
//! entry table with overrides already applied, and the decoded-texture
//! cache.

use std::fs::File;
use std::io::{BufRead, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use crate::config::LoaderConfig;
use crate::def::{DefReader, OverrideResolver, OverrideStats};
use crate::error::Result;
use crate::mul::{EntryTable, MulReader};
use crate::paths::PathResolver;
use crate::texture::{CacheStats, ResourceLedger, TexmapCache, Texture};

/// Loaded texture map archive
pub struct Texmaps<R: Read + Seek = File> {
    reader: MulReader<R>,
    entries: EntryTable,
    cache: TexmapCache,
    records_read: usize,
    overrides: OverrideStats,
}

impl Texmaps<File> {
    /// Open the archive described by `config`, fill the entry table and
    /// apply the definitions file if it exists.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileNotFound`] if the data or index file is
    /// missing, or an IO error if either cannot be read.
    pub fn load(config: &LoaderConfig, resolver: &dyn PathResolver) -> Result<Self> {
        let data_path = resolver.resolve(&config.texmaps_file);
        let index_path = resolver.resolve(&config.index_file);

        let reader = MulReader::open(
            &data_path,
            &index_path,
            config.entry_count,
            config.index_format,
        )?;
        let mut texmaps = Self::from_reader(reader, config.entry_count)?;

        let def_path = resolver.resolve(&config.definitions_file);
        texmaps.apply_overrides_file(&def_path)?;

        tracing::debug!(
            "Loaded texmaps: {} records, {} valid, {} overrides applied",
            texmaps.records_read,
            texmaps.entries.valid_count(),
            texmaps.overrides.applied
        );

        Ok(texmaps)
    }
}

impl<R: Read + Seek> Texmaps<R> {
    /// Build from an open reader, filling a table of `capacity` entries.
    /// No overrides are applied.
    pub fn from_reader(reader: MulReader<R>, capacity: usize) -> Result<Self> {
        Self::from_reader_with_cache(reader, capacity, TexmapCache::new(capacity))
    }

    /// Like [`Self::from_reader`], reporting cache loads to `ledger`
    pub fn from_reader_with_ledger(
        reader: MulReader<R>,
        capacity: usize,
        ledger: Box<dyn ResourceLedger>,
    ) -> Result<Self> {
        Self::from_reader_with_cache(reader, capacity, TexmapCache::with_ledger(capacity, ledger))
    }

    fn from_reader_with_cache(
        mut reader: MulReader<R>,
        capacity: usize,
        cache: TexmapCache,
    ) -> Result<Self> {
        let mut entries = EntryTable::new(capacity);
        let records_read = reader.fill_entries(&mut entries)?;

        Ok(Self {
            reader,
            entries,
            cache,
            records_read,
            overrides: OverrideStats::default(),
        })
    }

    /// Apply a definitions file; a missing file is a no-op
    pub fn apply_overrides_file(&mut self, path: &Path) -> Result<OverrideStats> {
        let stats = OverrideResolver::apply_file(&mut self.entries, path)?;
        self.merge_override_stats(stats);
        Ok(stats)
    }

    /// Apply definitions from any buffered source
    pub fn apply_overrides<B: BufRead>(&mut self, defs: DefReader<B>) -> Result<OverrideStats> {
        let stats = OverrideResolver::apply_reader(&mut self.entries, defs)?;
        self.merge_override_stats(stats);
        Ok(stats)
    }

    fn merge_override_stats(&mut self, stats: OverrideStats) {
        self.overrides.records += stats.records;
        self.overrides.applied += stats.applied;
        self.overrides.skipped_targets += stats.skipped_targets;
        self.overrides.skipped_sources += stats.skipped_sources;
        self.overrides.empty_groups += stats.empty_groups;
    }

    /// Texture for `index`, decoded on first use. See
    /// [`TexmapCache::get_texture`].
    pub fn get_texture(&mut self, index: u32, keep_raw: bool) -> Option<Arc<Texture>> {
        self.cache
            .get_texture(index, &self.entries, &mut self.reader, keep_raw)
    }

    pub fn entries(&self) -> &EntryTable {
        &self.entries
    }

    pub fn cache(&self) -> &TexmapCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of index records read from the index file
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Accumulated statistics from every override pass
    pub fn override_stats(&self) -> OverrideStats {
        self.overrides
    }

    /// See [`TexmapCache::release_unused`]
    pub fn release_unused(&mut self, max_idle: u64) -> usize {
        self.cache.release_unused(max_idle)
    }

    /// Dispose every cached texture, keeping the archive open
    pub fn dispose_all(&mut self) -> usize {
        self.cache.dispose_all()
    }

    /// Dispose every cached texture and close the archive
    pub fn close(mut self) -> usize {
        let disposed = self.cache.dispose_all();
        tracing::debug!("Closed texmaps, disposed {disposed} textures");
        disposed
    }
}
