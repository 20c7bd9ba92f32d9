//! Applies DEF overrides to an entry table

use std::io::BufRead;
use std::path::Path;

use super::{DefReader, DefRecord};
use crate::error::Result;
use crate::mul::EntryTable;

/// Counters describing one override pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideStats {
    /// Records read from the file
    pub records: usize,
    /// Entry copies performed
    pub applied: usize,
    /// Records dropped because the target was out of range
    pub skipped_targets: usize,
    /// Group elements dropped because the source was out of range
    pub skipped_sources: usize,
    /// Records with an in-range target but no parseable group
    pub empty_groups: usize,
}

/// Rewrites entries so that one index aliases another
///
/// For each record the target is checked first; an out-of-range target
/// drops the whole record without looking at its group. Out-of-range group
/// elements are skipped one at a time. Group elements are applied in file
/// order, so the last valid element wins.
pub struct OverrideResolver;

impl OverrideResolver {
    /// Apply the DEF file at `path` to `table`.
    ///
    /// A missing file is not an error: override files are optional and the
    /// table is left as-is.
    pub fn apply_file(table: &mut EntryTable, path: impl AsRef<Path>) -> Result<OverrideStats> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!("No override definitions at {}", path.display());
            return Ok(OverrideStats::default());
        }

        let stats = Self::apply_reader(table, DefReader::open(path)?)?;
        tracing::debug!(
            "Applied {} overrides from {} ({} records, {} bad targets, {} bad sources)",
            stats.applied,
            path.display(),
            stats.records,
            stats.skipped_targets,
            stats.skipped_sources
        );
        Ok(stats)
    }

    /// Apply every record produced by `reader`
    pub fn apply_reader<R: BufRead>(
        table: &mut EntryTable,
        reader: DefReader<R>,
    ) -> Result<OverrideStats> {
        let mut stats = OverrideStats::default();
        for record in reader {
            Self::apply_record(table, &record?, &mut stats);
        }
        Ok(stats)
    }

    /// Apply a single record, updating `stats`
    pub fn apply_record(table: &mut EntryTable, record: &DefRecord, stats: &mut OverrideStats) {
        stats.records += 1;

        let target = i64::from(record.key);
        if !table.contains(target) {
            tracing::trace!("DEF line {}: target {} out of range", record.line, target);
            stats.skipped_targets += 1;
            return;
        }

        let Some(group) = record.group() else {
            stats.empty_groups += 1;
            return;
        };

        for source in group {
            if table.copy_entry(target, i64::from(source)) {
                stats.applied += 1;
            } else {
                tracing::trace!("DEF line {}: source {} out of range", record.line, source);
                stats.skipped_sources += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mul::Entry;
    use pretty_assertions::assert_eq;

    fn table() -> EntryTable {
        let mut table = EntryTable::new(8);
        for i in 0..8 {
            table.set(i, Entry::new(i as u64 * 100, 8192, (i % 2) as i32));
        }
        table
    }

    fn apply(table: &mut EntryTable, text: &str) -> OverrideStats {
        OverrideResolver::apply_reader(table, DefReader::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn test_last_write_wins() {
        let mut t = table();
        let expected = *t.get(2).unwrap();

        let stats = apply(&mut t, "5 {1, 2}\n");

        assert_eq!(t.get(5), Some(&expected));
        assert_eq!(stats.applied, 2);
    }

    #[test]
    fn test_out_of_range_target_skips_record_only() {
        let mut t = table();
        let original = t.clone();

        let stats = apply(&mut t, "8 {1}\n-1 {2}\n3 4\n");

        assert_eq!(stats.skipped_targets, 2);
        assert_eq!(t.get(3), original.get(4));
        for i in (0..8).filter(|&i| i != 3) {
            assert_eq!(t.get(i), original.get(i));
        }
    }

    #[test]
    fn test_out_of_range_source_skips_element_only() {
        let mut t = table();
        let expected = *t.get(1).unwrap();

        let stats = apply(&mut t, "6 {1, 99, -4}\n");

        assert_eq!(t.get(6), Some(&expected));
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.skipped_sources, 2);
    }

    #[test]
    fn test_missing_group_is_skipped() {
        let mut t = table();
        let original = t.clone();

        let stats = apply(&mut t, "2\n2 {}\n");

        assert_eq!(t, original);
        assert_eq!(stats.empty_groups, 2);
    }

    #[test]
    fn test_missing_file_is_noop() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut t = table();
        let original = t.clone();

        let stats = OverrideResolver::apply_file(&mut t, temp.path().join("TexTerr.def")).unwrap();

        assert_eq!(stats, OverrideStats::default());
        assert_eq!(t, original);
    }
}
