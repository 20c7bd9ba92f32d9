//! Fixed-capacity table of index entries

use super::Entry;

/// Index entries keyed by resource ID
///
/// The capacity is fixed at construction. Every accessor treats an index
/// outside `[0, capacity)` as "not there" rather than panicking, because
/// shipped override files reference slots that do not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTable {
    entries: Vec<Entry>,
}

impl EntryTable {
    /// Create a table of `capacity` empty entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Entry::EMPTY; capacity],
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Whether `index` addresses a slot in this table
    #[must_use]
    pub fn contains(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.entries.len())
    }

    /// Raw entry at `index`, if in range
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Entry at `index`, or [`Entry::EMPTY`] when the index is out of range
    /// or the stored entry has no data.
    #[must_use]
    pub fn valid_entry(&self, index: usize) -> &Entry {
        match self.entries.get(index) {
            Some(entry) if entry.is_valid() => entry,
            _ => &Entry::EMPTY,
        }
    }

    /// Overwrite the entry at `index`. Out-of-range writes are ignored.
    ///
    /// Returns whether the write happened.
    pub fn set(&mut self, index: usize, entry: Entry) -> bool {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Copy the entry at `source` into `target` by value.
    ///
    /// Either index being out of range makes this a no-op. Returns whether
    /// the copy happened.
    pub fn copy_entry(&mut self, target: i64, source: i64) -> bool {
        if !self.contains(target) || !self.contains(source) {
            return false;
        }
        let entry = self.entries[source as usize];
        self.entries[target as usize] = entry;
        true
    }

    /// Reset every slot to [`Entry::EMPTY`]
    pub fn clear(&mut self) {
        self.entries.fill(Entry::EMPTY);
    }

    /// Iterate `(index, entry)` pairs over all slots
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries.iter().enumerate()
    }

    /// Number of entries with decodable data
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mul::UNUSED_OFFSET;

    #[test]
    fn test_valid_entry_clamps_out_of_range() {
        let mut table = EntryTable::new(4);
        table.set(1, Entry::new(10, 20, 0));

        assert_eq!(table.valid_entry(1), &Entry::new(10, 20, 0));
        assert_eq!(table.valid_entry(4), &Entry::EMPTY);
        assert_eq!(table.valid_entry(usize::MAX), &Entry::EMPTY);
    }

    #[test]
    fn test_valid_entry_rejects_empty_and_unused() {
        let mut table = EntryTable::new(3);
        table.set(0, Entry::new(0, -1, 0));
        table.set(1, Entry::new(UNUSED_OFFSET, 8192, 0));
        table.set(2, Entry::new(64, 0, 1));

        assert_eq!(table.valid_entry(0), &Entry::EMPTY);
        assert_eq!(table.valid_entry(1), &Entry::EMPTY);
        assert_eq!(table.valid_entry(2), &Entry::EMPTY);
        assert_eq!(table.valid_count(), 0);
    }

    #[test]
    fn test_copy_entry_is_by_value() {
        let mut table = EntryTable::new(3);
        table.set(0, Entry::new(100, 8192, 0));

        assert!(table.copy_entry(2, 0));
        table.set(0, Entry::new(999, 1, 1));

        assert_eq!(table.get(2), Some(&Entry::new(100, 8192, 0)));
    }

    #[test]
    fn test_copy_entry_skips_out_of_range() {
        let mut table = EntryTable::new(3);
        table.set(0, Entry::new(100, 8192, 0));
        let before = table.clone();

        assert!(!table.copy_entry(-1, 0));
        assert!(!table.copy_entry(3, 0));
        assert!(!table.copy_entry(1, 3));
        assert!(!table.copy_entry(1, -5));
        assert_eq!(table, before);
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut table = EntryTable::new(2);
        assert!(!table.set(2, Entry::new(1, 1, 1)));
        assert_eq!(table.valid_count(), 0);
    }
}
