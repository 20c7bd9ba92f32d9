//! Notifications for cache slots being filled and emptied

/// Receives notifications when cache slots are filled or emptied
///
/// Every `record_loaded` for an index is followed by exactly one
/// `record_released` before the next `record_loaded` for that index.
pub trait ResourceLedger: Send {
    /// A texture for `index` was decoded and cached
    fn record_loaded(&mut self, index: u32);

    /// The cached texture for `index` was disposed
    fn record_released(&mut self, index: u32) {
        let _ = index;
    }
}

/// Default ledger: ignores every notification
///
/// The cache already knows which slots are live (`TexmapCache::loaded_indices`),
/// so nothing needs to be tracked unless a caller asks for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLedger;

impl ResourceLedger for NullLedger {
    fn record_loaded(&mut self, _index: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_ledger_accepts_events() {
        let mut ledger = NullLedger;
        ledger.record_loaded(4);
        ledger.record_released(4);
        ledger.record_released(9);
    }
}
