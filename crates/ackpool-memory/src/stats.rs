//! Pool statistics.

use std::ops::Sub;

/// Statistics for pool usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of rents served from the idle set.
    pub hits: u64,
    /// Number of rents that had to allocate a new slot.
    pub misses: u64,
    /// Number of slots handed back.
    pub releases: u64,
    /// Highest number of simultaneously rented slots.
    pub peak_rented: u64,
}

impl PoolStats {
    /// Create new zeroed stats.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            releases: 0,
            peak_rented: 0,
        }
    }

    /// Total number of rents.
    #[must_use]
    pub fn rents(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of rents served without allocating, in `[0.0, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let rents = self.rents();
        if rents == 0 {
            return 0.0;
        }
        self.hits as f64 / rents as f64
    }

    /// Fold another snapshot into this one (e.g. per-thread totals).
    pub fn merge(&mut self, other: &PoolStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.releases += other.releases;
        self.peak_rented = self.peak_rented.max(other.peak_rented);
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_release(&mut self) {
        self.releases += 1;
    }

    pub(crate) fn record_rented(&mut self, rented: usize) {
        self.peak_rented = self.peak_rented.max(rented as u64);
    }
}

/// Counter delta between two snapshots. `peak_rented` keeps the later value,
/// since a high-water mark cannot be subtracted.
impl Sub for PoolStats {
    type Output = PoolStats;

    fn sub(self, earlier: PoolStats) -> PoolStats {
        PoolStats {
            hits: self.hits.saturating_sub(earlier.hits),
            misses: self.misses.saturating_sub(earlier.misses),
            releases: self.releases.saturating_sub(earlier.releases),
            peak_rented: self.peak_rented,
        }
    }
}
