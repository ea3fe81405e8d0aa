//! Generational slot pool for record reuse.
//!
//! A `SlotPool<T>` owns every record it ever created. Renting a record hands
//! out a [`SlotToken`] (slot index plus the slot's version at rent time);
//! releasing returns the slot to the idle set. The version is bumped each
//! time a slot is rented again, so a token kept past its release can never
//! reach the next tenant's data.

use std::fmt;

use crate::stats::PoolStats;

/// Records that can be wiped back to their freshly-constructed state.
pub trait Recycle {
    /// Reset all state so the record can serve an unrelated tenant.
    fn recycle(&mut self);
}

/// Handle to a rented slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotToken {
    index: usize,
    version: u64,
}

impl SlotToken {
    /// Slot index inside the owning pool.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Slot version observed when the token was issued.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl fmt::Display for SlotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.version)
    }
}

/// Error returned when a token does not name a currently rented slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// The slot has been rented again since the token was issued.
    #[error("stale token {token}: slot is at version {current}")]
    Stale {
        /// Token that was presented.
        token: SlotToken,
        /// Current version of the slot.
        current: u64,
    },

    /// The slot is idle; the token's tenant already released it.
    #[error("slot {0} is not rented")]
    NotRented(SlotToken),

    /// The index is out of range for this pool.
    #[error("token {0} does not belong to this pool")]
    Unknown(SlotToken),
}

struct Slot<T> {
    value: T,
    version: u64,
    rented: bool,
}

/// Pool of reusable records addressed by versioned tokens.
///
/// Idle slots are reused LIFO, so the most recently released record is the
/// next one handed out.
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    idle: Vec<usize>,
    factory: fn() -> T,
    stats: PoolStats,
}

impl<T: Recycle> SlotPool<T> {
    /// Create an empty pool that builds new records with `factory`.
    #[must_use]
    pub const fn new(factory: fn() -> T) -> Self {
        Self {
            slots: Vec::new(),
            idle: Vec::new(),
            factory,
            stats: PoolStats::new(),
        }
    }

    /// Create an empty pool with room for `capacity` slots before reallocating.
    #[must_use]
    pub fn with_capacity(factory: fn() -> T, capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            idle: Vec::with_capacity(capacity),
            factory,
            stats: PoolStats::new(),
        }
    }

    /// Rent a slot, reusing an idle one when possible.
    ///
    /// A reused slot is recycled and its version bumped; a new slot starts at
    /// version 0. Never fails.
    pub fn acquire(&mut self) -> SlotToken {
        let token = if let Some(index) = self.idle.pop() {
            let slot = &mut self.slots[index];
            slot.version = slot.version.wrapping_add(1);
            slot.value.recycle();
            slot.rented = true;
            self.stats.record_hit();
            SlotToken {
                index,
                version: slot.version,
            }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                value: (self.factory)(),
                version: 0,
                rented: true,
            });
            self.stats.record_miss();
            SlotToken { index, version: 0 }
        };
        self.stats.record_rented(self.rented());
        token
    }

    /// Return a rented slot to the idle set.
    pub fn release(&mut self, token: SlotToken) -> Result<(), SlotError> {
        self.check(token)?;
        self.slots[token.index].rented = false;
        self.idle.push(token.index);
        self.stats.record_release();
        Ok(())
    }

    /// Borrow the record behind `token`.
    pub fn get(&self, token: SlotToken) -> Result<&T, SlotError> {
        self.check(token)?;
        Ok(&self.slots[token.index].value)
    }

    /// Mutably borrow the record behind `token`.
    pub fn get_mut(&mut self, token: SlotToken) -> Result<&mut T, SlotError> {
        self.check(token)?;
        Ok(&mut self.slots[token.index].value)
    }

    /// Whether `token` names a currently rented slot.
    #[must_use]
    pub fn is_live(&self, token: SlotToken) -> bool {
        self.check(token).is_ok()
    }

    fn check(&self, token: SlotToken) -> Result<(), SlotError> {
        let slot = self
            .slots
            .get(token.index)
            .ok_or(SlotError::Unknown(token))?;
        if slot.version != token.version {
            return Err(SlotError::Stale {
                token,
                current: slot.version,
            });
        }
        if !slot.rented {
            return Err(SlotError::NotRented(token));
        }
        Ok(())
    }

    /// Force every rented slot back into the idle set, invalidating all
    /// outstanding tokens. Returns the number of slots reclaimed.
    pub fn reclaim_all(&mut self) -> usize {
        let mut reclaimed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.rented {
                slot.rented = false;
                slot.version = slot.version.wrapping_add(1);
                self.idle.push(index);
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Pre-populate the idle set until it holds at least `count` slots.
    pub fn warm(&mut self, count: usize) {
        let to_add = count.saturating_sub(self.idle.len());
        self.slots.reserve(to_add);
        for _ in 0..to_add {
            let index = self.slots.len();
            self.slots.push(Slot {
                value: (self.factory)(),
                version: 0,
                rented: false,
            });
            self.idle.push(index);
        }
    }

    /// Number of idle slots.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Number of rented slots.
    #[must_use]
    pub fn rented(&self) -> usize {
        self.slots.len() - self.idle.len()
    }

    /// Total number of slots ever allocated.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&mut self) {
        self.stats = PoolStats::new();
    }

    /// Restart the `peak_rented` high-water mark from the current rent count,
    /// leaving the other counters untouched.
    pub fn reset_peak(&mut self) {
        self.stats.peak_rented = 0;
        self.stats.record_rented(self.rented());
    }
}
