//! Tunable constants and per-table configuration.

use crate::{TableError, prime::is_prime};

/// Bucket count of a freshly created table.
pub const BASE_SIZE: usize = 53;
/// Multiplier of the primary polynomial hash.
pub const HASH_PRIME_A: u64 = 157;
/// Multiplier of the secondary polynomial hash, which drives the probe step.
pub const HASH_PRIME_B: u64 = 199;
/// The table grows once `count * 100 / capacity` exceeds this.
pub const GROW_PERCENT: usize = 70;
/// The table shrinks once `count * 100 / capacity` drops below this.
pub const SHRINK_PERCENT: usize = 10;

/// What a deletion leaves behind in the slot it clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionMode {
    /// The slot becomes empty.
    ///
    /// A search for another key whose probe sequence ran through the cleared slot stops there
    /// and reports the key as missing, even though it is still stored further along.
    #[default]
    EmptySlot,
    /// The slot keeps a tombstone that searches walk past and inserts may reuse.
    Tombstone,
}

/// How `insert` maintains the recorded entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountingMode {
    /// Every insert call bumps the count, including overwrites of an existing key.
    ///
    /// Repeated overwrites inflate the count and feed spurious growth.
    #[default]
    EveryInsert,
    /// Only inserts that store a new key bump the count.
    DistinctKeys,
}

/// Configuration of a [`HashTable`](crate::HashTable).
///
/// The default reproduces the classic behaviour: base size 53, multipliers 157 and 199,
/// growth above 70% load, shrinking below 10%, empty-slot deletion and per-call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Initial bucket count; must be prime.
    pub base_size: usize,
    /// Primary hash multiplier; must be prime.
    pub prime_a: u64,
    /// Secondary hash multiplier; must be prime.
    pub prime_b: u64,
    /// Grow threshold in percent, `1..=95`.
    pub grow_percent: usize,
    /// Shrink threshold in percent, below `grow_percent`.
    pub shrink_percent: usize,
    /// Deletion behaviour.
    pub deletion: DeletionMode,
    /// Count maintenance behaviour.
    pub counting: CountingMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            base_size: BASE_SIZE,
            prime_a: HASH_PRIME_A,
            prime_b: HASH_PRIME_B,
            grow_percent: GROW_PERCENT,
            shrink_percent: SHRINK_PERCENT,
            deletion: DeletionMode::EmptySlot,
            counting: CountingMode::EveryInsert,
        }
    }
}

impl TableConfig {
    /// Default constants with tombstone deletion and distinct-key counting.
    #[must_use]
    pub fn corrected() -> Self {
        Self {
            deletion: DeletionMode::Tombstone,
            counting: CountingMode::DistinctKeys,
            ..Self::default()
        }
    }

    /// Sets the initial bucket count
    #[must_use]
    pub fn with_base_size(mut self, base_size: usize) -> Self {
        self.base_size = base_size;
        self
    }

    /// Sets both hash multipliers
    #[must_use]
    pub fn with_primes(mut self, prime_a: u64, prime_b: u64) -> Self {
        self.prime_a = prime_a;
        self.prime_b = prime_b;
        self
    }

    /// Sets the grow and shrink thresholds, in percent
    #[must_use]
    pub fn with_thresholds(mut self, grow_percent: usize, shrink_percent: usize) -> Self {
        self.grow_percent = grow_percent;
        self.shrink_percent = shrink_percent;
        self
    }

    /// Sets the deletion mode
    #[must_use]
    pub fn with_deletion(mut self, deletion: DeletionMode) -> Self {
        self.deletion = deletion;
        self
    }

    /// Sets the counting mode
    #[must_use]
    pub fn with_counting(mut self, counting: CountingMode) -> Self {
        self.counting = counting;
        self
    }

    /// Checks that the configuration describes a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] when the base size or either multiplier is not
    /// prime, when `grow_percent` is outside `1..=95`, or when `shrink_percent` is not below
    /// `grow_percent`.
    pub fn validate(&self) -> Result<(), TableError> {
        if !is_prime(self.base_size) {
            return Err(TableError::InvalidConfig(format!(
                "base size {} is not prime",
                self.base_size
            )));
        }
        for multiplier in [self.prime_a, self.prime_b] {
            let prime = usize::try_from(multiplier).is_ok_and(is_prime);
            if !prime {
                return Err(TableError::InvalidConfig(format!(
                    "hash multiplier {multiplier} is not prime"
                )));
            }
        }
        if !(1..=95).contains(&self.grow_percent) {
            return Err(TableError::InvalidConfig(format!(
                "grow threshold {}% is outside 1..=95",
                self.grow_percent
            )));
        }
        if self.shrink_percent >= self.grow_percent {
            return Err(TableError::InvalidConfig(format!(
                "shrink threshold {}% is not below grow threshold {}%",
                self.shrink_percent, self.grow_percent
            )));
        }
        Ok(())
    }
}
