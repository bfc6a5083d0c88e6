use std::mem;

use log::{debug, error, trace};

use crate::{
    CountingMode, DeletionMode, TableConfig, TableError,
    config::BASE_SIZE,
    prime::next_prime,
    probe::ProbeSequence,
};

/// An owned key-value pair. Never edited in place: an overwrite replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// The key of the pair
    key: String,
    /// The value associated with the key
    value: String,
}

impl Entry {
    /// Copies `key` and `value` into a new entry
    fn try_new(key: &str, value: &str) -> Result<Self, TableError> {
        Ok(Self { key: copy_str(key)?, value: copy_str(value)? })
    }
}

/// Allocates an empty string able to hold `len` bytes
fn reserve_string(len: usize) -> Result<String, TableError> {
    let mut owned = String::new();
    owned.try_reserve_exact(len).map_err(|_| TableError::StringAllocationFailed { len })?;
    Ok(owned)
}

/// Copies `s` into a freshly allocated string
fn copy_str(s: &str) -> Result<String, TableError> {
    let mut owned = reserve_string(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

/// One bucket of the table
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// Never used, or cleared by an empty-slot deletion. Ends every probe walk.
    Empty,
    /// Left behind by a tombstone deletion. Probe walks continue past it.
    Tombstone,
    /// Holds a live entry
    Occupied(Entry),
}

/// Allocates `capacity` empty slots, reporting allocation failure instead of aborting
fn allocate_slots(capacity: usize) -> Result<Vec<Slot>, TableError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocationFailed { capacity })?;
    slots.resize(capacity, Slot::Empty);
    Ok(slots)
}

/// Logs an unrecoverable table error and terminates the process.
fn fatal(err: &TableError) -> ! {
    error!("Fatal hash table error: {err}");
    eprintln!("primehash: {err}");
    std::process::abort()
}

/// A string-keyed hash table with open addressing and double hashing.
///
/// The bucket count is always prime. Each key is probed at
/// `(h1 + i * (h2 + 1)) mod capacity`, where `h1` and `h2` are polynomial hashes of the key
/// with two different prime multipliers. Before every insert the table grows to
/// `next_prime(2 * capacity)` once the load exceeds the grow threshold, and after every delete it
/// shrinks to `next_prime(capacity / 2)` once the load drops below the shrink threshold.
///
/// The default configuration keeps two long-standing quirks of this design, both of which
/// can be switched off through [`TableConfig`]:
///
/// - [`DeletionMode::EmptySlot`]: a deletion empties its slot, so a later search for a key
///   that was placed past that slot can stop early and miss it.
/// - [`CountingMode::EveryInsert`]: overwriting an existing key still bumps [`len`](Self::len).
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct HashTable {
    /// The buckets; the vector length is the capacity
    slots: Vec<Slot>,
    /// Recorded number of entries, see [`CountingMode`]
    count: usize,
    /// Number of tombstone slots
    tombstones: usize,
    /// Thresholds, multipliers and behaviour switches
    config: TableConfig,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for HashTable
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v.as_ref());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl HashTable {
    /// Creates an empty table with 53 buckets and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        debug!("Creating hash table with {BASE_SIZE} slots");
        Self {
            slots: vec![Slot::Empty; BASE_SIZE],
            count: 0,
            tombstones: 0,
            config: TableConfig::default(),
        }
    }

    /// Creates an empty table with `config.base_size` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] when `config` does not validate and
    /// [`TableError::AllocationFailed`] when the buckets cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        debug!("Creating hash table with {} slots and {config:?}", config.base_size);
        Ok(Self { slots: allocate_slots(config.base_size)?, count: 0, tombstones: 0, config })
    }

    /// Releases the table and every entry it owns.
    #[allow(clippy::needless_pass_by_value)]
    pub fn destroy(self) {
        debug!("Destroying hash table with {} slots and {} entries", self.capacity(), self.count);
    }

    /// Inserts a copy of `key` and `value`, replacing any value stored under `key`.
    ///
    /// Aborts the process if a resize cannot allocate its buckets; use
    /// [`try_insert`](Self::try_insert) to handle that case instead.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Err(err) = self.try_insert(key, value) {
            fatal(&err);
        }
    }

    /// Inserts a copy of `key` and `value`, replacing any value stored under `key`.
    ///
    /// When live entries alone exceed the grow threshold the table doubles. When only the
    /// tombstones push it over, the table is rebuilt at its current capacity instead.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::StringAllocationFailed`] when the key or value cannot be copied,
    /// and [`TableError::AllocationFailed`] or [`TableError::CapacityOverflow`] when the table
    /// needed to grow and could not. The table is left unchanged in those cases.
    pub fn try_insert(&mut self, key: &str, value: &str) -> Result<(), TableError> {
        let entry = Entry::try_new(key, value)?;

        let capacity = self.capacity();
        if self.load_percent(self.count) > self.config.grow_percent {
            let target = capacity
                .checked_mul(2)
                .and_then(next_prime)
                .ok_or(TableError::CapacityOverflow { capacity })?;
            self.resize(target)?;
        } else if self.load_percent(self.count.saturating_add(self.tombstones))
            > self.config.grow_percent
        {
            self.resize(capacity)?;
        }

        self.store(entry)
    }

    /// Places `entry` on its probe sequence without consulting the resize policy.
    ///
    /// Fails with [`TableError::TableFull`] when the walk meets neither a free slot nor `key`,
    /// which the grow threshold rules out for tables built through the public API.
    fn store(&mut self, entry: Entry) -> Result<(), TableError> {
        let mut first_tombstone = None;
        let mut target = None;

        for index in self.probe(&entry.key) {
            match self.slots.get(index) {
                Some(Slot::Empty) => {
                    target = first_tombstone.or(Some(index));
                    break;
                }
                Some(Slot::Tombstone) => {
                    first_tombstone = first_tombstone.or(Some(index));
                }
                Some(Slot::Occupied(existing)) if existing.key == entry.key => {
                    target = Some(index);
                    break;
                }
                Some(Slot::Occupied(_)) | None => {}
            }
        }

        let capacity = self.slots.len();
        let Some(slot) = target.or(first_tombstone).and_then(|index| self.slots.get_mut(index))
        else {
            error!("No free slot for key {:?} in a table of {capacity} slots", entry.key);
            return Err(TableError::TableFull { capacity });
        };

        let is_new_key = match mem::replace(slot, Slot::Occupied(entry)) {
            Slot::Empty => true,
            Slot::Tombstone => {
                self.tombstones = self.tombstones.saturating_sub(1);
                true
            }
            Slot::Occupied(previous) => {
                trace!("Overwriting value of key {:?}", previous.key);
                false
            }
        };

        if is_new_key || self.config.counting == CountingMode::EveryInsert {
            self.count = self.count.saturating_add(1);
        }
        Ok(())
    }

    /// Returns the value stored under `key`.
    ///
    /// The returned view borrows the table, so it cannot outlive the next insert or delete.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<&str> {
        let (index, _) = self.locate(key);
        match self.slots.get(index?)? {
            Slot::Occupied(entry) => Some(entry.value.as_str()),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns `true` when a search for `key` finds a value
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.locate(key).0.is_some()
    }

    /// Returns how many slots a search for `key` inspects, including the one it stops at.
    #[must_use]
    pub fn probe_length(&self, key: &str) -> usize {
        self.locate(key).1
    }

    /// Walks the probe sequence of `key` like a search.
    ///
    /// Returns the slot holding `key`, if one is reached, and the number of slots inspected.
    fn locate(&self, key: &str) -> (Option<usize>, usize) {
        let mut probes: usize = 0;
        for index in self.probe(key) {
            probes = probes.saturating_add(1);
            match self.slots.get(index) {
                Some(Slot::Empty) | None => return (None, probes),
                Some(Slot::Occupied(entry)) if entry.key == key => return (Some(index), probes),
                Some(Slot::Occupied(_) | Slot::Tombstone) => {}
            }
        }
        (None, probes)
    }

    /// Removes `key`. Deleting a missing key changes nothing but may still shrink the table.
    ///
    /// Aborts the process if a shrink cannot allocate its buckets; use
    /// [`try_delete`](Self::try_delete) to handle that case instead.
    pub fn delete(&mut self, key: &str) {
        if let Err(err) = self.try_delete(key) {
            fatal(&err);
        }
    }

    /// Removes `key`.
    ///
    /// Every slot on the probe sequence that holds `key`, up to the first empty slot, is
    /// cleared and decrements the count.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] when the table needed to shrink and could not.
    /// The deletion itself has already happened in that case.
    pub fn try_delete(&mut self, key: &str) -> Result<(), TableError> {
        let cleared = match self.config.deletion {
            DeletionMode::EmptySlot => Slot::Empty,
            DeletionMode::Tombstone => Slot::Tombstone,
        };

        for index in self.probe(key) {
            let Some(slot) = self.slots.get_mut(index) else { break };
            if *slot == Slot::Empty {
                break;
            }
            if !matches!(slot, Slot::Occupied(entry) if entry.key == key) {
                continue;
            }

            *slot = cleared.clone();
            self.count = self.count.saturating_sub(1);
            if cleared == Slot::Tombstone {
                self.tombstones = self.tombstones.saturating_add(1);
            }
            trace!("Deleted key {key:?} from slot {index}");
        }

        if self.load_percent(self.count) < self.config.shrink_percent {
            let capacity = self.capacity();
            let target =
                next_prime(capacity / 2).ok_or(TableError::CapacityOverflow { capacity })?;
            if target != capacity {
                self.resize(target)?;
            }
        }
        Ok(())
    }

    /// Rehashes every live entry into `new_capacity` fresh slots and adopts them.
    ///
    /// The old storage is only replaced once the new one is fully built, so on error the table
    /// is untouched. Tombstones are dropped. Under [`CountingMode::EveryInsert`] the recorded
    /// count carries over unchanged.
    fn resize(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let mut fresh = Self {
            slots: allocate_slots(new_capacity)?,
            count: 0,
            tombstones: 0,
            config: self.config,
        };

        for entry in self.entries() {
            fresh.try_insert(&entry.key, &entry.value)?;
        }

        debug!(
            "Resized hash table from {} to {} slots ({} recorded, {} live entries)",
            self.capacity(),
            new_capacity,
            self.count,
            fresh.count
        );

        mem::swap(&mut self.slots, &mut fresh.slots);
        self.tombstones = 0;
        if self.config.counting == CountingMode::DistinctKeys {
            self.count = fresh.count;
        }
        Ok(())
    }

    /// The probe sequence of `key` in the current bucket array
    fn probe(&self, key: &str) -> ProbeSequence {
        ProbeSequence::new(key, &self.config, self.slots.len())
    }

    /// `n * 100 / capacity`, the integer load percentage the resize policy compares against
    #[allow(clippy::arithmetic_side_effects)]
    fn load_percent(&self, n: usize) -> usize {
        n.saturating_mul(100) / self.slots.len().max(1)
    }

    /// Live entries in slot order
    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(entry) => Some(entry),
            Slot::Empty | Slot::Tombstone => None,
        })
    }

    /// Returns the recorded number of entries.
    ///
    /// Under [`CountingMode::EveryInsert`] overwrites are counted too, so this can exceed the
    /// number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the recorded count is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of buckets, which is always prime
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones currently occupying buckets
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the configuration the table was built with
    #[must_use]
    pub fn config(&self) -> TableConfig {
        self.config
    }

    /// Returns the current load factor of the table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Removes every entry while keeping the current capacity
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.count = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over the stored key-value pairs, in no particular order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.slots.iter() }
    }
}

/// Iterator over the key-value pairs of a [`HashTable`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Remaining buckets
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied(entry) => Some((entry.key.as_str(), entry.value.as_str())),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}
