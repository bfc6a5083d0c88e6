//! Polynomial string hashing and the double-hash probe sequence.

use log::debug;

use crate::TableConfig;

/// Evaluates the key's bytes as polynomial coefficients in `multiplier`, modulo `buckets`.
///
/// `hash(s) = (s[0] * a^(n-1) + s[1] * a^(n-2) + ... + s[n-1]) mod m`, computed with Horner's
/// rule so intermediate values stay below `m * a + 255`.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn polynomial_hash(key: &str, multiplier: u64, buckets: usize) -> usize {
    let modulus = buckets.max(1) as u128;
    let multiplier = u128::from(multiplier) % modulus;
    let hash = key
        .bytes()
        .fold(0_u128, |acc, byte| (acc * multiplier + u128::from(byte)) % modulus);
    // below `buckets`, so the narrowing is lossless
    hash as usize
}

/// The slot indices visited for one key: `(h1 + i * (h2 + 1)) mod capacity` for `i = 0, 1, ...`.
///
/// Yields at most `capacity` indices. With a prime capacity and a non-zero step these are all
/// distinct, so the walk covers the whole table.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSequence {
    /// Next index to yield
    index: usize,
    /// Distance between consecutive probes, in `1..capacity` (or 1 for a single-slot table)
    step: usize,
    /// Bucket count of the table being probed
    capacity: usize,
    /// Probes left before the sequence would start repeating
    remaining: usize,
}

impl ProbeSequence {
    /// Starts the probe sequence of `key` in a table of `capacity` slots.
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn new(key: &str, config: &TableConfig, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let first = polynomial_hash(key, config.prime_a, capacity);
        let second = polynomial_hash(key, config.prime_b, capacity);

        // `second + 1 == capacity` would pin every attempt to the home slot
        let mut step = (second + 1) % capacity;
        if step == 0 {
            debug!("Remapping zero probe step to 1 for key {key:?} at capacity {capacity}");
            step = 1;
        }

        Self { index: first, step, capacity, remaining: capacity }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);

        let current = self.index;
        // modular add without risking `index + step` overflowing
        let headroom = self.capacity.saturating_sub(self.step);
        self.index = if current >= headroom {
            current.saturating_sub(headroom)
        } else {
            current.saturating_add(self.step)
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
