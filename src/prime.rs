//! Primality helpers used to pick bucket counts.
//!
//! A prime bucket count keeps the double-hash step coprime with the table size, so every
//! probe sequence visits each slot exactly once before repeating.

/// Returns `true` when `n` is prime.
///
/// Trial division by odd candidates up to `floor(sqrt(n))`, after an even check.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n <= 1 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor: usize = 3;
    // `divisor <= n / divisor` is `divisor * divisor <= n` without the overflow
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor = divisor.saturating_add(2);
    }
    true
}

/// Returns the smallest prime strictly greater than `n`.
///
/// Returns `None` when no such prime fits in a `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
