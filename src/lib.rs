//! # Prime Hash
//!
//! A string-keyed hash table using open addressing with double hashing.
//!
//! Keys and values are copied into the table on insert. Bucket counts are always prime, and the
//! table grows or shrinks by rehashing into a fresh bucket array once the load factor crosses
//! its thresholds.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primehash::HashTable;
//!
//! // Create a new table with 53 buckets
//! let mut table = HashTable::new();
//!
//! // Insert values
//! table.insert("apple", "red");
//! table.insert("banana", "yellow");
//!
//! // Retrieve values
//! assert_eq!(table.search("apple"), Some("red"));
//!
//! // Update values
//! table.insert("apple", "green");
//! assert_eq!(table.search("apple"), Some("green"));
//!
//! // Remove values
//! table.delete("apple");
//! assert_eq!(table.search("apple"), None);
//! ```
//!
//! ## Tombstone Deletion
//!
//! By default a deletion leaves an empty slot behind, which can cut short the probe walk of a
//! key stored further along the same sequence. [`TableConfig::corrected`] switches to tombstone
//! deletion and counts only distinct keys.
//!
//! ```rust
//! use primehash::{HashTable, TableConfig};
//!
//! let mut table = HashTable::with_config(TableConfig::corrected())?;
//! table.insert("a", "1");
//! table.insert("a", "2");
//! table.insert("b", "3");
//! assert_eq!(table.len(), 2);
//!
//! table.delete("a");
//! assert_eq!(table.search("b"), Some("3"));
//! # Ok::<(), primehash::TableError>(())
//! ```

/// Module with the tunable constants and table configuration
mod config;
/// Module with the error type of the fallible operations
mod error;
/// Module implementing the open-addressing hash table
mod hash_table;
/// Module with the primality helpers that pick bucket counts
mod prime;
/// Module computing polynomial hashes and probe sequences
mod probe;
/// Utility functions and traits for the hash table
mod utils;

pub use config::{
    BASE_SIZE, CountingMode, DeletionMode, GROW_PERCENT, HASH_PRIME_A, HASH_PRIME_B,
    SHRINK_PERCENT, TableConfig,
};
pub use error::TableError;
pub use hash_table::{HashTable, Iter};
pub use prime::{is_prime, next_prime};
pub use utils::HashMapExtensions;
