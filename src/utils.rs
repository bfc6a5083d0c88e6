//! Utility functions and traits for `HashTable`

use crate::HashTable;

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<K, V> {
    /// Returns the keys of the hash map as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the hash map as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns true if the hash map contains the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<str> + ?Sized;
}

impl HashMapExtensions<String, String> for HashTable {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<String> {
        self.iter().map(|(_, v)| v.to_owned()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<str> + ?Sized,
    {
        self.contains(key.as_ref())
    }
}
