use thiserror::Error;

/// Errors reported by the fallible [`HashTable`](crate::HashTable) operations.
///
/// Missing keys are not errors: `search` returns `None` and `delete` does nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The bucket array for a resize could not be allocated.
    #[error("Failed to allocate bucket array of {capacity} slots")]
    AllocationFailed {
        /// Requested bucket count.
        capacity: usize,
    },
    /// A key or value could not be copied into the table.
    #[error("Failed to allocate {len} bytes for a key or value")]
    StringAllocationFailed {
        /// Length of the string being copied.
        len: usize,
    },
    /// An insert walked every slot without finding the key or a free slot.
    #[error("No free slot left in a table of {capacity} slots")]
    TableFull {
        /// Bucket count of the full table.
        capacity: usize,
    },
    /// The next prime capacity does not fit in a `usize`.
    #[error("Cannot grow table past {capacity} slots")]
    CapacityOverflow {
        /// Bucket count at the time of the failed resize.
        capacity: usize,
    },
    /// A [`TableConfig`](crate::TableConfig) failed validation.
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}
