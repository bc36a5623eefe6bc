//! Key-value persistence for client-side state.
//!
//! The stores write their state through a [`KeyValueStore`], the same shape as
//! browser local storage: string keys, string values, no transactions. Two
//! backings are provided:
//!
//! - [`MemoryStorage`] - process-local map, used by tests and throwaway sessions
//! - [`FileStorage`] - one JSON document per key inside a directory
//!
//! Values are opaque to the storage layer. Decoding, validation and discarding
//! corrupt documents are the stores' job.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A previous writer panicked while holding the storage lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store with local-storage semantics.
///
/// Implementations take `&self` and handle their own interior mutability so a
/// single backing can be shared by the session and cart stores.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
