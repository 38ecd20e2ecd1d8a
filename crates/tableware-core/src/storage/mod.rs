//! Persistence medium for the local store.
//!
//! `LocalStorage` is a small string key/value interface. The entry store
//! and the mode controller each keep one key in it:
//!
//! - `inventory_entries`: JSON array of entries
//! - `storage_mode`: `"api"` or `"local"`
//!
//! `FileStorage` keeps one JSON file per key and survives restarts.
//! `MemoryStorage` is a shared in-process map for tests and throwaway runs.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::store::StoreError;

pub trait LocalStorage {
    /// Read the value stored under `key`, `None` if it was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}
