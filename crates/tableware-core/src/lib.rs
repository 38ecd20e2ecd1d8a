//! Core library for tableware - cutlery inventory tracking for two venues.
//!
//! Inventory entries live on a remote serverless endpoint. This crate keeps
//! a local persisted copy so the application keeps working when the remote
//! is unreachable:
//!
//! - `store::EntryStore`: the local entry collection
//! - `store::ModeController`: persisted api/local switch
//! - `loader::DataLoader`: routes reads and writes by mode, falls back to
//!   local on remote failure and mirrors remote data into the store
//!
//! Aggregation (`stats`) and export helpers (`export`) work on plain
//! entry slices and are shared by every front-end.

pub mod api;
pub mod config;
pub mod export;
pub mod loader;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use loader::{DataLoader, DataSource, LoadResult};
pub use models::{Backup, EntryPatch, InventoryEntry, Item, ItemCounts, NewEntry, Venue};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use store::{EntryStore, ModeController, StorageMode, StoreError};
