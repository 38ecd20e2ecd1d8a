//! Local store for inventory entries and the persisted storage mode.
//!
//! - `EntryStore`: the full entry collection, rewritten wholesale on every
//!   mutation
//! - `ModeController`: whether the application talks to the remote API or
//!   to the local store
//! - `EntryStore::sync_from_api`: mirrors authoritative remote data locally
//!
//! Stores are plain values owned by the caller. Two stores built over the
//! same storage see the same data; stores over separate storages are fully
//! independent.

pub mod entries;
pub mod error;
pub mod mode;
pub mod sync;

pub use entries::{EntryStore, ENTRIES_KEY};
pub use error::StoreError;
pub use mode::{ModeController, StorageMode, MODE_KEY};
