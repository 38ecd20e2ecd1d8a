//! Data models for inventory tracking.
//!
//! - `InventoryEntry`: one count submission for one venue on one date
//! - `NewEntry`, `EntryPatch`: create and partial-update inputs
//! - `Item`, `ItemCounts`: the ten counted tableware items
//! - `Venue`: the two tracked restaurant locations
//! - `Backup`: the JSON backup document

pub mod backup;
pub mod entry;
pub mod item;
pub mod venue;

pub use backup::{Backup, BACKUP_VERSION};
pub use entry::{EntryPatch, InventoryEntry, NewEntry};
pub use item::{Item, ItemCounts};
pub use venue::Venue;
