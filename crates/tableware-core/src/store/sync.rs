use tracing::info;

use super::{EntryStore, StoreError};
use crate::models::InventoryEntry;
use crate::storage::LocalStorage;

impl<S: LocalStorage> EntryStore<S> {
    /// Mirror a successful remote load into the local store.
    ///
    /// The remote is authoritative: the stored collection becomes exactly
    /// `primary` followed by `secondary`, and records that only existed
    /// locally are dropped.
    pub fn sync_from_api(
        &self,
        primary: &[InventoryEntry],
        secondary: &[InventoryEntry],
    ) -> Result<(), StoreError> {
        let all: Vec<InventoryEntry> = primary.iter().chain(secondary).cloned().collect();
        self.import_data(&all)?;
        info!(
            primary = primary.len(),
            secondary = secondary.len(),
            "Synced remote entries to local store"
        );
        Ok(())
    }
}
