//! Mode-aware data loading.
//!
//! `DataLoader` is what front-ends talk to. In `api` mode it reads and
//! writes through the remote functions and mirrors every successful load
//! into the local store. When the remote fails it switches the persisted
//! mode to `local` and serves the local store instead. Going back online
//! only happens through `reconnect`.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Backup, EntryPatch, InventoryEntry, NewEntry, Venue};
use crate::storage::LocalStorage;
use crate::store::{EntryStore, ModeController, StorageMode};

/// Where a `LoadResult` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fresh data from the remote functions
    Remote,
    /// Served from the local store (offline, or the remote just failed)
    Local,
}

#[derive(Debug, Clone)]
pub struct LoadResult {
    pub port: Vec<InventoryEntry>,
    pub dickens: Vec<InventoryEntry>,
    pub source: DataSource,
}

impl LoadResult {
    pub fn total(&self) -> usize {
        self.port.len() + self.dickens.len()
    }

    pub fn for_venue(&self, venue: Venue) -> &[InventoryEntry] {
        match venue {
            Venue::Port => &self.port,
            Venue::Dickens => &self.dickens,
        }
    }

    /// Both venues, first venue first
    pub fn all(&self) -> Vec<InventoryEntry> {
        self.port.iter().chain(&self.dickens).cloned().collect()
    }
}

pub struct DataLoader<S> {
    api: ApiClient,
    store: EntryStore<S>,
    modes: ModeController<S>,
}

impl<S: LocalStorage + Clone> DataLoader<S> {
    /// The entry store and mode controller share `storage`
    pub fn new(api: ApiClient, storage: S) -> Self {
        Self {
            api,
            store: EntryStore::new(storage.clone()),
            modes: ModeController::new(storage),
        }
    }

    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    pub fn modes(&self) -> &ModeController<S> {
        &self.modes
    }

    pub fn mode(&self) -> StorageMode {
        self.modes.get_mode()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load both venues according to the current mode
    pub async fn load_all(&self) -> LoadResult {
        if self.modes.is_offline() {
            debug!("Local mode, serving entries from local store");
            return self.load_local();
        }

        match self.fetch_remote().await {
            Ok((port, dickens)) => {
                if let Err(e) = self.store.sync_from_api(&port, &dickens) {
                    warn!(error = %e, "Failed to mirror remote entries locally");
                }
                info!(port = port.len(), dickens = dickens.len(), "Loaded entries from remote");
                LoadResult {
                    port,
                    dickens,
                    source: DataSource::Remote,
                }
            }
            Err(e) => {
                warn!(error = %e, "Remote load failed, falling back to local store");
                self.fall_back_to_local();
                self.load_local()
            }
        }
    }

    /// Leave local mode and try the remote again
    pub async fn reconnect(&self) -> Result<LoadResult> {
        self.modes.reset_to_api_mode()?;
        info!("Reconnecting to remote");
        Ok(self.load_all().await)
    }

    async fn fetch_remote(&self) -> Result<(Vec<InventoryEntry>, Vec<InventoryEntry>)> {
        futures::try_join!(
            self.api.fetch_entries(Venue::Port.as_str()),
            self.api.fetch_entries(Venue::Dickens.as_str()),
        )
    }

    fn load_local(&self) -> LoadResult {
        LoadResult {
            port: self.store.get_entries_by_venue(Venue::Port.as_str()),
            dickens: self.store.get_entries_by_venue(Venue::Dickens.as_str()),
            source: DataSource::Local,
        }
    }

    fn fall_back_to_local(&self) {
        if let Err(e) = self.modes.set_mode(StorageMode::Local) {
            warn!(error = %e, "Failed to persist local storage mode");
        }
    }

    /// Errors that mean the remote is down, as opposed to the remote
    /// rejecting this request. Anything that is not an `ApiError` came from
    /// the transport and counts as down.
    fn is_remote_down(err: &anyhow::Error) -> bool {
        err.downcast_ref::<ApiError>()
            .map(ApiError::is_unavailable)
            .unwrap_or(true)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn add_entry(&self, entry: NewEntry) -> Result<InventoryEntry> {
        entry.validate()?;

        if !self.modes.is_offline() {
            match self.api.create_entry(&entry).await {
                Ok(created) => {
                    self.load_all().await;
                    return Ok(created);
                }
                Err(e) if !Self::is_remote_down(&e) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Remote create failed, saving locally");
                    self.fall_back_to_local();
                }
            }
        }

        Ok(self.store.add_entry(entry)?)
    }

    /// Entry `id` from the local mirror, reloading from the remote once when
    /// the mirror does not have it
    async fn mirrored_entry(&self, id: i64) -> Option<InventoryEntry> {
        let find = || {
            self.store
                .get_all_entries()
                .into_iter()
                .find(|entry| entry.id == id)
        };
        if let Some(entry) = find() {
            return Some(entry);
        }
        debug!(id, "Entry not in local mirror, reloading");
        self.load_all().await;
        find()
    }

    /// Merge `patch` into entry `id`. `Ok(None)` if the entry is unknown.
    ///
    /// The remote replaces whole records, so in `api` mode the merge is done
    /// against the mirrored copy and the full result is sent.
    pub async fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<Option<InventoryEntry>> {
        patch.validate()?;

        if !self.modes.is_offline() {
            match self.mirrored_entry(id).await {
                Some(mut merged) => {
                    patch.apply(&mut merged);
                    match self.api.update_entry(&merged).await {
                        Ok(updated) => {
                            self.load_all().await;
                            return Ok(updated);
                        }
                        Err(e) if !Self::is_remote_down(&e) => return Err(e),
                        Err(e) => {
                            warn!(error = %e, "Remote update failed, updating locally");
                            self.fall_back_to_local();
                        }
                    }
                }
                // The reload itself failed and switched to local mode
                None if self.modes.is_offline() => {}
                None => {
                    debug!(id, "Update skipped, entry not found remotely");
                    return Ok(None);
                }
            }
        }

        Ok(self.store.update_entry(id, patch)?)
    }

    /// Delete entry `id`, returning whether a record was removed. Ids the
    /// remote does not list are reported as not found without a request.
    pub async fn delete_entry(&self, id: i64) -> Result<bool> {
        if !self.modes.is_offline() {
            match self.mirrored_entry(id).await {
                Some(_) => match self.api.delete_entry(id).await {
                    Ok(()) => {
                        self.load_all().await;
                        return Ok(true);
                    }
                    Err(e) if !Self::is_remote_down(&e) => return Err(e),
                    Err(e) => {
                        warn!(error = %e, "Remote delete failed, deleting locally");
                        self.fall_back_to_local();
                    }
                },
                None if self.modes.is_offline() => {}
                None => {
                    debug!(id, "Delete skipped, entry not found remotely");
                    return Ok(false);
                }
            }
        }

        Ok(self.store.delete_entry(id)?)
    }

    // =========================================================================
    // Backups
    // =========================================================================

    /// Restore a backup into the local store, returning the record count
    pub fn import_backup(&self, backup: &Backup) -> Result<usize> {
        if !backup.is_consistent() {
            warn!(
                declared = backup.total_records,
                actual = backup.entries.len(),
                "Backup record count does not match its entries"
            );
        }
        self.store.import_data(&backup.entries)?;
        info!(count = backup.entries.len(), "Imported backup");
        Ok(backup.entries.len())
    }

    /// Full backup: from the backup function when online, otherwise (or if
    /// that fails) built from the local store
    pub async fn export_backup(&self) -> Backup {
        if !self.modes.is_offline() && self.api.has_backup_endpoint() {
            match self.api.fetch_backup().await {
                Ok(backup) => return backup,
                Err(e) => warn!(error = %e, "Remote backup failed, using local store"),
            }
        }
        Backup::new(self.store.get_all_entries(), Utc::now())
    }
}

// ============================================================================
// Tests
// ============================================================================
