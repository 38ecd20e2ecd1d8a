use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use super::StoreError;
use crate::models::{EntryPatch, InventoryEntry, NewEntry};
use crate::storage::LocalStorage;

/// Storage key holding the JSON array of entries
pub const ENTRIES_KEY: &str = "inventory_entries";

/// The local entry collection.
///
/// Reads never fail: missing, unreadable or corrupt data reads as an empty
/// collection so the application stays usable. Every mutation reads the
/// full collection, changes it and writes it back in one piece.
#[derive(Debug, Clone)]
pub struct EntryStore<S> {
    storage: S,
}

impl<S: LocalStorage> EntryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// All entries in persisted order
    pub fn get_all_entries(&self) -> Vec<InventoryEntry> {
        let data = match self.storage.get_item(ENTRIES_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored entries, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Stored entries are corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Entries whose venue matches exactly
    pub fn get_entries_by_venue(&self, venue: &str) -> Vec<InventoryEntry> {
        self.get_all_entries()
            .into_iter()
            .filter(|entry| entry.is_venue(venue))
            .collect()
    }

    /// Wholesale write of the full collection
    pub fn save_all_entries(&self, entries: &[InventoryEntry]) -> Result<(), StoreError> {
        let contents = serde_json::to_string(entries)?;
        self.storage.set_item(ENTRIES_KEY, &contents)?;
        debug!(count = entries.len(), "Saved entries");
        Ok(())
    }

    /// Store a new entry, assigning its id and creation time
    pub fn add_entry(&self, entry: NewEntry) -> Result<InventoryEntry, StoreError> {
        entry.validate()?;

        let mut entries = self.get_all_entries();
        let id = next_id(&entries, Utc::now().timestamp_millis())?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let stored = entry.into_entry(id, created_at);

        entries.push(stored.clone());
        self.save_all_entries(&entries)?;
        debug!(id, venue = %stored.venue, date = %stored.date, "Added entry");
        Ok(stored)
    }

    /// Merge `patch` over the entry with `id`. `Ok(None)` if there is no
    /// such entry, in which case nothing is written.
    pub fn update_entry(
        &self,
        id: i64,
        patch: &EntryPatch,
    ) -> Result<Option<InventoryEntry>, StoreError> {
        patch.validate()?;

        let mut entries = self.get_all_entries();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            debug!(id, "Update skipped, entry not found");
            return Ok(None);
        };

        patch.apply(entry);
        let updated = entry.clone();
        self.save_all_entries(&entries)?;
        debug!(id, "Updated entry");
        Ok(Some(updated))
    }

    /// Remove the entry with `id`, returning whether one was removed
    pub fn delete_entry(&self, id: i64) -> Result<bool, StoreError> {
        let entries = self.get_all_entries();
        let before = entries.len();
        let remaining: Vec<InventoryEntry> =
            entries.into_iter().filter(|entry| entry.id != id).collect();

        if remaining.len() == before {
            debug!(id, "Delete skipped, entry not found");
            return Ok(false);
        }

        self.save_all_entries(&remaining)?;
        debug!(id, "Deleted entry");
        Ok(true)
    }

    /// Replace the whole collection, e.g. when restoring a backup
    pub fn import_data(&self, entries: &[InventoryEntry]) -> Result<(), StoreError> {
        self.save_all_entries(entries)
    }

    /// Drop the persisted collection entirely
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.storage.remove_item(ENTRIES_KEY)
    }
}

/// Ids follow the clock in milliseconds but always move past the largest
/// id already stored, so adds within the same millisecond stay unique.
fn next_id(entries: &[InventoryEntry], now_millis: i64) -> Result<i64, StoreError> {
    let max_existing = entries.iter().map(|entry| entry.id).max().unwrap_or(0);
    let after_existing = max_existing.checked_add(1).ok_or_else(|| {
        StoreError::InvalidEntry(format!("no id left after {}", max_existing))
    })?;
    Ok(now_millis.max(after_existing))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Venue};
    use crate::storage::{FileStorage, MemoryStorage};

    fn store() -> EntryStore<MemoryStorage> {
        EntryStore::new(MemoryStorage::new())
    }

    fn port_entry(date: &str) -> NewEntry {
        NewEntry::new(Venue::Port, date)
            .with_count(Item::Forks, 120)
            .with_count(Item::Knives, 110)
            .with_count(Item::SteakKnives, 48)
            .with_count(Item::Spoons, 115)
    }

    fn dickens_entry(date: &str) -> NewEntry {
        NewEntry::new(Venue::Dickens, date)
            .with_count(Item::Forks, 80)
            .with_count(Item::Plates, 90)
    }

    #[test]
    fn test_empty_store_reads_empty() {
        let store = store();
        assert!(store.get_all_entries().is_empty());
        assert!(store.get_entries_by_venue("PORT").is_empty());
    }

    #[test]
    fn test_corrupt_data_reads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(ENTRIES_KEY, "[{not json").unwrap();
        let store = EntryStore::new(storage);
        assert!(store.get_all_entries().is_empty());
    }

    #[test]
    fn test_add_port_entry_found_by_venue() {
        let store = store();
        let added = store.add_entry(port_entry("2025-10-01")).unwrap();

        let port = store.get_entries_by_venue("PORT");
        assert_eq!(port.len(), 1);
        assert_eq!(port[0].count(Item::Forks), 120);
        assert_eq!(port[0], added);
        assert!(added.created_at.is_some());
        assert!(store.get_entries_by_venue("Диккенс").is_empty());
    }

    #[test]
    fn test_add_rejects_empty_venue() {
        let store = store();
        let mut entry = port_entry("2025-10-01");
        entry.venue = String::new();
        assert!(matches!(store.add_entry(entry), Err(StoreError::InvalidEntry(_))));
        assert!(store.get_all_entries().is_empty());
    }

    #[test]
    fn test_rapid_adds_get_unique_increasing_ids() {
        let store = store();
        let ids: Vec<i64> = (0..50)
            .map(|_| store.add_entry(port_entry("2025-10-01")).unwrap().id)
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_next_id_moves_past_existing() {
        let store = store();
        let mut entry = store.add_entry(port_entry("2025-10-01")).unwrap();
        entry.id = i64::MAX / 2;
        store.import_data(&[entry.clone()]).unwrap();
        assert_eq!(next_id(&store.get_all_entries(), 1_000).unwrap(), entry.id + 1);
        assert_eq!(next_id(&[], 1_000).unwrap(), 1_000);
    }

    #[test]
    fn test_add_after_largest_possible_id_is_rejected() {
        let store = store();
        let mut entry = store.add_entry(port_entry("2025-10-01")).unwrap();
        entry.id = i64::MAX;
        store.import_data(&[entry.clone()]).unwrap();

        assert!(matches!(
            store.add_entry(port_entry("2025-10-02")),
            Err(StoreError::InvalidEntry(_))
        ));
        assert_eq!(store.get_all_entries(), vec![entry]);
    }

    #[test]
    fn test_count_is_adds_minus_successful_deletes() {
        let store = store();
        let a = store.add_entry(port_entry("2025-10-01")).unwrap();
        let b = store.add_entry(dickens_entry("2025-10-01")).unwrap();
        store.add_entry(port_entry("2025-10-02")).unwrap();

        assert!(store.delete_entry(a.id).unwrap());
        assert!(!store.delete_entry(a.id).unwrap());
        assert!(store.delete_entry(b.id).unwrap());
        assert!(!store.delete_entry(424242).unwrap());

        assert_eq!(store.get_all_entries().len(), 3 - 2);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let store = store();
        let a = store.add_entry(port_entry("2025-10-01")).unwrap();
        let b = store.add_entry(port_entry("2025-10-02")).unwrap();

        assert!(store.delete_entry(a.id).unwrap());
        assert_eq!(store.get_all_entries(), vec![b.clone()]);

        assert!(!store.delete_entry(a.id).unwrap());
        assert_eq!(store.get_all_entries(), vec![b]);
    }

    #[test]
    fn test_venue_filter_returns_matching_subset() {
        let store = store();
        store.add_entry(port_entry("2025-10-01")).unwrap();
        store.add_entry(dickens_entry("2025-10-01")).unwrap();
        store.add_entry(port_entry("2025-10-02")).unwrap();

        let all = store.get_all_entries();
        for venue in ["PORT", "Диккенс", "elsewhere"] {
            let expected: Vec<_> = all.iter().filter(|e| e.venue == venue).cloned().collect();
            assert_eq!(store.get_entries_by_venue(venue), expected);
        }
    }

    #[test]
    fn test_update_missing_id_changes_nothing() {
        let store = store();
        store.add_entry(port_entry("2025-10-01")).unwrap();
        let before = store.get_all_entries();

        let patch = EntryPatch::default().with_count(Item::Forks, 1);
        assert_eq!(store.update_entry(999, &patch).unwrap(), None);
        assert_eq!(store.get_all_entries(), before);
    }

    #[test]
    fn test_update_changes_only_patched_fields() {
        let store = store();
        let original = store.add_entry(port_entry("2025-10-01")).unwrap();
        let other = store.add_entry(dickens_entry("2025-10-01")).unwrap();

        let patch = EntryPatch {
            responsible_name: Some("Петров".to_string()),
            ..EntryPatch::default().with_count(Item::Knives, 100)
        };
        let updated = store.update_entry(original.id, &patch).unwrap().unwrap();

        let mut expected = original.clone();
        expected.counts.knives = 100;
        expected.responsible_name = Some("Петров".to_string());
        assert_eq!(updated, expected);
        assert_eq!(store.get_all_entries(), vec![expected, other]);
    }

    #[test]
    fn test_import_replaces_wholesale() {
        let store = store();
        store.add_entry(port_entry("2025-10-01")).unwrap();
        store.add_entry(dickens_entry("2025-10-01")).unwrap();

        let other = EntryStore::new(MemoryStorage::new());
        let replacement = vec![other.add_entry(dickens_entry("2025-09-30")).unwrap()];

        store.import_data(&replacement).unwrap();
        assert_eq!(store.get_all_entries(), replacement);

        store.import_data(&[]).unwrap();
        assert!(store.get_all_entries().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let store = store();
        store.add_entry(port_entry("2025-10-01")).unwrap();
        store.clear_all().unwrap();
        assert!(store.get_all_entries().is_empty());
    }

    #[test]
    fn test_independent_stores_do_not_share_data() {
        let first = store();
        let second = store();
        first.add_entry(port_entry("2025-10-01")).unwrap();
        assert!(second.get_all_entries().is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let added = {
            let store = EntryStore::new(FileStorage::new(dir.path().to_path_buf()).unwrap());
            store.add_entry(dickens_entry("2025-10-03")).unwrap()
        };

        let reopened = EntryStore::new(FileStorage::new(dir.path().to_path_buf()).unwrap());
        assert_eq!(reopened.get_entries_by_venue("Диккенс"), vec![added]);
    }
}
