use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::entry::InventoryEntry;

/// Version written into every backup document
pub const BACKUP_VERSION: &str = "1.0";

/// Full backup document, as served by the backup endpoint and written by
/// `backup export`. Restoring a backup imports `entries` wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Backup {
    pub backup_date: String,
    pub total_records: usize,
    pub version: String,
    #[serde(default)]
    pub entries: Vec<InventoryEntry>,
}

impl Backup {
    pub fn new(entries: Vec<InventoryEntry>, taken_at: DateTime<Utc>) -> Self {
        Self {
            backup_date: taken_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_records: entries.len(),
            version: BACKUP_VERSION.to_string(),
            entries,
        }
    }

    /// Whether the declared record count matches the entries actually present
    pub fn is_consistent(&self) -> bool {
        self.total_records == self.entries.len()
    }
}
