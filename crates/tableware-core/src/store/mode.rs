use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::StoreError;
use crate::storage::LocalStorage;

/// Storage key holding the current mode
pub const MODE_KEY: &str = "storage_mode";

/// Where reads and writes are directed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Remote API is authoritative
    #[default]
    Api,
    /// Remote was unreachable; the local store serves everything
    Local,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Api => "api",
            StorageMode::Local => "local",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "api" => Ok(StorageMode::Api),
            "local" => Ok(StorageMode::Local),
            other => Err(format!("Unknown storage mode: {}", other)),
        }
    }
}

/// Persisted api/local switch.
///
/// There is no automatic way back to `Api`: leaving `Local` always goes
/// through an explicit `reset_to_api_mode` followed by a fresh load.
#[derive(Debug, Clone)]
pub struct ModeController<S> {
    storage: S,
}

impl<S: LocalStorage> ModeController<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current mode; `Api` if nothing usable is persisted
    pub fn get_mode(&self) -> StorageMode {
        match self.storage.get_item(MODE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Ignoring stored storage mode");
                StorageMode::Api
            }),
            Ok(None) => StorageMode::Api,
            Err(e) => {
                warn!(error = %e, "Failed to read storage mode, assuming api");
                StorageMode::Api
            }
        }
    }

    /// Persist `mode`. Reloading data is up to the caller.
    pub fn set_mode(&self, mode: StorageMode) -> Result<(), StoreError> {
        let contents = serde_json::to_string(&mode)?;
        self.storage.set_item(MODE_KEY, &contents)?;
        info!(mode = %mode, "Storage mode changed");
        Ok(())
    }

    /// Switch back to the remote API, used before a reconnect attempt
    pub fn reset_to_api_mode(&self) -> Result<(), StoreError> {
        self.set_mode(StorageMode::Api)
    }

    pub fn is_offline(&self) -> bool {
        self.get_mode() == StorageMode::Local
    }
}
