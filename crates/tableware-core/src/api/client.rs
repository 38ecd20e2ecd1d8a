//! API client for the inventory serverless functions.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Backup, InventoryEntry, NewEntry};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Cold starts of the serverless function can take several seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    entries: Option<Vec<InventoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    #[serde(default)]
    entry: Option<InventoryEntry>,
}

/// Request body for create/replace. The function reads the multi-word
/// counts in camelCase while answering in snake_case.
#[derive(Debug, Serialize)]
struct EntryPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    venue: &'a str,
    date: &'a str,
    forks: u32,
    knives: u32,
    #[serde(rename = "steakKnives")]
    steak_knives: u32,
    spoons: u32,
    #[serde(rename = "dessertSpoons")]
    dessert_spoons: u32,
    #[serde(rename = "iceCooler")]
    ice_cooler: u32,
    plates: u32,
    #[serde(rename = "sugarTongs")]
    sugar_tongs: u32,
    #[serde(rename = "iceTongs")]
    ice_tongs: u32,
    ashtrays: u32,
    responsible_name: Option<&'a str>,
    responsible_date: Option<&'a str>,
}

impl<'a> EntryPayload<'a> {
    fn for_create(entry: &'a NewEntry) -> Self {
        let c = &entry.counts;
        Self {
            id: None,
            venue: &entry.venue,
            date: &entry.date,
            forks: c.forks,
            knives: c.knives,
            steak_knives: c.steak_knives,
            spoons: c.spoons,
            dessert_spoons: c.dessert_spoons,
            ice_cooler: c.ice_cooler,
            plates: c.plates,
            sugar_tongs: c.sugar_tongs,
            ice_tongs: c.ice_tongs,
            ashtrays: c.ashtrays,
            responsible_name: entry.responsible_name.as_deref(),
            responsible_date: entry.responsible_date.as_deref(),
        }
    }

    fn for_update(entry: &'a InventoryEntry) -> Self {
        let c = &entry.counts;
        Self {
            id: Some(entry.id),
            venue: &entry.venue,
            date: &entry.date,
            forks: c.forks,
            knives: c.knives,
            steak_knives: c.steak_knives,
            spoons: c.spoons,
            dessert_spoons: c.dessert_spoons,
            ice_cooler: c.ice_cooler,
            plates: c.plates,
            sugar_tongs: c.sugar_tongs,
            ice_tongs: c.ice_tongs,
            ashtrays: c.ashtrays,
            responsible_name: entry.responsible_name.as_deref(),
            responsible_date: entry.responsible_date.as_deref(),
        }
    }
}

/// API client for the inventory functions.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    backup_url: Option<String>,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>, backup_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            backup_url,
        })
    }

    pub fn has_backup_endpoint(&self) -> bool {
        self.backup_url.is_some()
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send a request built by `build`. GET requests back off and retry on
    /// 429; writes are never repeated and report `RateLimited` at once.
    async fn send<T, F>(&self, what: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let request = build()
                .header(header::ACCEPT, "application/json")
                .build()
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to build request: {}", what))?;
            let retry_rate_limited = *request.method() == Method::GET;

            let response = self
                .client
                .execute(request)
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send request: {}", what))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
                        .with_context(|| format!("Failed to parse response: {}", what));
                }
                None if !retry_rate_limited => return Err(ApiError::RateLimited.into()),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(request = what, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    // ===== Entries =====

    /// Fetch all entries of one venue, newest inventory date first
    pub async fn fetch_entries(&self, venue: &str) -> Result<Vec<InventoryEntry>> {
        let response: EntriesResponse = self
            .send("fetch entries", || {
                self.client.get(&self.api_url).query(&[("venue", venue)])
            })
            .await?;
        let entries = response.entries.unwrap_or_default();
        debug!(venue, count = entries.len(), "Fetched entries");
        Ok(entries)
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<InventoryEntry> {
        let payload = EntryPayload::for_create(entry);
        let response: EntryResponse = self
            .send("create entry", || self.client.post(&self.api_url).json(&payload))
            .await?;
        response
            .entry
            .ok_or_else(|| ApiError::InvalidResponse("create returned no entry".to_string()).into())
    }

    /// Replace an entry. `Ok(None)` when the remote has no entry with that id.
    pub async fn update_entry(&self, entry: &InventoryEntry) -> Result<Option<InventoryEntry>> {
        let payload = EntryPayload::for_update(entry);
        let response: EntryResponse = self
            .send("update entry", || self.client.put(&self.api_url).json(&payload))
            .await?;
        Ok(response.entry)
    }

    pub async fn delete_entry(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let _: serde_json::Value = self
            .send("delete entry", || {
                self.client.delete(&self.api_url).query(&[("id", id.as_str())])
            })
            .await?;
        Ok(())
    }

    // ===== Backup =====

    pub async fn fetch_backup(&self) -> Result<Backup> {
        let url = self
            .backup_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No backup endpoint configured"))?;
        self.send("fetch backup", || self.client.get(url)).await
    }
}
