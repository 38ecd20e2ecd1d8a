use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::item::{Item, ItemCounts};
use super::venue::Venue;
use crate::store::StoreError;

/// Inventory dates are plain calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One inventory count submission for one venue on one date.
///
/// Field names match the remote GET response and the backup `entries`
/// array, so the same type is used for the local store, the API and
/// backups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct InventoryEntry {
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub id: i64,
    pub venue: String,
    /// Inventory date (YYYY-MM-DD), not the submission time
    pub date: String,
    #[serde(flatten)]
    pub counts: ItemCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_date: Option<String>,
    /// Set once when the record is created. The remote omits it from
    /// create/update responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl InventoryEntry {
    pub fn count(&self, item: Item) -> u32 {
        self.counts.get(item)
    }

    pub fn is_venue(&self, venue: &str) -> bool {
        self.venue == venue
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Responsible person, if one was filled in with something other than whitespace
    pub fn responsible(&self) -> Option<&str> {
        self.responsible_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Fields of a new entry. `id` and `created_at` are assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct NewEntry {
    pub venue: String,
    pub date: String,
    #[serde(flatten)]
    pub counts: ItemCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_date: Option<String>,
}

impl NewEntry {
    pub fn new(venue: Venue, date: impl Into<String>) -> Self {
        Self {
            venue: venue.as_str().to_string(),
            date: date.into(),
            counts: ItemCounts::default(),
            responsible_name: None,
            responsible_date: None,
        }
    }

    pub fn with_count(mut self, item: Item, value: u32) -> Self {
        self.counts.set(item, value);
        self
    }

    pub fn with_responsible(mut self, name: impl Into<String>, date: Option<String>) -> Self {
        self.responsible_name = Some(name.into());
        self.responsible_date = date;
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        validate_venue(&self.venue)?;
        validate_date(&self.date)
    }

    pub(crate) fn into_entry(self, id: i64, created_at: String) -> InventoryEntry {
        InventoryEntry {
            id,
            venue: self.venue,
            date: self.date,
            counts: self.counts,
            responsible_name: self.responsible_name,
            responsible_date: self.responsible_date,
            created_at: Some(created_at),
        }
    }
}

/// Partial update of an entry. Only fields that are `Some` replace the
/// stored value; `id` and `created_at` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knives: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steak_knives: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dessert_spoons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice_cooler: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plates: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_tongs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice_tongs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ashtrays: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_date: Option<String>,
}

impl EntryPatch {
    pub fn count(&self, item: Item) -> Option<u32> {
        match item {
            Item::Forks => self.forks,
            Item::Knives => self.knives,
            Item::SteakKnives => self.steak_knives,
            Item::Spoons => self.spoons,
            Item::DessertSpoons => self.dessert_spoons,
            Item::IceCooler => self.ice_cooler,
            Item::Plates => self.plates,
            Item::SugarTongs => self.sugar_tongs,
            Item::IceTongs => self.ice_tongs,
            Item::Ashtrays => self.ashtrays,
        }
    }

    pub fn set_count(&mut self, item: Item, value: u32) {
        let slot = match item {
            Item::Forks => &mut self.forks,
            Item::Knives => &mut self.knives,
            Item::SteakKnives => &mut self.steak_knives,
            Item::Spoons => &mut self.spoons,
            Item::DessertSpoons => &mut self.dessert_spoons,
            Item::IceCooler => &mut self.ice_cooler,
            Item::Plates => &mut self.plates,
            Item::SugarTongs => &mut self.sugar_tongs,
            Item::IceTongs => &mut self.ice_tongs,
            Item::Ashtrays => &mut self.ashtrays,
        };
        *slot = Some(value);
    }

    pub fn with_count(mut self, item: Item, value: u32) -> Self {
        self.set_count(item, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(ref venue) = self.venue {
            validate_venue(venue)?;
        }
        if let Some(ref date) = self.date {
            validate_date(date)?;
        }
        Ok(())
    }

    /// Shallow merge over an existing entry
    pub fn apply(&self, entry: &mut InventoryEntry) {
        if let Some(ref venue) = self.venue {
            entry.venue = venue.clone();
        }
        if let Some(ref date) = self.date {
            entry.date = date.clone();
        }
        for item in Item::ALL {
            if let Some(value) = self.count(item) {
                entry.counts.set(item, value);
            }
        }
        if let Some(ref name) = self.responsible_name {
            entry.responsible_name = Some(name.clone());
        }
        if let Some(ref date) = self.responsible_date {
            entry.responsible_date = Some(date.clone());
        }
    }
}

fn validate_venue(venue: &str) -> Result<(), StoreError> {
    if venue.trim().is_empty() {
        return Err(StoreError::InvalidEntry("venue must not be empty".to_string()));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<(), StoreError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| StoreError::InvalidEntry(format!("date must be YYYY-MM-DD, got '{}'", date)))
}
