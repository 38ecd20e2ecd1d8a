use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// A counted tableware item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Forks,
    Knives,
    SteakKnives,
    Spoons,
    DessertSpoons,
    IceCooler,
    Plates,
    SugarTongs,
    IceTongs,
    Ashtrays,
}

impl Item {
    /// All items in display order.
    pub const ALL: [Item; 10] = [
        Item::Forks,
        Item::Knives,
        Item::SteakKnives,
        Item::Spoons,
        Item::DessertSpoons,
        Item::IceCooler,
        Item::Plates,
        Item::SugarTongs,
        Item::IceTongs,
        Item::Ashtrays,
    ];

    /// Field name used in stored and remote JSON
    pub fn key(&self) -> &'static str {
        match self {
            Item::Forks => "forks",
            Item::Knives => "knives",
            Item::SteakKnives => "steak_knives",
            Item::Spoons => "spoons",
            Item::DessertSpoons => "dessert_spoons",
            Item::IceCooler => "ice_cooler",
            Item::Plates => "plates",
            Item::SugarTongs => "sugar_tongs",
            Item::IceTongs => "ice_tongs",
            Item::Ashtrays => "ashtrays",
        }
    }

    /// Label shown to staff, also used as the CSV column header
    pub fn label(&self) -> &'static str {
        match self {
            Item::Forks => "Вилки",
            Item::Knives => "Ножи",
            Item::SteakKnives => "Стейковые ножи",
            Item::Spoons => "Ложки",
            Item::DessertSpoons => "Десертные ложки",
            Item::IceCooler => "Кулер",
            Item::Plates => "Тарелки",
            Item::SugarTongs => "Щипцы (сахар)",
            Item::IceTongs => "Щипцы (лед)",
            Item::Ashtrays => "Пепельницы",
        }
    }
}

/// The ten item counts of an entry. Missing fields deserialize as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct ItemCounts {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub forks: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub knives: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub steak_knives: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub spoons: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub dessert_spoons: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ice_cooler: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub plates: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub sugar_tongs: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ice_tongs: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ashtrays: u32,
}

/// Older remote rows carry `null` for columns added later
fn zero_if_null<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl ItemCounts {
    pub fn get(&self, item: Item) -> u32 {
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

    pub fn set(&mut self, item: Item, value: u32) {
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
        *slot = value;
    }

    /// Builder-style setter
    pub fn with(mut self, item: Item, value: u32) -> Self {
        self.set(item, value);
        self
    }
}
