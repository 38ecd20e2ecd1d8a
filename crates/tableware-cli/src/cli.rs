//! Command line definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use tableware_core::{EntryPatch, Item, ItemCounts, StorageMode, Venue};

#[derive(Parser, Debug)]
#[command(name = "tableware")]
#[command(about = "Cutlery inventory for PORT and Диккенс - works offline")]
#[command(version)]
pub struct Cli {
    /// Directory of the local store (default: $XDG_DATA_HOME/tableware)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Inventory API endpoint
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load both venues (remote when online) and refresh the local copy
    Load,

    /// List entries from the local store
    List {
        #[arg(long)]
        venue: Option<Venue>,
    },

    /// Add an inventory entry
    Add(AddArgs),

    /// Change fields of an existing entry
    Update(UpdateArgs),

    /// Delete an entry
    Delete { id: i64 },

    /// Show the storage mode, or set it
    Mode { mode: Option<StorageMode> },

    /// Switch back to the remote API and reload
    Reconnect,

    /// Export or restore a full backup
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Write entries as CSV
    ExportCsv {
        #[arg(long)]
        venue: Option<Venue>,

        /// Output file (default: inventory_<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Totals and averages per item
    Stats {
        /// First inventory date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last inventory date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupAction {
    /// Write a backup document
    Export {
        /// Output file (default: inventory_backup_<timestamp>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the local store with the entries of a backup document
    Import { path: PathBuf },
}

#[derive(Args, Debug, Default)]
pub struct CountArgs {
    #[arg(long)]
    pub forks: Option<u32>,
    #[arg(long)]
    pub knives: Option<u32>,
    #[arg(long)]
    pub steak_knives: Option<u32>,
    #[arg(long)]
    pub spoons: Option<u32>,
    #[arg(long)]
    pub dessert_spoons: Option<u32>,
    #[arg(long)]
    pub ice_cooler: Option<u32>,
    #[arg(long)]
    pub plates: Option<u32>,
    #[arg(long)]
    pub sugar_tongs: Option<u32>,
    #[arg(long)]
    pub ice_tongs: Option<u32>,
    #[arg(long)]
    pub ashtrays: Option<u32>,
}

impl CountArgs {
    fn values(&self) -> [(Item, Option<u32>); 10] {
        [
            (Item::Forks, self.forks),
            (Item::Knives, self.knives),
            (Item::SteakKnives, self.steak_knives),
            (Item::Spoons, self.spoons),
            (Item::DessertSpoons, self.dessert_spoons),
            (Item::IceCooler, self.ice_cooler),
            (Item::Plates, self.plates),
            (Item::SugarTongs, self.sugar_tongs),
            (Item::IceTongs, self.ice_tongs),
            (Item::Ashtrays, self.ashtrays),
        ]
    }

    /// Counts for a new entry; anything not given is 0
    pub fn to_counts(&self) -> ItemCounts {
        self.values()
            .into_iter()
            .fold(ItemCounts::default(), |counts, (item, value)| {
                counts.with(item, value.unwrap_or(0))
            })
    }

    pub fn apply_to(&self, patch: &mut EntryPatch) {
        for (item, value) in self.values() {
            if let Some(value) = value {
                patch.set_count(item, value);
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Venue (default from config, else PORT)
    #[arg(long)]
    pub venue: Option<Venue>,

    /// Inventory date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[command(flatten)]
    pub counts: CountArgs,

    #[arg(long)]
    pub responsible_name: Option<String>,

    #[arg(long)]
    pub responsible_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: i64,

    #[arg(long)]
    pub venue: Option<Venue>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[command(flatten)]
    pub counts: CountArgs,

    #[arg(long)]
    pub responsible_name: Option<String>,

    #[arg(long)]
    pub responsible_date: Option<NaiveDate>,
}

impl UpdateArgs {
    pub fn to_patch(&self) -> EntryPatch {
        let mut patch = EntryPatch {
            venue: self.venue.map(|v| v.as_str().to_string()),
            date: self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            responsible_name: self.responsible_name.clone(),
            responsible_date: self.responsible_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ..Default::default()
        };
        self.counts.apply_to(&mut patch);
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from([
            "tableware", "add", "--venue", "dickens", "--date", "2025-10-01", "--forks", "120",
            "--ice-tongs", "4",
        ]);
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.venue, Some(Venue::Dickens));
        let counts = args.counts.to_counts();
        assert_eq!(counts.forks, 120);
        assert_eq!(counts.ice_tongs, 4);
        assert_eq!(counts.knives, 0);
    }

    #[test]
    fn test_update_patch_has_only_given_fields() {
        let cli = Cli::parse_from(["tableware", "update", "42", "--knives", "100"]);
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        let patch = args.to_patch();
        assert_eq!(args.id, 42);
        assert_eq!(patch, EntryPatch::default().with_count(Item::Knives, 100));
    }

    #[test]
    fn test_parse_mode() {
        let cli = Cli::parse_from(["tableware", "mode", "local"]);
        assert!(matches!(
            cli.command,
            Command::Mode {
                mode: Some(StorageMode::Local)
            }
        ));
    }
}
