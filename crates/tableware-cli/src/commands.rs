//! Command handlers.
//!
//! Results go to stdout, notices about the storage mode go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use tracing::info;

use tableware_core::export::{
    backup_file_name, backup_to_json, csv_file_name, entries_to_csv, parse_backup,
};
use tableware_core::stats::{self, DateRange};
use tableware_core::{
    Config, DataLoader, DataSource, InventoryEntry, LoadResult, LocalStorage, NewEntry,
    StorageMode, Venue,
};

use crate::cli::{AddArgs, BackupAction, Command, UpdateArgs};
use crate::format::{entries_table, entry_detail, stats_table};

pub async fn run<S: LocalStorage + Clone>(
    command: Command,
    loader: &DataLoader<S>,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Load => load(loader).await,
        Command::List { venue } => {
            list(loader, venue).await;
            Ok(())
        }
        Command::Add(args) => add(loader, config, args).await,
        Command::Update(args) => update(loader, args).await,
        Command::Delete { id } => delete(loader, id).await,
        Command::Mode { mode } => mode_command(loader, mode),
        Command::Reconnect => reconnect(loader).await,
        Command::Backup { action } => match action {
            BackupAction::Export { out } => export_backup(loader, out).await,
            BackupAction::Import { path } => import_backup(loader, &path),
        },
        Command::ExportCsv { venue, out } => export_csv(loader, venue, out).await,
        Command::Stats { from, to } => {
            show_stats(loader, DateRange::new(from, to)).await;
            Ok(())
        }
    }
}

/// Tell the user when an operation just dropped us into local mode
fn report_fallback<S: LocalStorage + Clone>(loader: &DataLoader<S>, before: StorageMode) {
    if before == StorageMode::Api && loader.mode() == StorageMode::Local {
        eprintln!("Remote unavailable - switched to local storage.");
        eprintln!("If data is missing, restore it with `tableware backup import <file>`.");
        eprintln!("Run `tableware reconnect` to try the remote again.");
    }
}

fn print_load_summary(result: &LoadResult) {
    let source = match result.source {
        DataSource::Remote => "remote",
        DataSource::Local => "local store",
    };
    println!(
        "Loaded {} entries from {} (PORT: {}, Диккенс: {})",
        result.total(),
        source,
        result.port.len(),
        result.dickens.len()
    );
}

/// Fresh entries for both venues: the remote in api mode, else the local store
async fn load_entries<S: LocalStorage + Clone>(loader: &DataLoader<S>) -> LoadResult {
    let before = loader.mode();
    let result = loader.load_all().await;
    report_fallback(loader, before);
    result
}

async fn load<S: LocalStorage + Clone>(loader: &DataLoader<S>) -> Result<()> {
    let result = load_entries(loader).await;
    print_load_summary(&result);
    Ok(())
}

async fn reconnect<S: LocalStorage + Clone>(loader: &DataLoader<S>) -> Result<()> {
    let result = loader.reconnect().await?;
    print_load_summary(&result);
    if result.source == DataSource::Local {
        eprintln!("Remote still unavailable - staying in local mode.");
    }
    Ok(())
}

/// Newest inventory date first, as the remote lists them
fn sorted_by_date_desc(mut entries: Vec<InventoryEntry>) -> Vec<InventoryEntry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

fn venue_entries(result: &LoadResult, venue: Option<Venue>) -> Vec<InventoryEntry> {
    match venue {
        Some(venue) => result.for_venue(venue).to_vec(),
        None => result.all(),
    }
}

async fn list<S: LocalStorage + Clone>(loader: &DataLoader<S>, venue: Option<Venue>) {
    let result = load_entries(loader).await;
    let entries = sorted_by_date_desc(venue_entries(&result, venue));
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    println!("{}", entries_table(&entries));
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn new_entry_from_args(args: AddArgs, config: &Config) -> NewEntry {
    let venue = args.venue.unwrap_or_else(|| config.default_venue());
    let mut entry = NewEntry::new(venue, date_string(args.date.unwrap_or_else(today)));
    entry.counts = args.counts.to_counts();
    if let Some(name) = args.responsible_name {
        let responsible_date = args.responsible_date.unwrap_or_else(today);
        entry = entry.with_responsible(name, Some(date_string(responsible_date)));
    }
    entry
}

async fn add<S: LocalStorage + Clone>(
    loader: &DataLoader<S>,
    config: &Config,
    args: AddArgs,
) -> Result<()> {
    let before = loader.mode();
    let entry = new_entry_from_args(args, config);
    let added = loader.add_entry(entry).await?;
    report_fallback(loader, before);
    println!("Entry added\n{}", entry_detail(&added));
    Ok(())
}

async fn update<S: LocalStorage + Clone>(loader: &DataLoader<S>, args: UpdateArgs) -> Result<()> {
    let patch = args.to_patch();
    if patch.is_empty() {
        bail!("Nothing to update - pass at least one field");
    }

    let before = loader.mode();
    let updated = loader.update_entry(args.id, &patch).await?;
    report_fallback(loader, before);
    match updated {
        Some(entry) => {
            println!("Entry updated\n{}", entry_detail(&entry));
            Ok(())
        }
        None => bail!("No entry with id {}", args.id),
    }
}

async fn delete<S: LocalStorage + Clone>(loader: &DataLoader<S>, id: i64) -> Result<()> {
    let before = loader.mode();
    let removed = loader.delete_entry(id).await?;
    report_fallback(loader, before);
    if !removed {
        bail!("No entry with id {}", id);
    }
    println!("Entry {} deleted", id);
    Ok(())
}

fn mode_command<S: LocalStorage + Clone>(
    loader: &DataLoader<S>,
    mode: Option<StorageMode>,
) -> Result<()> {
    if let Some(mode) = mode {
        loader.modes().set_mode(mode)?;
    }
    println!("{}", loader.mode());
    Ok(())
}

async fn export_backup<S: LocalStorage + Clone>(
    loader: &DataLoader<S>,
    out: Option<PathBuf>,
) -> Result<()> {
    let backup = loader.export_backup().await;
    let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(Utc::now())));
    std::fs::write(&path, backup_to_json(&backup)?)
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;
    info!(path = %path.display(), records = backup.total_records, "Backup written");
    println!("Backup saved to {} ({} records)", path.display(), backup.total_records);
    Ok(())
}

fn import_backup<S: LocalStorage + Clone>(loader: &DataLoader<S>, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup: {}", path.display()))?;
    let backup = parse_backup(&contents)
        .with_context(|| format!("Not a backup document: {}", path.display()))?;
    let count = loader.import_backup(&backup)?;
    println!("Restored {} records from {}", count, path.display());
    Ok(())
}

async fn export_csv<S: LocalStorage + Clone>(
    loader: &DataLoader<S>,
    venue: Option<Venue>,
    out: Option<PathBuf>,
) -> Result<()> {
    let result = load_entries(loader).await;
    let entries = sorted_by_date_desc(venue_entries(&result, venue));
    let path = out.unwrap_or_else(|| PathBuf::from(csv_file_name(today())));
    std::fs::write(&path, entries_to_csv(&entries))
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    println!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

async fn show_stats<S: LocalStorage + Clone>(loader: &DataLoader<S>, range: DateRange) {
    let LoadResult { port, dickens, .. } = load_entries(loader).await;

    let in_range: Vec<InventoryEntry> = stats::in_date_range(&port, &range)
        .into_iter()
        .chain(stats::in_date_range(&dickens, &range))
        .collect();

    let rows: Vec<_> = stats::summarize(&in_range)
        .into_iter()
        .map(|summary| {
            let totals = stats::venue_totals(&port, &dickens, summary.item, &range);
            (summary, totals)
        })
        .collect();

    println!("{}", stats_table(&rows, stats::responsible_summary(&in_range)));
}
