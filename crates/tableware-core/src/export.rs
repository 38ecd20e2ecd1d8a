//! CSV and backup export.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Backup, InventoryEntry, Item};

/// Byte order mark so spreadsheet programs detect UTF-8
const UTF8_BOM: char = '\u{FEFF}';

/// Render entries as CSV: BOM, header row, one row per entry
pub fn entries_to_csv(entries: &[InventoryEntry]) -> String {
    let mut header: Vec<&str> = vec!["Заведение", "Дата"];
    header.extend(Item::ALL.iter().map(Item::label));
    header.extend(["Ответственный", "Дата ответственного"]);

    let mut out = String::new();
    out.push(UTF8_BOM);
    out.push_str(&header.join(","));

    for entry in entries {
        let mut row = vec![csv_field(&entry.venue), csv_field(&entry.date)];
        row.extend(Item::ALL.iter().map(|&item| entry.count(item).to_string()));
        row.push(csv_field(entry.responsible_name.as_deref().unwrap_or_default()));
        row.push(csv_field(entry.responsible_date.as_deref().unwrap_or_default()));

        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

/// Quote a field if it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("inventory_{}.csv", date.format("%Y-%m-%d"))
}

pub fn build_backup(entries: Vec<InventoryEntry>, taken_at: DateTime<Utc>) -> Backup {
    Backup::new(entries, taken_at)
}

pub fn backup_file_name(taken_at: DateTime<Utc>) -> String {
    format!("inventory_backup_{}.json", taken_at.format("%Y%m%d_%H%M%S"))
}

pub fn backup_to_json(backup: &Backup) -> serde_json::Result<String> {
    serde_json::to_string_pretty(backup)
}

pub fn parse_backup(json: &str) -> serde_json::Result<Backup> {
    serde_json::from_str(json)
}
