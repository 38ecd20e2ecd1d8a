//! Plain-text rendering of entries and statistics.

use tableware_core::stats::{ItemSummary, ResponsibleSummary, VenueTotals};
use tableware_core::{InventoryEntry, Item};

/// Width of the responsible-person column in entry tables
const RESPONSIBLE_WIDTH: usize = 18;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a stored timestamp for display.
/// The local store writes RFC 3339, the remote writes `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        dt.format("%d.%m.%Y %H:%M").to_string()
    } else if ts.len() >= 16 {
        ts.chars().take(16).collect()
    } else {
        ts.to_string()
    }
}

pub fn entries_table(entries: &[InventoryEntry]) -> String {
    let mut header = vec![
        format!("{:<14}", "id"),
        format!("{:<8}", "venue"),
        format!("{:<10}", "date"),
    ];
    header.extend(Item::ALL.iter().map(|item| item.key().to_string()));
    header.push("responsible".to_string());

    let mut lines = vec![header.join("  ")];
    for entry in entries {
        let mut row = vec![
            format!("{:<14}", entry.id),
            format!("{:<8}", entry.venue),
            format!("{:<10}", entry.date),
        ];
        row.extend(
            Item::ALL
                .iter()
                .map(|&item| format!("{:<width$}", entry.count(item), width = item.key().len())),
        );
        row.push(truncate_string(
            entry.responsible().unwrap_or("-"),
            RESPONSIBLE_WIDTH,
        ));
        lines.push(row.join("  "));
    }
    lines.join("\n")
}

pub fn entry_detail(entry: &InventoryEntry) -> String {
    let mut lines = vec![
        format!("id:          {}", entry.id),
        format!("venue:       {}", entry.venue),
        format!("date:        {}", entry.date),
    ];
    for item in Item::ALL {
        lines.push(format!("{:<17}{}", format!("{}:", item.label()), entry.count(item)));
    }
    if let Some(name) = entry.responsible() {
        lines.push(format!(
            "responsible: {} ({})",
            name,
            entry.responsible_date.as_deref().unwrap_or("-")
        ));
    }
    if let Some(ref created) = entry.created_at {
        lines.push(format!("created:     {}", format_timestamp(created)));
    }
    lines.join("\n")
}

/// One row per item: combined, per-venue, and average of all entries
pub fn stats_table(rows: &[(ItemSummary, VenueTotals)], responsible: ResponsibleSummary) -> String {
    let mut lines = vec![format!(
        "{:<17}{:>8}{:>8}{:>9}{:>9}",
        "",
        "total",
        "PORT",
        "Диккенс",
        "average"
    )];
    for (summary, totals) in rows {
        lines.push(format!(
            "{:<17}{:>8}{:>8}{:>9}{:>9}",
            summary.item.label(),
            totals.total,
            totals.port,
            totals.dickens,
            summary.average
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "entries: {}, with responsible: {}",
        responsible.total, responsible.with_responsible
    ));
    lines.join("\n")
}
