//! Client-side aggregation over inventory entries.
//!
//! Everything here works on entry slices so the same numbers can be shown
//! for the local store and for freshly loaded remote data.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{InventoryEntry, Item, ItemCounts};

/// Sum of one item over all entries
pub fn total(entries: &[InventoryEntry], item: Item) -> u64 {
    entries.iter().map(|entry| u64::from(entry.count(item))).sum()
}

/// Mean of one item, rounded to the nearest whole piece; 0 without entries
pub fn average(entries: &[InventoryEntry], item: Item) -> u64 {
    if entries.is_empty() {
        return 0;
    }
    (total(entries, item) as f64 / entries.len() as f64).round() as u64
}

/// Inclusive date range; a missing bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Entries with an unparseable date only match an unbounded range
    pub fn contains(&self, entry: &InventoryEntry) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = entry.parsed_date() else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

pub fn in_date_range(entries: &[InventoryEntry], range: &DateRange) -> Vec<InventoryEntry> {
    entries
        .iter()
        .filter(|entry| range.contains(entry))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VenueTotals {
    pub port: u64,
    pub dickens: u64,
    pub total: u64,
}

/// Per-venue and combined totals of one item within a date range
pub fn venue_totals(
    port: &[InventoryEntry],
    dickens: &[InventoryEntry],
    item: Item,
    range: &DateRange,
) -> VenueTotals {
    let port = total(&in_date_range(port, range), item);
    let dickens = total(&in_date_range(dickens, range), item);
    VenueTotals {
        port,
        dickens,
        total: port + dickens,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    #[serde(skip)]
    pub item: Item,
    pub total: u64,
    pub average: u64,
}

/// Total and average for every item
pub fn summarize(entries: &[InventoryEntry]) -> Vec<ItemSummary> {
    Item::ALL
        .into_iter()
        .map(|item| ItemSummary {
            item,
            total: total(entries, item),
            average: average(entries, item),
        })
        .collect()
}

/// One point of a count-over-time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    #[serde(flatten)]
    pub counts: ItemCounts,
}

/// Entries as a date-ascending series; entries on the same date keep
/// their relative order
pub fn chart_series(entries: &[InventoryEntry]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = entries
        .iter()
        .map(|entry| ChartPoint {
            date: entry.date.clone(),
            counts: entry.counts,
        })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResponsibleSummary {
    pub total: usize,
    pub with_responsible: usize,
}

pub fn responsible_summary(entries: &[InventoryEntry]) -> ResponsibleSummary {
    ResponsibleSummary {
        total: entries.len(),
        with_responsible: entries
            .iter()
            .filter(|entry| entry.responsible().is_some())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEntry, Venue};

    fn entry(id: i64, venue: Venue, date: &str, forks: u32, knives: u32) -> InventoryEntry {
        NewEntry::new(venue, date)
            .with_count(Item::Forks, forks)
            .with_count(Item::Knives, knives)
            .into_entry(id, String::new())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_total_and_average() {
        let entries = vec![
            entry(1, Venue::Port, "2025-10-01", 120, 110),
            entry(2, Venue::Port, "2025-10-02", 118, 108),
            entry(3, Venue::Port, "2025-10-03", 117, 107),
        ];
        assert_eq!(total(&entries, Item::Forks), 355);
        // 355 / 3 = 118.33
        assert_eq!(average(&entries, Item::Forks), 118);
        // 325 / 3 = 108.33
        assert_eq!(average(&entries, Item::Knives), 108);
        assert_eq!(total(&entries, Item::Ashtrays), 0);
    }

    #[test]
    fn test_average_rounds_half_up_and_handles_empty() {
        let entries = vec![
            entry(1, Venue::Port, "2025-10-01", 1, 0),
            entry(2, Venue::Port, "2025-10-02", 2, 0),
        ];
        assert_eq!(average(&entries, Item::Forks), 2);
        assert_eq!(average(&[], Item::Forks), 0);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let entries = vec![
            entry(1, Venue::Port, "2025-09-30", 1, 0),
            entry(2, Venue::Port, "2025-10-01", 2, 0),
            entry(3, Venue::Port, "2025-10-05", 4, 0),
            entry(4, Venue::Port, "2025-10-06", 8, 0),
        ];
        let range = DateRange::new(Some(date("2025-10-01")), Some(date("2025-10-05")));
        let ids: Vec<i64> = in_date_range(&entries, &range).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let open_end = DateRange::new(Some(date("2025-10-05")), None);
        assert_eq!(in_date_range(&entries, &open_end).len(), 2);
        assert_eq!(in_date_range(&entries, &DateRange::default()).len(), 4);
    }

    #[test]
    fn test_unparseable_dates_only_match_unbounded_range() {
        let mut odd = entry(1, Venue::Port, "2025-10-01", 1, 0);
        odd.date = "yesterday".to_string();
        assert!(DateRange::default().contains(&odd));
        assert!(!DateRange::new(Some(date("2000-01-01")), None).contains(&odd));
    }

    #[test]
    fn test_venue_totals() {
        let port = vec![
            entry(1, Venue::Port, "2025-10-01", 120, 0),
            entry(2, Venue::Port, "2025-11-01", 100, 0),
        ];
        let dickens = vec![entry(3, Venue::Dickens, "2025-10-02", 80, 0)];
        let range = DateRange::new(Some(date("2025-10-01")), Some(date("2025-10-31")));

        assert_eq!(
            venue_totals(&port, &dickens, Item::Forks, &range),
            VenueTotals {
                port: 120,
                dickens: 80,
                total: 200
            }
        );
    }

    #[test]
    fn test_chart_series_sorted_by_date() {
        let entries = vec![
            entry(1, Venue::Port, "2025-10-03", 3, 0),
            entry(2, Venue::Port, "2025-10-01", 1, 0),
            entry(3, Venue::Port, "2025-10-02", 2, 0),
        ];
        let series = chart_series(&entries);
        let forks: Vec<u32> = series.iter().map(|p| p.counts.forks).collect();
        assert_eq!(forks, vec![1, 2, 3]);
        assert_eq!(series[0].date, "2025-10-01");
    }

    #[test]
    fn test_summarize_covers_every_item() {
        let entries = vec![entry(1, Venue::Port, "2025-10-01", 5, 7)];
        let summary = summarize(&entries);
        assert_eq!(summary.len(), Item::ALL.len());
        assert_eq!(summary[0].item, Item::Forks);
        assert_eq!(summary[0].total, 5);
        assert_eq!(summary[1].average, 7);
    }

    #[test]
    fn test_responsible_summary() {
        let mut entries = vec![
            entry(1, Venue::Port, "2025-10-01", 0, 0),
            entry(2, Venue::Dickens, "2025-10-01", 0, 0),
            entry(3, Venue::Dickens, "2025-10-02", 0, 0),
        ];
        entries[0].responsible_name = Some("Иванов".to_string());
        entries[1].responsible_name = Some("  ".to_string());

        assert_eq!(
            responsible_summary(&entries),
            ResponsibleSummary {
                total: 3,
                with_responsible: 1
            }
        );
    }
}
