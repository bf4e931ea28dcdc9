//! History grouping: per person, per tier, per year

use std::collections::HashMap;

use crate::models::{HistoryEntry, Row};

/// Contiguous run of one person's history entries sharing a year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup {
    pub year: String,
    pub entries: Vec<HistoryEntry>,
}

/// Decode raw history rows: columns are user, month ("yyyymm"), tier key,
/// content.
pub fn entries_from_rows(rows: &[Row]) -> Vec<HistoryEntry> {
    rows.iter()
        .map(|row| HistoryEntry {
            user_name: row.text(0),
            month: row.text(1),
            tier_key: row.text(2),
            content: row.text(3),
        })
        .collect()
}

/// Group one person's history per tier key, sorted ascending by month and
/// partitioned into contiguous same-year runs. Entries with empty content
/// are dropped. Lexical month comparison is sufficient at the fixed "yyyymm"
/// width.
pub fn group_for(entries: &[HistoryEntry], person: &str) -> HashMap<String, Vec<YearGroup>> {
    let mut by_tier: HashMap<String, Vec<HistoryEntry>> = HashMap::new();
    for entry in entries {
        if entry.user_name == person && !entry.content.trim().is_empty() {
            by_tier
                .entry(entry.tier_key.clone())
                .or_default()
                .push(entry.clone());
        }
    }
    by_tier
        .into_iter()
        .map(|(tier, mut list)| {
            list.sort_by(|a, b| a.month.cmp(&b.month));
            let mut groups: Vec<YearGroup> = Vec::new();
            for entry in list {
                let year: String = entry.month.chars().take(4).collect();
                match groups.last_mut() {
                    Some(last) if last.year == year => last.entries.push(entry),
                    _ => groups.push(YearGroup {
                        year,
                        entries: vec![entry],
                    }),
                }
            }
            (tier, groups)
        })
        .collect()
}
