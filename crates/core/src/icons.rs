//! Icon gallery index: user-submitted images grouped by month or category

use std::collections::HashMap;

use crate::drive;
use crate::models::{IconEntry, Row};

pub const THUMBNAIL_WIDTH: u32 = 400;

/// Gallery entries keyed by group, where a group is either a "yyyymm" month
/// token or a free-text category. Month keys are compared as strings, never
/// as numbers.
#[derive(Debug, Clone, Default)]
pub struct IconIndex {
    groups: HashMap<String, Vec<IconEntry>>,
    insertion_order: Vec<String>,
    monthly: bool,
}

impl IconIndex {
    /// Build from raw icon-sheet rows: column 0 is the group key, column 1
    /// the user label, column 2 the image URL. Rows missing any of the three
    /// are skipped.
    pub fn build(rows: &[Row]) -> Self {
        let mut groups: HashMap<String, Vec<IconEntry>> = HashMap::new();
        let mut insertion_order = Vec::new();
        for row in rows {
            let key = row.text(0);
            let label = row.text(1);
            let url = row.text(2);
            if key.is_empty() || label.is_empty() || url.is_empty() {
                continue;
            }
            if !groups.contains_key(&key) {
                insertion_order.push(key.clone());
            }
            groups.entry(key).or_default().push(IconEntry {
                label,
                thumbnail_url: drive::thumbnail_url(&url, THUMBNAIL_WIDTH),
                original_url: url,
            });
        }
        let monthly = !insertion_order.is_empty() && insertion_order.iter().all(|k| is_month_key(k));
        IconIndex {
            groups,
            insertion_order,
            monthly,
        }
    }

    /// Whether every group key is a 6-digit year-month token.
    pub fn is_monthly(&self) -> bool {
        self.monthly
    }

    /// Group keys in display order: newest-first when monthly, first-seen
    /// order for category groupings.
    pub fn ordered_keys(&self) -> Vec<String> {
        let mut keys = self.insertion_order.clone();
        if self.monthly {
            keys.sort_by(|a, b| b.cmp(a));
        }
        keys
    }

    pub fn entries(&self, key: &str) -> &[IconEntry] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }
}

fn is_month_key(key: &str) -> bool {
    key.len() == 6 && key.bytes().all(|b| b.is_ascii_digit())
}
