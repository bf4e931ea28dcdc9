//! Rights table derivation: who holds which benefit tiers
//!
//! Column 0 of a rights row is the display name; each tier addresses its own
//! value column, and one dynamically located column carries free-text
//! "special" rights.

use std::cmp::Ordering;
use std::sync::OnceLock;

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Row, Tier, TierIcon};

/// Fallback special-column index when the rights table has neither a header
/// match nor any data rows.
pub const DEFAULT_SPECIAL_COLUMN: usize = 4;

/// Tier-column held predicate: the literal "TRUE" (any case) or a finite
/// number greater than zero. Everything else, including "FALSE", "0", and
/// the empty string, is not held.
pub fn is_held(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("TRUE") {
        return true;
    }
    trimmed
        .parse::<f64>()
        .map(|n| n.is_finite() && n > 0.0)
        .unwrap_or(false)
}

/// Special-column variant: any non-empty value except "FALSE" and "0".
pub fn is_special_held(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("FALSE") && trimmed != "0"
}

/// Locate the free-text "special" column: a header cell spelled "special"
/// (case-insensitive), else the last column of the widest data row, else a
/// fixed default.
pub fn detect_special_column(header: &Row, data: &[Row]) -> usize {
    for i in 0..header.len() {
        if header.text(i).trim().eq_ignore_ascii_case("special") {
            return i;
        }
    }
    data.iter()
        .map(Row::len)
        .max()
        .filter(|w| *w > 0)
        .map(|w| w - 1)
        .unwrap_or(DEFAULT_SPECIAL_COLUMN)
}

/// One person admitted to the filtered benefit listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RightsHolder {
    pub name: String,
    pub row: Row,
}

/// One display block for a held tier.
#[derive(Debug, Clone, PartialEq)]
pub struct HeldBlock {
    pub tier_key: String,
    pub icon: TierIcon,
    pub display: String,
}

/// One line of the benefit menu.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitItem {
    pub tier_key: String,
    pub icon: TierIcon,
    pub description: String,
}

pub fn has_any_benefit(row: &Row, tiers: &[Tier], special_index: usize) -> bool {
    tiers
        .iter()
        .any(|t| t.column_index >= 1 && is_held(&row.text(t.column_index)))
        || is_special_held(&row.text(special_index))
}

fn collator() -> Option<&'static Collator> {
    static COLLATOR: OnceLock<Option<Collator>> = OnceLock::new();
    COLLATOR
        .get_or_init(|| {
            let mut options = CollatorOptions::new();
            options.strength = Some(Strength::Tertiary);
            Collator::try_new(&locale!("ja").into(), options).ok()
        })
        .as_ref()
}

/// Japanese dictionary order for holder names, so hiragana and katakana
/// spellings of the same reading sort together. Falls back to comparing
/// NFKC-normalized code points if collation data is unavailable.
fn compare_names(a: &str, b: &str) -> Ordering {
    match collator() {
        Some(collator) => collator.compare(a, b),
        None => a.nfkc().cmp(b.nfkc()),
    }
}

/// Filtered, sorted listing of benefit holders. `search` is a
/// case-insensitive substring filter on the name, combined with the
/// benefit-eligibility filter.
pub fn derive_holders(
    rows: &[Row],
    tiers: &[Tier],
    special_index: usize,
    search: &str,
) -> Vec<RightsHolder> {
    let needle = search.trim().to_lowercase();
    let mut holders: Vec<RightsHolder> = rows
        .iter()
        .filter_map(|row| {
            let name = row.text(0).trim().to_string();
            if name.is_empty() || !has_any_benefit(row, tiers, special_index) {
                return None;
            }
            if !needle.is_empty() && !name.to_lowercase().contains(&needle) {
                return None;
            }
            Some(RightsHolder {
                name,
                row: row.clone(),
            })
        })
        .collect();
    holders.sort_by(|a, b| compare_names(&a.name, &b.name));
    holders
}

/// Display blocks for one person's held tiers, in tier order. Boolean tiers
/// use their template verbatim; others substitute `{value}` with the held
/// cell's raw text.
pub fn held_blocks(row: &Row, tiers: &[Tier]) -> Vec<HeldBlock> {
    tiers
        .iter()
        .filter(|t| t.column_index >= 1)
        .filter_map(|t| {
            let value = row.text(t.column_index);
            if !is_held(&value) {
                return None;
            }
            let display = if t.is_boolean {
                t.display_template.clone()
            } else {
                t.display_template.replace("{value}", &value)
            };
            Some(HeldBlock {
                tier_key: t.key.clone(),
                icon: TierIcon::resolve(&t.icon),
                display,
            })
        })
        .collect()
}

/// The special-rights text for one person, empty when nothing is held.
pub fn special_text(row: &Row, special_index: usize) -> String {
    let value = row.text(special_index);
    if is_special_held(&value) {
        value.trim().to_string()
    } else {
        String::new()
    }
}

/// The benefit menu: every configured tier in order, with its description
/// looked up by title cell in the benefit-description table (column 0 title,
/// column 1 description).
pub fn benefit_menu(tiers: &[Tier], benefit_rows: &[Row]) -> Vec<BenefitItem> {
    tiers
        .iter()
        .map(|t| {
            let description = benefit_rows
                .iter()
                .find(|row| row.text(0).trim() == t.key)
                .map(|row| row.text(1))
                .unwrap_or_default();
            BenefitItem {
                tier_key: t.key.clone(),
                icon: TierIcon::resolve(&t.icon),
                description,
            }
        })
        .collect()
}
