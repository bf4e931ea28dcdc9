//! Shared data models for sheet rows and derived views

use serde::{Deserialize, Serialize};

/// One decoded sheet cell. Missing cells decode to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Render the cell as display text. Integral numbers print without a
    /// trailing `.0` so a numeric month token compares equal to its string
    /// form; booleans render as the sheet's "TRUE"/"FALSE" literals.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                format!("{n:.0}")
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// An ordered sheet row. Column position is the contract; rows may be
/// shorter than the widest row in the table, so out-of-range access yields
/// an empty cell instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(Vec<CellValue>);

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Row(cells)
    }

    pub fn cell(&self, index: usize) -> &CellValue {
        self.0.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// Rendered text of the cell at `index`, empty string when out of range.
    pub fn text(&self, index: usize) -> String {
        self.cell(index).as_text()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.0
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(cells: Vec<CellValue>) -> Self {
        Row(cells)
    }
}

/// One step of the benefit ladder. `column_index` of 0 means the tier has no
/// column in the rights table and only appears in the benefit menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tier {
    pub key: String,
    pub icon: String,
    pub column_index: usize,
    /// Display template with a `{value}` placeholder for the held cell.
    pub display_template: String,
    /// Boolean tiers render their template verbatim, the cell value only
    /// carries truthiness.
    pub is_boolean: bool,
    pub is_membership: bool,
}

impl Default for Tier {
    fn default() -> Self {
        Self {
            key: String::new(),
            icon: String::new(),
            column_index: 0,
            display_template: "{value}".to_string(),
            is_boolean: false,
            is_membership: false,
        }
    }
}

/// Icon names shipped with the dashboard theme. Anything else in a tier's
/// `icon` field is rendered as a literal glyph (emoji or short text).
const KNOWN_ICONS: &[&str] = &[
    "crown", "star", "trophy", "medal", "gem", "gift", "heart", "mic", "music", "sparkles",
    "bottle", "ticket",
];

/// A tier's icon, resolved once instead of probing a registry on every use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierIcon {
    Known(String),
    Glyph(String),
}

impl TierIcon {
    pub fn resolve(raw: &str) -> Self {
        if KNOWN_ICONS.contains(&raw) {
            TierIcon::Known(raw.to_string())
        } else {
            TierIcon::Glyph(raw.to_string())
        }
    }
}

/// One gallery image, grouped under a month token or category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconEntry {
    pub label: String,
    pub thumbnail_url: String,
    pub original_url: String,
}

/// One row of the benefit-usage history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user_name: String,
    /// Fixed-width "yyyymm" month token.
    pub month: String,
    pub tier_key: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(202603.0).as_text(), "202603");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        // Integral values beyond i64 range must not saturate.
        assert_eq!(CellValue::Number(1e20).as_text(), "100000000000000000000");
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let row = Row::new(vec![CellValue::Text("a".into())]);
        assert_eq!(row.cell(5), &CellValue::Empty);
        assert_eq!(row.text(5), "");
    }

    #[test]
    fn icon_resolution_distinguishes_known_names_from_glyphs() {
        assert_eq!(TierIcon::resolve("crown"), TierIcon::Known("crown".into()));
        assert_eq!(TierIcon::resolve("🍾"), TierIcon::Glyph("🍾".into()));
    }
}
