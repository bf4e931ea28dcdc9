//! Layered dashboard configuration with deep-merge semantics
//!
//! The active configuration is built from three layers: compiled-in
//! defaults, the deployed config artifact, and locally persisted overrides.
//! Nested objects merge field-by-field; arrays and scalars replace
//! wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::models::Tier;

/// Global variable the generated config artifact assigns to; the deployed
/// site reads it back on next load.
pub const CONFIG_GLOBAL: &str = "FANBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub site_title: String,
    pub owner_name: String,
    pub logo_url: String,
    pub tagline: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_title: "Fan Dashboard".to_string(),
            owner_name: String::new(),
            logo_url: String::new(),
            tagline: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub background: String,
    pub surface: String,
    pub accent: String,
    pub text: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: "#1a1a2e".to_string(),
            surface: "#16213e".to_string(),
            accent: "#e94560".to_string(),
            text: "#f1f1f1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            heading: "Noto Sans JP".to_string(),
            body: "Noto Sans JP".to_string(),
        }
    }
}

/// Sheet connection parameters: which spreadsheet and which sheets/ranges
/// each logical table lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSource {
    pub spreadsheet_id: String,
    pub ranking_sheet: String,
    pub ranking_range: Option<String>,
    pub goal_sheet: String,
    pub goal_range: Option<String>,
    pub benefit_sheet: String,
    pub benefit_range: Option<String>,
    pub rights_sheet: String,
    pub rights_range: Option<String>,
    pub history_sheet: String,
    pub history_range: Option<String>,
    pub icon_sheet: String,
    /// Minutes between automatic refresh cycles.
    pub refresh_minutes: u64,
}

impl Default for SheetSource {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            ranking_sheet: "ランキング".to_string(),
            ranking_range: None,
            goal_sheet: "目標".to_string(),
            goal_range: None,
            benefit_sheet: "特典".to_string(),
            benefit_range: None,
            rights_sheet: "権利".to_string(),
            rights_range: None,
            history_sheet: "履歴".to_string(),
            history_range: None,
            icon_sheet: "アイコン".to_string(),
            refresh_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewToggles {
    pub show_ranking: bool,
    pub show_goals: bool,
    pub show_gallery: bool,
    pub show_rights: bool,
    pub show_history: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            show_ranking: true,
            show_goals: true,
            show_gallery: true,
            show_rights: true,
            show_history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiCopy {
    pub loading_message: String,
    pub fetch_error_message: String,
    pub config_missing_message: String,
}

impl Default for UiCopy {
    fn default() -> Self {
        Self {
            loading_message: "読み込み中...".to_string(),
            fetch_error_message: "データの取得に失敗しました".to_string(),
            config_missing_message: "管理画面からスプレッドシートを設定してください".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Effects {
    pub confetti: bool,
    pub sparkles: bool,
}

/// Shared admin password, compared client-side. Always sourced from the
/// deployed layer so a rotated password takes effect on next load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminCredentials {
    pub password: String,
}

impl AdminCredentials {
    pub fn matches(&self, input: &str) -> bool {
        !self.password.is_empty() && self.password == input
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub branding: Branding,
    pub colors: Colors,
    pub fonts: Fonts,
    pub sheets: SheetSource,
    pub views: ViewToggles,
    pub tiers: Vec<Tier>,
    pub copy: UiCopy,
    pub effects: Effects,
    pub admin: AdminCredentials,
}

/// Recursive merge: when both sides hold an object the fields combine,
/// otherwise the override replaces the base wholesale (arrays included).
/// A `Null` override is a no-op at the point of assignment.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(b), Value::Object(o)) => {
            let mut merged = b.clone();
            for (key, over) in o {
                if over.is_null() {
                    continue;
                }
                let value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, over),
                    None => over.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        _ => overrides.clone(),
    }
}

/// Produce the active configuration: defaults, then the deployed config,
/// then local overrides, each deep-merged on top of the previous. The
/// `admin` subsection ignores local overrides entirely, so a stale local
/// password can never mask a rotated one.
pub fn resolve_layers(deployed: Option<&Value>, local: Option<&Value>) -> Result<DashboardConfig> {
    let defaults = serde_json::to_value(DashboardConfig::default())
        .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))?;
    let mut merged = defaults.clone();
    if let Some(deployed) = deployed {
        merged = deep_merge(&merged, deployed);
    }
    if let Some(local) = local {
        merged = deep_merge(&merged, local);
    }

    let default_admin = defaults.get("admin").cloned().unwrap_or(Value::Null);
    let admin = match deployed.and_then(|d| d.get("admin")) {
        Some(over) => deep_merge(&default_admin, over),
        None => default_admin,
    };
    if let Value::Object(map) = &mut merged {
        map.insert("admin".to_string(), admin);
    }

    serde_json::from_value(merged).map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))
}

/// Render the deployable artifact: a script assigning the config JSON to the
/// well-known global. Deploy connection settings are stored separately from
/// the config proper, so no token ever lands in the artifact.
pub fn export_script(config: &DashboardConfig) -> Result<String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))?;
    Ok(format!("window.{} = {};\n", CONFIG_GLOBAL, json))
}

/// Parse an uploaded configuration artifact. Accepts both the generated
/// script form and bare JSON; on failure the caller's in-memory config is
/// left untouched.
pub fn import_script(input: &str) -> Result<DashboardConfig> {
    let trimmed = input.trim();
    let json = if trimmed.starts_with('{') {
        trimmed
    } else {
        let assign = trimmed
            .find('=')
            .ok_or_else(|| DashboardError::ConfigImportParse("missing assignment".to_string()))?;
        trimmed[assign + 1..].trim().trim_end_matches(';').trim_end()
    };
    serde_json::from_str(json).map_err(|e| DashboardError::ConfigImportParse(e.to_string()))
}
