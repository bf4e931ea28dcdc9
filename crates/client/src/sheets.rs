//! Google Sheets gviz fetcher
//!
//! The public "visualization query" endpoint answers with a JS callback
//! wrapper around a JSON table. This module strips the wrapper, decodes the
//! table, and normalizes rows; transient failures retry with exponential
//! backoff.

use std::time::Duration;

use fanboard_core::{CellValue, DashboardError, Result, Row};

use crate::transport::Transport;

const GVIZ_BASE: &str = "https://docs.google.com/spreadsheets/d";
const BACKOFF_BASE_MS: u64 = 1000;
// Caps the wait at ~17 minutes and keeps the shift below u64 width for any
// configured retry count.
const BACKOFF_MAX_EXPONENT: u32 = 10;

pub const DEFAULT_RETRIES: u32 = 3;

pub struct SheetClient<T: Transport> {
    transport: T,
}

impl<T: Transport> SheetClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch one sheet (optionally restricted to an A1 range) as normalized
    /// rows. Any failure kind retries up to `retries` attempts total, with
    /// 1s/2s/4s… waits in between; the last error wins. An empty spreadsheet
    /// id short-circuits without retrying.
    pub async fn fetch(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        range: Option<&str>,
        retries: u32,
    ) -> Result<Vec<Row>> {
        if spreadsheet_id.trim().is_empty() {
            return Err(DashboardError::ConfigMissing(
                "spreadsheet id is not set".to_string(),
            ));
        }
        let url = gviz_url(spreadsheet_id, sheet_name, range);
        let attempts = retries.max(1);
        let mut last_error = None;
        for attempt in 0..attempts {
            if attempt > 0 {
                let exponent = (attempt - 1).min(BACKOFF_MAX_EXPONENT);
                let wait = Duration::from_millis(BACKOFF_BASE_MS << exponent);
                tracing::debug!(
                    "retrying sheet '{}' (attempt {}/{}) after {:?}",
                    sheet_name,
                    attempt + 1,
                    attempts,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            match self.fetch_once(&url).await {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    tracing::warn!("fetch of sheet '{}' failed: {}", sheet_name, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| DashboardError::FetchFailed("no attempts made".to_string())))
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<Row>> {
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(DashboardError::FetchFailed(format!(
                "HTTP {}",
                response.status
            )));
        }
        let payload = strip_callback_wrapper(&response.body)?;
        parse_table(payload)
    }
}

pub fn gviz_url(spreadsheet_id: &str, sheet_name: &str, range: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}/gviz/tq?tqx=out:json&sheet={}",
        GVIZ_BASE,
        spreadsheet_id,
        urlencoding::encode(sheet_name)
    );
    if let Some(range) = range {
        url.push_str("&range=");
        url.push_str(&urlencoding::encode(range));
    }
    url
}

/// Extract the JSON payload from the callback-style response, which has the
/// form `google.visualization.Query.setResponse({...});` — the substring
/// between the first `(` and the final `)`.
fn strip_callback_wrapper(body: &str) -> Result<&str> {
    let open = body.find('(').ok_or_else(|| {
        DashboardError::InvalidResponseFormat("no callback wrapper found".to_string())
    })?;
    let close = body
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| {
            DashboardError::InvalidResponseFormat("unterminated callback wrapper".to_string())
        })?;
    Ok(&body[open + 1..close])
}

fn parse_table(payload: &str) -> Result<Vec<Row>> {
    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| DashboardError::InvalidResponseFormat(e.to_string()))?;
    let rows = json["table"]["rows"]
        .as_array()
        .ok_or_else(|| DashboardError::InvalidDataStructure("missing table.rows".to_string()))?;
    Ok(rows.iter().map(row_from_json).collect())
}

fn row_from_json(row: &serde_json::Value) -> Row {
    let cells = row["c"]
        .as_array()
        .map(|cells| cells.iter().map(|cell| cell_value(&cell["v"])).collect())
        .unwrap_or_default();
    Row::new(cells)
}

fn cell_value(v: &serde_json::Value) -> CellValue {
    match v {
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        _ => CellValue::Empty,
    }
}
