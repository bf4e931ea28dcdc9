//! Sheet fetcher behavior against scripted transports: fixture fidelity,
//! retry timing, and error propagation.

mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::time::{Duration, Instant};

use fanboard_client::sheets::SheetClient;
use fanboard_client::transport::{HttpResponse, Transport};
use fanboard_core::{CellValue, DashboardError, Result};

/// Replays a fixed sequence of responses and records when each request
/// arrived (in paused-clock time).
struct ScriptedTransport {
    script: Mutex<VecDeque<HttpResponse>>,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    fn new(script: Vec<HttpResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        _method: &str,
        _url: &str,
        _token: Option<&str>,
        _body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(Instant::now());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DashboardError::FetchFailed("script exhausted".to_string()))
    }
}

fn ok(body: String) -> HttpResponse {
    HttpResponse { status: 200, body }
}

fn http_error(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        body: String::new(),
    }
}

#[tokio::test]
async fn fetch_returns_fixture_rows_with_missing_cells_as_empty() {
    let body = common::gviz_body(&[
        vec![json!("Alice"), json!(5), json!(true)],
        vec![json!("Bob"), json!(null)],
    ]);
    let transport = Arc::new(ScriptedTransport::new(vec![ok(body)]));
    let client = SheetClient::new(Arc::clone(&transport));

    let rows = client.fetch("SID", "rights", Some("A1:C10"), 3).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text(0), "Alice");
    assert_eq!(rows[0].text(1), "5");
    assert_eq!(rows[0].cell(2), &CellValue::Bool(true));
    assert_eq!(rows[1].cell(1), &CellValue::Empty);
    // Rows shorter than the widest row still read as empty cells.
    assert_eq!(rows[1].text(2), "");
    assert_eq!(transport.call_times().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn two_failures_then_success_backs_off_one_then_two_seconds() {
    let body = common::gviz_body(&[vec![json!("x")]]);
    let transport = Arc::new(ScriptedTransport::new(vec![
        http_error(500),
        http_error(503),
        ok(body),
    ]));
    let client = SheetClient::new(Arc::clone(&transport));

    let rows = client.fetch("SID", "ranking", None, 3).await.unwrap();
    assert_eq!(rows.len(), 1);

    let times = transport.call_times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_secs(1));
    assert_eq!(times[2] - times[1], Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_propagate_the_last_error() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        http_error(500),
        http_error(500),
        http_error(404),
    ]));
    let client = SheetClient::new(Arc::clone(&transport));

    let err = client.fetch("SID", "ranking", None, 3).await.unwrap_err();
    assert!(matches!(err, DashboardError::FetchFailed(msg) if msg.contains("404")));
    assert_eq!(transport.call_times().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn malformed_wrapper_is_retried_then_surfaced() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ok("no wrapper here".to_string()),
        ok("still no wrapper".to_string()),
    ]));
    let client = SheetClient::new(Arc::clone(&transport));

    let err = client.fetch("SID", "ranking", None, 2).await.unwrap_err();
    assert!(matches!(err, DashboardError::InvalidResponseFormat(_)));
    assert_eq!(transport.call_times().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn backoff_is_capped_when_retry_counts_exceed_the_shift_width() {
    // 66 attempts cross the u64 bit width; the wait must plateau instead of
    // overflowing the shift.
    let script: Vec<_> = (0..66).map(|_| http_error(500)).collect();
    let transport = Arc::new(ScriptedTransport::new(script));
    let client = SheetClient::new(Arc::clone(&transport));

    let err = client.fetch("SID", "ranking", None, 66).await.unwrap_err();
    assert!(matches!(err, DashboardError::FetchFailed(_)));

    let times = transport.call_times();
    assert_eq!(times.len(), 66);
    let cap = Duration::from_secs(1024);
    assert_eq!(times[12] - times[11], cap);
    assert_eq!(times[65] - times[64], cap);
}

#[tokio::test]
async fn empty_spreadsheet_id_short_circuits_without_a_request() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let client = SheetClient::new(Arc::clone(&transport));

    let err = client.fetch("   ", "ranking", None, 3).await.unwrap_err();
    assert!(matches!(err, DashboardError::ConfigMissing(_)));
    assert!(transport.call_times().is_empty());
}
