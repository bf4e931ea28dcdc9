//! Periodic refresh cycle
//!
//! One cycle pulls the ranking, goal, benefit, and rights tables jointly:
//! they all succeed or the cycle fails and the previous snapshot stays, with
//! an error flag set. History loads in parallel but degrades to an empty
//! list on failure. Overlapping cycles resolve by sequence number: only the
//! most recently started cycle may publish its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

use fanboard_core::config::SheetSource;
use fanboard_core::{history, rights, DashboardError, HistoryEntry, Result, Row};

use crate::sheets::{SheetClient, DEFAULT_RETRIES};
use crate::transport::Transport;

/// All table data for one successfully completed refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub ranking: Vec<Row>,
    pub goals: Vec<Row>,
    pub benefits: Vec<Row>,
    /// Rights data rows, header stripped.
    pub rights: Vec<Row>,
    /// Resolved per cycle and carried next to the rows it indexes.
    pub special_column: usize,
    pub history: Vec<HistoryEntry>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Published view state: the current snapshot plus the latest error, if any.
/// A failed cycle leaves the previous snapshot in place.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    pub snapshot: DashboardSnapshot,
    pub error: Option<String>,
}

pub struct Refresher<T: Transport> {
    client: SheetClient<T>,
    source: SheetSource,
    seq: AtomicU64,
    state: RwLock<RefreshState>,
}

impl<T: Transport> Refresher<T> {
    pub fn new(transport: T, source: SheetSource) -> Self {
        Self {
            client: SheetClient::new(transport),
            source,
            seq: AtomicU64::new(0),
            state: RwLock::new(RefreshState::default()),
        }
    }

    pub async fn state(&self) -> RefreshState {
        self.state.read().await.clone()
    }

    /// Run one refresh cycle. Returns the cycle's sequence number; the
    /// result is discarded if a newer cycle started while this one was in
    /// flight.
    pub async fn run_cycle(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch_all().await;
        // The supersession check must happen under the state lock: checked
        // before acquiring it, a newer cycle could publish in the gap and be
        // overwritten with stale data.
        let mut state = self.state.write().await;
        if self.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding superseded refresh cycle {}", seq);
            return seq;
        }
        match result {
            Ok(snapshot) => {
                state.snapshot = snapshot;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("refresh cycle {} failed: {}", seq, e);
                state.error = Some(e.to_string());
            }
        }
        seq
    }

    /// Drive refresh cycles forever at the given period. Each tick starts a
    /// new cycle without awaiting an in-flight one.
    pub async fn run(self: Arc<Self>, period: Duration)
    where
        T: 'static,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let refresher = Arc::clone(&self);
            tokio::spawn(async move {
                refresher.run_cycle().await;
            });
        }
    }

    async fn fetch_all(&self) -> Result<DashboardSnapshot> {
        let s = &self.source;
        if s.spreadsheet_id.trim().is_empty() {
            return Err(DashboardError::ConfigMissing(
                "spreadsheet id is not set, configure the sheet connection in the admin panel"
                    .to_string(),
            ));
        }

        let joint = async {
            tokio::try_join!(
                self.fetch_sheet(&s.ranking_sheet, s.ranking_range.as_deref()),
                self.fetch_sheet(&s.goal_sheet, s.goal_range.as_deref()),
                self.fetch_sheet(&s.benefit_sheet, s.benefit_range.as_deref()),
                self.fetch_sheet(&s.rights_sheet, s.rights_range.as_deref()),
            )
        };
        let (joint, history_rows) = tokio::join!(joint, self.fetch_history());
        let (ranking, goals, benefits, rights_table) = joint?;

        let (header, data) = match rights_table.split_first() {
            Some((header, data)) => (header.clone(), data.to_vec()),
            None => (Row::default(), Vec::new()),
        };
        let special_column = rights::detect_special_column(&header, &data);

        Ok(DashboardSnapshot {
            ranking,
            goals,
            benefits,
            rights: data,
            special_column,
            history: history_rows,
            fetched_at: Some(Utc::now()),
        })
    }

    async fn fetch_sheet(&self, sheet: &str, range: Option<&str>) -> Result<Vec<Row>> {
        self.client
            .fetch(&self.source.spreadsheet_id, sheet, range, DEFAULT_RETRIES)
            .await
    }

    // History is supplementary detail: a failure degrades to an empty list
    // instead of failing the cycle.
    async fn fetch_history(&self) -> Vec<HistoryEntry> {
        let s = &self.source;
        match self
            .fetch_sheet(&s.history_sheet, s.history_range.as_deref())
            .await
        {
            Ok(rows) => history::entries_from_rows(&rows),
            Err(e) => {
                let e = DashboardError::HistoryLoadFailed(e.to_string());
                tracing::warn!("{}, continuing without history", e);
                Vec::new()
            }
        }
    }
}
