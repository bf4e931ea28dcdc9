//! Icon gallery loader
//!
//! The gallery index loads at most once per (spreadsheet, sheet) pair and is
//! invalidated when that pair changes. Failures stay isolated to the gallery
//! view.

use tokio::sync::Mutex;

use fanboard_core::icons::IconIndex;
use fanboard_core::{DashboardError, Result};

use crate::sheets::{SheetClient, DEFAULT_RETRIES};
use crate::transport::Transport;

#[derive(Default)]
struct GalleryState {
    loaded_for: Option<(String, String)>,
    index: IconIndex,
}

pub struct GalleryLoader<T: Transport> {
    client: SheetClient<T>,
    // Held across the fetch, which is what keeps a second concurrent caller
    // from starting a duplicate load.
    state: Mutex<GalleryState>,
}

impl<T: Transport> GalleryLoader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            client: SheetClient::new(transport),
            state: Mutex::new(GalleryState::default()),
        }
    }

    /// The icon index for the given sheet, fetched at most once until the
    /// (spreadsheet, sheet) pair changes or the cache is invalidated.
    pub async fn load(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<IconIndex> {
        let mut state = self.state.lock().await;
        let key = (spreadsheet_id.to_string(), sheet_name.to_string());
        if state.loaded_for.as_ref() == Some(&key) {
            return Ok(state.index.clone());
        }
        let rows = self
            .client
            .fetch(spreadsheet_id, sheet_name, None, DEFAULT_RETRIES)
            .await
            .map_err(|e| DashboardError::IconLoadFailed(e.to_string()))?;
        let index = IconIndex::build(&rows);
        state.index = index.clone();
        state.loaded_for = Some(key);
        Ok(index)
    }

    /// Drop the cached index so the next access reloads.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.loaded_for = None;
        state.index = IconIndex::default();
    }
}
