//! Gallery loader caching: at most one fetch per (spreadsheet, sheet) pair.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use fanboard_client::gallery::GalleryLoader;
use fanboard_client::transport::{HttpResponse, Transport};
use fanboard_core::{DashboardError, Result};

struct CountingTransport {
    fetches: AtomicUsize,
    fail: bool,
}

impl CountingTransport {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            fail: false,
        }
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn request(
        &self,
        _method: &str,
        _url: &str,
        _token: Option<&str>,
        _body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DashboardError::FetchFailed("boom".to_string()));
        }
        Ok(HttpResponse {
            status: 200,
            body: common::gviz_body(&[vec![
                json!("202601"),
                json!("Alice"),
                json!("https://drive.google.com/file/d/XYZ/view"),
            ]]),
        })
    }
}

#[tokio::test]
async fn index_loads_once_per_sheet_pair() {
    let transport = Arc::new(CountingTransport::new());
    let loader = GalleryLoader::new(Arc::clone(&transport));

    let first = loader.load("SID", "icons").await.unwrap();
    let second = loader.load("SID", "icons").await.unwrap();
    assert_eq!(transport.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(first.ordered_keys(), second.ordered_keys());
    assert_eq!(first.entries("202601").len(), 1);
}

#[tokio::test]
async fn changing_the_pair_or_invalidating_reloads() {
    let transport = Arc::new(CountingTransport::new());
    let loader = GalleryLoader::new(Arc::clone(&transport));

    loader.load("SID", "icons").await.unwrap();
    loader.load("SID", "other-icons").await.unwrap();
    assert_eq!(transport.fetches.load(Ordering::SeqCst), 2);

    loader.invalidate().await;
    loader.load("SID", "other-icons").await.unwrap();
    assert_eq!(transport.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn failures_surface_as_icon_load_failed() {
    let transport = Arc::new(CountingTransport {
        fetches: AtomicUsize::new(0),
        fail: true,
    });
    let loader = GalleryLoader::new(Arc::clone(&transport));

    let err = loader.load("SID", "icons").await.unwrap_err();
    assert!(matches!(err, DashboardError::IconLoadFailed(_)));
}
