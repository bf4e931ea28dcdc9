//! Run one refresh cycle against a configured spreadsheet and print the
//! derived dashboard views.
//!
//! Usage: cargo run --example dashboard -- <spreadsheet-id>

use fanboard_client::refresh::Refresher;
use fanboard_client::store::LocalStore;
use fanboard_client::transport::HttpTransport;
use fanboard_core::{config, rights};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fanboard_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = LocalStore::new(".fanboard");
    let local = store.load_overrides();
    let mut config = config::resolve_layers(None, local.as_ref()).expect("default configuration");
    if let Some(id) = std::env::args().nth(1) {
        config.sheets.spreadsheet_id = id;
    }

    let refresher = Refresher::new(HttpTransport::new(), config.sheets.clone());
    refresher.run_cycle().await;
    let state = refresher.state().await;
    if let Some(error) = &state.error {
        eprintln!("refresh failed: {}", error);
        return;
    }

    let snapshot = &state.snapshot;
    println!("ranking rows: {}", snapshot.ranking.len());
    println!("goal rows:    {}", snapshot.goals.len());

    let holders = rights::derive_holders(
        &snapshot.rights,
        &config.tiers,
        snapshot.special_column,
        "",
    );
    println!("benefit holders: {}", holders.len());
    for holder in &holders {
        let blocks = rights::held_blocks(&holder.row, &config.tiers);
        let labels: Vec<_> = blocks.iter().map(|b| b.display.as_str()).collect();
        println!("  {}: {}", holder.name, labels.join(", "));
    }
}
