//! Network layer for the fanboard dashboard
//!
//! This crate contains:
//! - The gviz sheet fetcher with retry/backoff
//! - The periodic refresh cycle producing dashboard snapshots
//! - The icon gallery loader with its at-most-once load guard
//! - The GitHub deploy client committing the config artifact
//! - File-backed persistence of config and deploy settings

pub mod deploy;
pub mod gallery;
pub mod refresh;
pub mod sheets;
pub mod store;
pub mod transport;
