//! Core data layer for the fanboard dashboard
//!
//! This crate contains:
//! - The cell/row model for sheet data
//! - Benefit tier, gallery, and history types
//! - Derivation logic turning raw rows into view models
//! - Layered configuration with deep-merge semantics
//! - Error types

pub mod config;
pub mod drive;
pub mod error;
pub mod history;
pub mod icons;
pub mod models;
pub mod rights;

pub use error::*;
pub use models::*;
