//! Error types for the fanboard pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to fetch sheet data: {0}")]
    FetchFailed(String),

    #[error("response was not in the expected callback-wrapped format: {0}")]
    InvalidResponseFormat(String),

    #[error("response payload missing the expected table structure: {0}")]
    InvalidDataStructure(String),

    #[error("configuration incomplete: {0}")]
    ConfigMissing(String),

    #[error("failed to load the icon gallery: {0}")]
    IconLoadFailed(String),

    #[error("failed to load history: {0}")]
    HistoryLoadFailed(String),

    #[error("deploy authentication failed, check the access token")]
    DeployAuth,

    #[error("deploy token lacks write permission for the repository")]
    DeployPermission,

    #[error("deploy target not found: {0}")]
    DeployNotFound(String),

    #[error("could not parse the imported configuration: {0}")]
    ConfigImportParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
