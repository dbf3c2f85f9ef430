use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColesListsError {
    #[error("__NEXT_DATA__ script not found.")]
    MissingDataBlock,

    #[error("__NEXT_DATA__ script is empty.")]
    EmptyDataBlock,

    #[error("Failed to parse page data: {0}")]
    MalformedJson(String),

    #[error("{0} not found.")]
    KeyNotFound(String),

    #[error("Failed to fetch shopping lists. Status: {0}")]
    HttpError(u16),

    #[error("Failed to open a new tab. Please allow pop-ups for this website.")]
    PopupBlocked,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ColesListsError>;
