use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("history store does not exist: {0}")]
    StoreMissing(PathBuf),
    #[error("failed to open history store at {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{query} query failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
    #[error("invalid {field} value: {value}")]
    InvalidCount { field: &'static str, value: String },
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

impl LauncherError {
    pub fn query(query: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { query, source }
    }

    /// Configuration mistakes are the user's to fix; everything else is
    /// a runtime condition.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::InvalidCount { .. }
                | Self::UnknownProvider(_)
        )
    }
}
