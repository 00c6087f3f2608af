use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("schema resource {resource} failed: {source}")]
    Schema {
        resource: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot read schema resources from {}: {source}", .path.display())]
    ResourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),
}
