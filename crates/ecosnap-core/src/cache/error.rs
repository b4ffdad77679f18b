use thiserror::Error;

use crate::http::FetchError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache name: {0}")]
    InvalidName(String),

    #[error("Failed to fetch {url} during install: {source}")]
    AssetFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Cache generation {0} has not been installed")]
    NotInstalled(String),
}
