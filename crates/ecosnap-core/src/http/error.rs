use thiserror::Error;

use crate::utils::truncate_string;

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Network unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

impl FetchError {
    pub fn from_status(url: &str, status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        FetchError::Status {
            url: url.to_string(),
            status,
            body: truncate_string(&text, MAX_ERROR_BODY_LENGTH),
        }
    }

    /// True for failures where no response arrived at all.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Unavailable(_))
    }
}
