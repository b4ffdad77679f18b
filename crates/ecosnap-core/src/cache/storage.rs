use std::sync::Arc;

use async_trait::async_trait;

use super::{CacheError, CachedData, StoredEntry};
use crate::http::{Request, Response};

/// The set of named cache generations.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it if it does not exist.
    async fn open(&self, name: &str) -> Result<Arc<dyn ResponseCache>, CacheError>;

    /// Does a generation with this name exist?
    async fn has(&self, name: &str) -> Result<bool, CacheError>;

    /// Names of all existing generations.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a generation; returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;
}

/// One cache generation: stored responses keyed by request identity.
///
/// Writers to the same key are last-write-wins.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    fn name(&self) -> &str;

    async fn match_request(
        &self,
        request: &Request,
    ) -> Result<Option<CachedData<StoredEntry>>, CacheError>;

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError>;

    /// Store several entries; nothing is stored if any write fails.
    async fn put_all(&self, entries: Vec<(Request, Response)>) -> Result<(), CacheError>;

    async fn entries(&self) -> Result<Vec<CachedData<StoredEntry>>, CacheError>;
}

/// Generation names become directory names, so keep them to a safe alphabet.
pub(crate) fn validate_name(name: &str) -> Result<(), CacheError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidName(name.to_string()))
    }
}
