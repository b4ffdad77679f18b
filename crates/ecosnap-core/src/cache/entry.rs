use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{Request, Response};
use crate::utils::format_age_minutes;

/// A value stamped with the time it was written to the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        format_age_minutes(self.age_minutes())
    }
}

/// A stored response together with the request identity it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub method: String,
    pub url: String,
    pub response: Response,
}

impl StoredEntry {
    pub fn new(request: &Request, response: Response) -> Self {
        Self {
            method: request.method.to_string(),
            url: request.url.to_string(),
            response,
        }
    }

    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}
