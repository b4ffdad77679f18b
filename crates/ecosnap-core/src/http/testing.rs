//! Scripted fetcher for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchError, Fetcher, Request, Response};

/// Serves canned responses by URL; unknown URLs get a 404.
/// Flip `set_offline(true)` to make every fetch fail at the transport level.
#[derive(Default)]
pub struct StubFetcher {
    routes: Mutex<HashMap<String, Response>>,
    failing: Mutex<Vec<String>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    /// Make a single URL fail with a transport error.
    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().push(url.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let other tasks interleave the way a real network round trip would
        tokio::task::yield_now().await;

        let url = request.url.as_str();
        if self.offline.load(Ordering::SeqCst)
            || self.failing.lock().unwrap().iter().any(|u| u == url)
        {
            return Err(FetchError::Unavailable(url.to_string()));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, "not found")))
    }
}
