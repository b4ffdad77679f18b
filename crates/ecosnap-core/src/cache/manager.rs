use std::sync::Arc;

use futures::future::try_join_all;
use reqwest::Url;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use super::{CacheError, CacheStorage, ResponseCache};
use crate::http::{FetchError, Fetcher, Request, Response};

/// Name of the current cache generation. Bump to roll out a new generation.
pub const DEFAULT_CACHE_NAME: &str = "ecosnap-v1";

/// Paths seeded into a new generation at install time.
pub const DEFAULT_STATIC_ASSETS: &[&str] = &["/", "/index.html", "/manifest.json"];

/// Hosts containing this domain are treated as the product-lookup API.
pub const DEFAULT_LOOKUP_HOST: &str = "openfoodfacts.org";

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub cache_name: String,
    /// Origin of the app; requests to it are same-origin.
    pub origin: Url,
    pub static_assets: Vec<String>,
    pub lookup_host: String,
}

impl CacheSettings {
    pub fn new(origin: Url) -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            origin,
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            lookup_host: DEFAULT_LOOKUP_HOST.to_string(),
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_static_assets(mut self, assets: Vec<String>) -> Self {
        self.static_assets = assets;
        self
    }

    pub fn with_lookup_host(mut self, host: impl Into<String>) -> Self {
        self.lookup_host = host.into();
        self
    }
}

/// Lifecycle of a cache manager version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet installed
    Parsed,
    Installing,
    /// Installed and waiting to activate
    Installed,
    /// Controlling clients; requests are intercepted
    Activated,
    /// Install failed; this version will never activate
    Redundant,
}

/// How a request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted; goes straight to the network
    Passthrough,
    /// Product lookup: network, then cache on failure
    NetworkFirst,
    /// Same-origin asset: cache, refreshed in the background
    CacheFirst,
}

#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    /// Stale generations removed during activation
    pub deleted: Vec<String>,
    pub claimed: bool,
}

/// Result of a background revalidation, reported to subscribers.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub url: String,
    pub result: RefreshResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshResult {
    Updated,
    /// Network answered with a non-success status; entry left as is
    Skipped(u16),
    Failed(String),
}

pub struct OfflineCacheManager {
    settings: CacheSettings,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
    refresh_tx: Option<mpsc::UnboundedSender<RefreshOutcome>>,
}

impl OfflineCacheManager {
    pub fn new(
        settings: CacheSettings,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            settings,
            storage,
            fetcher,
            state: RwLock::new(WorkerState::Parsed),
            refresh_tx: None,
        }
    }

    /// Report background revalidation outcomes on the returned channel.
    pub fn with_refresh_events(mut self) -> (Self, mpsc::UnboundedReceiver<RefreshOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.refresh_tx = Some(tx);
        (self, rx)
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    pub async fn is_controlling(&self) -> bool {
        self.state().await == WorkerState::Activated
    }

    // ===== Lifecycle =====

    /// Seed the current generation with the static assets.
    ///
    /// All assets are fetched before anything is written, so a failed install
    /// leaves no partially-seeded generation behind.
    pub async fn install(&self) -> Result<(), CacheError> {
        *self.state.write().await = WorkerState::Installing;
        info!(cache = %self.settings.cache_name, assets = self.settings.static_assets.len(), "Caching static assets");

        match self.fetch_static_assets().await {
            Ok(entries) => {
                if let Err(e) = self.store_static_assets(entries).await {
                    warn!(cache = %self.settings.cache_name, error = %e, "Install failed");
                    *self.state.write().await = WorkerState::Redundant;
                    return Err(e);
                }
                // Skip waiting: eligible to activate right away
                *self.state.write().await = WorkerState::Installed;
                info!(cache = %self.settings.cache_name, "Install complete");
                Ok(())
            }
            Err(e) => {
                warn!(cache = %self.settings.cache_name, error = %e, "Install failed");
                *self.state.write().await = WorkerState::Redundant;
                Err(e)
            }
        }
    }

    /// Write the fetched assets into the current generation. A generation
    /// created by this call is removed again if the write fails, so it can
    /// never be resumed unseeded.
    async fn store_static_assets(&self, entries: Vec<(Request, Response)>) -> Result<(), CacheError> {
        let name = &self.settings.cache_name;
        let existed = self.storage.has(name).await?;
        let stored = match self.storage.open(name).await {
            Ok(cache) => cache.put_all(entries).await,
            Err(e) => Err(e),
        };
        if stored.is_err() && !existed {
            if let Err(e) = self.storage.delete(name).await {
                warn!(cache = %name, error = %e, "Failed to remove unseeded generation");
            }
        }
        stored
    }

    async fn fetch_static_assets(&self) -> Result<Vec<(Request, Response)>, CacheError> {
        let fetches = self.settings.static_assets.iter().map(|path| async move {
            let request = Request::resolve_get(&self.settings.origin, path).map_err(|source| {
                CacheError::AssetFetch {
                    url: path.clone(),
                    source,
                }
            })?;
            let url = request.url.to_string();
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|source| CacheError::AssetFetch {
                    url: url.clone(),
                    source,
                })?;
            if !response.ok() {
                return Err(CacheError::AssetFetch {
                    source: FetchError::from_status(&url, response.status, &response.body),
                    url,
                });
            }
            Ok((request, response))
        });
        try_join_all(fetches).await
    }

    /// Delete every generation but the current one and take control.
    pub async fn activate(&self) -> Result<ActivationReport, CacheError> {
        let state = self.state().await;
        if !matches!(state, WorkerState::Installed | WorkerState::Activated) {
            return Err(CacheError::NotInstalled(self.settings.cache_name.clone()));
        }

        let mut report = ActivationReport::default();
        for name in self.storage.keys().await? {
            if name != self.settings.cache_name {
                info!(cache = %name, "Deleting stale cache generation");
                if self.storage.delete(&name).await? {
                    report.deleted.push(name);
                }
            }
        }

        *self.state.write().await = WorkerState::Activated;
        report.claimed = true;
        info!(cache = %self.settings.cache_name, deleted = report.deleted.len(), "Activated");
        Ok(report)
    }

    /// Take control again if the current generation was installed earlier.
    pub async fn resume(&self) -> Result<bool, CacheError> {
        if self.storage.has(&self.settings.cache_name).await? {
            *self.state.write().await = WorkerState::Activated;
            debug!(cache = %self.settings.cache_name, "Resumed existing generation");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ===== Interception =====

    pub fn route(&self, request: &Request) -> Route {
        if !request.is_retrieval() {
            return Route::Passthrough;
        }
        let is_lookup = request.host().contains(&self.settings.lookup_host);
        let same_origin = request.url.origin() == self.settings.origin.origin();
        if is_lookup {
            Route::NetworkFirst
        } else if same_origin {
            Route::CacheFirst
        } else {
            Route::Passthrough
        }
    }

    /// Answer a request according to its route.
    ///
    /// Until activation nothing is intercepted.
    pub async fn handle(&self, request: Request) -> Result<Response, FetchError> {
        if !self.is_controlling().await {
            return self.fetcher.fetch(&request).await;
        }

        let route = self.route(&request);
        debug!(method = %request.method, url = %request.url, ?route, "Intercepted request");
        match route {
            Route::Passthrough => self.fetcher.fetch(&request).await,
            Route::NetworkFirst => self.network_first(request).await,
            Route::CacheFirst => self.cache_first(request).await,
        }
    }

    async fn network_first(&self, request: Request) -> Result<Response, FetchError> {
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                if response.ok() {
                    self.store(&request, response.clone()).await;
                }
                Ok(response)
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Network failed, trying cache");
                match self.cached(&request).await {
                    Some(cached) => Ok(cached),
                    None => Err(e),
                }
            }
        }
    }

    async fn cache_first(&self, request: Request) -> Result<Response, FetchError> {
        if let Some(cached) = self.cached(&request).await {
            self.spawn_revalidation(request);
            return Ok(cached);
        }

        let response = self.fetcher.fetch(&request).await?;
        if response.ok() {
            self.store(&request, response.clone()).await;
        }
        Ok(response)
    }

    async fn current(&self) -> Result<Arc<dyn ResponseCache>, CacheError> {
        self.storage.open(&self.settings.cache_name).await
    }

    /// Cache lookup; storage errors count as a miss.
    async fn cached(&self, request: &Request) -> Option<Response> {
        let cache = match self.current().await {
            Ok(cache) => cache,
            Err(e) => {
                warn!(error = %e, "Failed to open cache");
                return None;
            }
        };
        match cache.match_request(request).await {
            Ok(Some(entry)) => {
                debug!(url = %request.url, age = %entry.age_display(), "Cache hit");
                Some(entry.data.response)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(url = %request.url, error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    /// Store a copy; the caller keeps its own response regardless of outcome.
    async fn store(&self, request: &Request, response: Response) {
        let stored = match self.current().await {
            Ok(cache) => cache.put(request, response).await,
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            warn!(url = %request.url, error = %e, "Failed to cache response");
        }
    }

    fn spawn_revalidation(&self, request: Request) {
        let storage = Arc::clone(&self.storage);
        let fetcher = Arc::clone(&self.fetcher);
        let cache_name = self.settings.cache_name.clone();
        let tx = self.refresh_tx.clone();

        // Detached: the cached response has already been handed back
        let _detached = tokio::spawn(async move {
            let url = request.url.to_string();
            let result = revalidate(storage, fetcher, &cache_name, &request).await;
            debug!(url = %url, ?result, "Background refresh finished");
            if let Some(tx) = tx {
                let _ = tx.send(RefreshOutcome { url, result });
            }
        });
    }
}

async fn revalidate(
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    cache_name: &str,
    request: &Request,
) -> RefreshResult {
    let response = match fetcher.fetch(request).await {
        Ok(response) => response,
        Err(e) => return RefreshResult::Failed(e.to_string()),
    };
    if !response.ok() {
        return RefreshResult::Skipped(response.status);
    }
    let stored = match storage.open(cache_name).await {
        Ok(cache) => cache.put(request, response).await,
        Err(e) => Err(e),
    };
    match stored {
        Ok(()) => RefreshResult::Updated,
        Err(e) => RefreshResult::Failed(e.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachedData, MemoryCacheStorage, StoredEntry};
    use crate::http::testing::StubFetcher;
    use crate::http::Method;

    const ORIGIN: &str = "http://localhost:5173";
    const LOOKUP_URL: &str = "https://world.openfoodfacts.org/api/v0/product/123.json";

    fn url(path: &str) -> Url {
        format!("{}{}", ORIGIN, path).parse().unwrap()
    }

    fn get(path: &str) -> Request {
        Request::get(url(path))
    }

    fn lookup() -> Request {
        Request::get(LOOKUP_URL.parse().unwrap())
    }

    fn setup() -> (Arc<MemoryCacheStorage>, Arc<StubFetcher>, OfflineCacheManager) {
        let storage = Arc::new(MemoryCacheStorage::new());
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.route(&format!("{}/", ORIGIN), Response::new(200, "root"));
        fetcher.route(&format!("{}/index.html", ORIGIN), Response::new(200, "<html>"));
        fetcher.route(&format!("{}/manifest.json", ORIGIN), Response::new(200, "{}"));
        let settings = CacheSettings::new(ORIGIN.parse().unwrap());
        let manager = OfflineCacheManager::new(settings, storage.clone(), fetcher.clone());
        (storage, fetcher, manager)
    }

    async fn stored_body(storage: &MemoryCacheStorage, request: &Request) -> Option<String> {
        let cache = storage.open(DEFAULT_CACHE_NAME).await.unwrap();
        cache
            .match_request(request)
            .await
            .unwrap()
            .map(|e| e.data.response.text())
    }

    #[tokio::test]
    async fn test_install_seeds_static_assets() {
        let (storage, _fetcher, manager) = setup();
        manager.install().await.unwrap();

        assert_eq!(manager.state().await, WorkerState::Installed);
        assert_eq!(stored_body(&storage, &get("/")).await.as_deref(), Some("root"));
        assert_eq!(stored_body(&storage, &get("/index.html")).await.as_deref(), Some("<html>"));
        assert_eq!(stored_body(&storage, &get("/manifest.json")).await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_install_fails_when_any_asset_fails() {
        let (storage, fetcher, manager) = setup();
        fetcher.fail(&format!("{}/manifest.json", ORIGIN));

        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, CacheError::AssetFetch { .. }));
        assert_eq!(manager.state().await, WorkerState::Redundant);
        assert!(!storage.has(DEFAULT_CACHE_NAME).await.unwrap());
        assert!(matches!(manager.activate().await, Err(CacheError::NotInstalled(_))));
    }

    #[tokio::test]
    async fn test_install_fails_on_error_status() {
        let (storage, fetcher, manager) = setup();
        fetcher.route(&format!("{}/index.html", ORIGIN), Response::new(500, "boom"));

        match manager.install().await {
            Err(CacheError::AssetFetch { source: FetchError::Status { status, .. }, .. }) => {
                assert_eq!(status, 500)
            }
            other => panic!("unexpected install result: {other:?}"),
        }
        assert!(!storage.has(DEFAULT_CACHE_NAME).await.unwrap());
    }

    #[tokio::test]
    async fn test_activate_leaves_only_current_generation() {
        let (storage, _fetcher, manager) = setup();
        storage.open("ecosnap-v0").await.unwrap();
        storage.open("something-else").await.unwrap();

        manager.install().await.unwrap();
        let report = manager.activate().await.unwrap();

        assert!(report.claimed);
        assert_eq!(report.deleted.len(), 2);
        assert_eq!(storage.keys().await.unwrap(), vec![DEFAULT_CACHE_NAME.to_string()]);
        assert!(manager.is_controlling().await);
    }

    #[tokio::test]
    async fn test_route_policy() {
        let (_storage, _fetcher, manager) = setup();

        assert_eq!(manager.route(&get("/app.js")), Route::CacheFirst);
        assert_eq!(manager.route(&lookup()), Route::NetworkFirst);
        assert_eq!(
            manager.route(&Request::new(Method::POST, url("/api/stats"))),
            Route::Passthrough
        );
        assert_eq!(
            manager.route(&Request::get("https://cdn.example.com/lib.js".parse().unwrap())),
            Route::Passthrough
        );
        // Same host, different port is a different origin
        assert_eq!(
            manager.route(&Request::get("http://localhost:9999/".parse().unwrap())),
            Route::Passthrough
        );
    }

    #[tokio::test]
    async fn test_passthrough_is_never_cached() {
        let (storage, fetcher, manager) = setup();
        let foreign = "https://cdn.example.com/lib.js";
        fetcher.route(foreign, Response::new(200, "lib"));
        manager.install().await.unwrap();
        manager.activate().await.unwrap();

        let request = Request::get(foreign.parse().unwrap());
        let response = manager.handle(request.clone()).await.unwrap();
        assert_eq!(response.text(), "lib");
        assert!(stored_body(&storage, &request).await.is_none());
    }

    #[tokio::test]
    async fn test_requests_pass_through_before_activation() {
        let (storage, fetcher, manager) = setup();
        fetcher.route(&format!("{}/app.js", ORIGIN), Response::new(200, "app"));

        let response = manager.handle(get("/app.js")).await.unwrap();
        assert_eq!(response.text(), "app");
        assert!(!storage.has(DEFAULT_CACHE_NAME).await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_first_serves_cached_and_refreshes_in_background() {
        let (storage, fetcher, manager) = setup();
        let (manager, mut refreshes) = manager.with_refresh_events();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();

        fetcher.route(&format!("{}/index.html", ORIGIN), Response::new(200, "<html v2>"));

        let first = manager.handle(get("/index.html")).await.unwrap();
        assert_eq!(first.text(), "<html>");

        let outcome = refreshes.recv().await.unwrap();
        assert_eq!(outcome.result, RefreshResult::Updated);
        assert_eq!(stored_body(&storage, &get("/index.html")).await.as_deref(), Some("<html v2>"));

        let second = manager.handle(get("/index.html")).await.unwrap();
        assert_eq!(second.text(), "<html v2>");
    }

    #[tokio::test]
    async fn test_background_refresh_failure_is_discarded() {
        let (storage, fetcher, manager) = setup();
        let (manager, mut refreshes) = manager.with_refresh_events();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();
        fetcher.set_offline(true);

        let response = manager.handle(get("/")).await.unwrap();
        assert_eq!(response.text(), "root");

        let outcome = refreshes.recv().await.unwrap();
        assert!(matches!(outcome.result, RefreshResult::Failed(_)));
        assert_eq!(stored_body(&storage, &get("/")).await.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn test_cache_first_miss_fetches_and_stores() {
        let (storage, fetcher, manager) = setup();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();
        fetcher.route(&format!("{}/logo.png", ORIGIN), Response::new(200, "png"));

        let response = manager.handle(get("/logo.png")).await.unwrap();
        assert_eq!(response.text(), "png");
        assert_eq!(stored_body(&storage, &get("/logo.png")).await.as_deref(), Some("png"));

        // Unknown paths get a 404 from the stub; error statuses are not cached
        let missing = manager.handle(get("/missing.css")).await.unwrap();
        assert_eq!(missing.status, 404);
        assert!(stored_body(&storage, &get("/missing.css")).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_first_miss_offline_propagates() {
        let (_storage, fetcher, manager) = setup();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();
        fetcher.set_offline(true);

        let err = manager.handle(get("/never-seen.js")).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_network_first_caches_and_falls_back() {
        let (storage, fetcher, manager) = setup();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();

        fetcher.route(LOOKUP_URL, Response::new(200, r#"{"status":1}"#));
        let online = manager.handle(lookup()).await.unwrap();
        assert_eq!(online.text(), r#"{"status":1}"#);
        assert_eq!(stored_body(&storage, &lookup()).await.as_deref(), Some(r#"{"status":1}"#));

        // Network is preferred over the cache while online
        fetcher.route(LOOKUP_URL, Response::new(200, r#"{"status":0}"#));
        let fresh = manager.handle(lookup()).await.unwrap();
        assert_eq!(fresh.text(), r#"{"status":0}"#);

        fetcher.set_offline(true);
        let offline = manager.handle(lookup()).await.unwrap();
        assert_eq!(offline.text(), r#"{"status":0}"#);
    }

    #[tokio::test]
    async fn test_network_first_offline_without_cache_fails() {
        let (_storage, fetcher, manager) = setup();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();
        fetcher.set_offline(true);

        assert!(manager.handle(lookup()).await.is_err());
    }

    #[tokio::test]
    async fn test_resume_takes_control_of_installed_generation() {
        let (storage, fetcher, manager) = setup();
        manager.install().await.unwrap();
        manager.activate().await.unwrap();

        let settings = CacheSettings::new(ORIGIN.parse().unwrap());
        let restarted = OfflineCacheManager::new(settings, storage.clone(), fetcher.clone());
        assert!(restarted.resume().await.unwrap());
        assert!(restarted.is_controlling().await);

        let fresh = OfflineCacheManager::new(
            CacheSettings::new(ORIGIN.parse().unwrap()).with_cache_name("ecosnap-v2"),
            storage,
            fetcher,
        );
        assert!(!fresh.resume().await.unwrap());
    }

    /// Storage whose batch writes always fail after the generation is created.
    struct FailingWriteStorage {
        inner: MemoryCacheStorage,
    }

    struct FailingWriteCache {
        inner: Arc<dyn ResponseCache>,
    }

    #[async_trait::async_trait]
    impl CacheStorage for FailingWriteStorage {
        async fn open(&self, name: &str) -> Result<Arc<dyn ResponseCache>, CacheError> {
            let inner = self.inner.open(name).await?;
            Ok(Arc::new(FailingWriteCache { inner }))
        }

        async fn has(&self, name: &str) -> Result<bool, CacheError> {
            self.inner.has(name).await
        }

        async fn keys(&self) -> Result<Vec<String>, CacheError> {
            self.inner.keys().await
        }

        async fn delete(&self, name: &str) -> Result<bool, CacheError> {
            self.inner.delete(name).await
        }
    }

    #[async_trait::async_trait]
    impl ResponseCache for FailingWriteCache {
        fn name(&self) -> &str {
            self.inner.name()
        }

        async fn match_request(
            &self,
            request: &Request,
        ) -> Result<Option<CachedData<StoredEntry>>, CacheError> {
            self.inner.match_request(request).await
        }

        async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
            self.inner.put(request, response).await
        }

        async fn put_all(&self, _entries: Vec<(Request, Response)>) -> Result<(), CacheError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }

        async fn entries(&self) -> Result<Vec<CachedData<StoredEntry>>, CacheError> {
            self.inner.entries().await
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_generation_to_resume() {
        let (_storage, fetcher, _manager) = setup();
        let storage = Arc::new(FailingWriteStorage {
            inner: MemoryCacheStorage::new(),
        });
        let settings = CacheSettings::new(ORIGIN.parse().unwrap());
        let manager = OfflineCacheManager::new(settings.clone(), storage.clone(), fetcher.clone());

        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
        assert_eq!(manager.state().await, WorkerState::Redundant);
        assert!(!storage.has(DEFAULT_CACHE_NAME).await.unwrap());

        let restarted = OfflineCacheManager::new(settings, storage, fetcher);
        assert!(!restarted.resume().await.unwrap());
        assert!(!restarted.is_controlling().await);
    }

    #[tokio::test]
    async fn test_failed_reinstall_keeps_existing_generation() {
        let (_storage, fetcher, _manager) = setup();
        let failing = Arc::new(FailingWriteStorage {
            inner: MemoryCacheStorage::new(),
        });
        failing.inner.open(DEFAULT_CACHE_NAME).await.unwrap();
        let settings = CacheSettings::new(ORIGIN.parse().unwrap());
        let retry = OfflineCacheManager::new(settings, failing.clone(), fetcher);
        assert!(retry.install().await.is_err());
        assert!(failing.has(DEFAULT_CACHE_NAME).await.unwrap());
    }
}
