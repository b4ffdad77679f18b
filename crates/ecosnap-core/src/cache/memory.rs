use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::storage::validate_name;
use super::{CacheError, CacheStorage, CachedData, ResponseCache, StoredEntry};
use crate::http::{Request, Response};

/// Process-local cache storage. Used by tests and as a scratch cache.
#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<BTreeMap<String, Arc<MemoryResponseCache>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn ResponseCache>, CacheError> {
        validate_name(name)?;
        let mut caches = self.caches.write().await;
        let cache = caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryResponseCache::new(name)))
            .clone();
        Ok(cache)
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.caches.read().await.contains_key(name))
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.caches.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.caches.write().await.remove(name).is_some())
    }
}

pub struct MemoryResponseCache {
    name: String,
    entries: RwLock<HashMap<String, CachedData<StoredEntry>>>,
}

impl MemoryResponseCache {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_request(
        &self,
        request: &Request,
    ) -> Result<Option<CachedData<StoredEntry>>, CacheError> {
        Ok(self.entries.read().await.get(&request.cache_key()).cloned())
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        self.entries.write().await.insert(
            request.cache_key(),
            CachedData::new(StoredEntry::new(request, response)),
        );
        Ok(())
    }

    async fn put_all(&self, entries: Vec<(Request, Response)>) -> Result<(), CacheError> {
        let mut stored = self.entries.write().await;
        for (request, response) in entries {
            stored.insert(
                request.cache_key(),
                CachedData::new(StoredEntry::new(&request, response)),
            );
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<CachedData<StoredEntry>>, CacheError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> Request {
        Request::get(format!("http://localhost:5173{}", path).parse().unwrap())
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_shared() {
        let storage = MemoryCacheStorage::new();
        let a = storage.open("v1").await.unwrap();
        a.put(&request("/"), Response::new(200, "root")).await.unwrap();

        let b = storage.open("v1").await.unwrap();
        let hit = b.match_request(&request("/")).await.unwrap().unwrap();
        assert_eq!(hit.data.response.text(), "root");
        assert_eq!(storage.keys().await.unwrap(), vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let storage = MemoryCacheStorage::new();
        let cache = storage.open("v1").await.unwrap();
        cache.put(&request("/a"), Response::new(200, "one")).await.unwrap();
        cache.put(&request("/a"), Response::new(200, "two")).await.unwrap();

        let hit = cache.match_request(&request("/a")).await.unwrap().unwrap();
        assert_eq!(hit.data.response.text(), "two");
        assert_eq!(cache.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = MemoryCacheStorage::new();
        storage.open("old").await.unwrap();
        assert!(storage.delete("old").await.unwrap());
        assert!(!storage.delete("old").await.unwrap());
        assert!(!storage.has("old").await.unwrap());
    }
}
