//! On-disk cache storage.
//!
//! Layout: one directory per generation under the storage root, one JSON
//! file per entry named by the SHA-256 of the request key.
//!
//! ```text
//! <root>/ecosnap-v1/3f1c...e2.json   -> CachedData<StoredEntry>
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

use super::storage::validate_name;
use super::{CacheError, CacheStorage, CachedData, ResponseCache, StoredEntry};
use crate::http::{Request, Response};

/// Suffix distinguishing in-flight writes from committed entries
const TEMP_SUFFIX: &str = "tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn ResponseCache>, CacheError> {
        validate_name(name)?;
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).await?;
        Ok(Arc::new(DiskResponseCache {
            name: name.to_string(),
            dir,
        }))
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        validate_name(name)?;
        match fs::metadata(self.root.join(name)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        validate_name(name)?;
        match fs::remove_dir_all(self.root.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct DiskResponseCache {
    name: String,
    dir: PathBuf,
}

impl DiskResponseCache {
    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("{}.{}", n, TEMP_SUFFIX))
    }

    /// Write to a temp file; the caller renames it into place.
    async fn stage(&self, entry: &CachedData<StoredEntry>) -> Result<(PathBuf, PathBuf), CacheError> {
        let path = self.entry_path(&entry.data.cache_key());
        let temp = self.temp_path(&path);
        let contents = serde_json::to_vec(entry)?;
        fs::write(&temp, contents).await?;
        Ok((temp, path))
    }
}

#[async_trait]
impl ResponseCache for DiskResponseCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_request(
        &self,
        request: &Request,
    ) -> Result<Option<CachedData<StoredEntry>>, CacheError> {
        let path = self.entry_path(&request.cache_key());
        let contents = match fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cached: CachedData<StoredEntry> = serde_json::from_slice(&contents)?;
        Ok(Some(cached))
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        let entry = CachedData::new(StoredEntry::new(request, response));
        let (temp, path) = self.stage(&entry).await?;
        fs::rename(&temp, &path).await?;
        debug!(cache = %self.name, url = %request.url, "Stored response");
        Ok(())
    }

    async fn put_all(&self, entries: Vec<(Request, Response)>) -> Result<(), CacheError> {
        let mut staged = Vec::with_capacity(entries.len());
        for (request, response) in entries {
            let entry = CachedData::new(StoredEntry::new(&request, response));
            match self.stage(&entry).await {
                Ok(paths) => staged.push(paths),
                Err(e) => {
                    for (temp, _) in staged {
                        let _ = fs::remove_file(temp).await;
                    }
                    return Err(e);
                }
            }
        }
        let mut committed: Vec<PathBuf> = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();
        while let Some((temp, path)) = pending.next() {
            if let Err(e) = fs::rename(&temp, &path).await {
                let _ = fs::remove_file(&temp).await;
                for (temp, _) in pending.by_ref() {
                    let _ = fs::remove_file(temp).await;
                }
                for path in committed {
                    let _ = fs::remove_file(path).await;
                }
                warn!(cache = %self.name, error = %e, "Rolled back partial batch write");
                return Err(e.into());
            }
            committed.push(path);
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<CachedData<StoredEntry>>, CacheError> {
        let mut found = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read(&path).await?;
            match serde_json::from_slice::<CachedData<StoredEntry>>(&contents) {
                Ok(cached) => found.push(cached),
                Err(e) => warn!(path = ?path, error = %e, "Skipping corrupt cache entry"),
            }
        }
        Ok(found)
    }
}
