//! Named cache stores holding asset responses.

use crate::error::{FluffError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::debug;

/// A stored or fetched asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Canonical form of a manifest or request path: leading `./` and `/` are
/// dropped, and the site root is `/`.
pub fn normalize_asset_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let trimmed = trimmed.trim_start_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A set of named stores, each mapping asset paths to responses.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Creates the store if it does not exist yet.
    async fn open(&self, name: &str) -> Result<()>;

    /// Names of every existing store.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Deletes a store and its entries. Returns false when it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;

    async fn put(&self, name: &str, path: &str, response: AssetResponse) -> Result<()>;

    /// Paths held by one store.
    async fn entries(&self, name: &str) -> Result<Vec<String>>;

    /// First match for `path` across all stores, in [`CacheStorage::keys`] order.
    async fn lookup(&self, path: &str) -> Result<Option<AssetResponse>>;
}

type Store = (String, Vec<(String, AssetResponse)>);

/// Process-local stores, kept in creation order.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: Mutex<Vec<Store>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_stores<R>(&self, f: impl FnOnce(&mut Vec<Store>) -> R) -> Result<R> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| FluffError::Cache("cache storage lock poisoned".to_string()))?;
        Ok(f(&mut stores))
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        self.with_stores(|stores| {
            if !stores.iter().any(|(n, _)| n == name) {
                stores.push((name.to_string(), Vec::new()));
            }
        })
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.with_stores(|stores| stores.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        self.with_stores(|stores| {
            let before = stores.len();
            stores.retain(|(n, _)| n != name);
            stores.len() != before
        })
    }

    async fn put(&self, name: &str, path: &str, response: AssetResponse) -> Result<()> {
        let path = normalize_asset_path(path);
        self.with_stores(|stores| {
            let idx = match stores.iter().position(|(n, _)| n == name) {
                Some(idx) => idx,
                None => {
                    stores.push((name.to_string(), Vec::new()));
                    stores.len() - 1
                }
            };
            let entries = &mut stores[idx].1;
            match entries.iter_mut().find(|(p, _)| *p == path) {
                Some(entry) => entry.1 = response,
                None => entries.push((path, response)),
            }
        })
    }

    async fn entries(&self, name: &str) -> Result<Vec<String>> {
        self.with_stores(|stores| {
            stores
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, entries)| entries.iter().map(|(p, _)| p.clone()).collect())
                .unwrap_or_default()
        })
    }

    async fn lookup(&self, path: &str) -> Result<Option<AssetResponse>> {
        let path = normalize_asset_path(path);
        self.with_stores(|stores| {
            stores
                .iter()
                .flat_map(|(_, entries)| entries.iter())
                .find(|(p, _)| *p == path)
                .map(|(_, r)| r.clone())
        })
    }
}

/// Stores on disk: `<root>/<store name>/<encoded asset path>`.
///
/// Only successful responses are ever written, so bodies are stored bare
/// and come back with status 200.
#[derive(Debug, Clone)]
pub struct FsCacheStorage {
    root: PathBuf,
}

impl FsCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(FluffError::Cache(format!("Invalid cache name: {:?}", name)));
        }
        Ok(self.root.join(name))
    }

    fn file_name(path: &str) -> String {
        url::form_urlencoded::byte_serialize(normalize_asset_path(path).as_bytes()).collect()
    }

    fn decode_file_name(name: &str) -> String {
        url::form_urlencoded::parse(format!("p={}", name).as_bytes())
            .next()
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| name.to_string())
    }

    async fn sorted_dir_names(dir: &Path, want_dirs: bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut read = match fs::read_dir(dir).await {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = read.next_entry().await? {
            if entry.file_type().await?.is_dir() != want_dirs {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // Hidden directories are never stores.
            if want_dirs && name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl CacheStorage for FsCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        fs::create_dir_all(self.store_dir(name)?).await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Self::sorted_dir_names(&self.root, true).await
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        match fs::remove_dir_all(self.store_dir(name)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, name: &str, path: &str, response: AssetResponse) -> Result<()> {
        if !response.is_success() {
            return Err(FluffError::Cache(format!(
                "refusing to store {} response for {}",
                response.status, path
            )));
        }
        let dir = self.store_dir(name)?;
        fs::create_dir_all(&dir).await?;
        let file = dir.join(Self::file_name(path));
        debug!(path = %file.display(), bytes = response.body.len(), "caching asset");
        fs::write(file, response.body).await?;
        Ok(())
    }

    async fn entries(&self, name: &str) -> Result<Vec<String>> {
        let names = Self::sorted_dir_names(&self.store_dir(name)?, false).await?;
        Ok(names.iter().map(|n| Self::decode_file_name(n)).collect())
    }

    async fn lookup(&self, path: &str) -> Result<Option<AssetResponse>> {
        let file_name = Self::file_name(path);
        for name in self.keys().await? {
            let file = self.store_dir(&name)?.join(&file_name);
            match fs::read(&file).await {
                Ok(body) => return Ok(Some(AssetResponse::ok(body))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }
}
