//! # Offline Cache Manager
//!
//! A cache-first interceptor for the app's static assets, modelled as a
//! worker with three externally triggered transitions:
//!
//! - **install**: open the store named [`CACHE_NAME`] and populate it with
//!   every path in [`ASSET_MANIFEST`]. All or nothing: one failed asset makes
//!   the worker [`WorkerState::Redundant`] and nothing is stored. A
//!   successful install skips the waiting phase.
//! - **activate**: delete every store whose name is not [`CACHE_NAME`] and
//!   claim open clients.
//! - **fetch**: non-GET requests pass through untouched; GET requests are
//!   answered from any store, falling back to the origin. Origin responses
//!   are never written back.
//!
//! The store name is the only invalidation key. Bump it whenever the bundle
//! changes, otherwise clients keep the stale assets.

pub mod origin;
pub mod storage;

use crate::error::{FluffError, Result};
use origin::{AssetOrigin, AssetRequest};
use storage::{AssetResponse, CacheStorage};
use tracing::{debug, info, warn};

pub const CACHE_NAME: &str = "fluffcook-v3-2-cache";

pub const ASSET_MANIFEST: &[&str] = &[
    "./",
    "index.html",
    "script.js",
    "style.css",
    "manifest.json",
    "icons/icon-192.png",
    "icons/icon-512.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activated,
    Redundant,
}

/// How a fetch was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not a GET; the caller should forward the request itself.
    Passthrough,
    Cache(AssetResponse),
    Network(AssetResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub current: String,
    pub stores: Vec<String>,
    pub cached_paths: Vec<String>,
}

impl CacheStatus {
    /// A failed install leaves the current store open but empty.
    pub fn is_installed(&self) -> bool {
        self.stores.iter().any(|s| *s == self.current) && !self.cached_paths.is_empty()
    }

    /// Stores that the next activation would delete.
    pub fn stale(&self) -> Vec<&str> {
        self.stores
            .iter()
            .filter(|s| **s != self.current)
            .map(String::as_str)
            .collect()
    }
}

pub struct CacheWorker<C: CacheStorage, O: AssetOrigin> {
    cache_name: String,
    manifest: Vec<String>,
    storage: C,
    origin: O,
    state: WorkerState,
    skip_waiting: bool,
    clients_claimed: bool,
}

impl<C: CacheStorage, O: AssetOrigin> CacheWorker<C, O> {
    pub fn new(storage: C, origin: O) -> Self {
        Self::with_version(storage, origin, CACHE_NAME, ASSET_MANIFEST)
    }

    pub fn with_version<S: AsRef<str>>(
        storage: C,
        origin: O,
        cache_name: &str,
        manifest: &[S],
    ) -> Self {
        Self {
            cache_name: cache_name.to_string(),
            manifest: manifest.iter().map(|p| p.as_ref().to_string()).collect(),
            storage,
            origin,
            state: WorkerState::Parsed,
            skip_waiting: false,
            clients_claimed: false,
        }
    }

    /// A worker for a version that was already installed and activated in an
    /// earlier session.
    pub async fn resume(storage: C, origin: O) -> Result<Self> {
        let mut worker = Self::new(storage, origin);
        if worker.storage.keys().await?.contains(&worker.cache_name) {
            worker.state = WorkerState::Activated;
            worker.clients_claimed = true;
        }
        Ok(worker)
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn skips_waiting(&self) -> bool {
        self.skip_waiting
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    pub fn storage(&self) -> &C {
        &self.storage
    }

    pub async fn install(&mut self) -> Result<()> {
        self.state = WorkerState::Installing;
        info!(cache = %self.cache_name, assets = self.manifest.len(), "installing");

        match self.populate().await {
            Ok(()) => {
                self.skip_waiting = true;
                self.state = WorkerState::Installed;
                info!(cache = %self.cache_name, "installed");
                Ok(())
            }
            Err(e) => {
                self.state = WorkerState::Redundant;
                warn!(cache = %self.cache_name, error = %e, "install failed");
                Err(e)
            }
        }
    }

    async fn populate(&self) -> Result<()> {
        self.storage.open(&self.cache_name).await?;

        let mut fetched = Vec::with_capacity(self.manifest.len());
        for path in &self.manifest {
            let request = AssetRequest::get(path);
            let response = self.origin.fetch(&request).await?;
            if !response.is_success() {
                return Err(FluffError::Cache(format!(
                    "{} returned status {}",
                    path, response.status
                )));
            }
            fetched.push((request.path, response));
        }

        for (path, response) in fetched {
            self.storage.put(&self.cache_name, &path, response).await?;
        }
        Ok(())
    }

    /// Deletes every store but the current one and returns the deleted names.
    pub async fn activate(&mut self) -> Result<Vec<String>> {
        match self.state {
            WorkerState::Installed if self.skip_waiting => {}
            WorkerState::Activated => return Ok(Vec::new()),
            state => {
                return Err(FluffError::Cache(format!(
                    "cannot activate a worker in state {:?}",
                    state
                )))
            }
        }

        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name != self.cache_name && self.storage.delete(&name).await? {
                info!(cache = %name, "deleted stale cache");
                deleted.push(name);
            }
        }

        self.clients_claimed = true;
        self.state = WorkerState::Activated;
        Ok(deleted)
    }

    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<FetchOutcome> {
        if !request.is_get() {
            return Ok(FetchOutcome::Passthrough);
        }
        if let Some(cached) = self.storage.lookup(&request.path).await? {
            debug!(path = %request.path, "cache hit");
            return Ok(FetchOutcome::Cache(cached));
        }
        debug!(path = %request.path, "cache miss");
        Ok(FetchOutcome::Network(self.origin.fetch(request).await?))
    }

    pub async fn status(&self) -> Result<CacheStatus> {
        Ok(CacheStatus {
            current: self.cache_name.clone(),
            stores: self.storage.keys().await?,
            cached_paths: self.storage.entries(&self.cache_name).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use origin::testing::StaticOrigin;
    use storage::MemoryCacheStorage;

    const MANIFEST: &[&str] = &["./", "index.html", "script.js"];

    fn origin() -> StaticOrigin {
        StaticOrigin::new()
            .with_asset("./", "<html>root</html>")
            .with_asset("index.html", "<html>index</html>")
            .with_asset("script.js", "main()")
            .with_asset("extra.css", "p{}")
    }

    fn worker(storage: MemoryCacheStorage, origin: StaticOrigin) -> CacheWorker<MemoryCacheStorage, StaticOrigin> {
        CacheWorker::with_version(storage, origin, "v3", MANIFEST)
    }

    #[tokio::test]
    async fn install_populates_current_store() {
        let mut worker = worker(MemoryCacheStorage::new(), origin());

        worker.install().await.unwrap();

        assert_eq!(worker.state(), WorkerState::Installed);
        assert!(worker.skips_waiting());
        assert_eq!(
            worker.storage().entries("v3").await.unwrap(),
            vec!["/", "index.html", "script.js"]
        );
    }

    #[tokio::test]
    async fn failed_install_stores_nothing_and_is_redundant() {
        let origin = origin().with_status("script.js", 500);
        let mut worker = worker(MemoryCacheStorage::new(), origin);

        assert!(worker.install().await.is_err());

        assert_eq!(worker.state(), WorkerState::Redundant);
        assert!(worker.storage().entries("v3").await.unwrap().is_empty());
        assert!(worker.activate().await.is_err());
    }

    #[tokio::test]
    async fn activation_deletes_exactly_the_old_versions() {
        let storage = MemoryCacheStorage::new();
        storage.put("v1", "index.html", AssetResponse::ok("old")).await.unwrap();
        storage.put("v2", "index.html", AssetResponse::ok("older")).await.unwrap();
        let mut worker = worker(storage, origin());

        assert!(!worker.storage().keys().await.unwrap().contains(&"v3".to_string()));
        worker.install().await.unwrap();
        let deleted = worker.activate().await.unwrap();

        assert_eq!(deleted, vec!["v1", "v2"]);
        assert_eq!(worker.storage().keys().await.unwrap(), vec!["v3"]);
        assert!(worker.clients_claimed());
        assert_eq!(worker.state(), WorkerState::Activated);
    }

    #[tokio::test]
    async fn activation_on_disk_skips_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".stfolder")).unwrap();
        let storage = storage::FsCacheStorage::new(dir.path());
        storage.put("v1", "index.html", AssetResponse::ok("old")).await.unwrap();
        let mut worker = CacheWorker::with_version(storage, origin(), "v3", MANIFEST);

        worker.install().await.unwrap();
        let deleted = worker.activate().await.unwrap();

        assert_eq!(deleted, vec!["v1"]);
        assert!(dir.path().join(".stfolder").is_dir());
        assert_eq!(worker.storage().keys().await.unwrap(), vec!["v3"]);
    }

    #[tokio::test]
    async fn activate_before_install_is_refused() {
        let mut worker = worker(MemoryCacheStorage::new(), origin());
        assert!(worker.activate().await.is_err());
    }

    #[tokio::test]
    async fn fetch_is_cache_first_without_write_back() {
        let mut worker = worker(MemoryCacheStorage::new(), origin());
        worker.install().await.unwrap();
        worker.activate().await.unwrap();

        assert_eq!(
            worker.handle_fetch(&AssetRequest::get("/index.html")).await.unwrap(),
            FetchOutcome::Cache(AssetResponse::ok("<html>index</html>"))
        );
        assert_eq!(
            worker.handle_fetch(&AssetRequest::get("extra.css")).await.unwrap(),
            FetchOutcome::Network(AssetResponse::ok("p{}"))
        );
        assert!(!worker
            .storage()
            .entries("v3")
            .await
            .unwrap()
            .contains(&"extra.css".to_string()));
    }

    #[tokio::test]
    async fn non_get_passes_through() {
        let worker = worker(MemoryCacheStorage::new(), origin());
        assert_eq!(
            worker
                .handle_fetch(&AssetRequest::new("POST", "index.html"))
                .await
                .unwrap(),
            FetchOutcome::Passthrough
        );
        assert!(worker.origin.requested().is_empty());
    }

    #[tokio::test]
    async fn status_reports_stale_stores() {
        let storage = MemoryCacheStorage::new();
        storage.open("v2").await.unwrap();
        let mut worker = worker(storage, origin());
        worker.install().await.unwrap();

        let status = worker.status().await.unwrap();
        assert!(status.is_installed());
        assert_eq!(status.stale(), vec!["v2"]);
        assert_eq!(status.cached_paths.len(), 3);
    }

    #[tokio::test]
    async fn resume_recognizes_an_installed_version() {
        let storage = MemoryCacheStorage::new();
        storage.open(CACHE_NAME).await.unwrap();
        let worker = CacheWorker::resume(storage, origin()).await.unwrap();
        assert_eq!(worker.state(), WorkerState::Activated);

        let fresh = CacheWorker::resume(MemoryCacheStorage::new(), origin()).await.unwrap();
        assert_eq!(fresh.state(), WorkerState::Parsed);
    }
}
