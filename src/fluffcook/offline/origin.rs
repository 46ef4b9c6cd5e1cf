//! Where assets come from when they are not cached.

use super::storage::{normalize_asset_path, AssetResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    pub path: String,
}

impl AssetRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: normalize_asset_path(path),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

#[async_trait]
pub trait AssetOrigin: Send + Sync {
    /// A missing asset is a 404 response; `Err` is reserved for failures to
    /// reach the origin at all.
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse>;
}

/// Serves a static bundle from a directory. The site root maps to `index.html`.
#[derive(Debug, Clone)]
pub struct DirOrigin {
    root: PathBuf,
}

impl DirOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = if path == "/" { "index.html" } else { path };
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl AssetOrigin for DirOrigin {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let Some(file) = self.resolve(&request.path) else {
            return Ok(AssetResponse::not_found());
        };
        debug!(path = %file.display(), "reading asset from origin");
        match fs::read(&file).await {
            Ok(body) => Ok(AssetResponse::ok(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AssetResponse::not_found()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fixed set of assets; records every path requested.
    #[derive(Debug, Default)]
    pub struct StaticOrigin {
        assets: HashMap<String, AssetResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticOrigin {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_asset(mut self, path: &str, body: &str) -> Self {
            self.assets
                .insert(normalize_asset_path(path), AssetResponse::ok(body));
            self
        }

        pub fn with_status(mut self, path: &str, status: u16) -> Self {
            self.assets.insert(
                normalize_asset_path(path),
                AssetResponse {
                    status,
                    body: Vec::new(),
                },
            );
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetOrigin for StaticOrigin {
        async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
            self.requested.lock().unwrap().push(request.path.clone());
            Ok(self
                .assets
                .get(&request.path)
                .cloned()
                .unwrap_or_else(AssetResponse::not_found))
        }
    }
}
