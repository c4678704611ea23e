//! Offline asset cache
//!
//! Server-side model of the site's service worker: a named bucket is filled
//! from a fixed manifest at install time (all or nothing), and lookups are
//! answered cache-first with a single origin fetch on a miss. Entries are never
//! invalidated; a new bucket name is the only way to replace them.

mod origin;
mod script;

use std::collections::HashMap;
use std::sync::Arc;

use hyper::body::Bytes;
use thiserror::Error;
use tokio::sync::RwLock;

pub use origin::{AssetFetcher, FetchError, StaticDirFetcher};
pub use script::render_service_worker;

/// A stored response: body bytes plus the headers needed to replay it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: &'static str,
    pub etag: String,
}

impl Asset {
    /// Wrap bytes served for `url`, deriving type and validator
    pub fn from_bytes(url: &str, body: Bytes) -> Self {
        Self {
            etag: crate::http::cache::generate_etag(&body),
            content_type: crate::http::mime::content_type_for(url),
            body,
        }
    }
}

/// Where a fetched asset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

#[derive(Debug, Error)]
#[error("failed to cache {url}: {source}")]
pub struct InstallError {
    pub url: String,
    #[source]
    pub source: FetchError,
}

type Bucket = HashMap<String, Asset>;

pub struct AssetCache {
    name: String,
    manifest: Vec<String>,
    buckets: RwLock<HashMap<String, Arc<Bucket>>>,
}

impl AssetCache {
    pub fn new(name: &str, manifest: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            manifest,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    /// Populate the current bucket with every manifest URL
    ///
    /// Nothing is committed unless every fetch succeeds. On success, buckets
    /// stored under any other name are dropped.
    pub async fn install(&self, origin: &dyn AssetFetcher) -> Result<usize, InstallError> {
        let mut bucket = Bucket::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let asset = origin.fetch(url).await.map_err(|source| InstallError {
                url: url.clone(),
                source,
            })?;
            bucket.insert(url.clone(), asset);
        }

        let count = bucket.len();
        let mut buckets = self.buckets.write().await;
        buckets.retain(|name, _| name == &self.name);
        buckets.insert(self.name.clone(), Arc::new(bucket));
        Ok(count)
    }

    /// Cached copy of `url` in the current bucket, if any
    pub async fn lookup(&self, url: &str) -> Option<Asset> {
        let buckets = self.buckets.read().await;
        buckets.get(&self.name)?.get(url).cloned()
    }

    /// Cache-first fetch; a miss goes to `origin` exactly once and is not stored
    pub async fn fetch(
        &self,
        url: &str,
        origin: &dyn AssetFetcher,
    ) -> Result<(Asset, Source), FetchError> {
        if let Some(asset) = self.lookup(url).await {
            return Ok((asset, Source::Cache));
        }
        origin.fetch(url).await.map(|asset| (asset, Source::Network))
    }

    pub async fn is_installed(&self) -> bool {
        self.buckets.read().await.contains_key(&self.name)
    }

    #[cfg(test)]
    async fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.buckets.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
