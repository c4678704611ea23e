//! Asset origin
//!
//! The "network" side of the cache: the built site on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hyper::body::Bytes;
use thiserror::Error;
use tokio::fs;

use super::Asset;
use crate::logger;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("outside asset root: {0}")]
    Forbidden(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of assets on a cache miss
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Asset, FetchError>;
}

/// Serves files below a root directory, `/` and trailing slashes map to the index file
pub struct StaticDirFetcher {
    root: PathBuf,
    index_file: String,
}

impl StaticDirFetcher {
    pub fn new(root: &str) -> Self {
        Self::with_index(root, "index.html")
    }

    pub fn with_index(root: &str, index_file: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            index_file: index_file.to_string(),
        }
    }

    /// Map a URL path to a file path below the root, rejecting traversal
    fn resolve(&self, url: &str) -> Result<PathBuf, FetchError> {
        let relative = url.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            logger::log_warning(&format!("Path traversal attempt blocked: {url}"));
            return Err(FetchError::Forbidden(url.to_string()));
        }

        let mut file_path = self.root.join(relative);
        if relative.is_empty() || relative.ends_with('/') || file_path.is_dir() {
            file_path = file_path.join(&self.index_file);
        }

        // Missing files are routine (404), only a missing root is worth a warning
        let root = self.root.canonicalize().map_err(|e| {
            logger::log_warning(&format!(
                "Asset root not found or inaccessible '{}': {e}",
                self.root.display()
            ));
            FetchError::NotFound(url.to_string())
        })?;
        let canonical = file_path
            .canonicalize()
            .map_err(|_| FetchError::NotFound(url.to_string()))?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {url} -> {}",
                canonical.display()
            ));
            return Err(FetchError::Forbidden(url.to_string()));
        }
        Ok(canonical)
    }
}

#[async_trait]
impl AssetFetcher for StaticDirFetcher {
    async fn fetch(&self, url: &str) -> Result<Asset, FetchError> {
        let path = self.resolve(url)?;
        let content = fs::read(&path).await.map_err(|source| FetchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Asset::from_bytes(&file_name(&path), Bytes::from(content)))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>home</html>").unwrap();
        std::fs::create_dir_all(dir.path().join("brands")).unwrap();
        std::fs::write(dir.path().join("brands/goose.webp"), b"RIFF goose").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_root_maps_to_index() {
        let dir = site();
        let fetcher = StaticDirFetcher::new(dir.path().to_str().unwrap());
        let asset = fetcher.fetch("/").await.unwrap();
        assert_eq!(asset.body.as_ref(), b"<html>home</html>");
        assert_eq!(asset.content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_nested_file() {
        let dir = site();
        let fetcher = StaticDirFetcher::new(dir.path().to_str().unwrap());
        let asset = fetcher.fetch("/brands/goose.webp").await.unwrap();
        assert_eq!(asset.content_type, "image/webp");
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let dir = site();
        let fetcher = StaticDirFetcher::new(dir.path().to_str().unwrap());
        assert!(matches!(
            fetcher.fetch("/brands/none.webp").await,
            Err(FetchError::NotFound(_))
        ));
        assert!(matches!(
            fetcher.fetch("/../etc/passwd").await,
            Err(FetchError::Forbidden(_))
        ));
    }
}
