//! On-disk server icon cache
//!
//! Blobs live under `<cache_dir>/blockspy/icons`, one file per server address.
//! The cache is best effort: when the directory cannot be created it runs
//! disabled, every lookup misses, and every store fails without panicking.

use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use blockspy_core::prelude::*;

use crate::api::DashboardApi;

const ICON_EXTENSION: &str = "icon";

#[derive(Debug, Clone, Default)]
pub struct IconCache {
    dir: Option<PathBuf>,
}

impl IconCache {
    /// Open the cache in the platform cache directory.
    ///
    /// Never fails; returns a disabled cache when storage is unavailable.
    pub async fn init() -> Self {
        match dirs::cache_dir() {
            Some(base) => Self::open(base.join("blockspy").join("icons")).await,
            None => {
                warn!("No cache directory on this platform, icon cache disabled");
                Self::disabled()
            }
        }
    }

    /// Open the cache rooted at `dir`, creating it if needed.
    pub async fn open(dir: PathBuf) -> Self {
        match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => {
                debug!("Icon cache at {:?}", dir);
                Self { dir: Some(dir) }
            }
            Err(e) => {
                warn!("Icon cache disabled, cannot create {:?}: {}", dir, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let name = utf8_percent_encode(key, NON_ALPHANUMERIC).to_string();
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{name}.{ICON_EXTENSION}")))
    }

    /// Cached blob for `key`. Misses and storage errors both return `None`.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!("Icon cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, blob: &[u8]) -> Result<()> {
        let path = self
            .path_for(key)
            .ok_or_else(|| Error::storage("icon cache is disabled"))?;
        tokio::fs::write(&path, blob)
            .await
            .map_err(|e| Error::storage(format!("failed to cache icon for {key}: {e}")))
    }
}

/// Cached icon for `ip`, fetching and caching it on a miss.
///
/// Failures are logged and yield `None`, leaving the placeholder in place.
pub async fn load_icon<A: DashboardApi>(cache: &IconCache, api: &A, ip: &str) -> Option<Vec<u8>> {
    if let Some(blob) = cache.get(ip).await {
        trace!("Icon cache hit for {}", ip);
        return Some(blob);
    }
    match api.icon(ip).await {
        Ok(blob) if !blob.is_empty() => {
            if let Err(e) = cache.set(ip, &blob).await {
                debug!("{}", e);
            }
            Some(blob)
        }
        Ok(_) => {
            debug!("Empty icon body for {}", ip);
            None
        }
        Err(e) => {
            warn!("Icon fetch failed for {}: {}", ip, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApi;

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IconCache::open(dir.path().to_path_buf()).await;
        assert!(cache.is_enabled());
        assert!(cache.get("mc.example.net").await.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IconCache::open(dir.path().to_path_buf()).await;
        cache.set("mc.example.net:25565", b"png").await.unwrap();
        assert_eq!(
            cache.get("mc.example.net:25565").await,
            Some(b"png".to_vec())
        );
        // Keys are independent
        assert!(cache.get("mc.example.net").await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let cache = IconCache::disabled();
        assert!(cache.get("a").await.is_none());
        assert!(matches!(
            cache.set("a", b"x").await,
            Err(Error::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_on_unwritable_path_disables() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "").unwrap();
        let cache = IconCache::open(file.join("icons")).await;
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_load_icon_fetches_then_caches() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IconCache::open(dir.path().to_path_buf()).await;
        let api = FakeApi::new();
        api.set_icon("a", b"blob".to_vec());

        assert_eq!(load_icon(&cache, &api, "a").await, Some(b"blob".to_vec()));
        assert_eq!(api.calls_to("icon"), 1);

        assert_eq!(load_icon(&cache, &api, "a").await, Some(b"blob".to_vec()));
        assert_eq!(api.calls_to("icon"), 1);
    }

    #[tokio::test]
    async fn test_load_icon_failure_is_none() {
        let api = FakeApi::new();
        assert_eq!(load_icon(&IconCache::disabled(), &api, "missing").await, None);
    }
}
