//! Content-addressed result cache.
//!
//! One JSON file per fingerprint under the cache directory. Entries carry
//! their creation time and are ignored once older than the retention window.
//! Writes land in a temporary file first and are renamed into place, so
//! readers only ever observe complete entries.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const ENTRY_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt cache entry at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CacheError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// SHA-256 of an upload, hex encoded. Doubles as the entry file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub created_at: DateTime<Utc>,
    pub value: T,
}

/// Minimal view used by the sweeper; skips decoding the value.
#[derive(Deserialize)]
struct EntryHeader {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
    ttl: chrono::Duration,
}

impl ResultCache {
    /// Opens (and creates if needed) the cache directory.
    pub async fn open(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| CacheError::io(&dir, e))?;

        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        info!("Result cache ready at {} (ttl {}s)", dir.display(), ttl.num_seconds());
        Ok(Self { dir, ttl })
    }

    fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(format!("{}.{ENTRY_EXTENSION}", fingerprint.as_str()))
    }

    fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(created_at) > self.ttl
    }

    /// Returns the cached value, or `None` when absent or expired.
    pub async fn get<T: DeserializeOwned>(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<T>, CacheError> {
        self.get_at(fingerprint, Utc::now()).await
    }

    pub(crate) async fn get_at<T: DeserializeOwned>(
        &self,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> Result<Option<T>, CacheError> {
        let path = self.entry_path(fingerprint);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: no entry for {fingerprint}");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io(&path, e)),
        };

        let entry: CacheEntry<T> =
            serde_json::from_slice(&raw).map_err(|source| CacheError::Corrupt {
                path: path.clone(),
                source,
            })?;

        if self.is_expired(entry.created_at, now) {
            info!("Cache expired for {fingerprint}");
            return Ok(None);
        }

        info!("Cache hit for {fingerprint}");
        Ok(Some(entry.value))
    }

    /// Stores `value` stamped with the current time, replacing any prior entry.
    pub async fn put<T: Serialize>(
        &self,
        fingerprint: &Fingerprint,
        value: &T,
    ) -> Result<(), CacheError> {
        self.put_at(fingerprint, value, Utc::now()).await
    }

    pub(crate) async fn put_at<T: Serialize>(
        &self,
        fingerprint: &Fingerprint,
        value: &T,
        created_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(fingerprint);
        let body =
            serde_json::to_vec(&CacheEntry { created_at, value }).map_err(CacheError::Encode)?;

        // Unique per writer; the rename makes the last writer win atomically.
        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", fingerprint.as_str(), Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp_path, &body).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(CacheError::io(&tmp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(CacheError::io(&path, e));
        }

        info!("Saved result to cache for {fingerprint}");
        Ok(())
    }

    /// Deletes entry files whose retention window has passed.
    /// Undecodable entries are left alone. Returns the number removed.
    pub async fn sweep_expired(&self) -> Result<usize, CacheError> {
        self.sweep_expired_at(Utc::now()).await
    }

    pub(crate) async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<usize, CacheError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?;

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }

            let raw = match tokio::fs::read(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Sweeper could not read {}: {e}", path.display());
                    continue;
                }
            };
            let Ok(header) = serde_json::from_slice::<EntryHeader>(&raw) else {
                continue;
            };

            if self.is_expired(header.created_at, now) {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    // Another sweeper or a rewrite got there first.
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => warn!("Sweeper could not remove {}: {e}", path.display()),
                }
            }
        }

        Ok(removed)
    }

    /// Runs [`Self::sweep_expired`] every `every` on a background task.
    pub fn spawn_sweeper(self, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;
                match self.sweep_expired().await {
                    Ok(0) => {}
                    Ok(n) => info!("Cache sweep removed {n} expired entries"),
                    Err(e) => warn!("Cache sweep failed: {e}"),
                }
            }
        })
    }
}
