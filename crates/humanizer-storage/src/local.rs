use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{StorageError, StorageResult};

/// Outcome of an age-based cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Local directory holding uploaded documents.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    last_stamp: AtomicU64,
}

impl FileStore {
    /// Create the store, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(FileStore {
            base_path,
            last_stamp: AtomicU64::new(0),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Millisecond timestamp, strictly increasing across calls on this store.
    fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut last = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_stamp.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// Write `data` as `{epoch_ms}_{filename}` and return the stored path.
    ///
    /// `filename` must already be sanitized to a single path component.
    pub async fn save(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidPath(format!(
                "'{}' is not a plain file name",
                filename
            )));
        }

        let stored_name = format!("{}_{}", self.next_stamp(), filename);
        let path = self.base_path.join(&stored_name);
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored uploaded file"
        );

        Ok(path)
    }

    /// Map a client-supplied path back to a file inside the store.
    ///
    /// Accepts either the path returned by [`FileStore::save`] or the bare stored file
    /// name. Anything resolving outside the store directory is rejected.
    pub async fn resolve(&self, raw: &str) -> StorageResult<PathBuf> {
        if raw.trim().is_empty() || raw.contains("..") {
            return Err(StorageError::InvalidPath(
                "File path contains invalid characters".to_string(),
            ));
        }

        let requested = Path::new(raw);
        let name = requested
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(format!("'{}' has no file name", raw)))?;

        if let Some(parent) = requested.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent != self.base_path.as_path() {
                let same_dir = match (parent.canonicalize(), self.base_path.canonicalize()) {
                    (Ok(parent), Ok(base)) => parent == base,
                    _ => false,
                };
                if !same_dir {
                    return Err(StorageError::InvalidPath(
                        "File path resolves outside the upload directory".to_string(),
                    ));
                }
            }
        }

        let path = self.base_path.join(name);
        let is_file = fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(StorageError::NotFound(raw.to_string()));
        }

        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            )),
        })
    }

    pub async fn remove(&self, path: &Path) -> StorageResult<()> {
        fs::remove_file(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            )),
        })?;

        tracing::debug!(path = %path.display(), "Removed stored file");
        Ok(())
    }

    /// Delete regular files older than `max_age`.
    ///
    /// Per-file failures are logged and counted; only failing to list the directory is
    /// an error.
    #[tracing::instrument(skip(self), fields(dir = %self.base_path.display()))]
    pub async fn cleanup(&self, max_age: Duration) -> StorageResult<CleanupReport> {
        let mut report = CleanupReport::default();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to stat file");
                    report.failed += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            report.scanned += 1;

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .unwrap_or_default();
            if age <= max_age {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Deleted expired upload");
                    report.deleted += 1;
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to delete expired upload");
                    report.failed += 1;
                }
            }
        }

        if report.deleted > 0 || report.failed > 0 {
            tracing::info!(
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "Upload cleanup finished"
            );
        }

        Ok(report)
    }
}
