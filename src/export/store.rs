//! Destinations for exported images.
use std::{
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use async_trait::async_trait;

use crate::{
    export::exporter::ExportedImage,
    foundation::error::{InstaframeError, InstaframeResult},
};

/// Where a saved export ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedMedia {
    /// Store-specific location (a file path, or an index for in-memory stores).
    pub location: String,
    /// Number of encoded bytes written.
    pub len: usize,
}

/// Persists finished exports.
///
/// A failure must leave nothing behind that a later `save` could confuse with a success.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, image: &ExportedImage) -> InstaframeResult<SavedMedia>;
}

/// Writes each export as a PNG file into a directory.
#[derive(Debug)]
pub struct DirectoryMediaStore {
    dir: PathBuf,
    counter: AtomicU64,
}

impl DirectoryMediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_file_name(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("instaframe-{millis}-{n}.png")
    }
}

#[async_trait]
impl MediaStore for DirectoryMediaStore {
    #[tracing::instrument(skip_all, fields(dir = %self.dir.display()))]
    async fn save(&self, image: &ExportedImage) -> InstaframeResult<SavedMedia> {
        let png = image.encode_png()?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create export dir '{}'", self.dir.display()))
            .map_err(|e| InstaframeError::persistence(format!("{e:#}")))?;

        let path = self.dir.join(self.next_file_name());
        let tmp = path.with_extension("png.partial");
        let write = async {
            tokio::fs::write(&tmp, &png)
                .await
                .with_context(|| format!("write '{}'", tmp.display()))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .with_context(|| format!("rename into '{}'", path.display()))?;
            anyhow::Ok(())
        };
        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(InstaframeError::persistence(format!("{e:#}")));
        }

        tracing::info!(path = %path.display(), bytes = png.len(), "export saved");
        Ok(SavedMedia {
            location: path.display().to_string(),
            len: png.len(),
        })
    }
}

/// Keeps encoded exports in memory.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    saved: Mutex<Vec<Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded PNGs in save order.
    pub fn saved(&self) -> Vec<Vec<u8>> {
        match self.saved.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn save(&self, image: &ExportedImage) -> InstaframeResult<SavedMedia> {
        let png = image.encode_png()?;
        let len = png.len();
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| InstaframeError::persistence("in-memory store poisoned"))?;
        saved.push(png);
        Ok(SavedMedia {
            location: format!("memory:{}", saved.len() - 1),
            len,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/store.rs"]
mod tests;
