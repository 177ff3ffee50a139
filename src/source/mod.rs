//! Where photo bytes come from.
use std::path::PathBuf;

use async_trait::async_trait;

/// Opaque handle to a user's photo choice, resolved by a [`PhotoSource`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SelectionToken(pub String);

impl From<PathBuf> for SelectionToken {
    fn from(path: PathBuf) -> Self {
        Self(path.display().to_string())
    }
}

impl From<&str> for SelectionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("photo selection was cancelled")]
    Cancelled,
    #[error("photo could not be read: {0}")]
    Unreadable(String),
}

/// Resolves a selection into encoded image bytes.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn load(&self, selection: &SelectionToken) -> Result<Vec<u8>, SourceError>;
}

/// Treats selection tokens as filesystem paths.
#[derive(Clone, Debug, Default)]
pub struct FsPhotoSource {
    root: Option<PathBuf>,
}

impl FsPhotoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative tokens against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, selection: &SelectionToken) -> PathBuf {
        let path = PathBuf::from(&selection.0);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl PhotoSource for FsPhotoSource {
    async fn load(&self, selection: &SelectionToken) -> Result<Vec<u8>, SourceError> {
        if selection.0.is_empty() {
            return Err(SourceError::Cancelled);
        }
        let path = self.resolve(selection);
        tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::Unreadable(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/mod.rs"]
mod tests;
