//! Sources for the bundled widget documents.
//!
//! Asset paths look absolute (`/anime-detail-widget.html`) and are resolved
//! against a placeholder origin before being mapped onto the store, so `..`
//! segments cannot climb out of it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::error::AssetError;

/// Placeholder origin asset paths are resolved against.
pub const ASSET_ORIGIN: &str = "https://assets.invalid";

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the text of the asset at `path`.
    async fn fetch(&self, path: &str) -> Result<String, AssetError>;
}

/// Resolve `path` to its normalized URL path segments.
pub fn resolve_segments(path: &str) -> Result<Vec<String>, AssetError> {
    let origin = Url::parse(ASSET_ORIGIN).map_err(|_| AssetError::InvalidPath(path.into()))?;
    let url = origin
        .join(path)
        .map_err(|_| AssetError::InvalidPath(path.into()))?;
    if url.origin() != origin.origin() {
        return Err(AssetError::InvalidPath(path.into()));
    }

    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    if segments.is_empty()
        || segments
            .iter()
            .any(|s| s == ".." || s.contains(['\\', '%']))
    {
        return Err(AssetError::InvalidPath(path.into()));
    }
    Ok(segments)
}

/// Assets served from a directory on disk, e.g. the front-end `dist/`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> Result<PathBuf, AssetError> {
        let mut file = self.root.clone();
        file.extend(resolve_segments(path)?);
        Ok(file)
    }
}

#[async_trait]
impl AssetSource for DirAssets {
    async fn fetch(&self, path: &str) -> Result<String, AssetError> {
        let file = self.file_path(path)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.to_string()))
            }
            Err(source) => Err(AssetError::Io {
                path: file.display().to_string(),
                source,
            }),
        }
    }
}

/// In-memory assets keyed by resolved path (`/name.html`).
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    files: HashMap<String, String>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, text: impl Into<String>) -> Self {
        let key = resolve_segments(path)
            .map(|segments| format!("/{}", segments.join("/")))
            .unwrap_or_else(|_| path.to_string());
        self.files.insert(key, text.into());
        self
    }
}

#[async_trait]
impl AssetSource for StaticAssets {
    async fn fetch(&self, path: &str) -> Result<String, AssetError> {
        let key = format!("/{}", resolve_segments(path)?.join("/"));
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}
