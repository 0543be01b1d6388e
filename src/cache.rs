use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::types::Repository;

const CACHE_FILE_NAME: &str = "ghmenu_repos";

/// Default cache location inside the system temporary directory.
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(CACHE_FILE_NAME)
}

/// Snapshot of the repository list stored as a JSON array.
///
/// Entries never expire; the snapshot is replaced only when the list is
/// fetched again. Cache problems are logged and never fail a run.
#[derive(Debug, Clone)]
pub struct RepoCache {
    path: PathBuf,
}

impl RepoCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached list, or `None` when there is no usable snapshot.
    pub async fn load(&self) -> Option<Vec<Repository>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no repository cache yet");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read repository cache");
                return None;
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(repos) => Some(repos),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed repository cache");
                None
            }
        }
    }

    /// Replaces the snapshot. Written to a uniquely named sibling file first
    /// and renamed, so an interrupted write never leaves a truncated cache
    /// behind and no other file is touched.
    pub async fn store(&self, repos: &[Repository]) {
        if let Err(e) = self.try_store(repos).await {
            warn!(path = %self.path.display(), error = %e, "failed to write repository cache");
        }
    }

    async fn try_store(&self, repos: &[Repository]) -> std::io::Result<()> {
        let json = serde_json::to_vec(repos)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&path, &json))
            .await
            .map_err(std::io::Error::other)??;
        debug!(path = %self.path.display(), count = repos.len(), "wrote repository cache");
        Ok(())
    }
}

fn write_replacing(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = tempfile::Builder::new()
        .prefix(".ghmenu_repos")
        .tempfile_in(dir)?;
    staging.write_all(contents)?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}
