use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum WriteFailure {
    #[error("Failed creating directory {dir}: {source}")]
    DirectoryCreateFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed writing file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for restored sources.
#[async_trait::async_trait]
pub trait SourceSink: Send + Sync {
    async fn write(&self, path: &Path, content: &str) -> Result<(), WriteFailure>;
}

/// Writes restored sources to the filesystem, creating parent directories
/// on demand. Holds no state between calls; an existing file is replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeWriter;

impl TreeWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SourceSink for TreeWriter {
    async fn write(&self, path: &Path, content: &str) -> Result<(), WriteFailure> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // create_dir_all treats an already existing directory as success,
            // which covers siblings racing on a shared ancestor.
            fs::create_dir_all(dir)
                .await
                .map_err(|source| WriteFailure::DirectoryCreateFailed {
                    dir: dir.to_path_buf(),
                    source,
                })?;
        }
        fs::write(path, content)
            .await
            .map_err(|source| WriteFailure::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// In-memory sink – useful for testing.
#[derive(Default, Clone)]
pub struct MemorySink {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
    failing: Arc<RwLock<Vec<PathBuf>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write to `path` fail with `WriteFailed`.
    pub async fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.write().await.push(path.into());
    }

    pub async fn get(&self, path: &Path) -> Option<String> {
        self.files.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SourceSink for MemorySink {
    async fn write(&self, path: &Path, content: &str) -> Result<(), WriteFailure> {
        if self.failing.read().await.iter().any(|p| p == path) {
            return Err(WriteFailure::WriteFailed {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write refused"),
            });
        }
        self.files
            .write()
            .await
            .insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }
}
