//! Sources for program artifacts read before upload.

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use tracing::debug;

/// Reads a program artifact by path.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn read_artifact(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads artifacts from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalArtifacts;

#[async_trait]
impl ArtifactSource for LocalArtifacts {
    async fn read_artifact(&self, path: &str) -> io::Result<Vec<u8>> {
        let content = tokio::fs::read(path).await?;
        debug!(path, bytes = content.len(), "read artifact");
        Ok(content)
    }
}

/// Serves artifacts from memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    files: HashMap<String, Vec<u8>>,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), content.into());
        self
    }
}

#[async_trait]
impl ArtifactSource for InMemoryArtifacts {
    async fn read_artifact(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such artifact: {path}"))
        })
    }
}
