//! Local filesystem implementation of `ObjectStore`.
//!
//! Keys are caller-chosen (the submission pipeline uses
//! `post-images/<millis>-<name>`); the store only validates them against
//! path traversal. Writes are chunked so progress reporting is real, not a
//! single 100 at the end.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use domains::{ObjectStore, UploadProgress};

const CHUNK_SIZE: usize = 64 * 1024;

pub struct LocalObjectStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, url_prefix: impl Into<String>) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a key under the root, rejecting traversal components.
    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)))
        {
            anyhow::bail!("invalid object key: {key}");
        }
        Ok(self.root_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn save(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
        progress: Option<UploadProgress>,
    ) -> anyhow::Result<String> {
        let target = self.resolve(key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&target).await?;
        let total = data.len();
        let mut written = 0usize;
        for chunk in data.chunks(CHUNK_SIZE) {
            file.write_all(chunk).await?;
            written += chunk.len();
            // Intermediate updates stay below 100; the terminal 100 is sent
            // exactly once, after the flush.
            if written < total {
                if let Some(progress) = &progress {
                    let _ = progress.send(((written * 100) / total) as u8);
                }
            }
        }
        file.flush().await?;
        if let Some(progress) = &progress {
            let _ = progress.send(100);
        }

        debug!(key, bytes = total, "object stored");
        Ok(format!("{}/{key}", self.url_prefix))
    }
}
