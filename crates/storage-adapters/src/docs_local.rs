//! Local filesystem implementation of `DocumentStore`.
//!
//! One JSON document per user id, written atomically enough for a
//! single-client engine. Stands in for a remote document service.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use domains::{DocumentStore, UserProfile};

pub struct LocalDocumentStore {
    root_path: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    fn path_for(&self, user_id: &str) -> anyhow::Result<PathBuf> {
        if user_id.is_empty() || user_id.contains(['/', '\\']) || user_id.contains("..") {
            anyhow::bail!("invalid user id: {user_id}");
        }
        Ok(self.root_path.join(format!("{user_id}.json")))
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        let path = self.path_for(user_id)?;
        match fs::read(&path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_profile(&self, user_id: &str, profile: &UserProfile) -> anyhow::Result<()> {
        let path = self.path_for(user_id)?;
        fs::create_dir_all(&self.root_path).await?;
        fs::write(&path, serde_json::to_vec_pretty(profile)?).await?;
        Ok(())
    }
}
