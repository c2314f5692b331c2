//! # Profile Service
//!
//! Loads and saves the per-user profile document, exchanging replacement
//! images for URLs first. Images keep their original file names under a
//! per-user prefix; an image that was not replaced keeps its stored URL.

use std::sync::Arc;

use domains::{AppError, DocumentStore, ImageFile, ObjectStore, Result, UserProfile};

/// One profile edit: the new bio plus any replacement images.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub bio: String,
    pub profile_image: Option<ImageFile>,
    pub background_image: Option<ImageFile>,
}

pub struct ProfileService {
    docs: Arc<dyn DocumentStore>,
    store: Arc<dyn ObjectStore>,
}

impl ProfileService {
    pub fn new(docs: Arc<dyn DocumentStore>, store: Arc<dyn ObjectStore>) -> Self {
        Self { docs, store }
    }

    /// Fetches the profile, defaulting to an empty one for first-time users.
    pub async fn load(&self, user_id: &str) -> Result<UserProfile> {
        self.docs
            .get_profile(user_id)
            .await
            .map(Option::unwrap_or_default)
            .map_err(AppError::from_collaborator)
    }

    /// Uploads any replacement images, merges the update over the stored
    /// document, and persists it.
    pub async fn save(&self, user_id: &str, update: ProfileUpdate) -> Result<UserProfile> {
        let mut profile = self.load(user_id).await?;
        profile.bio = update.bio;

        if let Some(image) = update.profile_image {
            profile.profile_image = Some(self.upload(user_id, "profile-images", image).await?);
        }
        if let Some(image) = update.background_image {
            profile.background_image =
                Some(self.upload(user_id, "background-images", image).await?);
        }

        self.docs
            .set_profile(user_id, &profile)
            .await
            .map_err(AppError::from_collaborator)?;
        Ok(profile)
    }

    async fn upload(&self, user_id: &str, prefix: &str, image: ImageFile) -> Result<String> {
        let key = format!("{prefix}/{user_id}/{}", image.file_name);
        self.store
            .save(&key, image.data, &image.content_type, None)
            .await
            .map_err(|err| AppError::Upload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use domains::{MockDocumentStore, MockObjectStore};

    fn png(name: &str) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            data: Bytes::from_static(&[1, 2, 3]),
        }
    }

    #[tokio::test]
    async fn load_defaults_to_empty_profile() {
        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile().returning(|_| Ok(None));

        let service = ProfileService::new(Arc::new(docs), Arc::new(MockObjectStore::new()));
        let profile = service.load("u1").await.unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[tokio::test]
    async fn save_uploads_replacement_images_under_user_prefix() {
        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile().returning(|_| Ok(None));
        docs.expect_set_profile().times(1).returning(|_, profile| {
            assert_eq!(profile.bio, "hello");
            assert_eq!(
                profile.profile_image.as_deref(),
                Some("/static/profile-images/u1/avatar.png")
            );
            Ok(())
        });

        let mut store = MockObjectStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|key, _, _, _| Ok(format!("/static/{key}")));

        let service = ProfileService::new(Arc::new(docs), Arc::new(store));
        let update = ProfileUpdate {
            bio: "hello".to_string(),
            profile_image: Some(png("avatar.png")),
            background_image: None,
        };
        let saved = service.save("u1", update).await.unwrap();
        assert_eq!(saved.bio, "hello");
    }

    #[tokio::test]
    async fn save_keeps_existing_urls_when_images_unchanged() {
        let existing = UserProfile {
            bio: "old".to_string(),
            profile_image: Some("/static/profile-images/u1/old.png".to_string()),
            background_image: Some("/static/background-images/u1/bg.png".to_string()),
        };
        let mut docs = MockDocumentStore::new();
        let stored = existing.clone();
        docs.expect_get_profile().returning(move |_| Ok(Some(stored.clone())));
        docs.expect_set_profile().returning(|_, profile| {
            assert_eq!(profile.profile_image.as_deref(), Some("/static/profile-images/u1/old.png"));
            Ok(())
        });

        // No replacement images: the object store must not be called.
        let service = ProfileService::new(Arc::new(docs), Arc::new(MockObjectStore::new()));
        let saved = service
            .save("u1", ProfileUpdate { bio: "new".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(saved.bio, "new");
        assert_eq!(saved.background_image.as_deref(), Some("/static/background-images/u1/bg.png"));
    }

    #[tokio::test]
    async fn upload_failure_surfaces_as_upload_error() {
        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile().returning(|_| Ok(None));
        let mut store = MockObjectStore::new();
        store
            .expect_save()
            .returning(|_, _, _, _| Err(anyhow::anyhow!("disk full")));

        let service = ProfileService::new(Arc::new(docs), Arc::new(store));
        let update = ProfileUpdate {
            bio: String::new(),
            profile_image: Some(png("avatar.png")),
            background_image: None,
        };
        let err = service.save("u1", update).await.unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
    }
}
