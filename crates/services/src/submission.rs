//! # Submission Pipeline
//!
//! Orchestrates one post creation: validate → upload → submit → interpret →
//! refresh. The pipeline is stateless and reentrant; at-most-one-in-flight
//! per form is the caller's convention, not enforced here. Every step's
//! error is caught and mapped to a `Failed` outcome; no raw transport
//! failure reaches the caller, and nothing is retried automatically.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use domains::{ModerationOutcome, NewPost, ObjectStore, PostsApi, SubmissionRequest, UploadProgress};

use crate::feed::FeedRefreshCoordinator;
use crate::moderation;

pub struct SubmissionPipeline {
    posts: Arc<dyn PostsApi>,
    store: Arc<dyn ObjectStore>,
    feed: Arc<FeedRefreshCoordinator>,
}

impl SubmissionPipeline {
    pub fn new(
        posts: Arc<dyn PostsApi>,
        store: Arc<dyn ObjectStore>,
        feed: Arc<FeedRefreshCoordinator>,
    ) -> Self {
        Self { posts, store, feed }
    }

    /// Runs one submission attempt without progress reporting.
    pub async fn submit(&self, request: SubmissionRequest) -> ModerationOutcome {
        self.submit_with_progress(request, None).await
    }

    /// Runs one submission attempt, forwarding upload progress when an
    /// image is attached. Steps are strictly sequential: the upload
    /// completes before the post is sent, and the response is fully
    /// interpreted before any refresh is triggered.
    pub async fn submit_with_progress(
        &self,
        request: SubmissionRequest,
        progress: Option<UploadProgress>,
    ) -> ModerationOutcome {
        // 1. Validate. An image-only post is legal; an empty one is not,
        //    and is rejected before any network call.
        if request.content.trim().is_empty() && request.image.is_none() {
            return ModerationOutcome::Failed {
                message: "post content or an image is required".to_string(),
            };
        }

        // 2. Upload: exchange the image for a public URL. No partial post
        //    is created on failure.
        let image_url = match &request.image {
            Some(image) => {
                let key = format!(
                    "post-images/{}-{}",
                    Utc::now().timestamp_millis(),
                    image.file_name
                );
                match self
                    .store
                    .save(&key, image.data.clone(), &image.content_type, progress)
                    .await
                {
                    Ok(url) => {
                        debug!(%key, %url, "image uploaded");
                        Some(url)
                    }
                    Err(err) => {
                        warn!(error = %err, "image upload failed");
                        return ModerationOutcome::Failed { message: err.to_string() };
                    }
                }
            }
            None => None,
        };

        // 3. Submit to the Posts API.
        let payload = NewPost::from_request(&request, image_url);
        let response = match self.posts.create_post(payload).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "create-post request failed");
                return ModerationOutcome::Failed { message: err.to_string() };
            }
        };

        // 4. Interpret the moderation response. Rejections return here
        //    without touching the feed.
        let outcome = moderation::interpret_response(&response);
        if !matches!(outcome, ModerationOutcome::Accepted { .. }) {
            return outcome;
        }

        // 5. Refresh the feed and attach the current post list.
        match self.feed.refresh(None).await {
            Ok(items) => ModerationOutcome::Accepted {
                posts: items.into_iter().map(|item| item.post).collect(),
            },
            Err(err) => ModerationOutcome::Failed { message: err.to_string() },
        }
    }
}
