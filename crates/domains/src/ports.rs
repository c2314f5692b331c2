//! # Ports
//!
//! Collaborator contracts. Every remote service the engine talks to is
//! reached through one of these traits so that tests can substitute fakes
//! and deployments can swap adapters.
//!
//! Ports return `anyhow::Result`; an adapter that can classify its own
//! failure embeds an [`crate::AppError`](crate::error::AppError) in the
//! chain for the service layer to downcast.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::models::{
    ApiResponse, NewPost, NewReply, NewUser, Post, Principal, Reply, UserProfile,
};

/// Percentage updates (0–100) emitted while an upload is in flight.
pub type UploadProgress = mpsc::UnboundedSender<u8>;

/// REST backend for posts, likes, replies, and user mirroring.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Submits a new post and returns the raw response for moderation
    /// interpretation. Only connection-level failures are `Err`; a 403 or
    /// a sentinel body is data, not an error.
    async fn create_post(&self, payload: NewPost) -> anyhow::Result<ApiResponse>;

    /// Fetches the post collection, optionally scoped to one author.
    async fn list_posts<'a>(&self, user_id: Option<&'a str>) -> anyhow::Result<Vec<Post>>;

    /// Deletes a post. Ownership is enforced server-side.
    async fn delete_post(&self, post_id: i64) -> anyhow::Result<()>;

    async fn like_post(&self, post_id: i64, user_id: &str) -> anyhow::Result<()>;
    async fn like_count(&self, post_id: i64) -> anyhow::Result<u64>;
    async fn like_status(&self, post_id: i64, user_id: &str) -> anyhow::Result<bool>;

    /// Creates a reply; resolves to the server acknowledgement message.
    async fn create_reply(&self, reply: NewReply) -> anyhow::Result<String>;
    async fn list_replies(&self, post_id: i64) -> anyhow::Result<Vec<Reply>>;

    /// Mirrors a freshly signed-up identity into the backend.
    async fn create_user(&self, user: NewUser) -> anyhow::Result<()>;
}

/// Blob storage contract: stores bytes under a caller-chosen key and
/// resolves to a publicly fetchable URL.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `key`, reporting 0–100 progress on `progress`
    /// when supplied. The returned URL is the terminal value of the upload.
    async fn save(
        &self,
        key: &str,
        data: bytes::Bytes,
        content_type: &str,
        progress: Option<UploadProgress>,
    ) -> anyhow::Result<String>;
}

/// Email/password identity and session contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<Principal>;

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Principal>;
    async fn sign_out(&self);

    fn current_user(&self) -> Option<Principal>;

    /// Session-changed notification stream. Receivers observe `None` after
    /// sign-out and the new principal after sign-in.
    fn subscribe(&self) -> watch::Receiver<Option<Principal>>;
}

/// Per-user profile document storage.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>>;
    async fn set_profile(&self, user_id: &str, profile: &UserProfile) -> anyhow::Result<()>;
}

/// Text detection over a remote image. Used only by the age gate.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Returns the full recognized text blob, or `None` when the image
    /// contains no detectable text.
    async fn detect_text(&self, image_url: &str) -> anyhow::Result<Option<String>>;
}
