//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Feed together with
//! the wire payloads exchanged with the Posts API. Field renames track the
//! backend's snake/camel conventions so the structs serialize verbatim.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A published post as returned by the Posts API.
///
/// Server-assigned `id`; immutable after creation except owner deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    #[serde(rename = "user_id")]
    pub author_user_id: String,
    /// Display name resolved by the backend at creation time.
    #[serde(rename = "username", default)]
    pub author_display_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A reply attached to a post. Fetched per post, never cached globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub post_id: i64,
    #[serde(rename = "user_id")]
    pub author_user_id: String,
    pub content: String,
}

/// An image selected for upload, kept in memory for the duration of one
/// submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Ephemeral value object describing one submission attempt. Never
/// persisted directly; converted into [`NewPost`] once the image (if any)
/// has been exchanged for a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub content: String,
    pub author_user_id: String,
    pub image: Option<ImageFile>,
}

/// Wire payload for `POST /posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewPost {
    /// Builds the wire payload from a request and the uploaded image URL.
    pub fn from_request(request: &SubmissionRequest, image_url: Option<String>) -> Self {
        Self {
            content: request.content.clone(),
            user_id: request.author_user_id.clone(),
            image_url,
        }
    }
}

/// Wire payload for `POST /replies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReply {
    pub content: String,
    pub post_id: i64,
    pub user_id: String,
}

/// Wire payload for `POST /users`, mirroring a freshly signed-up identity
/// into the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

/// Raw create-post response. Moderation statuses (403, body sentinel) are
/// carried here as data for the interpreter, not as transport errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// The classified result of submitting user content.
///
/// Exactly one variant is active; only `Accepted` carries a fresh post list.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    Accepted { posts: Vec<Post> },
    FlaggedContent,
    Forbidden,
    Failed { message: String },
}

/// Result of one age-gate verification attempt. Derived per signup attempt,
/// never persisted. `Undetermined` is a hard stop for account creation.
#[derive(Debug, Clone, PartialEq)]
pub enum AgeGateResult {
    Eligible { birth_date: NaiveDate },
    Ineligible { reason: String },
    Undetermined,
}

/// The authenticated principal exposed by the Identity Provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
}

/// Per-user profile document held by the Document Store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(rename = "backgroundImage", default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

/// One assembled feed row: the post plus its best-effort enrichments.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub post: Post,
    pub replies: Vec<Reply>,
    /// `None` renders as the default avatar.
    pub author_avatar: Option<String>,
}

/// A published feed state. `seq` orders snapshots so that a refresh which
/// started earlier but resolved later never overwrites a newer one.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub seq: u64,
    pub items: Vec<FeedItem>,
}

impl FeedSnapshot {
    pub fn empty() -> Self {
        Self { seq: 0, items: Vec::new() }
    }
}
