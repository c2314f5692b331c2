//! HTTP client for the Posts API.
//!
//! Create-post responses are returned raw (status, content type, body) so
//! the moderation interpreter can classify them; a 403 or a sentinel body
//! is data here, not an error. Read endpoints decode their JSON payloads
//! and enforce the content-type guard themselves.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use domains::{ApiResponse, AppError, NewPost, NewReply, NewUser, Post, PostsApi, Reply};

/// HTTP client for Posts API communication.
#[derive(Debug, Clone)]
pub struct PostsHttpClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct LikedResponse {
    liked: bool,
}

#[derive(Deserialize)]
struct AckResponse {
    #[serde(default)]
    message: String,
}

impl PostsHttpClient {
    /// Creates a client rooted at `base_url` (no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Builds the transport error for a non-success response, consuming it.
async fn transport_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    anyhow::Error::new(AppError::Transport(format!(
        "request failed: {status} - {body}"
    )))
}

/// Enforces the JSON content-type guard on a successful read response.
fn require_json(content_type: Option<&str>) -> anyhow::Result<()> {
    match content_type {
        Some(ct) if ct.contains("application/json") => Ok(()),
        other => Err(anyhow::Error::new(AppError::Parse(format!(
            "unexpected response format: {}",
            other.unwrap_or("none")
        )))),
    }
}

#[async_trait]
impl PostsApi for PostsHttpClient {
    async fn create_post(&self, payload: NewPost) -> anyhow::Result<ApiResponse> {
        let response = self
            .client
            .post(self.url("/posts"))
            .json(&payload)
            .send()
            .await
            .context("create-post request failed")?;

        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let body = response.text().await.context("create-post body unreadable")?;
        debug!(status, "create-post response received");

        Ok(ApiResponse { status, content_type, body })
    }

    async fn list_posts<'a>(&self, user_id: Option<&'a str>) -> anyhow::Result<Vec<Post>> {
        let url = match user_id {
            Some(id) => format!("{}/posts?userId={id}", self.base_url),
            None => self.url("/posts"),
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("posts request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        require_json(content_type_of(&response).as_deref())?;

        response
            .json::<Vec<Post>>()
            .await
            .map_err(|err| anyhow::Error::new(AppError::Parse(err.to_string())))
    }

    async fn delete_post(&self, post_id: i64) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{post_id}")))
            .send()
            .await
            .context("delete-post request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(())
    }

    async fn like_post(&self, post_id: i64, user_id: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/posts/{post_id}/like")))
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await
            .context("like request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(())
    }

    async fn like_count(&self, post_id: i64) -> anyhow::Result<u64> {
        let response = self
            .client
            .get(self.url(&format!("/posts/{post_id}/like/count")))
            .send()
            .await
            .context("like-count request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        let counted: CountResponse = response
            .json()
            .await
            .map_err(|err| anyhow::Error::new(AppError::Parse(err.to_string())))?;
        Ok(counted.count)
    }

    async fn like_status(&self, post_id: i64, user_id: &str) -> anyhow::Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/posts/{post_id}/like/status?user_id={user_id}")))
            .send()
            .await
            .context("like-status request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        let status: LikedResponse = response
            .json()
            .await
            .map_err(|err| anyhow::Error::new(AppError::Parse(err.to_string())))?;
        Ok(status.liked)
    }

    async fn create_reply(&self, reply: NewReply) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.url("/replies"))
            .json(&reply)
            .send()
            .await
            .context("reply request failed")?;

        if !response.status().is_success() {
            // The backend reports reply failures either as a JSON document
            // with a message field or as plain text.
            let is_json = content_type_of(&response)
                .is_some_and(|ct| ct.contains("application/json"));
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = if is_json {
                serde_json::from_str::<AckResponse>(&body)
                    .map(|ack| ack.message)
                    .ok()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| body.clone())
            } else {
                body.clone()
            };
            return Err(anyhow::Error::new(AppError::Transport(format!(
                "reply rejected ({status}): {message}"
            ))));
        }

        let ack: AckResponse = response
            .json()
            .await
            .map_err(|err| anyhow::Error::new(AppError::Parse(err.to_string())))?;
        Ok(ack.message)
    }

    async fn list_replies(&self, post_id: i64) -> anyhow::Result<Vec<Reply>> {
        let response = self
            .client
            .get(self.url(&format!("/posts/{post_id}/replies")))
            .send()
            .await
            .context("replies request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        response
            .json::<Vec<Reply>>()
            .await
            .map_err(|err| anyhow::Error::new(AppError::Parse(err.to_string())))
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&user)
            .send()
            .await
            .context("create-user request failed")?;

        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(())
    }
}
