//! Seeds the backend with sample posts for local development, pushing each
//! one through the full submission pipeline so moderation responses are
//! exercised the same way the app exercises them.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api_adapters::PostsHttpClient;
use domains::{DocumentStore, ModerationOutcome, ObjectStore, PostsApi, SubmissionRequest};
use services::{FeedRefreshCoordinator, SubmissionPipeline};
use storage_adapters::{LocalDocumentStore, LocalObjectStore};

const SEED_USER: &str = "seed-user";
const SAMPLE_POSTS: &[&str] = &[
    "Hello from the seed script!",
    "Second sample post with a bit more text to fill out the feed view.",
    "今日はいい天気ですね。",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = configs::load().context("failed to load configuration")?;

    let posts: Arc<dyn PostsApi> =
        Arc::new(PostsHttpClient::new(config.posts_api.base_url.clone())?);
    let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
        config.media.root_path.clone(),
        config.media.url_prefix.clone(),
    ));
    let docs: Arc<dyn DocumentStore> =
        Arc::new(LocalDocumentStore::new(config.media.root_path.join("profiles")));
    let feed = Arc::new(FeedRefreshCoordinator::new(posts.clone(), docs));
    let pipeline = SubmissionPipeline::new(posts, store, feed);

    let mut created = 0usize;
    for content in SAMPLE_POSTS {
        let request = SubmissionRequest {
            content: (*content).to_string(),
            author_user_id: SEED_USER.to_string(),
            image: None,
        };
        match pipeline.submit(request).await {
            ModerationOutcome::Accepted { posts } => {
                created += 1;
                info!(feed_len = posts.len(), "seeded post");
            }
            ModerationOutcome::FlaggedContent | ModerationOutcome::Forbidden => {
                warn!(content = *content, "seed post rejected by moderation");
            }
            ModerationOutcome::Failed { message } => anyhow::bail!("seeding failed: {message}"),
        }
    }

    info!(created, "seeding complete");
    Ok(())
}
