//! # Rusty-Feed CLI
//!
//! The entry point that assembles the shipped adapters behind the domain
//! ports and drives the engine from the command line:
//!
//! ```text
//! rusty-feed feed [user_id]
//! rusty-feed post <user_id> <content> [image_path]
//! rusty-feed reply <post_id> <user_id> <content>
//! rusty-feed like <post_id> <user_id>
//! rusty-feed delete <post_id>
//! rusty-feed signup <email> <password> <username> [id_document_url]
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api_adapters::PostsHttpClient;
use auth_adapters::SimpleIdentityProvider;
use domains::{
    DocumentStore, ImageFile, ModerationOutcome, NewReply, ObjectStore, PostsApi,
    SubmissionRequest, TextRecognizer,
};
use ocr_adapters::VisionTextRecognizer;
use services::{
    AgeGateVerifier, AgePolicy, FeedRefreshCoordinator, ProfileService, ProfileUpdate,
    SignupFlow, SignupRequest, SubmissionPipeline,
};
use storage_adapters::{LocalDocumentStore, LocalObjectStore};

const USAGE: &str = "usage:
  rusty-feed feed [user_id]
  rusty-feed post <user_id> <content> [image_path]
  rusty-feed reply <post_id> <user_id> <content>
  rusty-feed like <post_id> <user_id>
  rusty-feed delete <post_id>
  rusty-feed profile <user_id> [bio]
  rusty-feed signup <email> <password> <username> [id_document_url]";

/// Stands in for the OCR collaborator when age verification is disabled;
/// never consulted in that configuration.
struct NullRecognizer;

#[async_trait]
impl TextRecognizer for NullRecognizer {
    async fn detect_text(&self, _image_url: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = configs::load().context("failed to load configuration")?;

    // 1. Adapters behind the domain ports.
    let posts: Arc<dyn PostsApi> =
        Arc::new(PostsHttpClient::new(config.posts_api.base_url.clone())?);
    let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
        config.media.root_path.clone(),
        config.media.url_prefix.clone(),
    ));
    let docs: Arc<dyn DocumentStore> =
        Arc::new(LocalDocumentStore::new(config.media.root_path.join("profiles")));

    // 2. The engine.
    let feed = Arc::new(FeedRefreshCoordinator::new(posts.clone(), docs.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("feed") => {
            let items = feed.refresh(args.get(1).map(String::as_str)).await?;
            for item in &items {
                println!(
                    "#{} {}: {} ({} replies)",
                    item.post.id,
                    item.post.author_display_name,
                    item.post.content,
                    item.replies.len()
                );
            }
            info!(count = items.len(), "feed refreshed");
            Ok(())
        }

        Some("post") => {
            let (Some(user_id), Some(content)) = (args.get(1), args.get(2)) else {
                anyhow::bail!("{USAGE}");
            };
            let image = match args.get(3) {
                Some(path) => Some(read_image(Path::new(path)).await?),
                None => None,
            };

            let pipeline = SubmissionPipeline::new(posts.clone(), store, feed.clone());
            let request = SubmissionRequest {
                content: content.clone(),
                author_user_id: user_id.clone(),
                image,
            };

            let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel();
            let reporter = tokio::spawn(async move {
                while let Some(percent) = progress_rx.recv().await {
                    info!(percent, "uploading");
                }
            });

            let outcome = pipeline.submit_with_progress(request, Some(progress_tx)).await;
            reporter.await.ok();

            match outcome {
                ModerationOutcome::Accepted { posts } => {
                    info!(feed_len = posts.len(), "post accepted");
                    Ok(())
                }
                ModerationOutcome::FlaggedContent => {
                    warn!("post was flagged by moderation");
                    std::process::exit(1);
                }
                ModerationOutcome::Forbidden => {
                    warn!("post violates policy");
                    std::process::exit(1);
                }
                ModerationOutcome::Failed { message } => anyhow::bail!(message),
            }
        }

        Some("reply") => {
            let (Some(post_id), Some(user_id), Some(content)) =
                (args.get(1), args.get(2), args.get(3))
            else {
                anyhow::bail!("{USAGE}");
            };
            let post_id: i64 = post_id.parse().context("post id must be an integer")?;

            let ack = posts
                .create_reply(NewReply {
                    content: content.clone(),
                    post_id,
                    user_id: user_id.clone(),
                })
                .await?;
            if !ack.is_empty() {
                println!("{ack}");
            }
            feed.refresh(None).await?;
            info!(post_id, "reply created");
            Ok(())
        }

        Some("like") => {
            let (Some(post_id), Some(user_id)) = (args.get(1), args.get(2)) else {
                anyhow::bail!("{USAGE}");
            };
            let post_id: i64 = post_id.parse().context("post id must be an integer")?;

            posts.like_post(post_id, user_id).await?;
            let count = posts.like_count(post_id).await?;
            let liked = posts.like_status(post_id, user_id).await?;
            println!("{count} likes{}", if liked { " (including yours)" } else { "" });
            Ok(())
        }

        Some("delete") => {
            let Some(post_id) = args.get(1) else {
                anyhow::bail!("{USAGE}");
            };
            let post_id: i64 = post_id.parse().context("post id must be an integer")?;

            posts.delete_post(post_id).await?;
            feed.refresh(None).await?;
            info!(post_id, "post deleted");
            Ok(())
        }

        Some("profile") => {
            let Some(user_id) = args.get(1) else {
                anyhow::bail!("{USAGE}");
            };
            let service = ProfileService::new(docs.clone(), store);
            match args.get(2) {
                Some(bio) => {
                    let saved = service
                        .save(user_id, ProfileUpdate { bio: bio.clone(), ..Default::default() })
                        .await?;
                    info!(user_id = %user_id, "profile saved");
                    println!("bio: {}", saved.bio);
                }
                None => {
                    let profile = service.load(user_id).await?;
                    println!("bio: {}", profile.bio);
                    if let Some(avatar) = &profile.profile_image {
                        println!("avatar: {avatar}");
                    }
                }
            }
            Ok(())
        }

        Some("signup") => {
            let (Some(email), Some(password), Some(username)) =
                (args.get(1), args.get(2), args.get(3))
            else {
                anyhow::bail!("{USAGE}");
            };

            let policy = AgePolicy {
                require_verification: config.signup.require_age_verification,
            };
            let recognizer: Arc<dyn TextRecognizer> = match config.ocr.api_key {
                Some(key) => Arc::new(VisionTextRecognizer::new(config.ocr.endpoint, key)?),
                None if policy.require_verification => {
                    anyhow::bail!("ocr.api_key is required while age verification is enabled")
                }
                None => Arc::new(NullRecognizer),
            };

            let identity = Arc::new(SimpleIdentityProvider::new());
            let flow = SignupFlow::new(
                identity,
                posts.clone(),
                AgeGateVerifier::new(recognizer),
                policy,
            );

            let principal = flow
                .create_account(SignupRequest {
                    email: email.clone(),
                    password: password.clone(),
                    username: username.clone(),
                    id_document_url: args.get(4).cloned(),
                })
                .await?;
            info!(user_id = %principal.user_id, "account created");
            Ok(())
        }

        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

async fn read_image(path: &Path) -> anyhow::Result<ImageFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("image path has no file name")?
        .to_string();
    let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Ok(ImageFile { file_name, content_type, data: data.into() })
}
