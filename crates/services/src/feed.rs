//! # Feed Refresh Coordinator
//!
//! Re-fetches the post collection after any mutation and assembles the
//! display list: posts sorted newest-first, replies per post, and an avatar
//! per distinct author. Enrichment fetches are issued concurrently and are
//! best-effort: one failing reply or avatar fetch degrades that item only.
//!
//! Concurrent refreshes are legal; each caller gets its own result, but the
//! shared snapshot channel is last-write-wins: a refresh that started
//! earlier and resolved later is never published over a newer one.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{debug, warn};

use domains::{AppError, DocumentStore, FeedItem, FeedSnapshot, PostsApi, Reply, Result};

pub struct FeedRefreshCoordinator {
    posts: Arc<dyn PostsApi>,
    profiles: Arc<dyn DocumentStore>,
    next_seq: AtomicU64,
    published: Mutex<u64>,
    snapshot: watch::Sender<FeedSnapshot>,
}

impl FeedRefreshCoordinator {
    pub fn new(posts: Arc<dyn PostsApi>, profiles: Arc<dyn DocumentStore>) -> Self {
        let (snapshot, _) = watch::channel(FeedSnapshot::empty());
        Self {
            posts,
            profiles,
            next_seq: AtomicU64::new(0),
            published: Mutex::new(0),
            snapshot,
        }
    }

    /// Observes the authoritative feed state. Only the newest resolved
    /// refresh is ever published here.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot.subscribe()
    }

    /// Fetches the full (or user-scoped) post collection and its
    /// enrichments. A posts fetch failure aborts the refresh; enrichment
    /// failures degrade per item.
    pub async fn refresh(&self, user_id: Option<&str>) -> Result<Vec<FeedItem>> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;

        // 1. Fetch and re-sort: the wire order is not trusted.
        let mut posts = self
            .posts
            .list_posts(user_id)
            .await
            .map_err(AppError::from_collaborator)?;
        posts.sort_by(|a, b| b.id.cmp(&a.id));

        // 2. Enrich concurrently: replies per post, avatar per distinct author.
        let replies = join_all(posts.iter().map(|post| self.replies_for(post.id))).await;

        let authors: BTreeSet<String> =
            posts.iter().map(|post| post.author_user_id.clone()).collect();
        let avatars: HashMap<String, Option<String>> =
            join_all(authors.into_iter().map(|author| async move {
                let avatar = self.avatar_for(&author).await;
                (author, avatar)
            }))
            .await
            .into_iter()
            .collect();

        let items: Vec<FeedItem> = posts
            .into_iter()
            .zip(replies)
            .map(|(post, replies)| {
                let author_avatar = avatars.get(&post.author_user_id).cloned().flatten();
                FeedItem { post, replies, author_avatar }
            })
            .collect();

        // 3. Publish last-write-wins. Stale results still return to their
        //    caller but never overwrite a newer snapshot.
        {
            let mut published = self.published.lock().expect("snapshot lock");
            if seq > *published {
                *published = seq;
                let _ = self.snapshot.send(FeedSnapshot { seq, items: items.clone() });
            } else {
                debug!(seq, published = *published, "discarding stale refresh result");
            }
        }

        Ok(items)
    }

    async fn replies_for(&self, post_id: i64) -> Vec<Reply> {
        match self.posts.list_replies(post_id).await {
            Ok(replies) => replies,
            Err(err) => {
                warn!(post_id, error = %err, "reply fetch failed, degrading to empty list");
                Vec::new()
            }
        }
    }

    async fn avatar_for(&self, user_id: &str) -> Option<String> {
        match self.profiles.get_profile(user_id).await {
            Ok(profile) => profile.and_then(|p| p.profile_image),
            Err(err) => {
                warn!(user_id, error = %err, "avatar fetch failed, using default");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::fixtures::{sample_post, sample_reply};
    use domains::{MockDocumentStore, MockPostsApi, UserProfile};

    fn no_profiles() -> MockDocumentStore {
        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile().returning(|_| Ok(None));
        docs
    }

    #[tokio::test]
    async fn posts_are_sorted_by_descending_id() {
        let mut posts = MockPostsApi::new();
        posts
            .expect_list_posts()
            .returning(|_| Ok(vec![sample_post(7), sample_post(42), sample_post(3)]));
        posts.expect_list_replies().returning(|_| Ok(Vec::new()));

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(no_profiles()));
        let items = feed.refresh(None).await.unwrap();

        let ids: Vec<i64> = items.iter().map(|item| item.post.id).collect();
        assert_eq!(ids, vec![42, 7, 3]);
    }

    #[tokio::test]
    async fn failed_reply_fetch_degrades_that_item_only() {
        let mut posts = MockPostsApi::new();
        posts
            .expect_list_posts()
            .returning(|_| Ok(vec![sample_post(1), sample_post(2)]));
        posts.expect_list_replies().returning(|post_id| {
            if post_id == 1 {
                Err(anyhow::anyhow!("replies unavailable"))
            } else {
                Ok(vec![sample_reply(10, post_id)])
            }
        });

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(no_profiles()));
        let items = feed.refresh(None).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].post.id, 2);
        assert_eq!(items[0].replies.len(), 1);
        assert_eq!(items[1].post.id, 1);
        assert!(items[1].replies.is_empty());
    }

    #[tokio::test]
    async fn avatar_failure_falls_back_to_default() {
        let mut posts = MockPostsApi::new();
        posts.expect_list_posts().returning(|_| Ok(vec![sample_post(1)]));
        posts.expect_list_replies().returning(|_| Ok(Vec::new()));

        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile()
            .returning(|_| Err(anyhow::anyhow!("document store down")));

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(docs));
        let items = feed.refresh(None).await.unwrap();
        assert_eq!(items[0].author_avatar, None);
    }

    #[tokio::test]
    async fn avatar_is_taken_from_the_author_profile() {
        let mut posts = MockPostsApi::new();
        posts.expect_list_posts().returning(|_| Ok(vec![sample_post(1)]));
        posts.expect_list_replies().returning(|_| Ok(Vec::new()));

        let mut docs = MockDocumentStore::new();
        docs.expect_get_profile().returning(|_| {
            Ok(Some(UserProfile {
                bio: String::new(),
                profile_image: Some("/static/u1.png".to_string()),
                background_image: None,
            }))
        });

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(docs));
        let items = feed.refresh(None).await.unwrap();
        assert_eq!(items[0].author_avatar.as_deref(), Some("/static/u1.png"));
    }

    #[tokio::test]
    async fn posts_fetch_failure_aborts_the_refresh() {
        let mut posts = MockPostsApi::new();
        posts
            .expect_list_posts()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(no_profiles()));
        let err = feed.refresh(None).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn snapshot_is_published_on_refresh() {
        let mut posts = MockPostsApi::new();
        posts.expect_list_posts().returning(|_| Ok(vec![sample_post(5)]));
        posts.expect_list_replies().returning(|_| Ok(Vec::new()));

        let feed = FeedRefreshCoordinator::new(Arc::new(posts), Arc::new(no_profiles()));
        let rx = feed.subscribe();
        assert_eq!(rx.borrow().seq, 0);

        feed.refresh(None).await.unwrap();
        assert_eq!(rx.borrow().seq, 1);
        assert_eq!(rx.borrow().items.len(), 1);
    }
}
