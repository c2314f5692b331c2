//! End-to-end submission scenarios: a real HTTP client and a real local
//! object store, driven through the pipeline against a mock Posts API.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api_adapters::PostsHttpClient;
use domains::{
    DocumentStore, ImageFile, ModerationOutcome, ObjectStore, PostsApi, SubmissionRequest,
};
use integration_tests::{mount_empty_replies, mount_post_listing, post_json};
use services::{FeedRefreshCoordinator, SubmissionPipeline};
use storage_adapters::{LocalDocumentStore, LocalObjectStore};

fn build_pipeline(
    server: &MockServer,
    dir: &tempfile::TempDir,
) -> (SubmissionPipeline, Arc<FeedRefreshCoordinator>) {
    let posts: Arc<dyn PostsApi> = Arc::new(PostsHttpClient::new(server.uri()).unwrap());
    let store: Arc<dyn ObjectStore> =
        Arc::new(LocalObjectStore::new(dir.path().to_path_buf(), "/static/uploads"));
    let docs: Arc<dyn DocumentStore> =
        Arc::new(LocalDocumentStore::new(dir.path().join("profiles")));
    let feed = Arc::new(FeedRefreshCoordinator::new(posts.clone(), docs));
    (SubmissionPipeline::new(posts, store, feed.clone()), feed)
}

fn text_request(content: &str) -> SubmissionRequest {
    SubmissionRequest {
        content: content.to_string(),
        author_user_id: "u1".to_string(),
        image: None,
    }
}

#[tokio::test]
async fn accepted_submission_returns_the_refreshed_feed_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(42)))
        .expect(1)
        .mount(&server)
        .await;
    // The listing arrives unsorted; post 7's replies endpoint is down.
    mount_post_listing(&server, vec![post_json(7), post_json(42)]).await;
    Mock::given(method("GET"))
        .and(path("/posts/42/replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "post_id": 42, "user_id": "u2", "content": "nice" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts/7/replies"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (pipeline, feed) = build_pipeline(&server, &dir);

    let outcome = pipeline.submit(text_request("hello")).await;
    let ModerationOutcome::Accepted { posts } = outcome else {
        panic!("expected Accepted, got {outcome:?}");
    };

    // Sorted by descending id, the new post first.
    let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![42, 7]);

    // The published snapshot carries the degraded enrichments.
    let snapshot = feed.subscribe().borrow().clone();
    assert_eq!(snapshot.items[0].post.id, 42);
    assert_eq!(snapshot.items[0].replies.len(), 1);
    assert!(snapshot.items[1].replies.is_empty());
}

#[tokio::test]
async fn flagged_submission_never_refreshes_the_feed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("yes\n"),
        )
        .mount(&server)
        .await;
    // No GET /posts mock mounted: a refresh would 404 and fail the outcome.

    let dir = tempfile::tempdir().unwrap();
    let (pipeline, feed) = build_pipeline(&server, &dir);

    let outcome = pipeline.submit(text_request("rude words")).await;
    assert_eq!(outcome, ModerationOutcome::FlaggedContent);
    assert_eq!(feed.subscribe().borrow().seq, 0);
}

#[tokio::test]
async fn forbidden_submission_surfaces_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _) = build_pipeline(&server, &dir);

    let outcome = pipeline.submit(text_request("rude words")).await;
    assert_eq!(outcome, ModerationOutcome::Forbidden);
}

#[tokio::test]
async fn image_submission_lands_on_disk_before_the_post_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(50)))
        .mount(&server)
        .await;
    mount_post_listing(&server, vec![post_json(50)]).await;
    mount_empty_replies(&server, 50).await;

    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _) = build_pipeline(&server, &dir);

    let request = SubmissionRequest {
        content: "look at this".to_string(),
        author_user_id: "u1".to_string(),
        image: Some(ImageFile {
            file_name: "cat.png".to_string(),
            content_type: "image/png".to_string(),
            data: bytes::Bytes::from_static(b"pngdata"),
        }),
    };
    let outcome = pipeline.submit(request).await;
    assert!(matches!(outcome, ModerationOutcome::Accepted { .. }));

    // One object stored under post-images/, keyed <millis>-cat.png.
    let entries: Vec<_> = std::fs::read_dir(dir.path().join("post-images"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with("-cat.png"));
}

#[tokio::test]
async fn empty_submission_makes_no_request_at_all() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would return 404 and fail differently.

    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _) = build_pipeline(&server, &dir);

    let outcome = pipeline.submit(text_request("   ")).await;
    match outcome {
        ModerationOutcome::Failed { message } => {
            assert!(message.contains("required"), "got: {message}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}
