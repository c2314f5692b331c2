//! Checks that every shipped adapter satisfies its port, and that typed
//! errors survive the anyhow boundary between adapters and services.

use api_adapters::PostsHttpClient;
use auth_adapters::SimpleIdentityProvider;
use domains::{
    AppError, DocumentStore, IdentityProvider, MockPostsApi, ObjectStore, PostsApi,
    TextRecognizer,
};
use ocr_adapters::VisionTextRecognizer;
use storage_adapters::{LocalDocumentStore, LocalObjectStore};

fn assert_posts_api<T: PostsApi>() {}
fn assert_object_store<T: ObjectStore>() {}
fn assert_document_store<T: DocumentStore>() {}
fn assert_identity_provider<T: IdentityProvider>() {}
fn assert_text_recognizer<T: TextRecognizer>() {}

#[test]
fn shipped_adapters_satisfy_their_ports() {
    assert_posts_api::<PostsHttpClient>();
    assert_object_store::<LocalObjectStore>();
    assert_document_store::<LocalDocumentStore>();
    assert_identity_provider::<SimpleIdentityProvider>();
    assert_text_recognizer::<VisionTextRecognizer>();
}

#[tokio::test]
async fn typed_errors_survive_the_port_boundary() {
    let mut posts = MockPostsApi::new();
    posts.expect_list_posts().returning(|_| {
        Err(anyhow::Error::new(AppError::Parse(
            "unexpected response format: text/html".to_string(),
        )))
    });

    let err = posts.list_posts(None).await.unwrap_err();
    match AppError::from_collaborator(err) {
        AppError::Parse(message) => assert!(message.contains("text/html")),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[tokio::test]
async fn untyped_errors_degrade_to_transport() {
    let mut posts = MockPostsApi::new();
    posts
        .expect_list_posts()
        .returning(|_| Err(anyhow::anyhow!("connection reset by peer")));

    let err = posts.list_posts(None).await.unwrap_err();
    assert!(matches!(
        AppError::from_collaborator(err),
        AppError::Transport(_)
    ));
}
