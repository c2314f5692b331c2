//! Sanity checks over the shared sample-data fixtures.

use domains::fixtures::{image_submission, sample_post, sample_reply, text_submission};

#[test]
fn sample_post_is_authored_and_timestamped() {
    let post = sample_post(42);
    assert_eq!(post.id, 42);
    assert_eq!(post.author_user_id, "u1");
    assert!(!post.author_display_name.is_empty());
}

#[test]
fn sample_reply_points_at_its_post() {
    let reply = sample_reply(1, 42);
    assert_eq!(reply.post_id, 42);
}

#[test]
fn text_submission_has_no_image() {
    assert!(text_submission("hello").image.is_none());
}

#[test]
fn image_submission_carries_a_typed_blob() {
    let request = image_submission("look", "cat.png");
    let image = request.image.unwrap();
    assert_eq!(image.file_name, "cat.png");
    assert_eq!(image.content_type, "image/png");
    assert!(!image.data.is_empty());
}
