//! # Test Fixtures
//!
//! Sample-data constructors shared by unit and integration tests.
//! Compiled only under `cfg(test)` or the `testing` feature.

use chrono::{TimeZone, Utc};

use crate::models::{ImageFile, Post, Reply, SubmissionRequest, UserProfile};

pub fn sample_post(id: i64) -> Post {
    Post {
        id,
        content: format!("post #{id}"),
        author_user_id: "u1".to_string(),
        author_display_name: "alice".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        image_url: None,
    }
}

pub fn sample_reply(id: i64, post_id: i64) -> Reply {
    Reply {
        id,
        post_id,
        author_user_id: "u2".to_string(),
        content: format!("reply #{id}"),
    }
}

pub fn text_submission(content: &str) -> SubmissionRequest {
    SubmissionRequest {
        content: content.to_string(),
        author_user_id: "u1".to_string(),
        image: None,
    }
}

pub fn image_submission(content: &str, file_name: &str) -> SubmissionRequest {
    SubmissionRequest {
        content: content.to_string(),
        author_user_id: "u1".to_string(),
        image: Some(ImageFile {
            file_name: file_name.to_string(),
            content_type: "image/png".to_string(),
            data: bytes::Bytes::from_static(&[0x89, b'P', b'N', b'G']),
        }),
    }
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        bio: "hello".to_string(),
        profile_image: Some("/static/profile-images/u1/avatar.png".to_string()),
        background_image: None,
    }
}
