//! # api-adapters
//!
//! Outbound adapters for the remote Posts API. The backend is a plain
//! JSON-over-HTTPS service; [`PostsHttpClient`] implements the
//! `domains::PostsApi` port against it.

pub mod posts_http;

pub use posts_http::PostsHttpClient;
