//! rusty-feed/crates/domains/src/lib.rs
//!
//! The central domain models and interface definitions for Rusty-Feed.

pub mod error;
pub mod models;
pub mod ports;

#[cfg(any(test, feature = "testing"))]
pub mod fixtures;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
