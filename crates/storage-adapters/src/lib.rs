//! # storage-adapters
//!
//! Local-filesystem implementations of the storage ports: an
//! [`LocalObjectStore`] for uploaded media and a [`LocalDocumentStore`]
//! for per-user profile documents. Both stand in for remote object/document
//! services behind the same ports.

pub mod docs_local;
pub mod media_local;

pub use docs_local::LocalDocumentStore;
pub use media_local::LocalObjectStore;
