//! # services
//!
//! The core flows of Rusty-Feed: the content submission pipeline and its
//! moderation interpreter, the signup age gate, feed assembly, and the
//! profile/session helpers. Everything here reaches collaborators through
//! the ports defined in `domains`, so every flow runs unchanged against
//! fakes in tests.

pub mod agegate;
pub mod feed;
pub mod moderation;
pub mod profile;
pub mod session;
pub mod signup;
pub mod submission;

pub use agegate::AgeGateVerifier;
pub use feed::FeedRefreshCoordinator;
pub use profile::{ProfileService, ProfileUpdate};
pub use session::SessionClock;
pub use signup::{AgePolicy, SignupFlow, SignupRequest};
pub use submission::SubmissionPipeline;
