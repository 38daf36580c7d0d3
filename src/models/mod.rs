//! Shared wire types for the backend API.
//!
//! Request bodies and response payloads for every endpoint the client
//! talks to. Other modules import from here rather than reaching into each
//! other's internals.

pub mod bumble;
pub mod chat;
pub mod github;
pub mod review;
pub mod rewrite;

pub use bumble::LaunchResult;
pub use chat::{ChatMessage, ChatRole};
pub use github::{AutofixResult, FileReview, Installation, PrInfo, PrReviewResult};
pub use review::{Category, Grade, QualityScores, ReviewResult, Severity};
pub use rewrite::RewriteResult;
