//! Pure renderers: map API payloads onto view regions.
//!
//! Nothing in here performs I/O or talks to the backend. Timing-based
//! cosmetics live in [`animation`] and never gate data rendering.

pub mod animation;
pub mod code;
pub mod github;
pub mod markdown;
pub mod score;

pub use animation::{AnimationHandle, Animations};
