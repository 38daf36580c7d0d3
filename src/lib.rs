//! coderefine: client core for the CodeRefine AI code-review service (library crate).
//!
//! Headless state, view bindings, renderers, the backend client and the
//! action orchestrators. The terminal binary in `main.rs` is one front-end.

pub mod api;
pub mod config;
pub mod constants;
pub mod env;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod state;
pub mod storage;
pub mod view;
