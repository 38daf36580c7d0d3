//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! endpoint paths and the fixed user-facing strings so a rename only
//! requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "coderefine";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple (see `build.rs`).
pub const TARGET: &str = env!("CODEREFINE_TARGET");

/// Local config filename (e.g. `.coderefine.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".coderefine.toml";

/// Directory name under `~/.config/` for global config and the token file.
pub const CONFIG_DIR: &str = "coderefine";

/// Filename of the persisted GitHub token inside [`CONFIG_DIR`].
pub const TOKEN_FILENAME: &str = "github_token";

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Language assumed when none is configured.
pub const DEFAULT_LANGUAGE: &str = "python";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_API_URL: &str = "CODEREFINE_API_URL";
pub const ENV_LANGUAGE: &str = "CODEREFINE_LANGUAGE";
pub const ENV_ANIMATIONS: &str = "CODEREFINE_ANIMATIONS";
pub const ENV_LOG: &str = "CODEREFINE_LOG";

// ── Backend endpoints (relative to the base URL) ────────────────────

pub const PATH_REVIEW: &str = "/review";
pub const PATH_REWRITE: &str = "/rewrite";
pub const PATH_CHAT: &str = "/chat";
pub const PATH_INSTALLATIONS: &str = "/github/installations";
pub const PATH_VALIDATE_TOKEN: &str = "/github-simple/validate-token";
pub const PATH_ANALYZE_PR: &str = "/github-simple/analyze-pr";
pub const PATH_AUTOFIX_PR: &str = "/github-simple/autofix-pr";
pub const PATH_BUMBLE_LAUNCH: &str = "/bumble/launch";

// ── Fixed copy ──────────────────────────────────────────────────────

pub const MSG_EMPTY_CODE: &str = "Please enter some code first.";
pub const MSG_NO_SUMMARY: &str = "No summary available.";
pub const MSG_CHAT_WELCOME: &str =
    "Hi! I'm your AI programming assistant. Ask me about your code, the review, or any programming question.";
pub const MSG_CHAT_FAILURE: &str = "Sorry, I encountered an error. Please try again.";
pub const MSG_CHAT_CLEAR_CONFIRM: &str = "Clear the chat history?";
pub const MSG_TOKEN_EMPTY: &str = "Please enter a GitHub token.";
pub const MSG_TOKEN_VALIDATING: &str = "Validating token...";
pub const MSG_TOKEN_INVALID: &str = "Invalid token.";
pub const MSG_MISSING_TOKEN: &str = "Please enter and validate your GitHub token first.";
pub const MSG_MISSING_PR_URL: &str = "Please enter a pull request URL.";
pub const MSG_NOT_CONNECTED: &str =
    "GitHub App not connected. Install the app to enable PR automation.";
pub const MSG_NO_FILE_ISSUES: &str = "No issues found in this file.";
pub const MSG_COMMENT_POSTED: &str = "Review posted as a PR comment.";
pub const MSG_ANALYZE_FAILED: &str = "Analysis failed.";
pub const MSG_AUTOFIX_FAILED: &str = "Autofix failed.";
pub const MSG_BUMBLE_LAUNCHED: &str = "Bumble launched.";
pub const MSG_COPIED: &str = "Copied!";
pub const MSG_NOTHING_TO_COPY: &str = "Nothing to copy yet. Run a rewrite first.";
