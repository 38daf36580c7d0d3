//! Bumble assistant launch response.

use serde::Deserialize;

/// Response body of `POST /bumble/launch`.
///
/// Failures normally arrive as non-2xx; a 2xx body without `success` counts
/// as launched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaunchResult {
    pub success: bool,
    pub message: Option<String>,
}

impl Default for LaunchResult {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_counts_as_success() {
        let launch: LaunchResult = serde_json::from_str("{}").unwrap();
        assert!(launch.success);
        assert_eq!(launch.message, None);
    }

    #[test]
    fn reads_message() {
        let launch: LaunchResult =
            serde_json::from_str(r#"{"success": true, "message": "Bumble is running"}"#).unwrap();
        assert_eq!(launch.message.as_deref(), Some("Bumble is running"));
    }
}
