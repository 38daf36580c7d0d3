//! GitHub integration payloads: token validation, installations, PR analysis
//! and autofix.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::review::SeverityCounts;

/// Request body for `POST /github-simple/validate-token`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateTokenRequest {
    pub github_token: String,
}

/// Response body of the token validation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TokenValidation {
    pub valid: bool,
    pub username: Option<String>,
    pub error: Option<String>,
}

/// One GitHub App installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Installation {
    pub account: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<u64>,
    pub repository_selection: Option<String>,
}

/// Response body of `GET /github/installations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstallationList {
    pub installations: Vec<Installation>,
}

/// Request body for `POST /github-simple/analyze-pr`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub pr_url: String,
    pub github_token: String,
    pub post_comment: bool,
}

/// Request body for `POST /github-simple/autofix-pr`.
#[derive(Debug, Clone, Serialize)]
pub struct AutofixRequest {
    pub pr_url: String,
    pub github_token: String,
    pub auto_commit: bool,
}

/// Pull request metadata echoed back by the analyze endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrInfo {
    pub pr_number: u64,
    pub title: String,
    pub author: String,
    pub url: Option<String>,
    pub state: Option<String>,
    pub head_branch: Option<String>,
}

/// Review of a single changed file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileReview {
    pub filename: String,
    pub review: Option<String>,
    pub counts: Option<SeverityCounts>,
}

/// Response body of the analyze endpoint.
///
/// `success: false` carries `error` and possibly `message` instead of results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrReviewResult {
    pub success: bool,
    pub pr_info: PrInfo,
    pub review_results: Vec<FileReview>,
    pub comment_posted: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Response body of the autofix endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutofixResult {
    pub success: bool,
    pub files_fixed: u64,
    pub vulnerabilities_resolved: u64,
    /// Filename to fixed content, in server order.
    pub fixed_files: IndexMap<String, serde_json::Value>,
    pub commit_sha: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Error text from a `success: false` payload.
///
/// `message` is more descriptive than the `error` code, so it wins.
pub fn failure_text(error: &Option<String>, message: &Option<String>, fallback: &str) -> String {
    let present = |s: &Option<String>| {
        s.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };
    present(message)
        .or_else(|| present(error))
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installation_reads_type_field() {
        let list: InstallationList = serde_json::from_str(
            r#"{"installations": [{"id": 7, "account": "octo-org", "type": "Organization",
                "repository_selection": "all"}]}"#,
        )
        .unwrap();
        assert_eq!(list.installations.len(), 1);
        assert_eq!(list.installations[0].kind, "Organization");
        assert_eq!(list.installations[0].id, Some(7));
    }

    #[test]
    fn autofix_keeps_server_file_order() {
        let result: AutofixResult = serde_json::from_str(
            r#"{"success": true, "files_fixed": 2, "vulnerabilities_resolved": 3,
                "fixed_files": {"z.py": "...", "a.py": "..."}, "commit_sha": null}"#,
        )
        .unwrap();
        let names: Vec<_> = result.fixed_files.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["z.py", "a.py"]);
        assert!(result.commit_sha.is_none());
    }

    #[test]
    fn failure_text_prefers_message() {
        let error = Some("pr_closed".to_string());
        let message = Some("PR is closed. Cannot commit.".to_string());
        assert_eq!(failure_text(&error, &message, "x"), "PR is closed. Cannot commit.");
        assert_eq!(failure_text(&error, &None, "x"), "pr_closed");
        assert_eq!(failure_text(&None, &Some("  ".into()), "x"), "x");
    }
}
