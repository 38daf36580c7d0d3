//! Rewrite request and result types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /rewrite`.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteRequest {
    pub code: String,
    pub language: String,
    pub focus_areas: Vec<String>,
}

/// Response body of `POST /rewrite`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteResult {
    /// May arrive wrapped in a Markdown code fence.
    pub rewritten_code: String,
    /// Markdown notes describing what changed.
    pub improvements: Option<String>,
    /// Older backends list the applied improvements instead.
    pub improvements_applied: Option<Vec<String>>,
}

impl RewriteResult {
    /// Improvement notes as Markdown, empty when none were sent.
    pub fn improvements_markdown(&self) -> String {
        if let Some(ref notes) = self.improvements {
            return notes.clone();
        }
        match self.improvements_applied {
            Some(ref items) if !items.is_empty() => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvements_prefer_markdown_notes() {
        let result = RewriteResult {
            rewritten_code: String::new(),
            improvements: Some("**Fixed** the loop".into()),
            improvements_applied: Some(vec!["ignored".into()]),
        };
        assert_eq!(result.improvements_markdown(), "**Fixed** the loop");
    }

    #[test]
    fn improvements_fall_back_to_applied_list() {
        let result: RewriteResult = serde_json::from_str(
            r#"{"rewritten_code": "x", "improvements_applied": ["bugs", "security"]}"#,
        )
        .unwrap();
        assert_eq!(result.improvements_markdown(), "- bugs\n- security");
    }

    #[test]
    fn improvements_default_to_empty() {
        let result: RewriteResult = serde_json::from_str(r#"{"rewritten_code": "x"}"#).unwrap();
        assert_eq!(result.improvements_markdown(), "");
    }
}
