//! GitHub panel view models.
//!
//! Payloads from the integration endpoints are turned into plain structs
//! that a view can display without knowing the wire format.

use crate::constants;
use crate::models::github::{AutofixResult, Installation, PrReviewResult};
use crate::models::review::SeverityCounts;
use crate::render::markdown;
use crate::view::{Markup, StatusKind};

/// Length a commit SHA is shortened to for display.
pub const SHORT_SHA_LEN: usize = 7;

/// One installation, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationCard {
    pub account: String,
    pub kind: String,
    /// First two characters of the uppercased account name.
    pub badge: String,
}

impl From<&Installation> for InstallationCard {
    fn from(inst: &Installation) -> Self {
        Self {
            account: inst.account.clone(),
            kind: inst.kind.clone(),
            badge: badge(&inst.account),
        }
    }
}

pub fn badge(account: &str) -> String {
    account.to_uppercase().chars().take(2).collect()
}

/// Status line for the connection panel.
pub fn connection_status(installations: &[Installation]) -> (StatusKind, String) {
    match installations.len() {
        0 => (StatusKind::Warning, constants::MSG_NOT_CONNECTED.to_string()),
        n => (
            StatusKind::Success,
            format!("Connected to {n} installation(s)"),
        ),
    }
}

/// What a per-file block shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    Review(Markup),
    /// The file came back without review text.
    NoIssues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub filename: String,
    pub body: FileBody,
    pub counts: Option<SeverityCounts>,
}

/// Rendered analyze-PR result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReviewView {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub files: Vec<FileBlock>,
}

impl PrReviewView {
    pub fn header(&self) -> String {
        format!("PR #{} · {} · by @{}", self.number, self.title, self.author)
    }
}

pub fn pr_review_view(result: &PrReviewResult) -> PrReviewView {
    let files = result
        .review_results
        .iter()
        .map(|file| {
            let body = match file.review.as_deref() {
                Some(text) if !text.trim().is_empty() => FileBody::Review(markdown::render(text)),
                _ => FileBody::NoIssues,
            };
            FileBlock {
                filename: file.filename.clone(),
                body,
                counts: file.counts,
            }
        })
        .collect();

    PrReviewView {
        number: result.pr_info.pr_number,
        title: result.pr_info.title.clone(),
        author: result.pr_info.author.clone(),
        files,
    }
}

/// Rendered autofix result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutofixView {
    pub files_fixed: u64,
    pub issues_resolved: u64,
    pub committed: bool,
    pub files: Vec<String>,
    /// Shortened SHA, present only when a commit was made.
    pub commit: Option<String>,
}

pub fn autofix_view(result: &AutofixResult) -> AutofixView {
    let commit = result
        .commit_sha
        .as_deref()
        .filter(|sha| !sha.is_empty())
        .map(|sha| sha.chars().take(SHORT_SHA_LEN).collect::<String>());

    AutofixView {
        files_fixed: result.files_fixed,
        issues_resolved: result.vulnerabilities_resolved,
        committed: commit.is_some(),
        files: result.fixed_files.keys().cloned().collect(),
        commit,
    }
}
