//! GitHub panel: token validation, connection status, PR analysis and autofix.
//!
//! Failures here are shown inline in the panel, so a retry never has to
//! dismiss a modal first. Only missing arguments raise an alert.

use tracing::{debug, info, warn};

use super::{App, Outcome};
use crate::constants;
use crate::models::github::{
    AnalyzeRequest, AutofixRequest, ValidateTokenRequest, failure_text,
};
use crate::render::github::{self as panel, InstallationCard};
use crate::view::{Region, StatusKind};

impl App {
    /// Validate `raw` against the backend and persist it when it is good.
    ///
    /// Every call supersedes validations still in flight, including one that
    /// is rejected locally for an empty token.
    pub async fn validate_token(&self, raw: &str) -> Outcome {
        let token = raw.trim().to_string();
        let ticket = self.seq.validate.issue();
        {
            let mut state = self.lock_state();
            state.token.input = token.clone();
            state.token.valid = false;
            state.token.username = None;
        }
        if token.is_empty() {
            self.view
                .set_status(Region::TokenStatus, StatusKind::Error, constants::MSG_TOKEN_EMPTY);
            return Outcome::Rejected(constants::MSG_TOKEN_EMPTY.to_string());
        }

        self.view.set_status(
            Region::TokenStatus,
            StatusKind::Info,
            constants::MSG_TOKEN_VALIDATING,
        );
        let request = ValidateTokenRequest {
            github_token: token.clone(),
        };
        let result = self.backend.validate_token(&request).await;

        if !self.seq.validate.is_current(ticket) {
            debug!("discarding superseded token validation");
            return Outcome::Superseded;
        }

        let validation = match result {
            Ok(validation) => validation,
            Err(err) => {
                warn!(error = %err, "token validation failed");
                let message = format!("Token validation failed: {}", err.user_message());
                self.view
                    .set_status(Region::TokenStatus, StatusKind::Error, &message);
                return Outcome::Failed(message);
            }
        };

        if !validation.valid {
            let message = match validation.error.as_deref().map(str::trim) {
                Some(reason) if !reason.is_empty() => {
                    format!("{} {reason}", constants::MSG_TOKEN_INVALID)
                }
                _ => constants::MSG_TOKEN_INVALID.to_string(),
            };
            info!("token rejected by backend");
            self.view
                .set_status(Region::TokenStatus, StatusKind::Error, &message);
            return Outcome::Failed(message);
        }

        let username = validation.username.filter(|u| !u.trim().is_empty());
        let message = match username {
            Some(ref user) => format!("Token valid. Signed in as @{user}"),
            None => "Token valid.".to_string(),
        };
        {
            let mut state = self.lock_state();
            state.token.valid = true;
            state.token.username = username;
        }
        if let Err(err) = self.store.save(&token) {
            warn!(error = %err, "could not persist GitHub token");
        }
        info!("token validated");
        self.view
            .set_status(Region::TokenStatus, StatusKind::Success, &message);
        Outcome::Completed
    }

    /// Load the persisted token, if any, and validate it again.
    pub async fn restore_token(&self) -> Outcome {
        match self.store.load() {
            Some(token) => {
                debug!("restoring saved GitHub token");
                self.validate_token(&token).await
            }
            None => Outcome::Ignored,
        }
    }

    /// Fetch app installations and show the connection state.
    pub async fn refresh_connection_status(&self) -> Outcome {
        let ticket = self.seq.connection.issue();
        let result = self.backend.installations().await;

        if !self.seq.connection.is_current(ticket) {
            debug!("discarding superseded installations response");
            return Outcome::Superseded;
        }

        match result {
            Ok(list) => {
                let (kind, message) = panel::connection_status(&list.installations);
                self.view.set_status(Region::ConnectionStatus, kind, &message);
                let cards: Vec<InstallationCard> =
                    list.installations.iter().map(InstallationCard::from).collect();
                self.view.set_installations(&cards);
                info!(installations = cards.len(), "connection status refreshed");
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "installations request failed");
                let message = format!(
                    "Could not check the GitHub App connection: {}",
                    err.user_message()
                );
                self.view
                    .set_status(Region::ConnectionStatus, StatusKind::Error, &message);
                Outcome::Failed(message)
            }
        }
    }

    /// Review the pull request in `AppState::pr_url`.
    pub async fn analyze_pr(&self, post_comment: bool) -> Outcome {
        let (github_token, pr_url) = match self.pr_arguments() {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };

        let ticket = self.seq.analyze.issue();
        let spinner = self.pr_spinner.enter(self.view.as_ref());
        debug!(%pr_url, post_comment, "analyzing pull request");
        let request = AnalyzeRequest {
            pr_url,
            github_token,
            post_comment,
        };
        let result = self.backend.analyze_pr(&request).await;
        drop(spinner);

        if !self.seq.analyze.is_current(ticket) {
            debug!("discarding superseded analysis");
            return Outcome::Superseded;
        }

        match result {
            Ok(review) if review.success => {
                let rendered = panel::pr_review_view(&review);
                info!(
                    pr = rendered.number,
                    files = rendered.files.len(),
                    "pull request analyzed"
                );
                self.view.show_pr_review(&rendered);
                if post_comment && review.comment_posted {
                    self.view.notify(constants::MSG_COMMENT_POSTED);
                }
                Outcome::Completed
            }
            Ok(review) => {
                let message = failure_text(
                    &review.error,
                    &review.message,
                    constants::MSG_ANALYZE_FAILED,
                );
                warn!(%message, "analysis unsuccessful");
                self.view.show_pr_error(&message);
                Outcome::Failed(message)
            }
            Err(err) => {
                warn!(error = %err, "analyze request failed");
                let message = err.user_message();
                self.view.show_pr_error(&message);
                Outcome::Failed(message)
            }
        }
    }

    /// Ask the backend to fix the pull request in `AppState::pr_url`.
    pub async fn autofix_pr(&self, auto_commit: bool) -> Outcome {
        let (github_token, pr_url) = match self.pr_arguments() {
            Ok(args) => args,
            Err(outcome) => return outcome,
        };

        let ticket = self.seq.autofix.issue();
        let spinner = self.pr_spinner.enter(self.view.as_ref());
        debug!(%pr_url, auto_commit, "autofixing pull request");
        let request = AutofixRequest {
            pr_url,
            github_token,
            auto_commit,
        };
        let result = self.backend.autofix_pr(&request).await;
        drop(spinner);

        if !self.seq.autofix.is_current(ticket) {
            debug!("discarding superseded autofix");
            return Outcome::Superseded;
        }

        match result {
            Ok(fix) if fix.success => {
                let rendered = panel::autofix_view(&fix);
                info!(
                    files = rendered.files_fixed,
                    committed = rendered.committed,
                    "autofix applied"
                );
                self.view.show_autofix(&rendered);
                Outcome::Completed
            }
            Ok(fix) => {
                let message =
                    failure_text(&fix.error, &fix.message, constants::MSG_AUTOFIX_FAILED);
                warn!(%message, "autofix unsuccessful");
                self.view.show_pr_error(&message);
                Outcome::Failed(message)
            }
            Err(err) => {
                warn!(error = %err, "autofix request failed");
                let message = err.user_message();
                self.view.show_pr_error(&message);
                Outcome::Failed(message)
            }
        }
    }

    /// Token and PR URL, or the rejection after alerting about the missing one.
    fn pr_arguments(&self) -> Result<(String, String), Outcome> {
        let (token, url) = {
            let state = self.lock_state();
            (
                state.token.input.trim().to_string(),
                state.pr_url.trim().to_string(),
            )
        };
        if token.is_empty() {
            self.view.alert(constants::MSG_MISSING_TOKEN);
            return Err(Outcome::Rejected(constants::MSG_MISSING_TOKEN.to_string()));
        }
        if url.is_empty() {
            self.view.alert(constants::MSG_MISSING_PR_URL);
            return Err(Outcome::Rejected(constants::MSG_MISSING_PR_URL.to_string()));
        }
        Ok((token, url))
    }
}
