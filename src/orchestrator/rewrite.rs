//! Rewrite orchestrator and the copy-code action.

use tracing::{debug, info, warn};

use super::{App, Outcome};
use crate::constants;
use crate::models::rewrite::RewriteRequest;
use crate::render::{code, markdown};
use crate::state::{CodeRegion, RewriteSnapshot, Tab};
use crate::view::Region;

impl App {
    /// Ask the backend for an improved version of the editor contents.
    pub async fn rewrite(&self) -> Outcome {
        let request = {
            let state = self.lock_state();
            RewriteRequest {
                code: state.code.clone(),
                language: state.language.clone(),
                focus_areas: state.focus_list(),
            }
        };
        if request.code.trim().is_empty() {
            self.view.alert(constants::MSG_EMPTY_CODE);
            return Outcome::Rejected(constants::MSG_EMPTY_CODE.to_string());
        }

        self.show_tab(Tab::Rewrite);
        let ticket = self.seq.rewrite.issue();
        let loading = self.loading.enter(self.view.as_ref());
        debug!(language = %request.language, bytes = request.code.len(), "sending rewrite request");
        let result = self.backend.rewrite(&request).await;
        drop(loading);

        if !self.seq.rewrite.is_current(ticket) {
            debug!("discarding superseded rewrite response");
            return Outcome::Superseded;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "rewrite request failed");
                let message = err.user_message();
                self.view.alert(&message);
                return Outcome::Failed(message);
            }
        };

        let rewritten = code::strip_code_fence(&response.rewritten_code).to_string();
        let view = &self.view;
        view.set_visible(Region::RewriteResults, true);
        view.set_visible(Region::ImprovementsPanel, true);
        view.set_code(Region::OriginalCode, &request.code, &request.language);
        view.set_code(Region::RewrittenCode, &rewritten, &request.language);
        view.set_markup(
            Region::Improvements,
            &markdown::render(&response.improvements_markdown()),
        );

        info!(bytes = rewritten.len(), "rewrite rendered");
        self.lock_state().last_rewrite = Some(RewriteSnapshot {
            original: request.code,
            rewritten,
            language: request.language,
        });
        Outcome::Completed
    }

    /// Copy one of the two rewrite code blocks to the clipboard.
    pub fn copy_code(&self, region: CodeRegion) -> Outcome {
        let text = self
            .lock_state()
            .last_rewrite
            .as_ref()
            .map(|snapshot| snapshot.get(region).to_string());

        let Some(text) = text else {
            self.view.alert(constants::MSG_NOTHING_TO_COPY);
            return Outcome::Rejected(constants::MSG_NOTHING_TO_COPY.to_string());
        };

        if self.view.copy_to_clipboard(&text) {
            self.view.notify(constants::MSG_COPIED);
            Outcome::Completed
        } else {
            warn!(?region, "clipboard is not available");
            Outcome::Failed("Clipboard is not available.".to_string())
        }
    }
}
