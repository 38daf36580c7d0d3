//! Review orchestrator.

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::{App, Outcome};
use crate::constants;
use crate::models::review::{ReviewRequest, ReviewResult, Severity};
use crate::render::{markdown, score};
use crate::state::Tab;
use crate::view::Region;

impl App {
    /// Send the editor contents for review and render the result.
    pub async fn review(&self) -> Outcome {
        let request = {
            let state = self.lock_state();
            ReviewRequest {
                code: state.code.clone(),
                language: state.language.clone(),
                focus_areas: state.focus_list(),
                calculate_score: true,
            }
        };
        if request.code.trim().is_empty() {
            self.view.alert(constants::MSG_EMPTY_CODE);
            return Outcome::Rejected(constants::MSG_EMPTY_CODE.to_string());
        }

        self.show_tab(Tab::Review);
        let ticket = self.seq.review.issue();
        let loading = self.loading.enter(self.view.as_ref());
        debug!(
            language = %request.language,
            focus = ?request.focus_areas,
            bytes = request.code.len(),
            "sending review request"
        );
        let result = self.backend.review(&request).await;
        drop(loading);

        if !self.seq.review.is_current(ticket) {
            debug!("discarding superseded review response");
            return Outcome::Superseded;
        }

        match result {
            Ok(review) => {
                self.render_review(&review);
                info!(
                    grade = ?review.quality_scores.as_ref().map(|s| s.grade),
                    "review rendered"
                );
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "review request failed");
                let message = err.user_message();
                self.view.alert(&message);
                Outcome::Failed(message)
            }
        }
    }

    fn render_review(&self, review: &ReviewResult) {
        let view = &self.view;
        view.set_visible(Region::ReviewEmpty, false);
        view.set_visible(Region::ReviewResults, true);

        match review.quality_scores {
            Some(ref scores) => {
                view.set_visible(Region::ScoreCard, true);
                let handles = score::render_scores(view, scores, &self.animations);
                self.replace_animations(handles);
            }
            None => {
                view.set_visible(Region::ScoreCard, false);
                self.replace_animations(Vec::new());
            }
        }

        for severity in Severity::iter() {
            view.set_text(Region::Count(severity), &review.count(severity).to_string());
        }

        let summary = review
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(constants::MSG_NO_SUMMARY);
        view.set_text(Region::Summary, summary);
        self.lock_state().review_summary = Some(summary.to_string());

        let raw = review.raw_review.as_deref().unwrap_or_default();
        view.set_markup(Region::RawReview, &markdown::render(raw));
    }
}
