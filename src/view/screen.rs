//! Headless [`View`] that keeps the latest value of every region in memory.
//!
//! Used for tests and as the backing store of the terminal front-end,
//! which prints a panel from a [`ScreenState`] snapshot.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use super::{Markup, Region, StatusKind, Tone, View};
use crate::models::chat::ChatMessage;
use crate::render::github::{AutofixView, InstallationCard, PrReviewView};

/// Gauge radius used when none is specified.
pub const DEFAULT_GAUGE_RADIUS: f64 = 54.0;

/// What the PR results region currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PrResults {
    Review(PrReviewView),
    Autofix(AutofixView),
    Error(String),
}

/// Everything the screen currently displays, plus a log of modal prompts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub visible: HashMap<Region, bool>,
    pub active: HashMap<Region, bool>,
    pub text: HashMap<Region, String>,
    pub markup: HashMap<Region, Markup>,
    /// `(code, language)`
    pub code: HashMap<Region, (String, String)>,
    pub tone: HashMap<Region, Tone>,
    pub width: HashMap<Region, u8>,
    pub stroke_offset: HashMap<Region, f64>,
    pub status: HashMap<Region, (StatusKind, String)>,
    pub installations: Vec<InstallationCard>,
    pub pr_results: Option<PrResults>,
    pub chat: Vec<(ChatMessage, Markup)>,
    pub alerts: Vec<String>,
    pub confirmations: Vec<String>,
    pub notifications: Vec<String>,
    pub clipboard: Option<String>,
    /// Every visibility change in order, for asserting show/hide pairs.
    pub visibility_log: Vec<(Region, bool)>,
}

impl ScreenState {
    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.get(&region).copied().unwrap_or(false)
    }

    pub fn is_active(&self, region: Region) -> bool {
        self.active.get(&region).copied().unwrap_or(false)
    }

    pub fn text_of(&self, region: Region) -> Option<&str> {
        self.text.get(&region).map(String::as_str)
    }

    /// Regions currently visible, among `candidates`.
    pub fn visible_among(&self, candidates: impl IntoIterator<Item = Region>) -> Vec<Region> {
        candidates
            .into_iter()
            .filter(|r| self.is_visible(*r))
            .collect()
    }
}

/// In-memory view.
pub struct Screen {
    state: Mutex<ScreenState>,
    gauge_radius: f64,
    /// Scripted answers for [`View::confirm`]; an empty queue answers `fallback_confirm`.
    confirm_answers: Mutex<VecDeque<bool>>,
    fallback_confirm: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::with_gauge_radius(DEFAULT_GAUGE_RADIUS)
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gauge_radius(radius: f64) -> Self {
        Self {
            state: Mutex::new(ScreenState::default()),
            gauge_radius: radius,
            confirm_answers: Mutex::new(VecDeque::new()),
            fallback_confirm: false,
        }
    }

    /// Queue the answer for the next confirmation prompt.
    pub fn answer_next_confirm(&self, answer: bool) {
        self.confirm_answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(answer);
    }

    /// Copy of the current display state.
    pub fn snapshot(&self) -> ScreenState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl View for Screen {
    fn set_visible(&self, region: Region, visible: bool) {
        let mut state = self.lock();
        state.visible.insert(region, visible);
        state.visibility_log.push((region, visible));
    }

    fn set_active(&self, region: Region, active: bool) {
        self.lock().active.insert(region, active);
    }

    fn set_text(&self, region: Region, text: &str) {
        self.lock().text.insert(region, text.to_string());
    }

    fn set_markup(&self, region: Region, markup: &Markup) {
        self.lock().markup.insert(region, markup.clone());
    }

    fn set_code(&self, region: Region, code: &str, language: &str) {
        self.lock()
            .code
            .insert(region, (code.to_string(), language.to_string()));
    }

    fn set_tone(&self, region: Region, tone: Tone) {
        self.lock().tone.insert(region, tone);
    }

    fn set_width(&self, region: Region, percent: u8) {
        self.lock().width.insert(region, percent);
    }

    fn gauge_radius(&self) -> f64 {
        self.gauge_radius
    }

    fn set_stroke_offset(&self, region: Region, offset: f64) {
        self.lock().stroke_offset.insert(region, offset);
    }

    fn set_status(&self, region: Region, kind: StatusKind, message: &str) {
        self.lock()
            .status
            .insert(region, (kind, message.to_string()));
    }

    fn set_installations(&self, cards: &[InstallationCard]) {
        self.lock().installations = cards.to_vec();
    }

    fn show_pr_review(&self, review: &PrReviewView) {
        self.lock().pr_results = Some(PrResults::Review(review.clone()));
    }

    fn show_autofix(&self, autofix: &AutofixView) {
        self.lock().pr_results = Some(PrResults::Autofix(autofix.clone()));
    }

    fn show_pr_error(&self, message: &str) {
        self.lock().pr_results = Some(PrResults::Error(message.to_string()));
    }

    fn append_chat(&self, message: &ChatMessage, markup: &Markup) {
        self.lock().chat.push((message.clone(), markup.clone()));
    }

    fn truncate_chat(&self, keep: usize) {
        self.lock().chat.truncate(keep);
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.lock().confirmations.push(question.to_string());
        self.confirm_answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(self.fallback_confirm)
    }

    fn notify(&self, message: &str) {
        self.lock().notifications.push(message.to_string());
    }

    fn copy_to_clipboard(&self, text: &str) -> bool {
        self.lock().clipboard = Some(text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_latest_values() {
        let screen = Screen::new();
        screen.set_text(Region::Summary, "first");
        screen.set_text(Region::Summary, "second");
        screen.set_visible(Region::GlobalLoading, true);
        screen.set_visible(Region::GlobalLoading, false);

        let snap = screen.snapshot();
        assert_eq!(snap.text_of(Region::Summary), Some("second"));
        assert!(!snap.is_visible(Region::GlobalLoading));
        assert_eq!(
            snap.visibility_log,
            vec![(Region::GlobalLoading, true), (Region::GlobalLoading, false)]
        );
    }

    #[test]
    fn confirm_uses_scripted_answers_then_declines() {
        let screen = Screen::new();
        screen.answer_next_confirm(true);
        assert!(screen.confirm("sure?"));
        assert!(!screen.confirm("really?"));
        assert_eq!(screen.snapshot().confirmations, vec!["sure?", "really?"]);
    }

    #[test]
    fn truncate_chat_keeps_prefix() {
        let screen = Screen::new();
        for text in ["welcome", "q", "a"] {
            screen.append_chat(&ChatMessage::ai(text), &Markup::default());
        }
        screen.truncate_chat(1);
        let chat = screen.snapshot().chat;
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].0.text, "welcome");
    }
}
