//! Action orchestrators.
//!
//! [`App`] binds each user action to: input validation, loading-state
//! entry, one backend request, result rendering or error display, and
//! loading-state exit. Actions take `&self` and may overlap; each one keeps
//! its own [`Sequencer`] so a response that arrives after a newer request
//! of the same kind is dropped instead of overwriting fresher results.

pub mod bumble;
pub mod chat;
pub mod github;
pub mod review;
pub mod rewrite;
pub mod tabs;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::Backend;
use crate::render::{AnimationHandle, Animations};
use crate::state::AppState;
use crate::storage::TokenStore;
use crate::view::{Region, View};

/// How a single user action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was rendered.
    Completed,
    /// A local precondition failed; no request was sent.
    Rejected(String),
    /// Nothing to do (empty chat input, declined confirmation, no stored token).
    Ignored,
    /// The request failed; the message is what the user was shown.
    Failed(String),
    /// A newer request of the same kind was issued while this one was in flight.
    Superseded,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Ticket handed out by a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request counter for one orchestrator.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recent one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// A shared loading indicator bound to one view region.
///
/// Holders are counted so overlapping actions keep it visible until the
/// last one finishes.
#[derive(Debug)]
pub struct Indicator {
    region: Region,
    holders: Mutex<usize>,
}

impl Indicator {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            holders: Mutex::new(0),
        }
    }

    /// Show the indicator until the returned guard is dropped.
    pub fn enter<'a>(&'a self, view: &'a dyn View) -> IndicatorGuard<'a> {
        let mut holders = self.lock();
        *holders += 1;
        if *holders == 1 {
            view.set_visible(self.region, true);
        }
        IndicatorGuard {
            indicator: self,
            view,
        }
    }

    pub fn holders(&self) -> usize {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.holders.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps an [`Indicator`] visible. Hides it on drop when it is the last holder.
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct IndicatorGuard<'a> {
    indicator: &'a Indicator,
    view: &'a dyn View,
}

impl Drop for IndicatorGuard<'_> {
    fn drop(&mut self) {
        let mut holders = self.indicator.lock();
        *holders = holders.saturating_sub(1);
        if *holders == 0 {
            self.view.set_visible(self.indicator.region, false);
        }
    }
}

/// Per-action request sequencers.
#[derive(Debug, Default)]
struct Sequencers {
    review: Sequencer,
    rewrite: Sequencer,
    validate: Sequencer,
    connection: Sequencer,
    analyze: Sequencer,
    autofix: Sequencer,
}

/// The headless client: typed state, a backend, a view and a token store.
pub struct App {
    backend: Arc<dyn Backend>,
    view: Arc<dyn View>,
    store: Arc<dyn TokenStore>,
    animations: Animations,
    state: Mutex<AppState>,
    loading: Indicator,
    pr_spinner: Indicator,
    typing: Indicator,
    seq: Sequencers,
    /// Count-up and bar-fill tasks of the score card currently displayed.
    running_animations: Mutex<Vec<AnimationHandle>>,
}

impl App {
    pub fn new(
        backend: Arc<dyn Backend>,
        view: Arc<dyn View>,
        store: Arc<dyn TokenStore>,
        animations: Animations,
    ) -> Self {
        Self::with_state(backend, view, store, animations, AppState::default())
    }

    pub fn with_state(
        backend: Arc<dyn Backend>,
        view: Arc<dyn View>,
        store: Arc<dyn TokenStore>,
        animations: Animations,
        state: AppState,
    ) -> Self {
        Self {
            backend,
            view,
            store,
            animations,
            state: Mutex::new(state),
            loading: Indicator::new(Region::GlobalLoading),
            pr_spinner: Indicator::new(Region::PrSpinner),
            typing: Indicator::new(Region::ChatTyping),
            seq: Sequencers::default(),
            running_animations: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.lock_state().clone()
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    pub fn set_code(&self, code: impl Into<String>) {
        self.lock_state().code = code.into();
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.lock_state().language = language.into();
    }

    /// Replace the checked focus areas.
    pub fn set_focus_areas<I, S>(&self, areas: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let areas: BTreeSet<String> = areas.into_iter().map(Into::into).collect();
        self.lock_state().focus_areas = areas;
    }

    pub fn set_chat_input(&self, input: impl Into<String>) {
        self.lock_state().chat_input = input.into();
    }

    pub fn set_token_input(&self, token: impl Into<String>) {
        self.lock_state().token.input = token.into();
    }

    pub fn set_pr_url(&self, url: impl Into<String>) {
        self.lock_state().pr_url = url.into();
    }

    /// Draw the whole transcript into the view (e.g. the welcome message at start).
    pub fn render_transcript(&self) {
        let state = self.lock_state();
        for message in state.transcript.messages() {
            self.view.append_chat(message, &chat::markup_for(message));
        }
    }

    /// Wait until every running score animation has finished.
    pub async fn settle_animations(&self) {
        let handles = std::mem::take(&mut *self.lock_animations());
        for handle in handles {
            handle.wait().await;
        }
    }

    /// Stop the animations of the previous score card and track the new ones.
    fn replace_animations(&self, handles: Vec<AnimationHandle>) {
        let mut running = self.lock_animations();
        for old in running.drain(..) {
            old.cancel();
        }
        *running = handles;
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_animations(&self) -> MutexGuard<'_, Vec<AnimationHandle>> {
        self.running_animations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Screen;

    #[test]
    fn newer_ticket_supersedes_older() {
        let seq = Sequencer::new();
        let first = seq.issue();
        assert!(seq.is_current(first));
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn indicator_stays_visible_until_last_guard_drops() {
        let screen = Screen::default();
        let indicator = Indicator::new(Region::GlobalLoading);

        let a = indicator.enter(&screen);
        let b = indicator.enter(&screen);
        assert_eq!(indicator.holders(), 2);
        drop(a);
        assert!(screen.snapshot().is_visible(Region::GlobalLoading));
        drop(b);
        let snap = screen.snapshot();
        assert!(!snap.is_visible(Region::GlobalLoading));
        assert_eq!(
            snap.visibility_log,
            vec![(Region::GlobalLoading, true), (Region::GlobalLoading, false)]
        );
    }

    #[test]
    fn guard_hides_on_early_return() {
        fn bail(indicator: &Indicator, view: &dyn View) -> Result<(), ()> {
            let _guard = indicator.enter(view);
            Err(())?;
            Ok(())
        }

        let screen = Screen::default();
        let indicator = Indicator::new(Region::PrSpinner);
        assert!(bail(&indicator, &screen).is_err());
        assert!(!screen.snapshot().is_visible(Region::PrSpinner));
        assert_eq!(indicator.holders(), 0);
    }
}
