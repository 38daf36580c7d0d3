//! Typed application state.
//!
//! Everything the orchestrators read or remember between actions lives in
//! [`AppState`]: the active tab, the editor contents, the chat transcript,
//! the GitHub token and the last rewrite. Orchestrators read their inputs
//! from here instead of scraping the display.

use std::collections::BTreeSet;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::constants;
use crate::models::chat::ChatMessage;

/// Mutually exclusive content panels.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tab {
    #[default]
    Review,
    Rewrite,
    Chat,
    Github,
}

/// Append-only chat transcript.
///
/// Insertion order is display order. The first entry is the welcome
/// message and survives every clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A transcript holding only `welcome`.
    pub fn new(welcome: ChatMessage) -> Self {
        Self {
            messages: vec![welcome],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Discard everything but the first entry. Returns how many were removed.
    pub fn clear_keep_first(&mut self) -> usize {
        let removed = self.messages.len().saturating_sub(1);
        self.messages.truncate(1);
        removed
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(ChatMessage::ai(constants::MSG_CHAT_WELCOME))
    }
}

/// GitHub token as entered, plus whether the backend has confirmed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    /// Current contents of the token field.
    pub input: String,
    /// Set only after a validation round trip says the token is good.
    pub valid: bool,
    pub username: Option<String>,
}

/// Which code block a copy action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRegion {
    Original,
    Rewritten,
}

/// Code shown side by side after a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSnapshot {
    /// Editor contents at the moment the rewrite was requested.
    pub original: String,
    /// Rewritten code with any surrounding fence removed.
    pub rewritten: String,
    pub language: String,
}

impl RewriteSnapshot {
    pub fn get(&self, region: CodeRegion) -> &str {
        match region {
            CodeRegion::Original => &self.original,
            CodeRegion::Rewritten => &self.rewritten,
        }
    }
}

/// All mutable client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_tab: Tab,
    /// Code editor contents.
    pub code: String,
    pub language: String,
    /// Checked focus-area boxes. A set, so order and duplicates don't matter.
    pub focus_areas: BTreeSet<String>,
    /// Summary text of the most recently rendered review.
    pub review_summary: Option<String>,
    pub chat_input: String,
    pub transcript: Transcript,
    pub token: TokenState,
    pub pr_url: String,
    pub last_rewrite: Option<RewriteSnapshot>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            code: String::new(),
            language: constants::DEFAULT_LANGUAGE.to_string(),
            focus_areas: BTreeSet::new(),
            review_summary: None,
            chat_input: String::new(),
            transcript: Transcript::default(),
            token: TokenState::default(),
            pr_url: String::new(),
            last_rewrite: None,
        }
    }
}

impl AppState {
    /// Focus areas in request order.
    pub fn focus_list(&self) -> Vec<String> {
        self.focus_areas.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_parses_lowercase_names() {
        assert_eq!("github".parse::<Tab>().unwrap(), Tab::Github);
        assert_eq!("Rewrite".parse::<Tab>().unwrap(), Tab::Rewrite);
        assert!("settings".parse::<Tab>().is_err());
        assert_eq!(Tab::Chat.to_string(), "chat");
    }

    #[test]
    fn transcript_clear_keeps_welcome() {
        let mut t = Transcript::default();
        t.push(ChatMessage::user("hi"));
        t.push(ChatMessage::ai("hello"));
        assert_eq!(t.clear_keep_first(), 2);
        assert_eq!(t.len(), 1);
        assert_eq!(t.messages()[0].text, constants::MSG_CHAT_WELCOME);
        assert_eq!(t.clear_keep_first(), 0);
    }

    #[test]
    fn focus_areas_are_deduplicated() {
        let mut state = AppState::default();
        state.focus_areas.insert("security".into());
        state.focus_areas.insert("bugs".into());
        state.focus_areas.insert("security".into());
        assert_eq!(state.focus_list(), vec!["bugs", "security"]);
    }
}
