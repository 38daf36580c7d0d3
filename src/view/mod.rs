//! View bindings.
//!
//! Orchestrators and renderers never touch a concrete display. They drive a
//! [`View`]: a set of named display regions with get/set operations. The
//! terminal front-end implements it in [`terminal`]; [`screen`] is a
//! headless implementation that records the latest value of every region.

pub mod screen;
pub mod terminal;

use crate::models::chat::ChatMessage;
use crate::models::review::{Category, Severity};
use crate::render::github::{AutofixView, InstallationCard, PrReviewView};
use crate::state::Tab;

pub use screen::Screen;
pub use terminal::TerminalView;

/// Named display regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Content panel belonging to a tab.
    Panel(Tab),
    /// Button that activates a tab.
    TabButton(Tab),
    /// Page-wide loading overlay used by review, rewrite and bumble.
    GlobalLoading,

    ReviewEmpty,
    ReviewResults,
    ScoreCard,
    OverallScore,
    Grade,
    Gauge,
    ScoreMetrics,
    CategoryBar(Category),
    CategoryScore(Category),
    Count(Severity),
    Summary,
    RawReview,

    RewriteResults,
    ImprovementsPanel,
    OriginalCode,
    RewrittenCode,
    Improvements,

    ChatInput,
    ChatTyping,

    TokenStatus,
    ConnectionStatus,
    PrSpinner,
    PrResults,
}

/// Display colours. Concrete views map these onto their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Emerald,
    Blue,
    Amber,
    Orange,
    Red,
    Gray,
}

/// Severity of an inline status block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Work in progress ("validating...").
    Info,
    Success,
    Warning,
    Error,
}

/// Markdown source together with its rendered HTML.
///
/// HTML views use `html`; text views re-render `source` their own way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub source: String,
    pub html: String,
}

/// Display operations the client layer needs.
///
/// Every method takes `&self`; implementations use interior mutability so
/// a single view can be shared by concurrently running orchestrators and
/// animation tasks.
pub trait View: Send + Sync {
    fn set_visible(&self, region: Region, visible: bool);

    /// Toggle the "active" styling of a tab button.
    fn set_active(&self, region: Region, active: bool);

    fn set_text(&self, region: Region, text: &str);

    fn set_markup(&self, region: Region, markup: &Markup);

    /// Show a code block; the view applies syntax highlighting for `language`.
    fn set_code(&self, region: Region, code: &str, language: &str);

    fn set_tone(&self, region: Region, tone: Tone);

    /// Set a bar's fill width as a percentage.
    fn set_width(&self, region: Region, percent: u8);

    /// Radius of the overall-score gauge, read from the gauge geometry.
    fn gauge_radius(&self) -> f64;

    fn set_stroke_offset(&self, region: Region, offset: f64);

    fn set_status(&self, region: Region, kind: StatusKind, message: &str);

    fn set_installations(&self, cards: &[InstallationCard]);

    fn show_pr_review(&self, review: &PrReviewView);

    fn show_autofix(&self, autofix: &AutofixView);

    /// Inline error block inside the PR results region.
    fn show_pr_error(&self, message: &str);

    fn append_chat(&self, message: &ChatMessage, markup: &Markup);

    /// Drop every transcript entry after the first `keep`.
    fn truncate_chat(&self, keep: usize);

    /// Blocking, modal error message.
    fn alert(&self, message: &str);

    /// Ask the user a yes/no question.
    fn confirm(&self, question: &str) -> bool;

    /// Transient success notification.
    fn notify(&self, message: &str);

    /// Place `text` on the clipboard. Returns `false` if that is unsupported.
    fn copy_to_clipboard(&self, text: &str) -> bool;
}
