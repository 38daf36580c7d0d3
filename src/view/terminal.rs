//! Terminal front-end: styled flowing text on stdout, indicators on stderr.
//!
//! Region state is kept in an inner [`Screen`]. Events (alerts, status
//! lines, chat messages, PR results) print as they happen; the review and
//! rewrite panels are printed from a snapshot once an action completes.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use colored::{ColoredString, Colorize};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use strum::IntoEnumIterator;

use super::screen::{Screen, ScreenState};
use super::{Markup, Region, StatusKind, Tone, View};
use crate::constants;
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::review::{Category, Severity};
use crate::render::github::{AutofixView, FileBody, InstallationCard, PrReviewView};
use crate::render::score;
use crate::state::Tab;

/// Width of the horizontal bars, in cells.
const BAR_CELLS: usize = 20;
const RULE_WIDTH: usize = 35;

/// Terminal implementation of [`View`].
pub struct TerminalView {
    screen: Screen,
    /// Indicator currently drawn on stderr, if any.
    indicator: Mutex<Option<Region>>,
    interactive: bool,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            screen: Screen::default(),
            indicator: Mutex::new(None),
            interactive: io::stderr().is_terminal(),
        }
    }

    /// Print the final contents of `tab`'s panel to stdout.
    ///
    /// Chat and GitHub output is printed live, so only review and rewrite
    /// produce anything here.
    pub fn print_panel(&self, tab: Tab) {
        let state = self.screen.snapshot();
        let text = match tab {
            Tab::Review => format_review_panel(&state, self.screen.gauge_radius()),
            Tab::Rewrite => format_rewrite_panel(&state),
            Tab::Chat | Tab::Github => return,
        };
        self.out(&text);
    }

    pub fn snapshot(&self) -> ScreenState {
        self.screen.snapshot()
    }

    fn indicator_label(region: Region) -> Option<&'static str> {
        match region {
            Region::GlobalLoading => Some("Working…"),
            Region::PrSpinner => Some("Talking to GitHub…"),
            Region::ChatTyping => Some("AI is typing…"),
            _ => None,
        }
    }

    /// Write to stdout, lifting any indicator line out of the way.
    fn out(&self, text: &str) {
        self.around_indicator(|| {
            let mut handle = io::stdout().lock();
            let _ = write!(handle, "{text}");
            let _ = handle.flush();
        });
    }

    fn err(&self, text: &str) {
        self.around_indicator(|| {
            let _ = writeln!(io::stderr().lock(), "{text}");
        });
    }

    fn around_indicator(&self, print: impl FnOnce()) {
        let shown = *self.indicator.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(region) = shown {
            self.clear_indicator_line();
            print();
            self.draw_indicator(region);
        } else {
            print();
        }
    }

    fn draw_indicator(&self, region: Region) {
        if !self.interactive {
            return;
        }
        if let Some(label) = Self::indicator_label(region) {
            let mut handle = io::stderr().lock();
            let _ = writeln!(handle, "  {} {}", "◌".cyan().bold(), label.cyan());
            let _ = handle.flush();
        }
    }

    fn clear_indicator_line(&self) {
        if !self.interactive {
            return;
        }
        let mut handle = io::stderr().lock();
        // Move up one line and clear it
        let _ = write!(handle, "\x1b[1A\x1b[2K");
        let _ = handle.flush();
    }

    fn toggle_indicator(&self, region: Region, visible: bool) {
        let mut shown = self.indicator.lock().unwrap_or_else(|e| e.into_inner());
        match (visible, *shown) {
            (true, Some(current)) if current == region => {}
            (true, current) => {
                if current.is_some() {
                    self.clear_indicator_line();
                }
                self.draw_indicator(region);
                *shown = Some(region);
            }
            (false, Some(current)) if current == region => {
                self.clear_indicator_line();
                *shown = None;
            }
            (false, _) => {}
        }
    }
}

impl View for TerminalView {
    fn set_visible(&self, region: Region, visible: bool) {
        self.screen.set_visible(region, visible);
        if Self::indicator_label(region).is_some() {
            self.toggle_indicator(region, visible);
        }
    }

    fn set_active(&self, region: Region, active: bool) {
        self.screen.set_active(region, active);
    }

    fn set_text(&self, region: Region, text: &str) {
        self.screen.set_text(region, text);
    }

    fn set_markup(&self, region: Region, markup: &Markup) {
        self.screen.set_markup(region, markup);
    }

    fn set_code(&self, region: Region, code: &str, language: &str) {
        self.screen.set_code(region, code, language);
    }

    fn set_tone(&self, region: Region, tone: Tone) {
        self.screen.set_tone(region, tone);
    }

    fn set_width(&self, region: Region, percent: u8) {
        self.screen.set_width(region, percent);
    }

    fn gauge_radius(&self) -> f64 {
        self.screen.gauge_radius()
    }

    fn set_stroke_offset(&self, region: Region, offset: f64) {
        self.screen.set_stroke_offset(region, offset);
    }

    fn set_status(&self, region: Region, kind: StatusKind, message: &str) {
        self.screen.set_status(region, kind, message);
        self.err(&format_status(kind, message));
    }

    fn set_installations(&self, cards: &[InstallationCard]) {
        self.screen.set_installations(cards);
        self.out(&format_installations(cards));
    }

    fn show_pr_review(&self, review: &PrReviewView) {
        self.screen.show_pr_review(review);
        self.out(&format_pr_review(review));
    }

    fn show_autofix(&self, autofix: &AutofixView) {
        self.screen.show_autofix(autofix);
        self.out(&format_autofix(autofix));
    }

    fn show_pr_error(&self, message: &str) {
        self.screen.show_pr_error(message);
        self.err(&format_status(StatusKind::Error, message));
    }

    fn append_chat(&self, message: &ChatMessage, markup: &Markup) {
        self.screen.append_chat(message, markup);
        self.out(&format_chat(message, markup));
    }

    fn truncate_chat(&self, keep: usize) {
        self.screen.truncate_chat(keep);
    }

    fn alert(&self, message: &str) {
        self.screen.alert(message);
        self.err(&format!("  {} {}", "✖".red().bold(), message.red()));
    }

    fn confirm(&self, question: &str) -> bool {
        self.screen.confirm(question);
        self.err(&format!("  {} {} [y/N]", "?".yellow().bold(), question));
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }

    fn notify(&self, message: &str) {
        self.screen.notify(message);
        self.err(&format!("  {} {}", "✔".green().bold(), message.green()));
    }

    /// Copies through the OSC 52 escape sequence, which most modern
    /// terminal emulators (and tmux with `set-clipboard on`) honour.
    fn copy_to_clipboard(&self, text: &str) -> bool {
        self.screen.copy_to_clipboard(text);
        let stdout = io::stdout();
        if !stdout.is_terminal() {
            return false;
        }
        let mut handle = stdout.lock();
        write!(handle, "{}", osc52(text)).is_ok() && handle.flush().is_ok()
    }
}

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Emerald => text.green(),
        Tone::Blue => text.blue(),
        Tone::Amber => text.yellow(),
        Tone::Orange => text.truecolor(255, 165, 0),
        Tone::Red => text.red(),
        Tone::Gray => text.bright_black(),
    }
}

fn format_status(kind: StatusKind, message: &str) -> String {
    let (icon, text) = match kind {
        StatusKind::Info => ("◌".cyan().bold(), message.cyan()),
        StatusKind::Success => ("✔".green().bold(), message.green()),
        StatusKind::Warning => ("⚠".yellow().bold(), message.yellow()),
        StatusKind::Error => ("✖".red().bold(), message.red()),
    };
    format!("  {icon} {text}")
}

fn bar(percent: u8, tone: Tone) -> String {
    let filled = usize::from(percent.min(100)) * BAR_CELLS / 100;
    format!(
        "{}{}",
        paint(&"█".repeat(filled), tone),
        "░".repeat(BAR_CELLS - filled).dimmed()
    )
}

fn rule() -> String {
    format!("{}\n", "─".repeat(RULE_WIDTH).dimmed())
}

fn heading(title: &str) -> String {
    format!("\n {} {}\n", "▸".cyan().bold(), title.bold())
}

/// Review panel: score card, counts, summary and the full review.
pub fn format_review_panel(state: &ScreenState, gauge_radius: f64) -> String {
    let mut out = String::new();
    if !state.is_visible(Region::ReviewResults) {
        return out;
    }

    if state.is_visible(Region::ScoreCard) {
        let c = score::circumference(gauge_radius);
        let offset = state.stroke_offset.get(&Region::Gauge).copied().unwrap_or(c);
        let filled = if c > 0.0 { (1.0 - offset / c) * 100.0 } else { 0.0 };
        let tone = state.tone.get(&Region::Gauge).copied().unwrap_or(Tone::Gray);
        let overall = state.text_of(Region::OverallScore).unwrap_or("0");
        let grade = state.text_of(Region::Grade).unwrap_or("?");
        out.push_str(&heading("Quality"));
        out.push_str(&format!(
            "   {}  {}  grade {}\n",
            bar(filled.round().clamp(0.0, 100.0) as u8, tone),
            format!("{overall}/100").bold(),
            paint(grade, tone).bold(),
        ));

        for category in Category::iter() {
            let name: &'static str = category.into();
            let bar_region = Region::CategoryBar(category);
            let width = state.width.get(&bar_region).copied().unwrap_or(0);
            let tone = state.tone.get(&bar_region).copied().unwrap_or(Tone::Gray);
            let value = state
                .text_of(Region::CategoryScore(category))
                .unwrap_or("0");
            out.push_str(&format!("   {name:<16} {} {value}\n", bar(width, tone)));
        }

        if state.is_visible(Region::ScoreMetrics) {
            if let Some(line) = state.text_of(Region::ScoreMetrics) {
                out.push_str(&format!("   {}\n", line.dimmed()));
            }
        }
    }

    out.push_str(&heading("Issues"));
    let counts: Vec<String> = Severity::iter()
        .map(|severity| {
            let name: &'static str = severity.into();
            let n = state.text_of(Region::Count(severity)).unwrap_or("0");
            let label = format!("{n} {name}");
            match severity {
                Severity::Critical => label.red().bold().to_string(),
                Severity::High => label.truecolor(255, 165, 0).to_string(),
                Severity::Medium => label.yellow().to_string(),
                Severity::Low => label.blue().to_string(),
            }
        })
        .collect();
    out.push_str(&format!("   {}\n", counts.join(" · ")));

    if let Some(summary) = state.text_of(Region::Summary) {
        out.push_str(&heading("Summary"));
        out.push_str(&format!("   {summary}\n"));
    }

    let raw = state.markup.get(&Region::RawReview);
    if let Some(markup) = raw.filter(|m| !m.source.trim().is_empty()) {
        out.push('\n');
        out.push_str(&rule());
        out.push_str(&markdown_to_ansi(&markup.source));
    }
    out
}

/// Rewrite panel: original and rewritten code, then the improvement notes.
pub fn format_rewrite_panel(state: &ScreenState) -> String {
    let mut out = String::new();
    if !state.is_visible(Region::RewriteResults) {
        return out;
    }
    for (region, title) in [
        (Region::OriginalCode, "Original"),
        (Region::RewrittenCode, "Rewritten"),
    ] {
        if let Some((code, language)) = state.code.get(&region) {
            out.push_str(&heading(&format!("{title} ({language})")));
            out.push_str(&code_block(code));
        }
    }
    let notes = state
        .markup
        .get(&Region::Improvements)
        .filter(|m| !m.source.trim().is_empty());
    if let (true, Some(markup)) = (state.is_visible(Region::ImprovementsPanel), notes) {
        out.push_str(&heading("Improvements"));
        out.push_str(&markdown_to_ansi(&markup.source));
    }
    out
}

fn code_block(code: &str) -> String {
    code.lines()
        .map(|line| format!("   {} {}\n", "│".dimmed(), line))
        .collect()
}

fn format_installations(cards: &[InstallationCard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                "   {} {} {}\n",
                format!("[{}]", card.badge).cyan().bold(),
                card.account.bold(),
                card.kind.dimmed()
            )
        })
        .collect()
}

fn format_pr_review(review: &PrReviewView) -> String {
    let mut out = heading(&review.header());
    for file in &review.files {
        out.push_str(&format!("\n   {}\n", file.filename.bold().underline()));
        if let Some(counts) = file.counts {
            out.push_str(&format!(
                "   {} critical · {} high · {} medium · {} low\n",
                counts.critical, counts.high, counts.medium, counts.low
            ));
        }
        match &file.body {
            FileBody::Review(markup) => out.push_str(&markdown_to_ansi(&markup.source)),
            FileBody::NoIssues => out.push_str(&format!(
                "   {} {}\n",
                "✔".green().bold(),
                constants::MSG_NO_FILE_ISSUES.green()
            )),
        }
    }
    out
}

fn format_autofix(autofix: &AutofixView) -> String {
    let mut out = heading("Autofix");
    out.push_str(&format!(
        "   {} file(s) fixed · {} issue(s) resolved · committed: {}\n",
        autofix.files_fixed.to_string().bold(),
        autofix.issues_resolved.to_string().bold(),
        if autofix.committed {
            "yes".green().bold()
        } else {
            "no".dimmed()
        },
    ));
    for file in &autofix.files {
        out.push_str(&format!("   {} {}\n", "→".cyan(), file));
    }
    if let Some(ref commit) = autofix.commit {
        out.push_str(&format!("   commit {}\n", commit.yellow()));
    }
    out
}

fn format_chat(message: &ChatMessage, markup: &Markup) -> String {
    match message.role {
        ChatRole::User => format!("\n {} {}\n", "you ›".bold(), message.text),
        ChatRole::Ai => format!(
            "\n {}\n{}",
            "ai ›".cyan().bold(),
            markdown_to_ansi(&markup.source)
        ),
    }
}

/// Render Markdown as indented, coloured terminal text.
pub fn markdown_to_ansi(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );

    let mut out = String::new();
    let mut line = String::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut heading: Option<HeadingLevel> = None;
    let mut in_code_block = false;
    let mut list_depth = 0usize;

    let flush = |out: &mut String, line: &mut String| {
        if !line.trim().is_empty() {
            out.push_str("   ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        line.clear();
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut out, &mut line);
                heading = Some(level);
            }
            Event::End(TagEnd::Heading(_)) => {
                heading = None;
                flush(&mut out, &mut line);
            }
            Event::Start(Tag::Paragraph) => flush(&mut out, &mut line),
            Event::End(TagEnd::Paragraph) => {
                flush(&mut out, &mut line);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::List(_)) => {
                flush(&mut out, &mut line);
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut out, &mut line);
                line.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                line.push_str(&format!("{} ", "•".cyan()));
            }
            Event::End(TagEnd::Item) => flush(&mut out, &mut line),
            Event::Start(Tag::CodeBlock(kind)) => {
                flush(&mut out, &mut line);
                in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        out.push_str(&format!("   {}\n", (&*lang).dimmed()));
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::Strong) => bold += 1,
            Event::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic += 1,
            Event::End(TagEnd::Emphasis) => italic = italic.saturating_sub(1),
            Event::Text(text) if in_code_block => out.push_str(&code_block(&text)),
            Event::Text(text) => {
                let mut styled: ColoredString = (&*text).normal();
                if heading.is_some() || bold > 0 {
                    styled = styled.bold();
                }
                if matches!(heading, Some(HeadingLevel::H1 | HeadingLevel::H2)) {
                    styled = styled.underline();
                }
                if italic > 0 {
                    styled = styled.italic();
                }
                line.push_str(&styled.to_string());
            }
            Event::Code(code) => line.push_str(&(&*code).cyan().to_string()),
            Event::SoftBreak => line.push(' '),
            Event::HardBreak => flush(&mut out, &mut line),
            Event::Rule => {
                flush(&mut out, &mut line);
                out.push_str(&rule());
            }
            _ => {}
        }
    }
    flush(&mut out, &mut line);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::SeverityCounts;
    use crate::render::markdown;
    use serial_test::serial;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    #[serial]
    fn markdown_renders_lists_and_code() {
        plain();
        let text = markdown_to_ansi(
            "### Critical\n- SQL injection in `query()`\n\n```python\nprint(1)\n```\n",
        );
        assert!(text.contains("Critical"));
        assert!(text.contains("• SQL injection in query()"));
        assert!(text.contains("python"));
        assert!(text.contains("│ print(1)"));
    }

    #[test]
    #[serial]
    fn review_panel_lists_scores_and_counts() {
        plain();
        let screen = Screen::with_gauge_radius(40.0);
        screen.set_visible(Region::ReviewResults, true);
        screen.set_visible(Region::ScoreCard, true);
        screen.set_stroke_offset(Region::Gauge, score::circumference(40.0) * 0.2);
        screen.set_text(Region::OverallScore, "80");
        screen.set_text(Region::Grade, "B");
        screen.set_width(Region::CategoryBar(Category::Security), 50);
        screen.set_text(Region::CategoryScore(Category::Security), "50");
        screen.set_text(Region::Count(Severity::High), "2");
        screen.set_text(Region::Summary, "Looks fine.");
        screen.set_markup(Region::RawReview, &markdown::render("## Details\nok"));

        let text = format_review_panel(&screen.snapshot(), 40.0);
        assert!(text.contains("80/100"));
        assert!(text.contains("grade B"));
        let bar = format!("{}{} 50", "█".repeat(10), "░".repeat(10));
        assert!(text.lines().any(|l| l.contains("security") && l.contains(&bar)));
        assert!(text.contains("0 critical · 2 high · 0 medium · 0 low"));
        assert!(text.contains("Looks fine."));
        assert!(text.contains("Details"));
    }

    #[test]
    #[serial]
    fn hidden_score_card_is_not_reprinted() {
        plain();
        let screen = Screen::with_gauge_radius(40.0);
        screen.set_visible(Region::ReviewResults, true);
        screen.set_visible(Region::ScoreCard, true);
        screen.set_stroke_offset(Region::Gauge, 0.0);
        screen.set_text(Region::OverallScore, "97");
        // The next review came back without scores.
        screen.set_visible(Region::ScoreCard, false);
        screen.set_text(Region::Summary, "No scores this time.");

        let text = format_review_panel(&screen.snapshot(), 40.0);
        assert!(!text.contains("/100"));
        assert!(!text.contains("Quality"));
        assert!(text.contains("No scores this time."));
    }

    #[test]
    #[serial]
    fn rule_spans_a_fixed_width() {
        plain();
        assert_eq!(rule().trim_end().chars().count(), RULE_WIDTH);
    }

    #[test]
    #[serial]
    fn hidden_review_panel_prints_nothing() {
        plain();
        let screen = Screen::default();
        assert!(format_review_panel(&screen.snapshot(), 54.0).is_empty());
    }

    #[test]
    #[serial]
    fn pr_review_shows_placeholder_and_counts() {
        plain();
        let review = PrReviewView {
            number: 7,
            title: "Fix".into(),
            author: "dev".into(),
            files: vec![crate::render::github::FileBlock {
                filename: "a.py".into(),
                body: FileBody::NoIssues,
                counts: Some(SeverityCounts {
                    critical: 1,
                    ..Default::default()
                }),
            }],
        };
        let text = format_pr_review(&review);
        assert!(text.contains("PR #7 · Fix · by @dev"));
        assert!(text.contains("1 critical · 0 high"));
        assert!(text.contains(constants::MSG_NO_FILE_ISSUES));
    }

    #[test]
    #[serial]
    fn autofix_lists_files_and_commit() {
        plain();
        let text = format_autofix(&AutofixView {
            files_fixed: 2,
            issues_resolved: 3,
            committed: true,
            files: vec!["a.py".into(), "b.py".into()],
            commit: Some("abc1234".into()),
        });
        assert!(text.contains("2 file(s) fixed · 3 issue(s) resolved · committed: yes"));
        assert!(text.contains("→ b.py"));
        assert!(text.contains("commit abc1234"));
    }
}
