//! Markdown to HTML via pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use crate::view::Markup;

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render Markdown to HTML.
///
/// Fenced code blocks come out as `<pre><code class="language-…">`, which
/// is the hook the view's syntax highlighter keys on.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Markdown source paired with its HTML rendering.
pub fn render(markdown: &str) -> Markup {
    Markup {
        source: markdown.to_string(),
        html: to_html(markdown),
    }
}

/// Literal text (e.g. something the user typed) as markup, never interpreted.
pub fn plain(text: &str) -> Markup {
    Markup {
        source: text.to_string(),
        html: format!("<p>{}</p>", escape_html(text)),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
