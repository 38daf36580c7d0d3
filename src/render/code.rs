//! Code block normalisation.

use regex::Regex;
use std::sync::LazyLock;

/// Opening fence with an optional language tag, then the body up to the
/// first closing fence (non-greedy).
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[\w+#.-]*[ \t]*\r?\n(.*?)\r?\n?```").unwrap());

/// Strip a Markdown code fence wrapped around rewritten code.
///
/// Only text that starts with a triple backtick is considered. When the
/// fence pattern doesn't match the input comes back unchanged.
pub fn strip_code_fence(code: &str) -> &str {
    if !code.starts_with("```") {
        return code;
    }
    FENCE_RE
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let fenced = "```python\ndef add(a, b):\n    return a + b\n```";
        assert_eq!(strip_code_fence(fenced), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn strips_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\nlet x = 1;\n```\n"), "let x = 1;");
    }

    #[test]
    fn stops_at_first_closing_fence() {
        let fenced = "```js\nfirst();\n```\n\nSome notes\n```js\nsecond();\n```";
        assert_eq!(strip_code_fence(fenced), "first();");
    }

    #[test]
    fn unfenced_code_is_unchanged() {
        let plain = "fn main() {}\n// ```not a fence```";
        assert_eq!(strip_code_fence(plain), plain);
    }

    #[test]
    fn malformed_fence_falls_back_to_raw() {
        let broken = "```python print(1)";
        assert_eq!(strip_code_fence(broken), broken);
    }
}
