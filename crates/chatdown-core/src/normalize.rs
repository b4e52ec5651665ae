//! Math delimiter normalization
//!
//! Assistant output mixes two LaTeX delimiter conventions; the parser only
//! understands the dollar one. Every bracket-style token (`\[`, `\]`, `\(`,
//! `\)`) is rewritten to `$$` before parsing. Inline brackets are coerced to
//! the block token as well - a deliberate compatibility quirk, see DESIGN.md.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// The four bracket-style math delimiter tokens.
static BRACKET_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\[|\\\]|\\\(|\\\)").unwrap());

/// Rewrite bracket math delimiters to the `$$` convention.
///
/// Pure and infallible. Returns the input unchanged (borrowed) when no
/// bracket token occurs, so text without math costs nothing.
pub fn normalize(text: &str) -> Cow<'_, str> {
    // each "$$" in a replacement string is one escaped literal dollar sign
    BRACKET_DELIMITERS.replace_all(text, "$$$$")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_without_delimiters() {
        let text = "plain prose, $5 of it, and `code`";
        let out = normalize(text);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, text);
    }

    #[test]
    fn replaces_all_four_tokens() {
        let out = normalize(r"\[x\] and \(y\)");
        assert_eq!(out, "$$x$$ and $$y$$");
    }

    #[test]
    fn replacement_count_matches_token_count() {
        let text = r"\(a\) \(b\) \[c\]";
        let out = normalize(text);
        assert_eq!(out.matches("$$").count(), 6);
    }

    #[test]
    fn empty_input_passes_through() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent_on_own_output() {
        let once = normalize(r"\[E=mc^2\]").into_owned();
        let twice = normalize(&once);
        assert_eq!(twice, once);
        assert!(matches!(twice, Cow::Borrowed(_)));
    }
}
