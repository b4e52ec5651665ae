//! Syntax highlighting using syntect
//!
//! The highlighting engine collaborator: given a language tag and raw code,
//! produce styled spans per line. Unrecognized tags fall back to plain-text
//! syntax rather than failing.

use once_cell::sync::Lazy;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::theme::Theme;

/// Global syntax set - loaded once
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Syntect theme set; only used for scope detection, colors come from ours
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Highlight a code block, returning styled spans for each line.
pub fn highlight_lines(code: &str, lang: &str, theme: &Theme) -> Vec<Vec<Span<'static>>> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    // base16-ocean.dark gives stable scope colors to remap below
    let syntect_theme = &THEME_SET.themes["base16-ocean.dark"];
    let mut highlighter = HighlightLines::new(syntax, syntect_theme);

    let mut result = Vec::new();

    for line in LinesWithEndings::from(code) {
        let ranges = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .unwrap_or_default();

        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                let color = remap_color(style.foreground, theme);
                let mut out = Style::default().fg(color);
                if style.font_style.contains(FontStyle::BOLD) {
                    out = out.add_modifier(Modifier::BOLD);
                }
                if style.font_style.contains(FontStyle::ITALIC) {
                    out = out.add_modifier(Modifier::ITALIC);
                }
                Span::styled(text.trim_end_matches('\n').to_string(), out)
            })
            .collect();

        result.push(spans);
    }

    if result.is_empty() {
        result.push(vec![Span::raw("")]);
    }

    result
}

/// Remap syntect's base16-ocean output onto the caller's theme so code
/// blocks follow the configured palette instead of a baked-in one.
fn remap_color(color: syntect::highlighting::Color, theme: &Theme) -> ratatui::style::Color {
    match (color.r, color.g, color.b) {
        // Comments
        (101, 115, 126) => theme.syntax_comment_color,
        // Strings
        (163, 190, 140) => theme.syntax_string_color,
        // Numbers
        (208, 135, 112) => theme.syntax_number_color,
        // Keywords
        (180, 142, 173) => theme.syntax_keyword_color,
        // Functions
        (143, 161, 179) => theme.syntax_function_color,
        // Types and support
        (235, 203, 139) | (150, 181, 180) => theme.syntax_type_color,
        // Variables
        (191, 97, 106) => theme.syntax_variable_color,
        // Operators and punctuation
        (192, 197, 206) | (167, 173, 186) => theme.syntax_punctuation_color,
        _ => theme.code_fg_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(lines: &[Vec<Span<'static>>]) -> String {
        lines
            .iter()
            .map(|spans| {
                spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn preserves_code_text() {
        let theme = Theme::dark();
        let lines = highlight_lines("fn main() {\n    let x = 1;\n}", "rust", &theme);
        assert_eq!(lines.len(), 3);
        assert_eq!(flatten(&lines), "fn main() {\n    let x = 1;\n}");
    }

    #[test]
    fn unknown_language_falls_back_to_plain() {
        let theme = Theme::dark();
        let lines = highlight_lines("whatever text", "not-a-language", &theme);
        assert_eq!(flatten(&lines), "whatever text");
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        let theme = Theme::dark();
        let lines = highlight_lines("", "rust", &theme);
        assert_eq!(lines.len(), 1);
    }
}
