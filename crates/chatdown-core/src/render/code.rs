//! Code rendering
//!
//! One renderer, two layouts, chosen by the annotated classification and the
//! language tag: inline code (or a block without a recognizable language)
//! gets the minimal styled-span treatment; block code with a language gets a
//! labeled header bar and a highlighted body.

use once_cell::sync::Lazy;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use regex::Regex;

use crate::highlight;
use crate::node::{Node, NodeKind};
use crate::theme::Theme;

use super::inline::InlineCtx;
use super::{CodeBlockMeta, Renderer};

pub(crate) const PLAINTEXT: &str = "plaintext";

/// Extracts the tag from the `language-<tag>` class convention.
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"language-(\w+)").unwrap());

/// The language tag of a code node; `plaintext` when absent or unparseable.
pub fn language_of(node: &Node) -> String {
    node.class_name()
        .and_then(|class| LANGUAGE_RE.captures(class))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLAINTEXT.to_string())
}

/// Strip exactly one trailing line terminator, nothing more.
fn content_of(literal: &str) -> &str {
    literal.strip_suffix('\n').unwrap_or(literal)
}

pub(super) fn inline(node: &Node, theme: &Theme, ctx: &mut InlineCtx) {
    let NodeKind::Code { literal } = &node.kind else {
        return;
    };
    let content = content_of(literal);
    if content.is_empty() {
        return;
    }
    ctx.code_meta.push(CodeBlockMeta {
        language: language_of(node),
        inline: node.is_inline_code(),
        content: content.to_string(),
    });
    ctx.push(Span::styled(
        format!(" {content} "),
        Style::default()
            .fg(theme.code_fg_color)
            .bg(theme.code_bg_color),
    ));
}

pub(super) fn block(r: &mut Renderer<'_>, node: &Node) {
    let NodeKind::Code { literal } = &node.kind else {
        return;
    };
    let content = content_of(literal);
    // Empty content emits nothing, not an empty frame.
    if content.is_empty() {
        return;
    }

    let language = language_of(node);
    let inline_class = node.is_inline_code();
    r.out.code_blocks.push(CodeBlockMeta {
        language: language.clone(),
        inline: inline_class,
        content: content.to_string(),
    });

    if inline_class || language == PLAINTEXT {
        let style = Style::default()
            .fg(r.theme.code_fg_color)
            .bg(r.theme.code_bg_color);
        for line in content.split('\n') {
            r.out
                .lines
                .push(Line::from(Span::styled(format!(" {line} "), style)));
        }
        return;
    }

    // Header bar with the language tag, then the highlighted body.
    r.out.lines.push(Line::from(Span::styled(
        format!(" {language} "),
        Style::default()
            .fg(r.theme.label_fg_color)
            .bg(r.theme.label_bg_color),
    )));
    for spans in highlight::highlight_lines(content, &language, r.theme) {
        r.out.lines.push(Line::from(spans));
    }
}
