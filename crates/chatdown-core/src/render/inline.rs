//! Inline content rendering
//!
//! Walks inline nodes into styled spans, tracking the current line and
//! display column so link extents and nested prefixes stay accurate.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::node::{Node, NodeKind};
use crate::theme::Theme;

use super::{code, links, CodeBlockMeta, LinkSpan};

pub(super) struct InlineOut {
    pub lines: Vec<Vec<Span<'static>>>,
    pub links: Vec<LinkSpan>,
    pub code_meta: Vec<CodeBlockMeta>,
}

pub(super) struct InlineCtx {
    spans: Vec<Span<'static>>,
    lines: Vec<Vec<Span<'static>>>,
    pub(super) line: usize,
    pub(super) col: usize,
    pub(super) links: Vec<LinkSpan>,
    pub(super) code_meta: Vec<CodeBlockMeta>,
}

impl InlineCtx {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            lines: Vec::new(),
            line: 0,
            col: 0,
            links: Vec::new(),
            code_meta: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, span: Span<'static>) {
        if span.content.is_empty() {
            return;
        }
        self.col += span.content.as_ref().width();
        self.spans.push(span);
    }

    pub(super) fn newline(&mut self) {
        self.lines.push(std::mem::take(&mut self.spans));
        self.line += 1;
        self.col = 0;
    }

    fn finish(mut self) -> InlineOut {
        if !self.spans.is_empty() {
            self.lines.push(std::mem::take(&mut self.spans));
        }
        InlineOut {
            lines: self.lines,
            links: self.links,
            code_meta: self.code_meta,
        }
    }
}

pub(super) fn render_lines(content: &[Node], theme: &Theme, base_style: Style) -> InlineOut {
    let mut ctx = InlineCtx::new();
    for node in content {
        walk(node, base_style, theme, &mut ctx);
    }
    ctx.finish()
}

pub(super) fn walk(node: &Node, style: Style, theme: &Theme, ctx: &mut InlineCtx) {
    match &node.kind {
        NodeKind::Text { literal } => push_text(literal, style, ctx),
        NodeKind::Emphasis => recurse(node, style.add_modifier(Modifier::ITALIC), theme, ctx),
        NodeKind::Strong => recurse(node, style.add_modifier(Modifier::BOLD), theme, ctx),
        NodeKind::Strikethrough => {
            recurse(node, style.add_modifier(Modifier::CROSSED_OUT), theme, ctx)
        }
        NodeKind::Code { .. } => code::inline(node, theme, ctx),
        NodeKind::Link { url } => links::inline(node, url, style, theme, ctx),
        NodeKind::Image { url } => {
            // Alt text plus the source, dimmed; terminals don't show pixels.
            recurse(node, style, theme, ctx);
            ctx.push(Span::styled(
                format!(" ({url})"),
                Style::default().fg(theme.dim_color),
            ));
        }
        NodeKind::Math { literal } => {
            let math = Style::default()
                .fg(theme.math_color)
                .add_modifier(Modifier::ITALIC);
            push_text(literal.trim(), math, ctx);
        }
        // Raw markup flows through as literal text, never executed.
        NodeKind::Html { literal } => push_text(literal.trim_end_matches('\n'), style, ctx),
        NodeKind::SoftBreak => ctx.push(Span::styled(" ".to_string(), style)),
        NodeKind::HardBreak => ctx.newline(),
        // Block kinds at inline position: keep their content in the flow.
        _ => recurse(node, style, theme, ctx),
    }
}

fn recurse(node: &Node, style: Style, theme: &Theme, ctx: &mut InlineCtx) {
    for child in &node.children {
        walk(child, style, theme, ctx);
    }
}

/// Literals may span source lines (raw markup blocks do); split on newlines
/// so a span never contains a line terminator.
fn push_text(text: &str, style: Style, ctx: &mut InlineCtx) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            ctx.newline();
        }
        if !part.is_empty() {
            ctx.push(Span::styled(part.to_string(), style));
        }
    }
}
