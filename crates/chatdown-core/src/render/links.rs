//! Link rendering with position tracking
//!
//! Links render underlined in the link color and are recorded as `LinkSpan`s
//! so the embedding surface can attach navigation after the fact (OSC 8
//! hyperlinks in a terminal). The renderer itself never opens anything.

use ratatui::style::{Modifier, Style};

use crate::node::Node;
use crate::theme::Theme;

use super::inline::{self, InlineCtx};

/// The extent of one hyperlink in rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub url: String,
    /// Line index in rendered output, 0-based
    pub line: usize,
    /// Start column in display-width units, 0-based
    pub start_col: usize,
    /// End column, exclusive
    pub end_col: usize,
}

pub(super) fn inline(node: &Node, url: &str, base_style: Style, theme: &Theme, ctx: &mut InlineCtx) {
    let start_col = ctx.col;
    let style = base_style
        .fg(theme.link_color)
        .add_modifier(Modifier::UNDERLINED);
    for child in &node.children {
        inline::walk(child, style, theme, ctx);
    }
    // Only links that produced visible text get an extent
    if ctx.col > start_col {
        ctx.links.push(LinkSpan {
            url: url.to_string(),
            line: ctx.line,
            start_col,
            end_col: ctx.col,
        });
    }
}
