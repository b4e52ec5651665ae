//! Renderer dispatch
//!
//! Walks the annotated tree once and maps each node kind to a renderer:
//! code and tables get specialized renderers, links get safe-navigation
//! tracking, everything else goes through the default structural renderer,
//! which recurses preserving tree shape. Unrecognized kinds fall back to the
//! default path rather than failing.

mod code;
mod inline;
mod links;
mod table;

pub use code::language_of;
pub use links::LinkSpan;
pub use table::extract_text;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::node::{Node, NodeKind};
use crate::theme::Theme;

const RULE_WIDTH: usize = 40;

/// Language + classification + content of one rendered code node, exposed
/// for copy and highlighting affordances in the embedding surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockMeta {
    pub language: String,
    pub inline: bool,
    pub content: String,
}

/// The view tree produced for one message, plus node-level metadata the
/// surrounding UI needs: hyperlink extents, code block info, and the
/// extracted tab-separated text of each table (clipboard-ready; actually
/// writing the clipboard is the collaborator's decision).
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<LinkSpan>,
    pub code_blocks: Vec<CodeBlockMeta>,
    pub tables: Vec<String>,
}

/// Render an annotated tree to styled lines.
pub fn render_tree(root: &Node, theme: &Theme) -> Rendered {
    let mut r = Renderer::new(theme);
    r.blocks(&root.children, false);
    r.finish()
}

struct Renderer<'t> {
    theme: &'t Theme,
    out: Rendered,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            out: Rendered::default(),
        }
    }

    fn finish(mut self) -> Rendered {
        while self.out.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.out.lines.pop();
        }
        self.out
    }

    fn base_style(&self) -> Style {
        Style::default().fg(self.theme.text_color)
    }

    /// Walk sibling nodes, grouping consecutive inline nodes into paragraph
    /// runs (tight list items carry bare inline children).
    fn blocks(&mut self, nodes: &[Node], tight: bool) {
        let mut emitted = false;
        let mut i = 0;
        while i < nodes.len() {
            if emitted && !tight {
                self.out.lines.push(Line::default());
            }
            if is_inline_position(&nodes[i]) {
                let start = i;
                while i < nodes.len() && is_inline_position(&nodes[i]) {
                    i += 1;
                }
                let style = self.base_style();
                self.paragraph(&nodes[start..i], style);
            } else {
                self.block(&nodes[i]);
                i += 1;
            }
            emitted = true;
        }
    }

    /// The dispatch table. Each kind maps to exactly one renderer.
    fn block(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Code { .. } => code::block(self, node),
            NodeKind::Table => table::block(self, node),
            _ => self.default_block(node),
        }
    }

    fn default_block(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Document => self.blocks(&node.children, false),
            NodeKind::Paragraph => {
                let style = self.base_style();
                self.paragraph(&node.children, style);
            }
            NodeKind::Heading { level } => {
                let color = if *level <= 2 {
                    self.theme.heading_color
                } else {
                    self.theme.text_color
                };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                self.paragraph(&node.children, style);
            }
            NodeKind::BlockQuote => {
                let bar = Span::styled(
                    "│ ".to_string(),
                    Style::default().fg(self.theme.quote_color),
                );
                self.nested(&node.children, vec![bar.clone()], vec![bar], false);
            }
            NodeKind::List { ordered, start } => self.list(node, *ordered, *start),
            NodeKind::Item => self.blocks(&node.children, true),
            NodeKind::Rule => {
                self.out.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    Style::default().fg(self.theme.dim_color),
                )));
            }
            NodeKind::Math { literal } => {
                let style = Style::default()
                    .fg(self.theme.math_color)
                    .add_modifier(Modifier::ITALIC);
                for line in literal.trim().split('\n') {
                    self.out
                        .lines
                        .push(Line::from(Span::styled(format!("  {line}"), style)));
                }
            }
            NodeKind::Html { literal } => {
                // Raw markup renders as literal text, never executed.
                let style = self.base_style();
                for line in literal.trim_end_matches('\n').split('\n') {
                    self.out
                        .lines
                        .push(Line::from(Span::styled(line.to_string(), style)));
                }
            }
            // Table fragments outside a table, or anything future: recurse
            // preserving shape.
            _ => self.blocks(&node.children, true),
        }
    }

    fn list(&mut self, node: &Node, ordered: bool, start: u64) {
        let mut n = start;
        for item in &node.children {
            if !matches!(item.kind, NodeKind::Item) {
                continue;
            }
            let mut marker = if ordered {
                format!("{n}. ")
            } else {
                "• ".to_string()
            };
            if let Some(checked) = item.props.get("checked").and_then(serde_json::Value::as_bool) {
                marker.push_str(if checked { "[x] " } else { "[ ] " });
            }
            let indent = " ".repeat(marker.width());
            let first = vec![Span::styled(
                marker,
                Style::default().fg(self.theme.list_marker_color),
            )];
            let rest = vec![Span::raw(indent)];
            self.nested(&item.children, first, rest, true);
            n += 1;
        }
    }

    fn paragraph(&mut self, content: &[Node], style: Style) {
        let out = inline::render_lines(content, self.theme, style);
        let base = self.out.lines.len();
        for spans in out.lines {
            self.out.lines.push(Line::from(spans));
        }
        for mut link in out.links {
            link.line += base;
            self.out.links.push(link);
        }
        self.out.code_blocks.extend(out.code_meta);
    }

    /// Render children through a sub-renderer, then reattach with hanging
    /// prefixes, shifting link coordinates accordingly.
    fn nested(
        &mut self,
        nodes: &[Node],
        first_prefix: Vec<Span<'static>>,
        rest_prefix: Vec<Span<'static>>,
        tight: bool,
    ) {
        let mut sub = Renderer::new(self.theme);
        sub.blocks(nodes, tight);
        let rendered = sub.finish();

        let base = self.out.lines.len();
        let first_width = spans_width(&first_prefix);
        let rest_width = spans_width(&rest_prefix);

        if rendered.lines.is_empty() {
            self.out.lines.push(Line::from(first_prefix));
        } else {
            for (i, line) in rendered.lines.into_iter().enumerate() {
                let mut spans = if i == 0 {
                    first_prefix.clone()
                } else {
                    rest_prefix.clone()
                };
                spans.extend(line.spans);
                self.out.lines.push(Line::from(spans));
            }
        }

        for mut link in rendered.links {
            let shift = if link.line == 0 { first_width } else { rest_width };
            link.line += base;
            link.start_col += shift;
            link.end_col += shift;
            self.out.links.push(link);
        }
        self.out.code_blocks.extend(rendered.code_blocks);
        self.out.tables.extend(rendered.tables);
    }
}

/// Whether a node flows within a line of prose, as opposed to standing on
/// its own. For code this is the annotator's classification, nothing else.
fn is_inline_position(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Text { .. }
        | NodeKind::Emphasis
        | NodeKind::Strong
        | NodeKind::Strikethrough
        | NodeKind::Link { .. }
        | NodeKind::Image { .. }
        | NodeKind::Html { .. }
        | NodeKind::Math { .. }
        | NodeKind::SoftBreak
        | NodeKind::HardBreak => true,
        NodeKind::Code { .. } => node.is_inline_code(),
        _ => false,
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.as_ref().width()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate, parse};

    fn render(text: &str) -> Rendered {
        let mut tree = parse::parse(text);
        annotate::annotate(&mut tree);
        render_tree(&tree, &Theme::dark())
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn plain_paragraph() {
        let out = render("hello world");
        assert_eq!(out.lines.len(), 1);
        assert_eq!(line_text(&out.lines[0]), "hello world");
    }

    #[test]
    fn bold_and_italic_styles() {
        let out = render("**bold** and *italic*");
        let has_bold = out.lines.iter().any(|l| {
            l.spans
                .iter()
                .any(|s| s.style.add_modifier.contains(Modifier::BOLD))
        });
        let has_italic = out.lines.iter().any(|l| {
            l.spans
                .iter()
                .any(|s| s.style.add_modifier.contains(Modifier::ITALIC))
        });
        assert!(has_bold);
        assert!(has_italic);
    }

    #[test]
    fn inline_code_has_no_language_header() {
        let out = render("inline `x=1` code");
        assert_eq!(out.lines.len(), 1);
        assert_eq!(line_text(&out.lines[0]), "inline  x=1  code");
        assert_eq!(out.code_blocks.len(), 1);
        assert!(out.code_blocks[0].inline);
        assert_eq!(out.code_blocks[0].language, "plaintext");
    }

    #[test]
    fn block_code_with_language_has_header_bar() {
        let out = render("```go\nfmt.Println(1)\n```\n");
        assert_eq!(line_text(&out.lines[0]), " go ");
        assert_eq!(line_text(&out.lines[1]), "fmt.Println(1)");
        // Trailing newline was stripped: no extra body line
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.code_blocks[0].language, "go");
        assert!(!out.code_blocks[0].inline);
        assert_eq!(out.code_blocks[0].content, "fmt.Println(1)");
    }

    #[test]
    fn block_code_without_language_degrades_to_minimal() {
        let out = render("```\nplain stuff\n```\n");
        assert_eq!(out.lines.len(), 1);
        assert_eq!(line_text(&out.lines[0]), " plain stuff ");
    }

    #[test]
    fn empty_code_block_renders_nothing() {
        let out = render("```go\n```\n");
        assert!(out.lines.is_empty());
        assert!(out.code_blocks.is_empty());
    }

    #[test]
    fn link_is_tracked_with_url() {
        let out = render("see [docs](https://example.com/docs) here");
        assert_eq!(out.links.len(), 1);
        let link = &out.links[0];
        assert_eq!(link.url, "https://example.com/docs");
        assert_eq!(link.line, 0);
        let text = line_text(&out.lines[0]);
        assert_eq!(&text[link.start_col..link.end_col], "docs");
    }

    #[test]
    fn link_in_list_item_shifts_columns() {
        let out = render("- go to https://example.com now");
        assert_eq!(out.links.len(), 1);
        let link = &out.links[0];
        assert_eq!(link.line, 0);
        // "• " marker (2 cols) plus "go to " (6 cols)
        assert_eq!(link.start_col, 8);
        assert_eq!(link.end_col - link.start_col, "https://example.com".len());
    }

    #[test]
    fn table_renders_with_label_and_exposes_extract() {
        let out = render("| A | B |\n| --- | --- |\n| 1 | 2 |\n");
        assert_eq!(out.tables, vec!["A\tB\n1\t2".to_string()]);
        assert_eq!(line_text(&out.lines[0]), " Table ");
        let header = line_text(&out.lines[2]);
        assert!(header.contains('A') && header.contains('B'));
    }

    #[test]
    fn ordered_list_uses_numbers() {
        let out = render("1. first\n2. second\n");
        assert!(line_text(&out.lines[0]).starts_with("1. "));
        assert!(line_text(&out.lines[1]).starts_with("2. "));
    }

    #[test]
    fn task_list_renders_checkboxes() {
        let out = render("- [x] done\n- [ ] todo\n");
        assert!(line_text(&out.lines[0]).starts_with("• [x] "));
        assert!(line_text(&out.lines[1]).starts_with("• [ ] "));
    }

    #[test]
    fn blockquote_gets_bar_prefix() {
        let out = render("> quoted text\n");
        assert!(line_text(&out.lines[0]).starts_with("│ "));
    }

    #[test]
    fn display_math_is_rendered() {
        let out = render("$$E=mc^2$$");
        let all: String = out.lines.iter().map(|l| line_text(l)).collect();
        assert!(all.contains("E=mc^2"));
    }

    #[test]
    fn raw_markup_is_rendered_literally() {
        let out = render("before <b>mid</b> after");
        let text = line_text(&out.lines[0]);
        assert!(text.contains("<b>"));
        assert!(text.contains("</b>"));
    }

    #[test]
    fn hard_break_splits_lines() {
        let out = render("one  \ntwo");
        assert_eq!(out.lines.len(), 2);
        assert_eq!(line_text(&out.lines[0]), "one");
        assert_eq!(line_text(&out.lines[1]), "two");
    }

    #[test]
    fn empty_tree_renders_empty() {
        let out = render("");
        assert!(out.lines.is_empty());
        assert!(out.links.is_empty());
        assert!(out.tables.is_empty());
    }
}
