//! Table rendering and text extraction
//!
//! Tables render as a bordered grid under a fixed " Table " label, mirroring
//! the labeled container the web surface draws. Every rendered table also
//! pushes its flattened tab-separated text into `Rendered::tables` so a copy
//! affordance can grab it without re-walking the tree.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::node::{Node, NodeKind};
use crate::theme::Theme;

use super::{inline, spans_width, CodeBlockMeta, LinkSpan, Renderer};

struct Cell {
    spans: Vec<Span<'static>>,
    width: usize,
    links: Vec<LinkSpan>,
    code_meta: Vec<CodeBlockMeta>,
}

pub(super) fn block(r: &mut Renderer<'_>, node: &Node) {
    r.out.tables.push(extract_text(node));

    let mut rows: Vec<(bool, Vec<Cell>)> = Vec::new();
    for section in &node.children {
        if !matches!(section.kind, NodeKind::TableHead | NodeKind::TableBody) {
            continue;
        }
        let is_head = matches!(section.kind, NodeKind::TableHead);
        for row in &section.children {
            if !matches!(row.kind, NodeKind::TableRow) {
                continue;
            }
            let cells = row
                .children
                .iter()
                .map(|c| cell(c, r.theme, is_head))
                .collect();
            rows.push((is_head, cells));
        }
    }
    if rows.is_empty() {
        return;
    }

    let ncols = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    let mut widths = vec![1usize; ncols];
    for (_, cells) in &rows {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.width);
        }
    }

    let border = Style::default().fg(r.theme.border_color);
    let label = Style::default()
        .fg(r.theme.label_fg_color)
        .bg(r.theme.label_bg_color);

    r.out.lines.push(Line::from(Span::styled(" Table ", label)));
    r.out.lines.push(rule_line('┌', '┬', '┐', &widths, border));

    let mut head_done = false;
    for (is_head, cells) in rows {
        let line_idx = r.out.lines.len();
        let mut spans = vec![Span::styled("│ ".to_string(), border)];
        let mut col = 2;

        let mut iter = cells.into_iter();
        for (i, width) in widths.iter().enumerate() {
            let cell = iter.next().unwrap_or_else(|| Cell {
                spans: Vec::new(),
                width: 0,
                links: Vec::new(),
                code_meta: Vec::new(),
            });
            for mut link in cell.links {
                link.line = line_idx;
                link.start_col += col;
                link.end_col += col;
                r.out.links.push(link);
            }
            r.out.code_blocks.extend(cell.code_meta);
            let cell_width = cell.width;
            spans.extend(cell.spans);
            if *width > cell_width {
                spans.push(Span::raw(" ".repeat(width - cell_width)));
            }
            let sep = if i + 1 < ncols { " │ " } else { " │" };
            spans.push(Span::styled(sep.to_string(), border));
            col += width + 3;
        }
        r.out.lines.push(Line::from(spans));

        if is_head && !head_done {
            r.out.lines.push(rule_line('├', '┼', '┤', &widths, border));
            head_done = true;
        }
    }
    r.out.lines.push(rule_line('└', '┴', '┘', &widths, border));
}

fn cell(node: &Node, theme: &Theme, is_head: bool) -> Cell {
    let mut style = Style::default().fg(theme.text_color);
    if is_head {
        style = style.add_modifier(Modifier::BOLD);
    }
    let out = inline::render_lines(&node.children, theme, style);
    let mut lines = out.lines.into_iter();
    let spans = lines.next().unwrap_or_default();
    let width = spans_width(&spans);
    // Grid cells are single-line; keep only first-line links
    let links = out.links.into_iter().filter(|l| l.line == 0).collect();
    Cell {
        spans,
        width,
        links,
        code_meta: out.code_meta,
    }
}

fn rule_line(left: char, mid: char, right: char, widths: &[usize], style: Style) -> Line<'static> {
    let mut s = String::new();
    s.push(left);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            s.push(mid);
        }
        s.push_str(&"─".repeat(w + 2));
    }
    s.push(right);
    Line::from(Span::styled(s, style))
}

/// Flattened tab/newline text of a table, for copy actions.
///
/// Cell text trims each literal and joins nested pieces with single spaces;
/// raw markup contributes nothing. Cells join with a tab, rows with a
/// newline; empty cells and fully empty rows are dropped.
pub fn extract_text(table: &Node) -> String {
    let mut rows = Vec::new();
    for section in &table.children {
        for row in &section.children {
            let cells: Vec<String> = row
                .children
                .iter()
                .map(node_text)
                .filter(|t| !t.is_empty())
                .collect();
            let joined = cells.join("\t");
            if !joined.is_empty() {
                rows.push(joined);
            }
        }
    }
    rows.join("\n")
}

fn node_text(node: &Node) -> String {
    match &node.kind {
        NodeKind::Text { literal }
        | NodeKind::Code { literal }
        | NodeKind::Math { literal } => literal.trim().to_string(),
        NodeKind::Html { .. } => String::new(),
        _ => node
            .children
            .iter()
            .map(node_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}
