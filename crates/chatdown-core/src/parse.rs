//! Structural parsing using pulldown-cmark
//!
//! Turns normalized text into a `Node` tree with source positions. The
//! parser is best-effort by construction: pulldown-cmark never fails on
//! arbitrary input, raw markup is carried through as literal nodes, and
//! anything unrecognized degrades to text. That matters here because the
//! input is unconstrained model-generated prose.

use std::ops::Range;

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;
use serde_json::json;

use crate::node::{Node, NodeKind, Point, Position};

/// Regex for detecting bare URLs in text
static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s<>\[\]()]+").unwrap());

/// Parse normalized text into a document tree.
///
/// GFM extensions (tables, strikethrough, task lists) and math are enabled.
/// A lone `$` is never treated as inline math: `InlineMath` events are
/// demoted back to literal text, so only `$$...$$` produces math nodes.
pub fn parse(text: &str) -> Node {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH;

    let mut builder = TreeBuilder::new(text);
    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        builder.handle(event, range);
    }
    builder.finish()
}

/// Maps byte offsets to 1-based line/column points.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn point(&self, offset: usize) -> Point {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let column = offset - self.line_starts[line - 1] + 1;
        Point { line, column }
    }

    fn position(&self, range: &Range<usize>) -> Position {
        Position {
            start: self.point(range.start),
            end: self.point(range.end),
        }
    }
}

struct TreeBuilder {
    index: LineIndex,
    /// stack[0] is the document root; containers are pushed on Start and
    /// folded into their parent on End.
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new(text: &str) -> Self {
        Self {
            index: LineIndex::new(text),
            stack: vec![Node::new(NodeKind::Document, None)],
        }
    }

    fn handle(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text, range),
            Event::Code(code) => self.leaf(
                NodeKind::Code {
                    literal: code.to_string(),
                },
                range,
            ),
            // Raw markup is preserved as a literal node, never executed.
            Event::Html(html) | Event::InlineHtml(html) => self.leaf(
                NodeKind::Html {
                    literal: html.to_string(),
                },
                range,
            ),
            // Single-dollar math is disabled: restore the span as plain text.
            Event::InlineMath(math) => self.leaf(
                NodeKind::Text {
                    literal: format!("${math}$"),
                },
                range,
            ),
            Event::DisplayMath(math) => self.leaf(
                NodeKind::Math {
                    literal: math.to_string(),
                },
                range,
            ),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, range),
            Event::HardBreak => self.leaf(NodeKind::HardBreak, range),
            Event::Rule => self.leaf(NodeKind::Rule, range),
            Event::TaskListMarker(checked) => {
                if let Some(item) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|n| matches!(n.kind, NodeKind::Item))
                {
                    item.set_prop("checked", json!(checked));
                }
            }
            Event::FootnoteReference(name) => self.leaf(
                NodeKind::Text {
                    literal: format!("[^{name}]"),
                },
                range,
            ),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let position = Some(self.index.position(&range));
        let node = match tag {
            Tag::Paragraph => Node::new(NodeKind::Paragraph, position),
            Tag::Heading { level, .. } => Node::new(
                NodeKind::Heading {
                    level: level as u8,
                },
                position,
            ),
            Tag::BlockQuote(_) => Node::new(NodeKind::BlockQuote, position),
            Tag::CodeBlock(kind) => {
                let mut node = Node::new(
                    NodeKind::Code {
                        literal: String::new(),
                    },
                    position,
                );
                if let CodeBlockKind::Fenced(info) = kind {
                    if !info.is_empty() {
                        // Same class-name convention the web stack uses.
                        node.set_prop("className", json!(format!("language-{info}")));
                    }
                }
                node
            }
            Tag::List(start) => Node::new(
                NodeKind::List {
                    ordered: start.is_some(),
                    start: start.unwrap_or(1),
                },
                position,
            ),
            Tag::Item => Node::new(NodeKind::Item, position),
            Tag::Table(_) => Node::new(NodeKind::Table, position),
            Tag::TableHead => Node::new(NodeKind::TableHead, position),
            Tag::TableRow => Node::new(NodeKind::TableRow, position),
            Tag::TableCell => Node::new(NodeKind::TableCell, position),
            Tag::Emphasis => Node::new(NodeKind::Emphasis, position),
            Tag::Strong => Node::new(NodeKind::Strong, position),
            Tag::Strikethrough => Node::new(NodeKind::Strikethrough, position),
            Tag::Link { dest_url, .. } => Node::new(
                NodeKind::Link {
                    url: dest_url.to_string(),
                },
                position,
            ),
            Tag::Image { dest_url, .. } => Node::new(
                NodeKind::Image {
                    url: dest_url.to_string(),
                },
                position,
            ),
            // HTML blocks and anything future act as plain containers; their
            // contents still render through the default path.
            _ => Node::new(NodeKind::Paragraph, position),
        };
        self.stack.push(node);
    }

    fn end(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        if matches!(node.kind, NodeKind::Table) {
            restructure_table(&mut node);
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        // Inside a code block, text events are the block's content.
        if let Some(top) = self.stack.last_mut() {
            if let NodeKind::Code { literal } = &mut top.kind {
                literal.push_str(text);
                return;
            }
        }

        let position = Some(self.index.position(&range));
        let mut pieces = autolink(text);
        if pieces.len() == 1 {
            // Unsplit text keeps its source position.
            pieces[0].position = position;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.children.extend(pieces);
        }
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        let position = Some(self.index.position(&range));
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::new(kind, position));
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.end();
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document, None))
    }
}

/// Convert text containing bare URLs into a mix of text and link nodes.
///
/// Split-out pieces are synthesized (no source position).
fn autolink(text: &str) -> Vec<Node> {
    let mut result = Vec::new();
    let mut last_end = 0;

    for mat in URL_REGEX.find_iter(text) {
        if mat.start() > last_end {
            result.push(Node::synthesized(NodeKind::Text {
                literal: text[last_end..mat.start()].to_string(),
            }));
        }

        let url = mat.as_str().to_string();
        let mut link = Node::synthesized(NodeKind::Link { url: url.clone() });
        link.children.push(Node::synthesized(NodeKind::Text {
            literal: url,
        }));
        result.push(link);

        last_end = mat.end();
    }

    if last_end < text.len() {
        result.push(Node::synthesized(NodeKind::Text {
            literal: text[last_end..].to_string(),
        }));
    }

    if result.is_empty() {
        result.push(Node::synthesized(NodeKind::Text {
            literal: text.to_string(),
        }));
    }

    result
}

/// Normalize a table's children to the section model the renderer and the
/// extraction walk expect: head/body sections containing rows containing
/// cells. pulldown-cmark puts header cells directly under `TableHead` and
/// body rows directly under `Table`; the head row and the body section are
/// synthesized wrappers.
fn restructure_table(table: &mut Node) {
    let children = std::mem::take(&mut table.children);
    let mut body = Node::synthesized(NodeKind::TableBody);

    for child in children {
        match child.kind {
            NodeKind::TableHead => {
                let mut head = Node::new(NodeKind::TableHead, child.position);
                let mut row = Node::synthesized(NodeKind::TableRow);
                row.children = child.children;
                head.children.push(row);
                table.children.push(head);
            }
            NodeKind::TableRow => body.children.push(child),
            _ => {}
        }
    }

    if !body.children.is_empty() {
        table.children.push(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(node: &'a Node, pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
        if pred(node) {
            return Some(node);
        }
        node.children.iter().find_map(|c| find(c, pred))
    }

    #[test]
    fn paragraph_with_text() {
        let tree = parse("hello world");
        assert!(matches!(tree.kind, NodeKind::Document));
        assert!(matches!(tree.children[0].kind, NodeKind::Paragraph));
        let text = &tree.children[0].children[0];
        assert_eq!(
            text.kind,
            NodeKind::Text {
                literal: "hello world".into()
            }
        );
        assert!(text.position.is_some());
    }

    #[test]
    fn inline_code_spans_one_line() {
        let tree = parse("use `x=1` here");
        let code = find(&tree, &|n| matches!(n.kind, NodeKind::Code { .. })).unwrap();
        let pos = code.position.unwrap();
        assert_eq!(pos.start.line, pos.end.line);
    }

    #[test]
    fn fenced_code_records_class_name() {
        let tree = parse("```python\nprint(1)\n```\n");
        let code = find(&tree, &|n| matches!(n.kind, NodeKind::Code { .. })).unwrap();
        assert_eq!(code.class_name(), Some("language-python"));
        let NodeKind::Code { literal } = &code.kind else {
            unreachable!()
        };
        assert_eq!(literal, "print(1)\n");
        let pos = code.position.unwrap();
        assert_ne!(pos.start.line, pos.end.line);
    }

    #[test]
    fn bare_fence_has_no_class_name() {
        let tree = parse("```\nfoo\n```\n");
        let code = find(&tree, &|n| matches!(n.kind, NodeKind::Code { .. })).unwrap();
        assert_eq!(code.class_name(), None);
    }

    #[test]
    fn display_math_becomes_math_node() {
        let tree = parse("$$E=mc^2$$");
        let math = find(&tree, &|n| matches!(n.kind, NodeKind::Math { .. })).unwrap();
        assert_eq!(
            math.kind,
            NodeKind::Math {
                literal: "E=mc^2".into()
            }
        );
    }

    #[test]
    fn single_dollar_is_not_math() {
        let tree = parse("that costs $5 and $10 total");
        assert!(find(&tree, &|n| matches!(n.kind, NodeKind::Math { .. })).is_none());
    }

    #[test]
    fn raw_markup_is_preserved() {
        let tree = parse("a <b>bold</b> c");
        let html = find(&tree, &|n| {
            matches!(&n.kind, NodeKind::Html { literal } if literal == "<b>")
        });
        assert!(html.is_some());
    }

    #[test]
    fn table_is_restructured_into_sections() {
        let tree = parse("| A | B |\n| --- | --- |\n| 1 | 2 |\n");
        let table = find(&tree, &|n| matches!(n.kind, NodeKind::Table)).unwrap();
        assert!(matches!(table.children[0].kind, NodeKind::TableHead));
        assert!(matches!(table.children[1].kind, NodeKind::TableBody));

        let head_row = &table.children[0].children[0];
        assert!(matches!(head_row.kind, NodeKind::TableRow));
        assert_eq!(head_row.children.len(), 2);
        // Synthesized wrapper carries no position
        assert!(head_row.position.is_none());

        let body_row = &table.children[1].children[0];
        assert!(matches!(body_row.kind, NodeKind::TableRow));
        assert_eq!(body_row.children.len(), 2);
    }

    #[test]
    fn bare_urls_become_links() {
        let tree = parse("see https://example.com now");
        let link = find(&tree, &|n| {
            matches!(&n.kind, NodeKind::Link { url } if url == "https://example.com")
        })
        .unwrap();
        // Autolinked pieces are synthesized
        assert!(link.position.is_none());
    }

    #[test]
    fn task_list_marker_sets_checked() {
        let tree = parse("- [x] done\n- [ ] todo\n");
        let items: Vec<&Node> = {
            let list = find(&tree, &|n| matches!(n.kind, NodeKind::List { .. })).unwrap();
            list.children.iter().collect()
        };
        assert_eq!(items[0].props.get("checked"), Some(&json!(true)));
        assert_eq!(items[1].props.get("checked"), Some(&json!(false)));
    }

    #[test]
    fn malformed_input_degrades_to_text() {
        // Unterminated fence, broken table, stray brackets: still a tree.
        let tree = parse("| no\n| table\n```rust\nunterminated");
        assert!(!tree.children.is_empty());
    }

    #[test]
    fn arbitrary_garbage_never_panics() {
        for text in [
            "\u{0}\u{1}\u{2}",
            "]]]][[[[(((($$$$",
            "|||---|||\n\n\n```",
            "<div><<<>>></div>",
            "\\(\\)\\[\\]$$$$$",
        ] {
            let _ = parse(text);
        }
    }
}
