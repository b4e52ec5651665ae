//! Inline/block classification for code nodes
//!
//! A single mutation pass, run strictly between parse and render. A code
//! node is inline iff its source span starts and ends on the same line;
//! nodes without a position (synthesized) count as block. Renderers read the
//! resulting flag and never re-derive it from raw text.

use serde_json::json;

use crate::node::{Node, NodeKind};

/// Decorate every code node in the tree with `properties["inline"]`.
pub fn annotate(root: &mut Node) {
    if matches!(root.kind, NodeKind::Code { .. }) {
        let inline = root
            .position
            .is_some_and(|p| p.start.line == p.end.line);
        root.set_prop("inline", json!(inline));
    }
    for child in &mut root.children {
        annotate(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn find<'a>(node: &'a Node, pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
        if pred(node) {
            return Some(node);
        }
        node.children.iter().find_map(|c| find(c, pred))
    }

    #[test]
    fn single_line_span_is_inline() {
        let mut tree = parse::parse("use `x=1` here");
        annotate(&mut tree);
        let code = find(&tree, &|n| matches!(n.kind, NodeKind::Code { .. })).unwrap();
        assert!(code.is_inline_code());
    }

    #[test]
    fn multi_line_span_is_block() {
        let mut tree = parse::parse("```go\nfmt.Println(1)\n```\n");
        annotate(&mut tree);
        let code = find(&tree, &|n| matches!(n.kind, NodeKind::Code { .. })).unwrap();
        assert!(!code.is_inline_code());
    }

    #[test]
    fn missing_position_defaults_to_block() {
        let mut node = Node::synthesized(NodeKind::Code {
            literal: "x".into(),
        });
        annotate(&mut node);
        assert_eq!(node.props.get("inline"), Some(&json!(false)));
    }
}
