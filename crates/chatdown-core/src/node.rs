//! Syntax tree types
//!
//! The structural parser produces one `Node` tree per message. Nodes carry a
//! closed kind tag, an optional source position, and an open-ended properties
//! map used by later pipeline passes (the annotator stores the inline/block
//! classification there).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A 1-based line/column pair into the normalized source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

/// Source extent of a node. `end` is exclusive (the point just past the
/// node's last byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

/// Extensible per-node metadata: string key to JSON value.
pub type Properties = BTreeMap<String, Value>;

/// Closed set of node kinds produced by the parser.
///
/// Rendering dispatches on this tag; adding a kind means updating the one
/// dispatch match in `render`, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    Text { literal: String },
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String },
    Image { url: String },
    /// Inline or fenced code. The inline/block classification is NOT stored
    /// here; the annotator derives it from the source position and parks it
    /// in `properties["inline"]`.
    Code { literal: String },
    /// Display math (`$$...$$`). Single-dollar spans never produce this kind.
    Math { literal: String },
    /// Raw markup carried through verbatim, never executed.
    Html { literal: String },
    List { ordered: bool, start: u64 },
    Item,
    BlockQuote,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    SoftBreak,
    HardBreak,
    Rule,
}

/// One element of the parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(rename = "properties", skip_serializing_if = "BTreeMap::is_empty")]
    pub props: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Option<Position>) -> Self {
        Self {
            kind,
            position,
            props: Properties::new(),
            children: Vec::new(),
        }
    }

    /// A node created by a pipeline pass rather than read from source text.
    pub fn synthesized(kind: NodeKind) -> Self {
        Self::new(kind, None)
    }

    pub fn set_prop(&mut self, key: &str, value: Value) {
        self.props.insert(key.to_string(), value);
    }

    /// The inline/block classification computed by the annotator.
    /// Absent (pre-annotation) reads as block.
    pub fn is_inline_code(&self) -> bool {
        self.props
            .get("inline")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The `language-<tag>` class annotation recorded for fenced code.
    pub fn class_name(&self) -> Option<&str> {
        self.props.get("className").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_flag_defaults_to_block() {
        let node = Node::synthesized(NodeKind::Code {
            literal: "x".into(),
        });
        assert!(!node.is_inline_code());
    }

    #[test]
    fn inline_flag_reads_property() {
        let mut node = Node::synthesized(NodeKind::Code {
            literal: "x".into(),
        });
        node.set_prop("inline", json!(true));
        assert!(node.is_inline_code());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let node = Node::synthesized(NodeKind::Paragraph);
        let v = serde_json::to_value(&node).unwrap();
        assert_eq!(v, json!({ "kind": "paragraph" }));
    }
}
