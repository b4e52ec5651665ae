//! Message markdown pipeline
//!
//! Turns raw assistant-message markdown into terminal-ready styled lines in
//! four fixed stages: normalize bracket math delimiters, parse into a
//! position-annotated tree, classify code nodes as inline or block, then
//! render with specialized treatment for code, tables and links.
//!
//! ```
//! use chatdown_core::{render_message, Theme};
//!
//! let out = render_message("see `x` in **bold**", &Theme::dark());
//! assert_eq!(out.lines.len(), 1);
//! ```

pub mod annotate;
pub mod highlight;
pub mod node;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod theme;

pub use node::{Node, NodeKind, Point, Position};
pub use render::{extract_text, language_of, CodeBlockMeta, LinkSpan, Rendered};
pub use theme::Theme;

/// Normalize, parse and annotate one message into its tree form.
pub fn message_tree(text: &str) -> Node {
    let normalized = normalize::normalize(text);
    let mut tree = parse::parse(&normalized);
    annotate::annotate(&mut tree);
    tree
}

/// Run the full pipeline on one message.
pub fn render_message(text: &str, theme: &Theme) -> Rendered {
    if text.is_empty() {
        return Rendered::default();
    }
    tracing::trace!(len = text.len(), "rendering message");
    let tree = message_tree(text);
    let out = render::render_tree(&tree, theme);
    tracing::debug!(
        lines = out.lines.len(),
        links = out.links.len(),
        code_blocks = out.code_blocks.len(),
        tables = out.tables.len(),
        "message rendered"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_renders_empty() {
        let out = render_message("", &Theme::dark());
        assert!(out.lines.is_empty());
        assert!(out.links.is_empty());
        assert!(out.code_blocks.is_empty());
        assert!(out.tables.is_empty());
    }

    #[test]
    fn bracket_math_flows_through_the_pipeline() {
        let tree = message_tree(r"\[x^2\]");
        fn find_math(node: &Node) -> bool {
            matches!(node.kind, NodeKind::Math { .. })
                || node.children.iter().any(find_math)
        }
        assert!(find_math(&tree));
    }
}
