//! Rendering syntax nodes back to source text.
//!
//! Every function here is total: an absent node renders as [`NIL`] and
//! invalid UTF-8 is replaced rather than dropped.

use tree_sitter::Node;

/// Rendering of an absent node.
pub const NIL: &str = "<nil>";

/// Source text of `node`, or `"<nil>"` when there is no node.
pub fn render(node: Option<Node>, source: &[u8]) -> String {
    match node {
        Some(node) => String::from_utf8_lossy(&source[node.byte_range()]).into_owned(),
        None => NIL.to_string(),
    }
}

/// Render a parameter list (receiver, parameters) without its parentheses.
///
/// `(t *T)` renders as `t *T`, `(a, b int, opts ...Option)` as
/// `a, b int, opts ...Option`. An absent or empty list renders as `""`.
pub fn render_field_list(list: Option<Node>, source: &[u8]) -> String {
    let Some(list) = list else {
        return String::new();
    };
    list_items(list)
        .into_iter()
        .map(|field| render(Some(field), source))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Named children of a list-like node, skipping interleaved comments.
pub fn list_items(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Items of an `expression_list`; a bare expression counts as a list of one.
pub fn expression_items(node: Option<Node>) -> Vec<Node> {
    match node {
        Some(n) if n.kind() == "expression_list" => list_items(n),
        Some(n) => vec![n],
        None => Vec::new(),
    }
}

/// Statements directly inside a `block`.
///
/// Newer grammars wrap block contents in a `statement_list`; both shapes
/// are accepted.
pub fn block_statements(block: Node) -> Vec<Node> {
    let mut cursor = block.walk();
    let list = block
        .named_children(&mut cursor)
        .find(|n| n.kind() == "statement_list");
    let container = list.unwrap_or(block);
    list_items(container)
        .into_iter()
        .filter(|n| n.kind() != "empty_statement")
        .collect()
}
