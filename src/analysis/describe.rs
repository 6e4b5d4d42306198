//! One-line statement summaries.

use tree_sitter::Node;

use super::render::{expression_items, render, NIL};

/// The statement shapes that get a dedicated summary.
///
/// Classification is the only place that looks at tree-sitter kind strings;
/// [`describe_statement`] matches this enum exhaustively.
#[derive(Debug, Clone)]
pub enum StatementKind<'tree> {
    /// `a, b = x, y`, `a := x`, `a += x`.
    Assignment {
        left: Vec<Node<'tree>>,
        right: Vec<Node<'tree>>,
    },
    /// `var`, `const` or `type` declaration in statement position.
    Declaration(Node<'tree>),
    /// A call or receive used as a statement.
    Expression(Option<Node<'tree>>),
    If {
        condition: Option<Node<'tree>>,
    },
    /// Three-clause, condition-only or infinite `for`. Range loops are `Other`.
    For {
        init: Option<Node<'tree>>,
        condition: Option<Node<'tree>>,
        post: Option<Node<'tree>>,
    },
    Other(Node<'tree>),
}

impl<'tree> StatementKind<'tree> {
    pub fn classify(stmt: Node<'tree>) -> Self {
        match stmt.kind() {
            "assignment_statement" | "short_var_declaration" => StatementKind::Assignment {
                left: expression_items(stmt.child_by_field_name("left")),
                right: expression_items(stmt.child_by_field_name("right")),
            },
            "var_declaration" | "const_declaration" | "type_declaration" => {
                StatementKind::Declaration(stmt)
            }
            "expression_statement" => StatementKind::Expression(stmt.named_child(0)),
            "if_statement" => StatementKind::If {
                condition: stmt.child_by_field_name("condition"),
            },
            "for_statement" => classify_for(stmt),
            _ => StatementKind::Other(stmt),
        }
    }
}

fn classify_for(stmt: Node) -> StatementKind {
    let body = stmt.child_by_field_name("body");
    let mut cursor = stmt.walk();
    let header = stmt
        .named_children(&mut cursor)
        .find(|n| Some(*n) != body && n.kind() != "comment");

    match header {
        None => StatementKind::For {
            init: None,
            condition: None,
            post: None,
        },
        Some(h) if h.kind() == "for_clause" => StatementKind::For {
            init: h.child_by_field_name("initializer"),
            condition: h.child_by_field_name("condition"),
            post: h.child_by_field_name("update"),
        },
        Some(h) if h.kind() == "range_clause" => StatementKind::Other(stmt),
        Some(condition) => StatementKind::For {
            init: None,
            condition: Some(condition),
            post: None,
        },
    }
}

/// Summarize a statement on one line.
///
/// ```text
/// x, y := 1, 2        ->  Assignment: x y = 1 2
/// var n int           ->  Declaration: var n int
/// fmt.Println(n)      ->  Expression: fmt.Println(n)
/// if n > 0 { ... }    ->  If Condition: n > 0
/// for i := 0; ...     ->  For Loop: Init: i := 0; Cond: i < n; Post: i++
/// ```
///
/// Any other statement is rendered verbatim; an absent one as `"<nil>"`.
pub fn describe_statement(stmt: Option<Node>, source: &[u8]) -> String {
    let Some(stmt) = stmt else {
        return NIL.to_string();
    };

    match StatementKind::classify(stmt) {
        StatementKind::Assignment { left, right } => {
            let mut out = String::from("Assignment: ");
            for lhs in left {
                out.push_str(&render(Some(lhs), source));
                out.push(' ');
            }
            out.push_str("= ");
            for rhs in right {
                out.push_str(&render(Some(rhs), source));
                out.push(' ');
            }
            out.trim_end().to_string()
        }
        StatementKind::Declaration(decl) => format!("Declaration: {}", render(Some(decl), source)),
        StatementKind::Expression(expr) => format!("Expression: {}", render(expr, source)),
        StatementKind::If { condition } => format!("If Condition: {}", render(condition, source)),
        StatementKind::For {
            init,
            condition,
            post,
        } => format!(
            "For Loop: Init: {}; Cond: {}; Post: {}",
            render(init, source),
            render(condition, source),
            render(post, source)
        ),
        StatementKind::Other(node) => render(Some(node), source),
    }
}
