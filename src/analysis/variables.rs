//! Local variable extraction from function bodies.

use tree_sitter::Node;

use super::facts::{Span, VariableRecord};
use super::render::{expression_items, render};

/// Descriptor used when a left-hand identifier has no matching right side.
pub const UNKNOWN: &str = "unknown";

/// Name of the blank identifier.
const BLANK: &str = "_";

/// Output of [`extract_variables`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// One record per identifier target, in pre-order discovery order.
    pub variables: Vec<VariableRecord>,
    /// `_` targets with no matching right-hand expression, i.e. a dropped
    /// result of a multi-value call such as `v, _ := load()`.
    pub discarded: Vec<Span>,
}

/// Pending work for the extraction walk.
enum Step<'tree> {
    Visit(Node<'tree>),
    /// Record the alias of a `switch v := x.(type)` once everything before
    /// it (the initializer) has been visited.
    Guard(Node<'tree>),
}

/// Collect every identifier assigned anywhere in `body`.
///
/// The traversal is a full pre-order walk, so assignments nested in
/// branches, loops, `select` cases and function literals are included.
/// Field, index, dereference and parenthesized targets are skipped.
/// Work is kept on an explicit stack, so tree depth is not bounded by the
/// call stack.
pub fn extract_variables(body: Option<Node>, source: &[u8]) -> Extraction {
    let mut out = Extraction::default();
    let mut stack: Vec<Step> = body.map(Step::Visit).into_iter().collect();

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Guard(switch) => {
                record_guard(switch, source, &mut out);
                continue;
            }
            Step::Visit(node) => node,
        };

        match node.kind() {
            "assignment_statement" | "short_var_declaration" | "receive_statement" => {
                let left = expression_items(node.child_by_field_name("left"));
                let right: Vec<String> = expression_items(node.child_by_field_name("right"))
                    .into_iter()
                    .map(|rhs| render(Some(rhs), source))
                    .collect();
                record_targets(&left, &right, source, &mut out);
                push_children(node, None, &mut stack);
            }
            "type_switch_statement" => {
                // The initializer runs before the guard binds its alias.
                let init = node.child_by_field_name("initializer");
                push_children(node, init, &mut stack);
                stack.push(Step::Guard(node));
                if let Some(init) = init {
                    stack.push(Step::Visit(init));
                }
            }
            _ => push_children(node, None, &mut stack),
        }
    }
    out
}

/// Queue the children of `node` so they pop in source order.
fn push_children<'tree>(
    node: Node<'tree>,
    skip: Option<Node<'tree>>,
    stack: &mut Vec<Step<'tree>>,
) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    stack.extend(
        children
            .into_iter()
            .rev()
            .filter(|child| Some(*child) != skip)
            .map(Step::Visit),
    );
}

fn record_guard(switch: Node, source: &[u8], out: &mut Extraction) {
    let Some(alias) = switch.child_by_field_name("alias") else {
        return;
    };
    let value = switch.child_by_field_name("value");
    let right = vec![format!("{}.(type)", render(value, source))];
    record_targets(&expression_items(Some(alias)), &right, source, out);
}

fn record_targets(left: &[Node], right: &[String], source: &[u8], out: &mut Extraction) {
    for (i, target) in left.iter().enumerate() {
        if !matches!(target.kind(), "identifier" | "blank_identifier") {
            continue;
        }
        let name = render(Some(*target), source);
        let descriptor = right.get(i).map(String::as_str).unwrap_or(UNKNOWN);

        if name == BLANK && descriptor == UNKNOWN {
            let span = Span::from_node(*target);
            tracing::warn!(position = %span, "potential ignored error");
            out.discarded.push(span);
        }

        out.variables.push(VariableRecord::new(name, descriptor));
    }
}
