//! Fact structures extracted from a parsed Go file.

use std::fmt;
use std::sync::Arc;

use super::describe::describe_statement;
use super::parsed::ParsedFile;
use super::render::block_statements;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A local variable assignment discovered inside a function body.
///
/// The same name may appear several times when it is reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    /// Identifier on the left-hand side.
    pub name: String,
    /// Source text of the matching right-hand expression, or `"unknown"`.
    pub descriptor: String,
}

impl VariableRecord {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// A single parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name; `None` for unnamed parameters such as `func(int)`.
    pub name: Option<String>,
    /// Literal type text. Variadic parameters keep their `...` prefix.
    pub type_text: String,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", name, self.type_text),
            None => f.write_str(&self.type_text),
        }
    }
}

/// Parameter and result types of a function, as written in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub results: Vec<String>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "Parameters: {}", params.join(", "))?;
        if !self.results.is_empty() {
            write!(f, " | Returns: {}", self.results.join(", "))?;
        }
        Ok(())
    }
}

/// Handle to a function body inside its retained syntax tree.
///
/// The parsed file is shared by every record from the same file, so the
/// body node stays reachable for as long as any record lives.
#[derive(Clone)]
pub struct FunctionBody {
    file: Arc<ParsedFile>,
    span: Span,
}

impl FunctionBody {
    pub(crate) fn new(file: Arc<ParsedFile>, node: tree_sitter::Node) -> Self {
        Self {
            file,
            span: Span::from_node(node),
        }
    }

    /// Raw source text of the body block.
    pub fn text(&self) -> &str {
        let bytes = &self.file.source[self.span.start_byte..self.span.end_byte];
        std::str::from_utf8(bytes).unwrap_or("")
    }

    /// Re-locate the `block` node in the retained tree.
    pub fn node(&self) -> Option<tree_sitter::Node<'_>> {
        let root = self.file.tree.root_node();
        let mut node = root.descendant_for_byte_range(self.span.start_byte, self.span.end_byte)?;
        loop {
            if node.kind() == "block"
                && node.start_byte() == self.span.start_byte
                && node.end_byte() == self.span.end_byte
            {
                return Some(node);
            }
            node = node.parent()?;
        }
    }

    /// Top-level statements of the body, in source order.
    pub fn statements(&self) -> Vec<tree_sitter::Node<'_>> {
        self.node().map(block_statements).unwrap_or_default()
    }

    /// One-line summaries of the top-level statements.
    pub fn describe_statements(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .map(|stmt| describe_statement(Some(stmt), &self.file.source))
            .collect()
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionBody")
            .field("path", &self.file.path)
            .field("span", &self.span)
            .finish()
    }
}

/// Metadata for one function or method declaration.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    /// Function name.
    pub name: String,
    /// Text of the leading doc comment group, empty when absent.
    pub doc: String,
    /// Rendered receiver list (e.g. `t *T`), empty for plain functions.
    pub receiver: String,
    /// Bare receiver type name (e.g. `T` for `(t *T)`).
    pub receiver_type: Option<String>,
    pub signature: Signature,
    /// Assignments in depth-first discovery order.
    pub variables: Vec<VariableRecord>,
    /// Positions of `_` assignments that swallow an unmatched result.
    pub discarded: Vec<Span>,
    /// Span of the whole declaration.
    pub span: Span,
    /// `None` for body-less declarations (assembly-backed functions).
    pub body: Option<FunctionBody>,
}

impl FunctionRecord {
    pub fn is_method(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// `Recv.Name` for methods, the plain name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.receiver_type {
            Some(recv) => format!("{}.{}", recv, self.name),
            None => self.name.clone(),
        }
    }

    /// Variable names in discovery order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span {
            start_byte: 0,
            end_byte: 10,
            start_line: 1,
            start_col: 1,
            end_line: 1,
            end_col: 11,
        }
    }

    fn record(name: &str, receiver: &str, receiver_type: Option<&str>) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            doc: String::new(),
            receiver: receiver.to_string(),
            receiver_type: receiver_type.map(str::to_string),
            signature: Signature::default(),
            variables: Vec::new(),
            discarded: Vec::new(),
            span: span(),
            body: None,
        }
    }

    #[test]
    fn test_qualified_name() {
        let func = record("main", "", None);
        assert!(!func.is_method());
        assert_eq!(func.qualified_name(), "main");

        let method = record("Validate", "c *Config", Some("Config"));
        assert!(method.is_method());
        assert_eq!(method.qualified_name(), "Config.Validate");
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature {
            parameters: vec![
                Parameter {
                    name: Some("ctx".to_string()),
                    type_text: "context.Context".to_string(),
                },
                Parameter {
                    name: None,
                    type_text: "...string".to_string(),
                },
            ],
            results: vec!["int".to_string(), "error".to_string()],
        };
        assert_eq!(
            sig.to_string(),
            "Parameters: ctx context.Context, ...string | Returns: int, error"
        );

        assert_eq!(Signature::default().to_string(), "Parameters: ");
    }

    #[test]
    fn test_span_display() {
        assert_eq!(span().to_string(), "1:1");
    }
}
