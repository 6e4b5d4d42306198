//! Per-file function analyzer.
//!
//! Walks a parsed file's syntax tree and builds a [`FunctionRecord`] for
//! every `function_declaration` and `method_declaration`. All other nodes
//! are passed through; traversal always continues into children.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tree_sitter::Node;

use super::facts::{FunctionBody, FunctionRecord, Parameter, Signature, Span};
use super::parsed::ParsedFile;
use super::render::{list_items, render, render_field_list};
use super::variables::extract_variables;

lazy_static! {
    /// Tool directives such as `//go:generate` or `//line foo.go:10`.
    /// These are not documentation.
    static ref DIRECTIVE: Regex =
        Regex::new(r"^(line |extern |export |[a-z0-9]+:[a-z0-9])").unwrap();
}

/// How functions are keyed inside one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodKeying {
    /// Key by bare name. Methods sharing a name on different receivers
    /// overwrite each other; the last declaration in the file wins.
    #[default]
    Name,
    /// Key methods by `Recv.Name` so same-named methods stay distinct.
    Receiver,
}

/// Collects function records for a single file.
pub struct FunctionAnalyzer {
    file: Arc<ParsedFile>,
    keying: MethodKeying,
    functions: HashMap<String, FunctionRecord>,
}

impl FunctionAnalyzer {
    pub fn new(file: Arc<ParsedFile>, keying: MethodKeying) -> Self {
        Self {
            file,
            keying,
            functions: HashMap::new(),
        }
    }

    /// Visit the whole file and return the per-file map.
    pub fn analyze(mut self) -> HashMap<String, FunctionRecord> {
        let file = Arc::clone(&self.file);
        self.visit(file.tree.root_node());
        self.functions
    }

    /// Visit `node` and everything below it in pre-order.
    ///
    /// The walk runs on a [`tree_sitter::TreeCursor`], so arbitrarily deep
    /// trees (long generated expression chains) do not grow the call stack.
    pub fn visit(&mut self, node: Node) {
        let mut cursor = node.walk();
        loop {
            let current = cursor.node();
            if matches!(current.kind(), "function_declaration" | "method_declaration") {
                self.insert(current);
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    fn insert(&mut self, decl: Node) {
        let record = self.build_record(decl);
        let key = match self.keying {
            MethodKeying::Name => record.name.clone(),
            MethodKeying::Receiver => record.qualified_name(),
        };
        if self.functions.contains_key(&key) {
            tracing::debug!(
                path = %self.file.path.display(),
                function = %key,
                "duplicate function name in file, keeping the later declaration"
            );
        }
        self.functions.insert(key, record);
    }

    fn build_record(&self, decl: Node) -> FunctionRecord {
        let source = &self.file.source[..];
        let receiver_list = decl.child_by_field_name("receiver");
        let body = decl.child_by_field_name("body");
        let extraction = extract_variables(body, source);

        FunctionRecord {
            name: decl
                .child_by_field_name("name")
                .map(|n| render(Some(n), source))
                .unwrap_or_default(),
            doc: doc_comment(decl, source),
            receiver: render_field_list(receiver_list, source),
            receiver_type: receiver_list.and_then(|list| receiver_type_name(list, source)),
            signature: signature(decl, source),
            variables: extraction.variables,
            discarded: extraction.discarded,
            span: Span::from_node(decl),
            body: body.map(|b| FunctionBody::new(Arc::clone(&self.file), b)),
        }
    }
}

/// Bare type name of a receiver: `T` for `(t *T)`, `(T)`, or `(l *List[E])`.
fn receiver_type_name(list: Node, source: &[u8]) -> Option<String> {
    let param = list_items(list).into_iter().next()?;
    let mut ty = param.child_by_field_name("type")?;
    loop {
        ty = match ty.kind() {
            "pointer_type" | "parenthesized_type" => ty.named_child(0)?,
            "generic_type" => ty.child_by_field_name("type")?,
            _ => break,
        };
    }
    Some(render(Some(ty), source))
}

/// Parameters and results of a declaration, expanded one entry per name.
fn signature(decl: Node, source: &[u8]) -> Signature {
    let parameters = decl
        .child_by_field_name("parameters")
        .map(|list| parameter_list(list, source))
        .unwrap_or_default();

    let results = match decl.child_by_field_name("result") {
        Some(list) if list.kind() == "parameter_list" => parameter_list(list, source)
            .into_iter()
            .map(|p| p.type_text)
            .collect(),
        Some(ty) => vec![render(Some(ty), source)],
        None => Vec::new(),
    };

    Signature {
        parameters,
        results,
    }
}

fn parameter_list(list: Node, source: &[u8]) -> Vec<Parameter> {
    let mut params = Vec::new();
    for decl in list_items(list) {
        let type_text = render(decl.child_by_field_name("type"), source);
        let type_text = if decl.kind() == "variadic_parameter_declaration" {
            format!("...{}", type_text)
        } else {
            type_text
        };

        let mut cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut cursor)
            .map(|n| render(Some(n), source))
            .collect();

        if names.is_empty() {
            params.push(Parameter {
                name: None,
                type_text,
            });
        } else {
            params.extend(names.into_iter().map(|name| Parameter {
                name: Some(name),
                type_text: type_text.clone(),
            }));
        }
    }
    params
}

/// Text of the comment group directly above `decl`, or `""`.
///
/// The group is the run of comments ending on the line before the
/// declaration, with no blank line between them. A comment trailing code on
/// its own line does not belong to the group.
fn doc_comment(decl: Node, source: &[u8]) -> String {
    let mut group = Vec::new();
    let mut next_row = decl.start_position().row;
    let mut current = decl.prev_named_sibling();

    while let Some(comment) = current {
        if comment.kind() != "comment" {
            break;
        }
        let end_row = comment.end_position().row;
        let adjacent = if group.is_empty() {
            end_row + 1 == next_row
        } else {
            end_row + 1 >= next_row
        };
        if !adjacent {
            break;
        }
        let previous = comment.prev_named_sibling();
        let trailing = previous.is_some_and(|p| {
            p.kind() != "comment" && p.end_position().row == comment.start_position().row
        });
        if trailing {
            break;
        }
        group.push(comment);
        next_row = comment.start_position().row;
        current = previous;
    }

    group.reverse();
    comment_text(group.iter().map(|c| c.utf8_text(source).unwrap_or("")))
}

/// Convert raw comments into documentation text.
///
/// Comment markers are removed, along with one space after `//`. Directive
/// comments are dropped, trailing whitespace is trimmed from each line,
/// leading and trailing blank lines are removed and inner runs of blank
/// lines collapse to one. Non-empty output ends with a newline.
pub fn comment_text<'a>(comments: impl IntoIterator<Item = &'a str>) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for raw in comments {
        let text = if let Some(rest) = raw.strip_prefix("//") {
            match rest.strip_prefix(' ') {
                Some(rest) => rest,
                None if DIRECTIVE.is_match(rest) => continue,
                None => rest,
            }
        } else if let Some(rest) = raw.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            raw
        };
        lines.extend(text.split('\n').map(str::trim_end));
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.is_empty() || kept.last().is_some_and(|l| !l.is_empty()) {
            kept.push(line);
        }
    }
    while kept.last() == Some(&"") {
        kept.pop();
    }

    if kept.is_empty() {
        return String::new();
    }
    let mut text = kept.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::analysis::GoParser;

    fn analyze(source: &str, keying: MethodKeying) -> HashMap<String, FunctionRecord> {
        let parsed = GoParser::new()
            .parse(Path::new("test.go"), source.as_bytes())
            .unwrap();
        FunctionAnalyzer::new(Arc::new(parsed), keying).analyze()
    }

    #[test]
    fn test_one_record_per_declaration() {
        let source = r#"
package main

type Config struct{}

func main() {
    println("hello")
}

func helper(x int) int {
    return x + 1
}

func (c *Config) Validate() error {
    return nil
}
"#;
        let functions = analyze(source, MethodKeying::Name);
        assert_eq!(functions.len(), 3);
        assert!(functions.contains_key("main"));
        assert!(functions.contains_key("helper"));
        assert!(functions["Validate"].is_method());
        assert!(!functions["helper"].is_method());
    }

    #[test]
    fn test_method_receiver_and_variables() {
        let source = "package demo\n\nfunc (t *T) Foo() { x := 1; if x > 0 { y := 2 } }\n";
        let functions = analyze(source, MethodKeying::Name);
        let foo = &functions["Foo"];

        assert_eq!(foo.receiver, "t *T");
        assert_eq!(foo.receiver_type.as_deref(), Some("T"));
        let vars: Vec<_> = foo
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.descriptor.as_str()))
            .collect();
        assert_eq!(vars, vec![("x", "1"), ("y", "2")]);
        assert!(foo.body.is_some());
    }

    #[test]
    fn test_same_named_methods_collapse_by_name() {
        let source = r#"
package shapes

func (c Circle) Area() float64 {
    r := c.R
    return r * r * 3.14
}

func (s Square) Area() float64 {
    side := s.Side
    return side * side
}
"#;
        let functions = analyze(source, MethodKeying::Name);
        assert_eq!(functions.len(), 1);
        let area = &functions["Area"];
        assert_eq!(area.receiver, "s Square");
        assert_eq!(area.variable_names().collect::<Vec<_>>(), vec!["side"]);
    }

    #[test]
    fn test_same_named_methods_kept_by_receiver() {
        let source = r#"
package shapes

func (c Circle) Area() float64 { return 0 }

func (s *Square) Area() float64 { return 0 }

func Area() float64 { return 0 }
"#;
        let functions = analyze(source, MethodKeying::Receiver);
        let mut keys: Vec<_> = functions.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["Area", "Circle.Area", "Square.Area"]);
    }

    #[test]
    fn test_doc_comment_attached() {
        let source = r#"package main

// Unrelated comment.

// Run starts the server.
//
// It blocks until shutdown.
//go:noinline
func Run() {}

func Undocumented() {}

/* Block documents
   the helper. */
func helper() {}
"#;
        let functions = analyze(source, MethodKeying::Name);
        assert_eq!(
            functions["Run"].doc,
            "Run starts the server.\n\nIt blocks until shutdown.\n"
        );
        assert_eq!(functions["Undocumented"].doc, "");
        // Block comments keep their inner indentation.
        assert_eq!(functions["helper"].doc, " Block documents\n   the helper.\n");
    }

    #[test]
    fn test_signature_extraction() {
        let source = r#"
package main

func Open(name string, a, b int, opts ...Option) (*File, error) {
    return nil, nil
}

func Count(int) (n int) {
    return 0
}

func Name() string {
    return ""
}
"#;
        let functions = analyze(source, MethodKeying::Name);
        assert_eq!(
            functions["Open"].signature.to_string(),
            "Parameters: name string, a int, b int, opts ...Option | Returns: *File, error"
        );
        assert_eq!(
            functions["Count"].signature.to_string(),
            "Parameters: int | Returns: int"
        );
        assert_eq!(functions["Name"].signature.results, vec!["string"]);
    }

    #[test]
    fn test_bodyless_declaration() {
        let source = "package asm\n\nfunc fastAdd(a, b int) int\n";
        let functions = analyze(source, MethodKeying::Name);
        let record = &functions["fastAdd"];
        assert!(record.body.is_none());
        assert!(record.variables.is_empty());
    }

    #[test]
    fn test_body_statements_described() {
        let source = "package main\n\nfunc run() {\n\tn := 2\n\tfor i := 0; i < n; i++ {\n\t}\n}\n";
        let functions = analyze(source, MethodKeying::Name);
        let body = functions["run"].body.as_ref().unwrap();
        assert_eq!(
            body.describe_statements(),
            vec![
                "Assignment: n = 2",
                "For Loop: Init: i := 0; Cond: i < n; Post: i++",
            ]
        );
        assert!(body.text().starts_with('{'));
    }

    #[test]
    fn test_deeply_nested_file() {
        let chain = vec!["1"; 20_000].join(" + ");
        let source = format!(
            "package gen\n\nfunc Sum() int {{\n\tx := {}\n\treturn x\n}}\n\nfunc After() {{}}\n",
            chain
        );
        let functions = analyze(&source, MethodKeying::Name);

        assert_eq!(functions.len(), 2);
        let sum = &functions["Sum"];
        assert_eq!(sum.variable_names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(sum.variables[0].descriptor, chain);
        assert!(functions.contains_key("After"));
    }

    #[test]
    fn test_comment_text_rules() {
        assert_eq!(comment_text(Vec::<&str>::new()), "");
        assert_eq!(comment_text(["//", "// a", "//", "//", "// b", "//"]), "a\n\nb\n");
        assert_eq!(comment_text(["//go:generate stringer", "//line x.go:1"]), "");
        assert_eq!(comment_text(["//nospace  "]), "nospace\n");
    }
}
