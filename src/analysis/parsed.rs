//! Go parsing on top of tree-sitter.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use crate::error::{Result, SeerError};

/// Tree-sitter query for the package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Compiled once; queries are immutable and shareable across files.
static COMPILED_PACKAGE_QUERY: OnceCell<Query> = OnceCell::new();

/// Holds a parsed tree-sitter tree and the source it was built from.
///
/// Function records keep this alive (behind an `Arc`) so their body nodes
/// can be revisited after the walk.
pub struct ParsedFile {
    /// The tree-sitter parse tree. Comments are retained as `comment` nodes.
    pub tree: tree_sitter::Tree,
    /// Source bytes, guaranteed to be valid UTF-8.
    pub source: Vec<u8>,
    /// The file path as it was walked.
    pub path: PathBuf,
    /// Declared package name.
    pub package: String,
}

/// Go source parser.
pub struct GoParser {
    language: Language,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a tree-sitter parser. Parsers are stateful, so one per call.
    fn create_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse Go source into a [`ParsedFile`].
    ///
    /// Malformed input is rejected: tree-sitter recovers from syntax errors
    /// by inserting `ERROR`/missing nodes, and such trees are reported as
    /// [`SeerError::Parse`] at the first error position. Source that is not
    /// valid UTF-8 and a file without a `package` clause are rejected as well.
    pub fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        if let Err(e) = std::str::from_utf8(source) {
            let (line, column) = byte_position(source, e.valid_up_to());
            return Err(SeerError::Encoding {
                path: path.to_path_buf(),
                line,
                column,
            });
        }

        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| SeerError::Parse {
            path: path.to_path_buf(),
            line: 1,
            column: 1,
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(root);
            return Err(SeerError::Parse {
                path: path.to_path_buf(),
                line,
                column,
            });
        }

        let package = self
            .extract_package(&tree, source)?
            .ok_or_else(|| SeerError::MissingPackage {
                path: path.to_path_buf(),
            })?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_path_buf(),
            package,
        })
    }

    /// Extract the package name from a tree.
    fn extract_package(&self, tree: &tree_sitter::Tree, source: &[u8]) -> Result<Option<String>> {
        let query = COMPILED_PACKAGE_QUERY
            .get_or_try_init(|| Query::new(&self.language, PACKAGE_QUERY))?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, tree.root_node(), source);

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    let text = capture.node.utf8_text(source).unwrap_or("");
                    return Ok(Some(text.to_string()));
                }
            }
        }
        Ok(None)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 1-indexed line and byte column of `offset`.
fn byte_position(source: &[u8], offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

/// 1-indexed position of the first `ERROR` or missing node in pre-order.
fn first_error_position(root: tree_sitter::Node) -> (usize, usize) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return (pos.row + 1, pos.column + 1);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    let pos = root.start_position();
    (pos.row + 1, pos.column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_go(source: &str) -> Result<ParsedFile> {
        GoParser::new().parse(Path::new("test.go"), source.as_bytes())
    }

    #[test]
    fn test_extract_package() {
        let parsed = parse_go("package main\n").unwrap();
        assert_eq!(parsed.package, "main");
        assert_eq!(parsed.path, PathBuf::from("test.go"));
    }

    #[test]
    fn test_package_with_leading_comment() {
        let parsed = parse_go("// Package util does things.\npackage util\n").unwrap();
        assert_eq!(parsed.package, "util");
    }

    #[test]
    fn test_syntax_error_rejected() {
        let err = parse_go("package main\n\nfunc broken( {\n").err().unwrap();
        match err {
            SeerError::Parse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("test.go"));
                assert!(line >= 3, "error reported on line {}", line);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_package_rejected() {
        let err = parse_go("func main() {}\n").err().unwrap();
        assert!(matches!(err, SeerError::MissingPackage { .. }));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let source = b"package main\n\nfunc F() { s := \"\xff\xfe\" }\n";
        let err = GoParser::new()
            .parse(Path::new("bin.go"), source)
            .err()
            .unwrap();
        match err {
            SeerError::Encoding { line, column, .. } => assert_eq!((line, column), (3, 18)),
            other => panic!("expected encoding error, got {:?}", other),
        }
    }
}
