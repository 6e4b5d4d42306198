//! Directory walk that drives per-file analysis into a [`FunctionTable`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use super::facts::FunctionRecord;
use super::parsed::GoParser;
use super::table::FunctionTable;
use super::visitor::{FunctionAnalyzer, MethodKeying};
use crate::error::{Result, SeerError};

/// Options controlling which files a walk analyzes.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    extension: String,
    exclude: Option<GlobSet>,
    include_tests: bool,
    follow_links: bool,
    keying: MethodKeying,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            extension: "go".to_string(),
            exclude: None,
            include_tests: true,
            follow_links: false,
            keying: MethodKeying::Name,
        }
    }
}

impl WalkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip files whose path relative to the walk root matches any pattern.
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            self.exclude = None;
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        self.exclude = Some(builder.build()?);
        Ok(self)
    }

    /// Whether `_test.go` files are analyzed (default: yes).
    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn keying(mut self, keying: MethodKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Check whether a walked file should be analyzed.
    fn accepts(&self, root: &Path, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let suffix = format!(".{}", self.extension);
        if !name.ends_with(&suffix) {
            return false;
        }
        if !self.include_tests && name.ends_with(&format!("_test{}", suffix)) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            let rel = path.strip_prefix(root).unwrap_or(path);
            if exclude.is_match(rel) {
                return false;
            }
        }
        true
    }
}

/// A file that was found but not analyzed.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a directory walk.
#[derive(Debug, Default)]
pub struct WalkSummary {
    pub table: FunctionTable,
    pub files_analyzed: usize,
    /// Files that could not be read or parsed, in walk order.
    pub skipped: Vec<SkippedFile>,
}

/// Walk `root` recursively and analyze every accepted source file.
///
/// Entries are visited in file-name order, so when two files produce the
/// same composite key the later one deterministically wins. Read and parse
/// failures are logged and the file is skipped. Only a failure to enumerate
/// the tree (missing root, unreadable directory) is returned as an error.
pub fn walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<WalkSummary> {
    let root = root.as_ref();
    let parser = GoParser::new();
    let mut summary = WalkSummary::default();

    for entry in WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| SeerError::Walk {
            path: source.path().unwrap_or(root).to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if !options.accepts(root, path) {
            continue;
        }

        match analyze_file(&parser, path, options.keying) {
            Ok((package, functions)) => {
                summary.table.merge_file(&package, path, functions);
                summary.files_analyzed += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                summary.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        files = summary.files_analyzed,
        skipped = summary.skipped.len(),
        functions = summary.table.len(),
        "walk complete"
    );
    Ok(summary)
}

/// Read, parse and analyze one file.
///
/// Returns the declared package and the per-file function map.
pub fn analyze_file(
    parser: &GoParser,
    path: &Path,
    keying: MethodKeying,
) -> Result<(String, HashMap<String, FunctionRecord>)> {
    tracing::debug!(path = %path.display(), "analyzing file");

    let source = fs::read(path).map_err(|source| SeerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = Arc::new(parser.parse(path, &source)?);
    let package = parsed.package.clone();
    let functions = FunctionAnalyzer::new(parsed, keying).analyze();

    Ok((package, functions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_extension_only() {
        let options = WalkOptions::new();
        let root = Path::new("/src");
        assert!(options.accepts(root, Path::new("/src/main.go")));
        assert!(options.accepts(root, Path::new("/src/main_test.go")));
        assert!(!options.accepts(root, Path::new("/src/main.go.txt")));
        assert!(!options.accepts(root, Path::new("/src/README.md")));
    }

    #[test]
    fn test_accepts_respects_tests_and_excludes() {
        let options = WalkOptions::new()
            .include_tests(false)
            .exclude(&["vendor/**"])
            .unwrap();
        let root = Path::new("/src");
        assert!(!options.accepts(root, Path::new("/src/main_test.go")));
        assert!(!options.accepts(root, Path::new("/src/vendor/lib/lib.go")));
        assert!(options.accepts(root, Path::new("/src/pkg/lib.go")));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let err = WalkOptions::new().exclude(&["a[b"]).err().unwrap();
        assert!(matches!(err, SeerError::Glob(_)));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = walk(&missing, &WalkOptions::new()).err().unwrap();
        assert!(matches!(err, SeerError::Walk { .. }));
    }

    #[test]
    fn test_analyze_file_reports_read_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone.go");
        let err = analyze_file(&GoParser::new(), &missing, MethodKeying::Name)
            .err()
            .unwrap();
        assert!(matches!(err, SeerError::Io { .. }));
    }

    #[test]
    fn test_later_file_wins_on_key_collision() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("shapes.go"),
            "package shapes\n\nfunc (c Circle) Area() {}\n\nfunc (s Square) Area() {}\n",
        )
        .unwrap();

        let summary = walk(temp.path(), &WalkOptions::new()).unwrap();
        assert_eq!(summary.table.len(), 1);
        let (_, record) = summary.table.iter().next().unwrap();
        assert_eq!(record.receiver, "s Square");

        let qualified = WalkOptions::new().keying(MethodKeying::Receiver);
        let summary = walk(temp.path(), &qualified).unwrap();
        assert_eq!(summary.table.len(), 2);
        let path = temp.path().join("shapes.go");
        let key = composite_key_for("shapes", "Circle.Area", &path);
        assert!(summary.table.get(&key).is_some());
    }

    fn composite_key_for(package: &str, name: &str, path: &Path) -> String {
        crate::analysis::composite_key(package, name, path)
    }
}
