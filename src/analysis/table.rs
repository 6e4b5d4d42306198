//! The function table built by a directory walk.

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::facts::FunctionRecord;

/// Composite key `{package}.{function} ({path})`.
pub fn composite_key(package: &str, function: &str, path: &Path) -> String {
    format!("{}.{} ({})", package, function, path.display())
}

/// Mapping from composite key to function record.
///
/// Keys iterate in sorted order. Inserting an existing key replaces the
/// previous record.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, FunctionRecord>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, key: String, record: FunctionRecord) -> Option<FunctionRecord> {
        self.functions.insert(key, record)
    }

    /// Merge one file's analyzer output under composite keys.
    ///
    /// `functions` is keyed the way the analyzer keyed it (bare name or
    /// `Recv.Name`); that key becomes the function part of the composite key.
    pub fn merge_file(
        &mut self,
        package: &str,
        path: &Path,
        functions: HashMap<String, FunctionRecord>,
    ) {
        for (name, record) in functions {
            let key = composite_key(package, &name, path);
            if self.insert(key.clone(), record).is_some() {
                tracing::debug!(key = %key, "replaced existing function record");
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FunctionRecord> {
        self.functions.get(key)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FunctionRecord> {
        self.functions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// All entries for a function name, across files and packages.
    pub fn find_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a FunctionRecord)> + 'a {
        self.functions
            .iter()
            .filter(move |(_, record)| record.name == name)
            .map(|(key, record)| (key.as_str(), record))
    }
}

impl<'a> IntoIterator for &'a FunctionTable {
    type Item = (&'a String, &'a FunctionRecord);
    type IntoIter = btree_map::Iter<'a, String, FunctionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FunctionRecord, Signature, Span};

    fn record(name: &str, doc: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            doc: doc.to_string(),
            receiver: String::new(),
            receiver_type: None,
            signature: Signature::default(),
            variables: Vec::new(),
            discarded: Vec::new(),
            span: Span {
                start_byte: 0,
                end_byte: 0,
                start_line: 1,
                start_col: 1,
                end_line: 1,
                end_col: 1,
            },
            body: None,
        }
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(
            composite_key("main", "run", Path::new("cmd/main.go")),
            "main.run (cmd/main.go)"
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = FunctionTable::new();
        assert!(table.insert("k".to_string(), record("f", "first")).is_none());
        let replaced = table.insert("k".to_string(), record("f", "second"));
        assert_eq!(replaced.map(|r| r.doc), Some("first".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("k").unwrap().doc, "second");
    }

    #[test]
    fn test_merge_and_sorted_iteration() {
        let mut table = FunctionTable::new();
        let mut functions = HashMap::new();
        functions.insert("zeta".to_string(), record("zeta", ""));
        functions.insert("alpha".to_string(), record("alpha", ""));
        table.merge_file("pkg", Path::new("a.go"), functions);

        let mut other = HashMap::new();
        other.insert("alpha".to_string(), record("alpha", ""));
        table.merge_file("pkg", Path::new("b.go"), other);

        let keys: Vec<_> = table.keys().collect();
        assert_eq!(
            keys,
            vec!["pkg.alpha (a.go)", "pkg.alpha (b.go)", "pkg.zeta (a.go)"]
        );
        assert_eq!(table.find_by_name("alpha").count(), 2);
        assert!(!table.is_empty());
    }
}
