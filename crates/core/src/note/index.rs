//! Read-only access to note metadata snapshots.

use std::collections::HashMap;

use super::types::NoteRecord;

/// Source of note metadata.
///
/// Construction and maintenance of the index live outside the filter core;
/// the core only reads from it.
pub trait MetadataIndex {
    /// All records, in the index's stable order.
    fn records(&self) -> &[NoteRecord];

    /// Look up a record by vault-relative path.
    fn get(&self, path: &str) -> Option<&NoteRecord>;
}

/// An immutable, in-memory snapshot of note records.
#[derive(Debug, Clone, Default)]
pub struct VaultSnapshot {
    records: Vec<NoteRecord>,
    by_path: HashMap<String, usize>,
}

impl VaultSnapshot {
    /// Create a snapshot, keeping the given order.
    ///
    /// When two records share a path, the later one wins lookups.
    pub fn new(records: Vec<NoteRecord>) -> Self {
        let by_path =
            records.iter().enumerate().map(|(i, r)| (r.path.clone(), i)).collect();
        Self { records, by_path }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MetadataIndex for VaultSnapshot {
    fn records(&self) -> &[NoteRecord] {
        &self.records
    }

    fn get(&self, path: &str) -> Option<&NoteRecord> {
        self.by_path.get(path).and_then(|&i| self.records.get(i))
    }
}

impl FromIterator<NoteRecord> for VaultSnapshot {
    fn from_iter<I: IntoIterator<Item = NoteRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
