use std::collections::HashMap;
use std::sync::Arc;

use medisearch_common::{MediSearchError, Result};
use parking_lot::RwLock;
use tracing::debug;

use crate::similarity::rank_top_k;
use crate::types::{IndexHandle, IndexStats, SearchMatch, VectorIndex, VectorRecord};

/// Named in-memory vector indexes behind per-index locks
///
/// The outer lock only guards the name table, so operations on different
/// indexes run in parallel and readers of one index never block each other.
/// Nothing is persisted; the store lives and dies with the process.
pub struct VectorStore {
    indexes: RwLock<HashMap<String, Arc<RwLock<VectorIndex>>>>,
}

impl VectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Create (or reset) a named index
    ///
    /// An existing index with the same name is replaced by a fresh empty
    /// one, which also clears its locked dimension.
    pub fn create_index(&self, name: impl Into<String>) -> IndexHandle {
        let name = name.into();
        let mut indexes = self.indexes.write();
        indexes.insert(name.clone(), Arc::new(RwLock::new(VectorIndex::default())));

        debug!("Created index '{}'", name);
        IndexHandle::new(name)
    }

    /// Remove a named index
    ///
    /// Removing a name that does not exist is a no-op.
    pub fn delete_index(&self, name: impl AsRef<str>) {
        let removed = self.indexes.write().remove(name.as_ref());
        if removed.is_some() {
            debug!("Deleted index '{}'", name.as_ref());
        }
    }

    /// Whether an index with this name exists
    pub fn has_index(&self, name: impl AsRef<str>) -> bool {
        self.indexes.read().contains_key(name.as_ref())
    }

    /// Insert a batch of records into an index
    ///
    /// The batch is validated as a whole before anything is stored: if any
    /// record's dimension disagrees with the index (or, on a still-empty
    /// index, with the batch's first record), the whole batch is rejected
    /// and the index is left untouched. The first accepted batch locks the
    /// index dimension.
    pub fn upsert(&self, index: impl AsRef<str>, records: Vec<VectorRecord>) -> Result<()> {
        let name = index.as_ref();
        let handle = self.get_index(name)?;

        if records.is_empty() {
            return Ok(());
        }

        let mut guard = handle.write();

        let expected = match guard.dimension {
            Some(dim) => dim,
            None => {
                let first = records[0].dimension();
                if first == 0 {
                    return Err(MediSearchError::invalid_input(format!(
                        "record '{}' has an empty vector",
                        records[0].id
                    )));
                }
                first
            }
        };

        for record in &records {
            if record.dimension() != expected {
                return Err(MediSearchError::dimension_mismatch(
                    expected,
                    record.dimension(),
                ));
            }
        }

        // Whole batch validated; only now lock the dimension and store.
        guard.dimension = Some(expected);
        let accepted = records.len();
        guard.records.extend(records);

        debug!("Upserted {} records into index '{}'", accepted, name);
        Ok(())
    }

    /// Rank every record in the index against `query` and return the top `k`,
    /// highest similarity first
    ///
    /// An empty index yields an empty result; the query vector's dimension
    /// is only checked once the index holds records.
    pub fn query(
        &self,
        index: impl AsRef<str>,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<SearchMatch>> {
        let name = index.as_ref();
        let handle = self.get_index(name)?;
        let guard = handle.read();

        // No locked dimension means no records.
        let expected = match guard.dimension {
            Some(dim) => dim,
            None => return Ok(Vec::new()),
        };

        if query.len() != expected {
            return Err(MediSearchError::dimension_mismatch(expected, query.len()));
        }

        let matches = rank_top_k(&guard.records, query, k);

        debug!(
            "Query on '{}' returned {} of {} records",
            name,
            matches.len(),
            guard.records.len()
        );
        Ok(matches)
    }

    /// Point-in-time statistics for an index
    pub fn stats(&self, index: impl AsRef<str>) -> Result<IndexStats> {
        let name = index.as_ref();
        let handle = self.get_index(name)?;
        let guard = handle.read();

        Ok(IndexStats {
            name: name.to_string(),
            record_count: guard.records.len(),
            dimension: guard.dimension,
        })
    }

    fn get_index(&self, name: &str) -> Result<Arc<RwLock<VectorIndex>>> {
        self.indexes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| MediSearchError::unknown_index(name))
    }
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new()
    }
}
