//! In-memory document store
//!
//! Behaves like the managed store for everything the activity pipeline relies
//! on: equality queries, atomic batches, a per-batch operation limit. Faults
//! can be injected to exercise partial-failure handling.

use crate::batch::{CommitReceipt, WriteBatch, WriteOp};
use crate::error::StoreError;
use crate::query::Query;
use crate::store::{DocumentStore, StoredDocument, DEFAULT_MAX_BATCH_OPS};
use crate::USERS_COLLECTION;
use activity_model::{fields, ActivityRecord, Document, DocumentId, User};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

type Collection = BTreeMap<DocumentId, Document>;

/// Store usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Successful commits
    pub commits: usize,
    /// Queries served (including failed ones)
    pub queries: usize,
    /// Documents across all collections
    pub documents: usize,
}

#[derive(Debug, Default)]
struct FaultPlan {
    fail_next_commits: usize,
    fail_next_queries: usize,
    /// Commits that write a document with `field == value` fail
    poisoned_writes: Vec<(String, Value)>,
}

impl FaultPlan {
    fn poisoned(&self, batch: &WriteBatch) -> Option<String> {
        batch.ops().iter().find_map(|op| match op {
            WriteOp::Set { document, .. } => self
                .poisoned_writes
                .iter()
                .find(|(field, value)| document.get(field) == Some(value))
                .map(|(field, value)| format!("write with {field} == {value} rejected")),
            WriteOp::Delete { .. } => None,
        })
    }
}

/// Thread-safe in-memory [`DocumentStore`]
#[derive(Debug)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    faults: Mutex<FaultPlan>,
    query_counts: DashMap<String, usize>,
    commits: AtomicUsize,
    max_batch_ops: usize,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_batch_ops(DEFAULT_MAX_BATCH_OPS)
    }

    /// Create empty store with a custom batch limit
    #[must_use]
    pub fn with_max_batch_ops(max_batch_ops: usize) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            faults: Mutex::new(FaultPlan::default()),
            query_counts: DashMap::new(),
            commits: AtomicUsize::new(0),
            max_batch_ops,
        }
    }

    /// Insert a document outside of any batch
    pub fn insert(&self, collection: &str, document: Document) -> DocumentId {
        let id = DocumentId::generate();
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);
        id
    }

    /// Insert an activity record outside of any batch
    ///
    /// # Errors
    /// Returns error if the record cannot be encoded
    pub fn insert_record(&self, collection: &str, record: &ActivityRecord) -> Result<DocumentId, StoreError> {
        Ok(self.insert(collection, record.to_document()?))
    }

    /// Populate the users collection
    pub fn seed_users(&self, users: &[User]) {
        self.seed_users_into(USERS_COLLECTION, users);
    }

    /// Populate a named users collection
    pub fn seed_users_into(&self, collection: &str, users: &[User]) {
        for user in users {
            let mut doc = Document::new();
            doc.insert(fields::USER_ID.to_string(), Value::from(user.id));
            doc.insert(fields::USERNAME.to_string(), Value::from(user.username.as_str()));
            self.insert(collection, doc);
        }
    }

    /// Snapshot of a collection
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.collections
            .read()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Decode every document of a collection as an activity record
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidDocument`] for the first undecodable document
    pub fn records(&self, collection: &str) -> Result<Vec<ActivityRecord>, StoreError> {
        self.documents(collection)
            .into_iter()
            .map(|doc| {
                ActivityRecord::from_document(&doc.data).map_err(|e| StoreError::InvalidDocument {
                    id: doc.id,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Number of documents in a collection
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, BTreeMap::len)
    }

    /// Number of queries issued against a collection
    #[must_use]
    pub fn queries_on(&self, collection: &str) -> usize {
        self.query_counts.get(collection).map_or(0, |c| *c)
    }

    /// Usage counters
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            commits: self.commits.load(Ordering::SeqCst),
            queries: self.query_counts.iter().map(|e| *e.value()).sum(),
            documents: self.collections.read().values().map(BTreeMap::len).sum(),
        }
    }

    /// Fail the next `n` commits
    pub fn fail_next_commits(&self, n: usize) {
        self.faults.lock().fail_next_commits = n;
    }

    /// Fail the next `n` queries
    pub fn fail_next_queries(&self, n: usize) {
        self.faults.lock().fail_next_queries = n;
    }

    /// Fail every commit that writes a document with `field == value`
    pub fn fail_commits_writing(&self, field: impl Into<String>, value: impl Into<Value>) {
        self.faults.lock().poisoned_writes.push((field.into(), value.into()));
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        *self.faults.lock() = FaultPlan::default();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        *self
            .query_counts
            .entry(query.collection_name().to_string())
            .or_insert(0) += 1;

        {
            let mut faults = self.faults.lock();
            if faults.fail_next_queries > 0 {
                faults.fail_next_queries -= 1;
                return Err(StoreError::Injected(format!("query {query} failed")));
            }
        }

        let collections = self.collections.read();
        let matched = collections
            .get(query.collection_name())
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| query.matches(data))
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(matched)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        if batch.len() > self.max_batch_ops {
            return Err(StoreError::BatchTooLarge {
                len: batch.len(),
                max: self.max_batch_ops,
            });
        }

        {
            let mut faults = self.faults.lock();
            if faults.fail_next_commits > 0 {
                faults.fail_next_commits -= 1;
                return Err(StoreError::Injected("commit failed".to_string()));
            }
            if let Some(reason) = faults.poisoned(&batch) {
                return Err(StoreError::Injected(reason));
            }
        }

        let mut receipt = CommitReceipt::default();
        let mut collections = self.collections.write();
        for op in batch.into_ops() {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    document,
                } => {
                    collections.entry(collection).or_default().insert(id, document);
                    receipt.written += 1;
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        if docs.remove(&id).is_some() {
                            receipt.deleted += 1;
                        }
                    }
                }
            }
        }
        drop(collections);

        self.commits.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            "Committed batch: {} written, {} deleted",
            receipt.written,
            receipt.deleted
        );
        Ok(receipt)
    }

    fn max_batch_ops(&self) -> usize {
        self.max_batch_ops
    }
}
