use crate::{
    document::{DocId, Document},
    store::{ChangeBatch, ChangeEvent, ChangeKind, ChangeSeq, DocumentStore, StoreError},
};
use std::{cell::Cell, collections::BTreeMap, sync::RwLock};

///
/// MemoryStore
///
/// Reference in-memory document store. Used by the test suites and as the
/// executable model of the collaborator contract; production deployments
/// provide their own `DocumentStore`.
///
/// The change log is retained from `retained_from` onward; `compact_through`
/// simulates log truncation so resume-gap handling can be exercised.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    // Failure injection: number of upcoming calls that report Unavailable.
    outage_calls: Cell<u32>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<DocId, Document>,
    log: Vec<ChangeEvent>,
    last_seq: ChangeSeq,
    retained_from: ChangeSeq,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one document; records a create or update change.
    pub fn put(&self, doc: Document) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let kind = if inner.docs.contains_key(&doc.id) {
            ChangeKind::Update
        } else {
            ChangeKind::Create
        };

        let seq = inner.last_seq.next();
        inner.last_seq = seq;
        inner.log.push(ChangeEvent {
            seq,
            doc_id: doc.id.clone(),
            revision: doc.revision.clone(),
            kind,
        });
        inner.docs.insert(doc.id.clone(), doc);
    }

    /// Delete one document; records a delete change. Unknown ids are a
    /// silent no-op, matching the collaborator's semantics.
    pub fn delete(&self, id: &DocId) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let Some(doc) = inner.docs.remove(id) else {
            return;
        };

        let seq = inner.last_seq.next();
        inner.last_seq = seq;
        inner.log.push(ChangeEvent {
            seq,
            doc_id: doc.id,
            revision: doc.revision,
            kind: ChangeKind::Delete,
        });
    }

    /// Drop change-log entries at or before `through`, simulating log
    /// compaction. Resuming from an earlier position then reports a gap.
    pub fn compact_through(&self, through: ChangeSeq) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.log.retain(|event| event.seq > through);
        if through > inner.retained_from {
            inner.retained_from = through;
        }
    }

    /// Make the next `calls` store operations report `Unavailable`.
    pub fn inject_outage(&self, calls: u32) {
        self.outage_calls.set(calls);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        let remaining = self.outage_calls.get();
        if remaining == 0 {
            return Ok(());
        }

        self.outage_calls.set(remaining - 1);
        Err(StoreError::Unavailable {
            reason: "injected outage".to_string(),
        })
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &DocId) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().expect("store lock poisoned");

        Ok(inner.docs.get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().expect("store lock poisoned");

        Ok(inner.docs.values().cloned().collect())
    }

    fn changes_since(&self, seq: ChangeSeq) -> Result<ChangeBatch, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().expect("store lock poisoned");

        if seq < inner.retained_from {
            return Err(StoreError::ResumeGap {
                position: seq.0,
                retained_from: inner.retained_from.0,
            });
        }

        let events: Vec<ChangeEvent> = inner
            .log
            .iter()
            .filter(|event| event.seq > seq)
            .cloned()
            .collect();

        Ok(ChangeBatch {
            events,
            last_seq: inner.last_seq,
        })
    }
}

///
/// TESTS
///
