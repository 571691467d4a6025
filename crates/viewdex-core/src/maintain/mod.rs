//! Module: maintain
//! Responsibility: keeping every registered view's index consistent with the
//! document store under incremental mutation, rebuild, and change-feed resume.
//! Does not own: projection semantics or read-side query shaping.
//! Boundary: readers obtain immutable snapshots; all mutation funnels through
//! the replace operation here.

mod backoff;
mod diagnostics;


use crate::{
    document::{DocId, Document, Revision},
    index::{IndexDelta, ViewIndex},
    obs::sink::{self, MetricsEvent},
    projection::{Emission, ProjectionEngine},
    query::QueryError,
    registry::{RegistryError, ViewRegistry},
    store::{ChangeEvent, ChangeKind, ChangeSeq, DocumentStore, StoreError},
    view::{ViewDefinition, ViewName},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
    time::Duration,
};

// re-exports
pub use backoff::BackoffPolicy;
pub use diagnostics::ProjectionDiagnostic;

use diagnostics::DiagnosticLog;

///
/// SyncReport
///
/// Outcome of one change-feed drain.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SyncReport {
    pub events_applied: usize,
    pub rebuilt: bool,
    pub last_seq: ChangeSeq,
}

///
/// IndexMaintainer
///
/// Owns one sorted index per registered view and keeps them consistent with
/// the document store. Each index is published as an `Arc` snapshot behind a
/// lock: readers clone the `Arc` and never block writers; writers prepare
/// the replacement off-lock and swap it in, so no reader ever observes a
/// half-applied replace.
///

pub struct IndexMaintainer {
    engine: ProjectionEngine,
    registry: ViewRegistry,
    indexes: BTreeMap<ViewName, RwLock<Arc<ViewIndex>>>,
    diagnostics: DiagnosticLog,
    last_seq: ChangeSeq,
}

impl IndexMaintainer {
    #[must_use]
    pub fn new(engine: ProjectionEngine) -> Self {
        Self {
            engine,
            registry: ViewRegistry::new(),
            indexes: BTreeMap::new(),
            diagnostics: DiagnosticLog::default(),
            last_seq: ChangeSeq::START,
        }
    }

    /// Register one view and create its (empty) index. Documents already in
    /// the store become visible after a rebuild or as their mutations flow
    /// through the change feed.
    pub fn register(&mut self, definition: ViewDefinition) -> Result<(), RegistryError> {
        let name = definition.name.clone();
        self.registry.register(definition)?;
        self.indexes
            .insert(name, RwLock::new(Arc::new(ViewIndex::new())));

        Ok(())
    }

    #[must_use]
    pub const fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn last_seq(&self) -> ChangeSeq {
        self.last_seq
    }

    /// Point-in-time snapshot of one view's index.
    pub fn snapshot(&self, name: &ViewName) -> Result<Arc<ViewIndex>, QueryError> {
        let lock = self.indexes.get(name).ok_or_else(|| QueryError::UnknownView {
            name: name.clone(),
        })?;

        Ok(Arc::clone(&lock.read().expect("index lock poisoned")))
    }

    /// Per-document projection failure diagnostics, most recent last.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ProjectionDiagnostic> {
        self.diagnostics.snapshot()
    }

    ///
    /// MUTATION
    ///

    /// Index one document across every registered view: one logical replace
    /// per view, published atomically. A projection failure in one view is
    /// recorded and contributes an empty entry set there; it never aborts
    /// the other views.
    pub fn apply_document(&self, doc: &Document) {
        for definition in self.registry.iter() {
            let emissions = match self.engine.project(definition, doc) {
                Ok(emissions) => emissions,
                Err(err) => {
                    self.diagnostics.push(ProjectionDiagnostic {
                        view: definition.name.clone(),
                        doc_id: doc.id.clone(),
                        revision: doc.revision.clone(),
                        reason: err.to_string(),
                    });
                    sink::record(MetricsEvent::ProjectionFailure {
                        view: definition.name.clone(),
                    });
                    Vec::new()
                }
            };

            let delta = self.publish_replace(&definition.name, &doc.id, &doc.revision, emissions);
            if !delta.is_noop() {
                sink::record(MetricsEvent::IndexDelta {
                    view: definition.name.clone(),
                    inserts: delta.inserts,
                    removes: delta.removes,
                });
            }
        }

        sink::record(MetricsEvent::DocumentIndexed);
    }

    /// Remove one document's entries from every view.
    pub fn apply_delete(&self, doc_id: &DocId) {
        for definition in self.registry.iter() {
            let delta = self.publish_remove(&definition.name, doc_id);
            if !delta.is_noop() {
                sink::record(MetricsEvent::IndexDelta {
                    view: definition.name.clone(),
                    inserts: delta.inserts,
                    removes: delta.removes,
                });
            }
        }

        sink::record(MetricsEvent::DocumentRemoved);
    }

    /// Apply one change-feed event. Create/update events read the latest
    /// revision through the store; a document that vanished in the meantime
    /// is treated as deleted.
    pub fn apply(&self, store: &impl DocumentStore, event: &ChangeEvent) -> Result<(), StoreError> {
        match event.kind {
            ChangeKind::Create | ChangeKind::Update => match store.get(&event.doc_id)? {
                Some(doc) => self.apply_document(&doc),
                None => self.apply_delete(&event.doc_id),
            },
            ChangeKind::Delete => self.apply_delete(&event.doc_id),
        }

        Ok(())
    }

    ///
    /// SYNC
    ///

    /// Drain the change feed from the last acknowledged position.
    ///
    /// An unrecoverable resume position re-derives every index from
    /// `list_all` and then resumes from the store's retained horizon;
    /// replayed events degrade to no-ops by idempotence, so no mutation is
    /// ever silently dropped. `Unavailable` propagates to the caller, which
    /// retries under a [`BackoffPolicy`].
    pub fn sync(&mut self, store: &impl DocumentStore) -> Result<SyncReport, StoreError> {
        let batch = match store.changes_since(self.last_seq) {
            Ok(batch) => batch,
            Err(StoreError::ResumeGap { retained_from, .. }) => {
                let mut report = self.rebuild_all(store)?;
                // Resume from the retained horizon; replayed events degrade
                // to no-ops by idempotence.
                self.last_seq = ChangeSeq(retained_from);
                report.last_seq = self.last_seq;

                return Ok(report);
            }
            Err(err) => return Err(err),
        };

        let mut applied = 0;
        for event in &batch.events {
            self.apply(store, event)?;
            self.last_seq = event.seq;
            applied += 1;
        }
        self.last_seq = batch.last_seq;

        Ok(SyncReport {
            events_applied: applied,
            rebuilt: false,
            last_seq: self.last_seq,
        })
    }

    /// Drain the change feed, retrying store outages under `policy`.
    ///
    /// Sleeping is delegated to `sleep` so this layer stays clock-free;
    /// the last error is returned once `max_attempts` is exhausted.
    pub fn sync_with_retry(
        &mut self,
        store: &impl DocumentStore,
        policy: &BackoffPolicy,
        mut sleep: impl FnMut(Duration),
    ) -> Result<SyncReport, StoreError> {
        let mut attempt = 0;
        loop {
            match self.sync(store) {
                Err(StoreError::Unavailable { .. }) if attempt < policy.max_attempts => {
                    sleep(policy.delay_for(attempt));
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    /// Reconstruct every view's index from `list_all`, in whatever order the
    /// store enumerates. Replace-not-merge makes the result order-independent.
    pub fn rebuild_all(&mut self, store: &impl DocumentStore) -> Result<SyncReport, StoreError> {
        let docs = store.list_all()?;

        // Build fresh indexes off to the side, then publish each atomically;
        // readers keep the previous snapshot until the swap.
        let mut fresh: BTreeMap<ViewName, ViewIndex> = self
            .indexes
            .keys()
            .map(|name| (name.clone(), ViewIndex::new()))
            .collect();

        let mut applied = 0;
        for doc in &docs {
            for definition in self.registry.iter() {
                let index = fresh
                    .get_mut(&definition.name)
                    .expect("registered view must have an index");
                Self::rebuild_one(&self.engine, &self.diagnostics, definition, doc, index);
            }
            applied += 1;
        }

        for (name, index) in fresh {
            let lock = self
                .indexes
                .get(&name)
                .expect("registered view must have an index");
            *lock.write().expect("index lock poisoned") = Arc::new(index);
        }
        sink::record(MetricsEvent::Rebuild);

        Ok(SyncReport {
            events_applied: applied,
            rebuilt: true,
            last_seq: self.last_seq,
        })
    }

    fn rebuild_one(
        engine: &ProjectionEngine,
        diagnostics: &DiagnosticLog,
        definition: &ViewDefinition,
        doc: &Document,
        index: &mut ViewIndex,
    ) {
        let emissions = match engine.project(definition, doc) {
            Ok(emissions) => emissions,
            Err(err) => {
                diagnostics.push(ProjectionDiagnostic {
                    view: definition.name.clone(),
                    doc_id: doc.id.clone(),
                    revision: doc.revision.clone(),
                    reason: err.to_string(),
                });
                sink::record(MetricsEvent::ProjectionFailure {
                    view: definition.name.clone(),
                });
                Vec::new()
            }
        };

        index.replace_document(&doc.id, &doc.revision, emissions);
    }

    fn publish_replace(
        &self,
        view: &ViewName,
        doc_id: &DocId,
        revision: &Revision,
        emissions: Vec<Emission>,
    ) -> IndexDelta {
        let lock = self
            .indexes
            .get(view)
            .expect("registered view must have an index");
        let mut guard = lock.write().expect("index lock poisoned");

        // Idempotence fast path: same revision means the stored entries
        // already match; skip the copy entirely.
        if guard.revision_of(doc_id) == Some(revision) {
            return IndexDelta::default();
        }

        let mut next = (**guard).clone();
        let delta = next.replace_document(doc_id, revision, emissions);
        if delta.is_noop() {
            return delta;
        }

        debug_assert!(next.verify_ordered().is_ok());
        *guard = Arc::new(next);

        delta
    }

    fn publish_remove(&self, view: &ViewName, doc_id: &DocId) -> IndexDelta {
        let lock = self
            .indexes
            .get(view)
            .expect("registered view must have an index");
        let mut guard = lock.write().expect("index lock poisoned");

        if guard.revision_of(doc_id).is_none() {
            return IndexDelta::default();
        }

        let mut next = (**guard).clone();
        let delta = next.remove_document(doc_id);
        *guard = Arc::new(next);

        delta
    }
}
