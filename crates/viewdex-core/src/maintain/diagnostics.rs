use crate::{
    document::{DocId, Revision},
    view::ViewName,
};
use std::{collections::VecDeque, sync::Mutex};

/// Bounded retention of per-document failure diagnostics.
const MAX_DIAGNOSTICS: usize = 256;

///
/// ProjectionDiagnostic
///
/// One per-document projection failure: which view, which document revision,
/// and why. The document contributes no entries to that view until a later
/// revision projects cleanly.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectionDiagnostic {
    pub view: ViewName,
    pub doc_id: DocId,
    pub revision: Revision,
    pub reason: String,
}

///
/// DiagnosticLog
///
/// Ring of the most recent projection diagnostics; oldest entries are
/// evicted beyond the retention bound.
///

#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    ring: Mutex<VecDeque<ProjectionDiagnostic>>,
}

impl DiagnosticLog {
    pub(crate) fn push(&self, diagnostic: ProjectionDiagnostic) {
        let mut ring = self.ring.lock().expect("diagnostic lock poisoned");
        if ring.len() == MAX_DIAGNOSTICS {
            ring.pop_front();
        }
        ring.push_back(diagnostic);
    }

    #[must_use]
    pub(crate) fn snapshot(&self) -> Vec<ProjectionDiagnostic> {
        let ring = self.ring.lock().expect("diagnostic lock poisoned");
        ring.iter().cloned().collect()
    }
}

///
/// TESTS
///
