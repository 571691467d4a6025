mod memory;

use crate::document::{DocId, Document, Revision};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// re-exports
pub use memory::MemoryStore;

///
/// ChangeSeq
///
/// Position in the store's change log. `ChangeSeq::START` is the position
/// before the first change.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct ChangeSeq(pub u64);

impl ChangeSeq {
    pub const START: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

///
/// ChangeKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

///
/// ChangeEvent
///
/// One document mutation as observed through the store's change feed.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub seq: ChangeSeq,
    pub doc_id: DocId,
    pub revision: Revision,
    pub kind: ChangeKind,
}

///
/// ChangeBatch
///
/// Events after a resume position, plus the position to acknowledge.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChangeBatch {
    pub events: Vec<ChangeEvent>,
    pub last_seq: ChangeSeq,
}

///
/// StoreError
///
/// Failures at the document-store boundary. `Unavailable` is retried with
/// backoff by the caller; `ResumeGap` forces re-derivation from `list_all`.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("store corruption: {reason}")]
    Corrupt { reason: String },

    #[error("change position {position} is no longer retained (oldest is {retained_from})")]
    ResumeGap { position: u64, retained_from: u64 },

    #[error("document store unavailable: {reason}")]
    Unavailable { reason: String },
}

///
/// DocumentStore
///
/// The narrow collaborator interface to the surrounding application's
/// document store. The indexing layer only ever reads through it.
///

pub trait DocumentStore {
    /// Fetch the latest revision of one document, `None` when deleted or
    /// never written.
    fn get(&self, id: &DocId) -> Result<Option<Document>, StoreError>;

    /// Enumerate every live document, for full rebuilds. Order is
    /// unspecified; rebuild results must not depend on it.
    fn list_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Changes after the given acknowledged position.
    fn changes_since(&self, seq: ChangeSeq) -> Result<ChangeBatch, StoreError>;
}
