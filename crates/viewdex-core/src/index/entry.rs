use crate::{
    document::{DocId, Revision},
    key::Key,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// IndexEntry
///
/// One row of one view's sorted index. A document owning several entries in
/// the same view (fan-out) is represented as independent rows sharing
/// `doc_id`; the `ordinal` records the emission position within the
/// document's projection run, so duplicate keys from repeated occurrences
/// remain representable and enumeration under an equal key is stable.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexEntry {
    pub key: Key,
    pub value: Value,
    pub doc_id: DocId,
    pub revision: Revision,
    pub ordinal: u32,
}

/// Total index order: `(key, doc_id, ordinal)` under the canonical key
/// collation. This is deliberately NOT `Ord for IndexEntry`: two rows with
/// equal positions but different values must not compare equal.
#[must_use]
pub(crate) fn cmp_entry_order(left: &IndexEntry, right: &IndexEntry) -> Ordering {
    Key::canonical_cmp(&left.key, &right.key)
        .then_with(|| left.doc_id.cmp(&right.doc_id))
        .then_with(|| left.ordinal.cmp(&right.ordinal))
}
