mod entry;


use crate::{
    document::{DocId, Revision},
    error::InternalError,
    key::Key,
    projection::Emission,
};
use std::{cmp::Ordering, collections::BTreeMap, ops::Bound};

// re-exports
pub use entry::IndexEntry;

use entry::cmp_entry_order;

///
/// IndexDelta
///
/// Row counts of one logical replace, for instrumentation.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexDelta {
    pub inserts: u64,
    pub removes: u64,
}

impl IndexDelta {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.inserts == 0 && self.removes == 0
    }
}

///
/// ViewIndex
///
/// One view's totally ordered index: an append-then-sort ordered collection
/// of entries sorted by `(key, doc_id, ordinal)`, plus the set of live
/// contributing documents with their revisions.
///
/// A `ViewIndex` value is an immutable point-in-time snapshot from the
/// reader's perspective; all mutation happens on a private copy inside the
/// maintainer, which then publishes the replacement atomically.
///

#[derive(Clone, Debug, Default)]
pub struct ViewIndex {
    entries: Vec<IndexEntry>,
    docs: BTreeMap<DocId, Revision>,
}

impl ViewIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Revision of the given document's current contribution, if any.
    #[must_use]
    pub fn revision_of(&self, doc_id: &DocId) -> Option<&Revision> {
        self.docs.get(doc_id)
    }

    /// Number of documents currently contributing entries.
    #[must_use]
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    ///
    /// MUTATION
    ///

    /// One logical replace: drop every entry of `doc_id`, then insert the
    /// given emissions under `revision`. Re-applying the same revision is a
    /// no-op (projection is deterministic per revision, so the stored
    /// entries already match).
    #[expect(clippy::cast_possible_truncation)]
    pub fn replace_document(
        &mut self,
        doc_id: &DocId,
        revision: &Revision,
        emissions: Vec<Emission>,
    ) -> IndexDelta {
        if self.docs.get(doc_id) == Some(revision) {
            return IndexDelta::default();
        }

        let removes = self.drop_entries_of(doc_id);
        let inserts = emissions.len() as u64;

        if emissions.is_empty() {
            self.docs.remove(doc_id);
        } else {
            self.docs.insert(doc_id.clone(), revision.clone());

            // Append-then-sort; ordinals preserve the emission order so
            // duplicate keys from repeated occurrences stay distinct rows.
            self.entries
                .extend(emissions.into_iter().enumerate().map(|(ordinal, emission)| {
                    IndexEntry {
                        key: emission.key,
                        value: emission.value,
                        doc_id: doc_id.clone(),
                        revision: revision.clone(),
                        ordinal: ordinal as u32,
                    }
                }));
            self.entries.sort_by(cmp_entry_order);
        }

        IndexDelta { inserts, removes }
    }

    /// Remove every entry contributed by `doc_id`.
    pub fn remove_document(&mut self, doc_id: &DocId) -> IndexDelta {
        let removes = self.drop_entries_of(doc_id);
        self.docs.remove(doc_id);

        IndexDelta {
            inserts: 0,
            removes,
        }
    }

    fn drop_entries_of(&mut self, doc_id: &DocId) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.doc_id != *doc_id);

        (before - self.entries.len()) as u64
    }

    ///
    /// READ PRIMITIVES
    ///

    /// Ordered slice of every entry whose key falls inside the bounds.
    #[must_use]
    pub fn range_slice(&self, lower: Bound<&Key>, upper: Bound<&Key>) -> &[IndexEntry] {
        let lo = self.lower_position(lower);
        let hi = self.upper_position(upper);
        if lo >= hi {
            return &[];
        }

        &self.entries[lo..hi]
    }

    /// Every entry exactly matching `key`, ordered by `(doc_id, ordinal)`.
    #[must_use]
    pub fn point_slice(&self, key: &Key) -> &[IndexEntry] {
        self.range_slice(Bound::Included(key), Bound::Included(key))
    }

    /// Entry count inside the bounds, computed from positions without
    /// materializing the slice.
    #[must_use]
    pub fn count_range(&self, lower: Bound<&Key>, upper: Bound<&Key>) -> u64 {
        let lo = self.lower_position(lower);
        let hi = self.upper_position(upper);

        hi.saturating_sub(lo) as u64
    }

    fn lower_position(&self, bound: Bound<&Key>) -> usize {
        self.entries.partition_point(|entry| match bound {
            Bound::Included(key) => Key::canonical_cmp(&entry.key, key) == Ordering::Less,
            Bound::Excluded(key) => Key::canonical_cmp(&entry.key, key) != Ordering::Greater,
            Bound::Unbounded => false,
        })
    }

    fn upper_position(&self, bound: Bound<&Key>) -> usize {
        self.entries.partition_point(|entry| match bound {
            Bound::Included(key) => Key::canonical_cmp(&entry.key, key) != Ordering::Greater,
            Bound::Excluded(key) => Key::canonical_cmp(&entry.key, key) == Ordering::Less,
            Bound::Unbounded => true,
        })
    }

    ///
    /// CONSISTENCY
    ///

    /// Validate the total order invariant; used by debug assertions after
    /// every replace.
    pub fn verify_ordered(&self) -> Result<(), InternalError> {
        for window in self.entries.windows(2) {
            if cmp_entry_order(&window[0], &window[1]) == Ordering::Greater {
                return Err(InternalError::index_invariant(format!(
                    "entries out of order near key {}",
                    window[1].key
                )));
            }
        }

        Ok(())
    }
}
