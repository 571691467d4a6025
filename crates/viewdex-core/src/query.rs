use crate::{
    index::IndexEntry,
    key::Key,
    maintain::IndexMaintainer,
    obs::sink::{self, MetricsEvent},
    view::ViewName,
};
use std::ops::Bound;
use thiserror::Error as ThisError;

///
/// QueryError
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("unknown view: {name}")]
    UnknownView { name: ViewName },
}

///
/// ScanRange
///
/// Key bounds of one range scan. Absent keys mean open-ended; both bounds
/// default to inclusive.
///
/// `descending` reverses enumeration order. When both bounds are given with
/// `descending`, the caller passes them already swapped: `start_key` is the
/// UPPER bound and `end_key` the lower one, mirroring the ordering
/// semantics of an ordered scan. Passing un-swapped bounds yields an empty
/// result, not an error.
///

#[derive(Clone, Debug, Default)]
pub struct ScanRange {
    pub start_key: Option<Key>,
    pub end_key: Option<Key>,
    pub exclusive_start: bool,
    pub exclusive_end: bool,
    pub descending: bool,
}

impl ScanRange {
    /// The full index, ascending.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start(mut self, key: Key) -> Self {
        self.start_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_end(mut self, key: Key) -> Self {
        self.end_key = Some(key);
        self
    }

    #[must_use]
    pub const fn exclusive_start(mut self) -> Self {
        self.exclusive_start = true;
        self
    }

    #[must_use]
    pub const fn exclusive_end(mut self) -> Self {
        self.exclusive_end = true;
        self
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    // Lower/upper bounds in key order, undoing the descending swap.
    fn bounds(&self) -> (Bound<&Key>, Bound<&Key>) {
        let start = bound_of(self.start_key.as_ref(), self.exclusive_start);
        let end = bound_of(self.end_key.as_ref(), self.exclusive_end);

        if self.descending {
            (end, start)
        } else {
            (start, end)
        }
    }
}

fn bound_of(key: Option<&Key>, exclusive: bool) -> Bound<&Key> {
    match key {
        None => Bound::Unbounded,
        Some(key) if exclusive => Bound::Excluded(key),
        Some(key) => Bound::Included(key),
    }
}

///
/// ScanWindow
///
/// Post-scan pagination window. `skip`/`limit` slice the already-ordered
/// result; they are not a stability guarantee across concurrent mutations.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanWindow {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl ScanWindow {
    #[must_use]
    pub const fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    /// Rows fetched after skipping; unbounded when no limit is set.
    #[must_use]
    pub const fn fetch_count(&self) -> usize {
        match self.limit {
            Some(limit) => limit,
            None => usize::MAX,
        }
    }
}

///
/// QueryExecutor
///
/// Read-only range and point lookups against the maintainer's current
/// snapshots. Every operation reads one point-in-time `Arc` snapshot and
/// never blocks the maintainer.
///

pub struct QueryExecutor<'a> {
    maintainer: &'a IndexMaintainer,
}

impl<'a> QueryExecutor<'a> {
    #[must_use]
    pub const fn new(maintainer: &'a IndexMaintainer) -> Self {
        Self { maintainer }
    }

    /// Ordered range scan over one view.
    pub fn range_scan(
        &self,
        view: &ViewName,
        range: &ScanRange,
        window: &ScanWindow,
    ) -> Result<Vec<IndexEntry>, QueryError> {
        let snapshot = self.maintainer.snapshot(view)?;
        let (lower, upper) = range.bounds();
        let slice = snapshot.range_slice(lower, upper);
        sink::record(MetricsEvent::RangeScan);

        Ok(if range.descending {
            slice
                .iter()
                .rev()
                .skip(window.skip)
                .take(window.fetch_count())
                .cloned()
                .collect()
        } else {
            slice
                .iter()
                .skip(window.skip)
                .take(window.fetch_count())
                .cloned()
                .collect()
        })
    }

    /// Every entry exactly matching `key`, ordered by `(doc_id, ordinal)`.
    /// Fan-out means one key may hold many entries.
    pub fn point_lookup(&self, view: &ViewName, key: &Key) -> Result<Vec<IndexEntry>, QueryError> {
        let snapshot = self.maintainer.snapshot(view)?;
        sink::record(MetricsEvent::PointLookup);

        Ok(snapshot.point_slice(key).to_vec())
    }

    /// Every entry whose text key starts with `prefix`, ascending.
    ///
    /// This is the start-key/ceiling idiom used for keyword-token prefix
    /// search: the upper bound is the prefix extended by the maximum
    /// scalar character.
    pub fn prefix_scan(
        &self,
        view: &ViewName,
        prefix: &str,
        window: &ScanWindow,
    ) -> Result<Vec<IndexEntry>, QueryError> {
        let mut ceiling = prefix.to_string();
        ceiling.push(char::MAX);

        let range = ScanRange::all()
            .with_start(Key::text(prefix))
            .with_end(Key::text(ceiling))
            .exclusive_end();

        self.range_scan(view, &range, window)
    }
}
