use crate::{
    key::Key,
    maintain::IndexMaintainer,
    obs::sink::{self, MetricsEvent},
    query::QueryError,
    view::ViewName,
};
use std::{collections::BTreeMap, ops::Bound};

///
/// ReduceAggregator
///
/// Grouped counting over one view's current snapshot. Count is the only
/// reduce operator; `count` over a range is required to equal the length of
/// the equivalent range scan, and is computed from sorted positions without
/// materializing the rows.
///

pub struct ReduceAggregator<'a> {
    maintainer: &'a IndexMaintainer,
}

impl<'a> ReduceAggregator<'a> {
    #[must_use]
    pub const fn new(maintainer: &'a IndexMaintainer) -> Self {
        Self { maintainer }
    }

    /// Number of entries with keys inside the (inclusive) bounds; absent
    /// bounds mean open-ended.
    pub fn count(
        &self,
        view: &ViewName,
        start_key: Option<&Key>,
        end_key: Option<&Key>,
    ) -> Result<u64, QueryError> {
        let snapshot = self.maintainer.snapshot(view)?;
        sink::record(MetricsEvent::Reduce);

        let lower = start_key.map_or(Bound::Unbounded, Bound::Included);
        let upper = end_key.map_or(Bound::Unbounded, Bound::Included);

        Ok(snapshot.count_range(lower, upper))
    }

    /// Entry counts grouped by truncated key.
    ///
    /// For composite keys, `group_level` selects how many leading tuple
    /// elements form the group (owner only, owner+status, ...); level 0
    /// groups by the entire key, and scalar keys always group whole.
    pub fn grouped_count(
        &self,
        view: &ViewName,
        group_level: usize,
    ) -> Result<BTreeMap<Key, u64>, QueryError> {
        let snapshot = self.maintainer.snapshot(view)?;
        sink::record(MetricsEvent::Reduce);

        let mut groups: BTreeMap<Key, u64> = BTreeMap::new();
        for entry in snapshot.entries() {
            let group = entry.key.group_prefix(group_level);
            *groups.entry(group).or_insert(0) += 1;
        }

        Ok(groups)
    }
}
