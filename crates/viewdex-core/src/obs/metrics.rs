use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

///
/// OpCounters
/// Engine-wide operation counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpCounters {
    pub documents_indexed: u64,
    pub documents_removed: u64,
    pub projection_failures: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
    pub rebuilds: u64,
    pub range_scans: u64,
    pub point_lookups: u64,
    pub reduces: u64,
}

///
/// ViewCounters
/// Per-view counter breakdown.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ViewCounters {
    pub projection_failures: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
}

///
/// EventState
/// Process-local metrics state; mutated only through the sink boundary.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: OpCounters,
    pub views: BTreeMap<String, ViewCounters>,
}

///
/// EventReport
/// Point-in-time snapshot of the metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: EventState,
}

pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    STATE.with(|state| f(&state.borrow()))
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot the current metrics state.
#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|state| EventReport {
        counters: state.clone(),
    })
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|state| *state = EventState::default());
}
