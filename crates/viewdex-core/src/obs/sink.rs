//! Metrics sink boundary.
//!
//! Engine logic MUST NOT depend on `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`; this
//! module is the only bridge between execution logic and the metrics state.

use crate::{obs::metrics, view::ViewName};

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    DocumentIndexed,
    DocumentRemoved,
    ProjectionFailure { view: ViewName },
    IndexDelta { view: ViewName, inserts: u64, removes: u64 },
    Rebuild,
    RangeScan,
    PointLookup,
    Reduce,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into the global metrics state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::DocumentIndexed => {
                metrics::with_state_mut(|m| {
                    m.ops.documents_indexed = m.ops.documents_indexed.saturating_add(1);
                });
            }

            MetricsEvent::DocumentRemoved => {
                metrics::with_state_mut(|m| {
                    m.ops.documents_removed = m.ops.documents_removed.saturating_add(1);
                });
            }

            MetricsEvent::ProjectionFailure { view } => {
                metrics::with_state_mut(|m| {
                    m.ops.projection_failures = m.ops.projection_failures.saturating_add(1);
                    let entry = m.views.entry(view.to_string()).or_default();
                    entry.projection_failures = entry.projection_failures.saturating_add(1);
                });
            }

            MetricsEvent::IndexDelta {
                view,
                inserts,
                removes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);
                    let entry = m.views.entry(view.to_string()).or_default();
                    entry.index_inserts = entry.index_inserts.saturating_add(inserts);
                    entry.index_removes = entry.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::Rebuild => {
                metrics::with_state_mut(|m| {
                    m.ops.rebuilds = m.ops.rebuilds.saturating_add(1);
                });
            }

            MetricsEvent::RangeScan => {
                metrics::with_state_mut(|m| {
                    m.ops.range_scans = m.ops.range_scans.saturating_add(1);
                });
            }

            MetricsEvent::PointLookup => {
                metrics::with_state_mut(|m| {
                    m.ops.point_lookups = m.ops.point_lookups.saturating_add(1);
                });
            }

            MetricsEvent::Reduce => {
                metrics::with_state_mut(|m| {
                    m.ops.reduces = m.ops.reduces.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    GLOBAL_METRICS_SINK.record(event);
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

///
/// TESTS
///
