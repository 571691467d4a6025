//! Observability: runtime counters and the sink abstraction.
//!
//! This module does not access index internals directly.
//! Engine-level index inspection lives in `index` and `maintain`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventReport, EventState, OpCounters, ViewCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
