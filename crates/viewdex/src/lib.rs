//! Viewdex — deterministic view indexing and grouped aggregation for
//! document stores.
//!
//! This is the public meta-crate. Downstream users depend on **viewdex**
//! only; it re-exports the stable public API from `viewdex-core`:
//! documents and values, view definitions, the projection engine, the index
//! maintainer, and the query/reduce read surfaces.

pub use viewdex_core as core;

//
// Stable surface
//

pub use viewdex_core::{
    catalog,
    document::{DocId, Document, Revision},
    index::{IndexEntry, ViewIndex},
    key::{Key, KeyError},
    maintain::{BackoffPolicy, IndexMaintainer, ProjectionDiagnostic, SyncReport},
    obs::{metrics_report, metrics_reset_all},
    projection::{Emission, EngineConfig, ProjectionEngine, ProjectionError, TokenizerConfig},
    query::{QueryError, QueryExecutor, ScanRange, ScanWindow},
    reduce::ReduceAggregator,
    registry::{RegistryError, ViewRegistry},
    store::{ChangeEvent, ChangeKind, ChangeSeq, DocumentStore, MemoryStore, StoreError},
    value::Value,
    view::{EmitFilter, Projection, ReduceKind, ValueSpec, ViewDefinition, ViewName},
};

//
// Prelude
//

pub mod prelude {
    pub use viewdex_core::prelude::*;
}
