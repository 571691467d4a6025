use crate::value::Value;
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};

///
/// ViewName
///
/// Name of one registered view, conventionally `doctype/purpose`
/// (e.g. `order/status`, `account/email`).
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ViewName(String);

impl ViewName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for ViewName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ViewName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

///
/// ValueSpec
///
/// What a projection emits as the entry value.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ValueSpec {
    /// Emit null.
    Null,
    /// Emit the literal 1; the convention for count-reduced views.
    One,
    /// Emit the named field's value (null when absent).
    Field(String),
    /// Emit a list of the named fields' values (nulls when absent).
    Fields(Vec<String>),
}

impl ValueSpec {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }
}

///
/// EmitFilter
///
/// Optional second-line predicate applied after the doctype filter.
/// Status-partitioned view families are realized as one view per partition,
/// each carrying an `Equals` filter against its status literal.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EmitFilter {
    /// Emit only when the field is present and truthy.
    Present { field: String },
    /// Emit only when the field is absent or falsy.
    Absent { field: String },
    /// Emit only when the field equals the literal.
    Equals { field: String, value: Value },
}

impl EmitFilter {
    #[must_use]
    pub fn present(field: impl Into<String>) -> Self {
        Self::Present {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn absent(field: impl Into<String>) -> Self {
        Self::Absent {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }
}

///
/// Projection
///
/// The closed set of projection kinds. Each is a pure mapping from one
/// document to zero or more (key, value) emissions; the engine executes
/// them without touching any state beyond the given document.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Projection {
    /// Emit the field's value as a scalar key.
    Field { field: String, value: ValueSpec },

    /// Emit a tuple key from two or more named fields, all required.
    Composite {
        fields: Vec<String>,
        value: ValueSpec,
    },

    /// Emit one entry per element of a list field; `append` extends each
    /// element into a tuple with trailing scalar fields.
    FanOut {
        field: String,
        append: Vec<String>,
        value: ValueSpec,
    },

    /// Tokenized keyword projection over a text field; each surviving token
    /// is emitted with the original un-normalized text as value.
    Keyword { field: String },

    /// Colon-delimited tag projection over a list field: the whole tag
    /// lower-cased, plus the bare suffix when exactly one colon is present.
    Tag { field: String, value: ValueSpec },
}

///
/// ReduceKind
///
/// Count is the only reduce operator.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ReduceKind {
    Count,
}

///
/// ViewDefinition
///
/// One named (projection, optional reduce) pair defining one secondary
/// index. Immutable once registered.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ViewDefinition {
    pub name: ViewName,
    pub doctype: String,
    pub filter: Option<EmitFilter>,
    pub projection: Projection,
    pub reduce: Option<ReduceKind>,
}

impl ViewDefinition {
    #[must_use]
    pub fn new(
        name: impl Into<ViewName>,
        doctype: impl Into<String>,
        projection: Projection,
    ) -> Self {
        Self {
            name: name.into(),
            doctype: doctype.into(),
            filter: None,
            projection,
            reduce: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: EmitFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn with_reduce(mut self, reduce: ReduceKind) -> Self {
        self.reduce = Some(reduce);
        self
    }
}
