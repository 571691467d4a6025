mod tokenizer;


use crate::{
    document::Document,
    key::{Key, KeyError},
    value::Value,
    view::{EmitFilter, Projection, ValueSpec, ViewDefinition},
};
use thiserror::Error as ThisError;

// re-exports
pub use tokenizer::{TOKENIZER_POLICY_VERSION, TokenizerConfig};

///
/// EngineConfig
///
/// Immutable engine configuration, constructed once at process start and
/// injected into the engine. No global mutable state.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EngineConfig {
    pub tokenizer: TokenizerConfig,
}

///
/// ProjectionError
///
/// Malformed input for one (view, document) pair. Caught by the maintainer,
/// counted, and treated as an empty contribution; never fatal to other
/// documents or views.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum ProjectionError {
    #[error("field '{field}' is not a list")]
    FieldNotList { field: String },

    #[error("field '{field}' is not text")]
    FieldNotText { field: String },

    #[error("key construction failed: {0}")]
    Key(#[from] KeyError),

    #[error("list field '{field}' element {index} is not a scalar")]
    ListElementNotScalar { field: String, index: usize },

    #[error("required field '{field}' is missing")]
    MissingField { field: String },
}

///
/// Emission
///
/// One (key, value) pair produced by a projection for one document.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Emission {
    pub key: Key,
    pub value: Value,
}

impl Emission {
    fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }
}

///
/// ProjectionEngine
///
/// Executes a view's projection against one document. Pure: reads only the
/// given document and the immutable engine configuration; no other
/// document, no external state, no wall clock.
///

#[derive(Clone, Debug, Default)]
pub struct ProjectionEngine {
    config: EngineConfig,
}

impl ProjectionEngine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one view's projection against one document.
    ///
    /// Non-matching doctypes and failed filters yield the empty sequence;
    /// malformed fields yield a `ProjectionError`, never a panic.
    pub fn project(
        &self,
        view: &ViewDefinition,
        doc: &Document,
    ) -> Result<Vec<Emission>, ProjectionError> {
        // First-line type filter.
        if doc.doctype != view.doctype {
            return Ok(Vec::new());
        }
        if let Some(filter) = &view.filter
            && !filter_passes(filter, doc)
        {
            return Ok(Vec::new());
        }

        match &view.projection {
            Projection::Field { field, value } => project_field(doc, field, value),
            Projection::Composite { fields, value } => project_composite(doc, fields, value),
            Projection::FanOut {
                field,
                append,
                value,
            } => project_fan_out(doc, field, append, value),
            Projection::Keyword { field } => project_keyword(doc, field, &self.config.tokenizer),
            Projection::Tag { field, value } => project_tag(doc, field, value),
        }
    }
}

fn filter_passes(filter: &EmitFilter, doc: &Document) -> bool {
    match filter {
        EmitFilter::Present { field } => doc.field(field).is_some_and(|v| v.is_truthy()),
        EmitFilter::Absent { field } => !doc.field(field).is_some_and(|v| v.is_truthy()),
        EmitFilter::Equals { field, value } => doc.field(field).as_ref() == Some(value),
    }
}

fn require_field(doc: &Document, field: &str) -> Result<Value, ProjectionError> {
    doc.field(field).ok_or_else(|| ProjectionError::MissingField {
        field: field.to_string(),
    })
}

fn resolve_value(spec: &ValueSpec, doc: &Document) -> Value {
    match spec {
        ValueSpec::Null => Value::Null,
        ValueSpec::One => Value::Int(1),
        ValueSpec::Field(name) => doc.field(name).unwrap_or(Value::Null),
        ValueSpec::Fields(names) => Value::List(
            names
                .iter()
                .map(|name| doc.field(name).unwrap_or(Value::Null))
                .collect(),
        ),
    }
}

fn project_field(
    doc: &Document,
    field: &str,
    value: &ValueSpec,
) -> Result<Vec<Emission>, ProjectionError> {
    let key = Key::scalar(require_field(doc, field)?)?;

    Ok(vec![Emission::new(key, resolve_value(value, doc))])
}

fn project_composite(
    doc: &Document,
    fields: &[String],
    value: &ValueSpec,
) -> Result<Vec<Emission>, ProjectionError> {
    let mut elements = Vec::with_capacity(fields.len());
    for field in fields {
        elements.push(require_field(doc, field)?);
    }
    let key = Key::tuple(elements)?;

    Ok(vec![Emission::new(key, resolve_value(value, doc))])
}

fn project_fan_out(
    doc: &Document,
    field: &str,
    append: &[String],
    value: &ValueSpec,
) -> Result<Vec<Emission>, ProjectionError> {
    // Absent list fields yield no fan-out entries; this is not an error.
    let Some(list) = doc.field(field) else {
        return Ok(Vec::new());
    };
    let Some(items) = list.as_list() else {
        return Err(ProjectionError::FieldNotList {
            field: field.to_string(),
        });
    };

    let mut appended = Vec::with_capacity(append.len());
    for name in append {
        appended.push(require_field(doc, name)?);
    }

    let emitted = resolve_value(value, doc);
    let mut emissions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_scalar() {
            return Err(ProjectionError::ListElementNotScalar {
                field: field.to_string(),
                index,
            });
        }

        let key = if append.is_empty() {
            Key::scalar(item.clone())?
        } else {
            let mut elements = Vec::with_capacity(1 + appended.len());
            elements.push(item.clone());
            elements.extend(appended.iter().cloned());
            Key::tuple(elements)?
        };
        emissions.push(Emission::new(key, emitted.clone()));
    }

    Ok(emissions)
}

fn project_keyword(
    doc: &Document,
    field: &str,
    tokenizer: &TokenizerConfig,
) -> Result<Vec<Emission>, ProjectionError> {
    let raw = require_field(doc, field)?;
    let Some(text) = raw.as_text() else {
        return Err(ProjectionError::FieldNotText {
            field: field.to_string(),
        });
    };

    // One emission per surviving token occurrence, each carrying the
    // original un-normalized text as value.
    let original = Value::Text(text.to_string());
    Ok(tokenizer
        .tokenize(text)
        .into_iter()
        .map(|token| Emission::new(Key::text(token), original.clone()))
        .collect())
}

fn project_tag(
    doc: &Document,
    field: &str,
    value: &ValueSpec,
) -> Result<Vec<Emission>, ProjectionError> {
    let Some(list) = doc.field(field) else {
        return Ok(Vec::new());
    };
    let Some(tags) = list.as_list() else {
        return Err(ProjectionError::FieldNotList {
            field: field.to_string(),
        });
    };

    let emitted = resolve_value(value, doc);
    let mut emissions = Vec::new();
    for tag in tags {
        let Some(text) = tag.as_text() else {
            return Err(ProjectionError::FieldNotText {
                field: field.to_string(),
            });
        };

        emissions.push(Emission::new(Key::text(text.to_lowercase()), emitted.clone()));

        // Qualified `namespace:value` tags are also reachable by bare value.
        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() == 2 {
            emissions.push(Emission::new(
                Key::text(parts[1].to_lowercase()),
                emitted.clone(),
            ));
        }
    }

    Ok(emissions)
}
