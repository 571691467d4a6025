use crate::value::Value;
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// DocId
///
/// Opaque document identifier owned by the document store.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

///
/// Revision
///
/// Opaque version marker of a document. Compared only for equality; the
/// store owns its sequencing.
///

#[derive(Clone, Debug, Deref, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    #[must_use]
    pub fn new(revision: impl Into<String>) -> Self {
        Self(revision.into())
    }
}

impl From<&str> for Revision {
    fn from(revision: &str) -> Self {
        Self(revision.to_string())
    }
}

impl From<String> for Revision {
    fn from(revision: String) -> Self {
        Self(revision)
    }
}

///
/// Document
///
/// One stored document as read by the indexing layer. The store owns the
/// document; projections only read it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub revision: Revision,
    pub doctype: String,
    pub fields: BTreeMap<String, Value>,
}

/// Synthetic field path resolving to the document id.
pub const DOC_ID_FIELD: &str = "_id";

impl Document {
    #[must_use]
    pub fn new(
        id: impl Into<DocId>,
        revision: impl Into<Revision>,
        doctype: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision: revision.into(),
            doctype: doctype.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion, for tests and fixtures.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field by path.
    ///
    /// Dotted paths traverse nested maps (`changed.login_failure`); the
    /// synthetic `_id` path resolves to the document id.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<Value> {
        if path == DOC_ID_FIELD {
            return Some(Value::Text(self.id.to_string()));
        }

        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }

        Some(current.clone())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_resolves_flat_and_dotted_paths() {
        let doc = Document::new("d1", "1-a", "log")
            .with_field("entity", "o42")
            .with_field(
                "changed",
                Value::Map(
                    std::iter::once(("login_failure".to_string(), Value::from("bad password")))
                        .collect(),
                ),
            );

        assert_eq!(doc.field("entity"), Some(Value::from("o42")));
        assert_eq!(
            doc.field("changed.login_failure"),
            Some(Value::from("bad password"))
        );
        assert_eq!(doc.field("changed.missing"), None);
        assert_eq!(doc.field("absent"), None);
    }

    #[test]
    fn synthetic_id_path_resolves_to_document_id() {
        let doc = Document::new("m7", "1-a", "message");
        assert_eq!(doc.field("_id"), Some(Value::from("m7")));
    }

    #[test]
    fn dotted_path_through_scalar_yields_none() {
        let doc = Document::new("d1", "1-a", "order").with_field("title", "Widget Order");
        assert_eq!(doc.field("title.inner"), None);
    }
}
