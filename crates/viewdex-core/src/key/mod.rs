
use crate::{MAX_KEY_ELEMENTS, value::Value};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error as ThisError;

///
/// Key
///
/// The atomic, normalized unit of the index keyspace: a single scalar, or an
/// ordered tuple of scalars for two- and three-level sorts (owner-then-
/// timestamp, owner-then-status-then-timestamp).
///
/// Collation is total and fixed: every scalar orders by the canonical value
/// collation (null < bool < number < string), and every tuple orders after
/// every scalar, element-wise among tuples.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Key {
    Scalar(Value),
    Tuple(Vec<Value>),
}

///
/// KeyError
///
/// Malformed key shapes rejected at construction.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum KeyError {
    #[error("tuple key must contain at least one element")]
    EmptyTuple,

    #[error("tuple element {index} is not a scalar")]
    NonScalarElement { index: usize },

    #[error("scalar key must not be a list or map")]
    NonScalarKey,

    #[error("tuple key has {len} elements (limit {MAX_KEY_ELEMENTS})")]
    TooManyElements { len: usize },
}

impl Key {
    /// Build a scalar key; lists and maps are rejected.
    pub fn scalar(value: impl Into<Value>) -> Result<Self, KeyError> {
        let value = value.into();
        if !value.is_scalar() {
            return Err(KeyError::NonScalarKey);
        }

        Ok(Self::Scalar(value))
    }

    /// Build a composite key; every element must be scalar and the element
    /// count bounded by [`MAX_KEY_ELEMENTS`].
    pub fn tuple(elements: Vec<Value>) -> Result<Self, KeyError> {
        if elements.is_empty() {
            return Err(KeyError::EmptyTuple);
        }
        if elements.len() > MAX_KEY_ELEMENTS {
            return Err(KeyError::TooManyElements {
                len: elements.len(),
            });
        }
        for (index, element) in elements.iter().enumerate() {
            if !element.is_scalar() {
                return Err(KeyError::NonScalarElement { index });
            }
        }

        Ok(Self::Tuple(elements))
    }

    /// Build a scalar text key; used by tokenized and tag projections.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(Value::Text(value.into()))
    }

    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Number of elements: 1 for scalars, tuple arity otherwise.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Tuple(elements) => elements.len(),
        }
    }

    /// Truncate to the leading `level` tuple elements for grouped
    /// aggregation. Level 0 means the whole key; scalar keys always group
    /// whole; a truncation to a single element degrades to a scalar key.
    #[must_use]
    pub fn group_prefix(&self, level: usize) -> Self {
        match self {
            Self::Scalar(_) => self.clone(),
            Self::Tuple(elements) => {
                if level == 0 || level >= elements.len() {
                    return self.clone();
                }
                if level == 1 {
                    return Self::Scalar(elements[0].clone());
                }

                Self::Tuple(elements[..level].to_vec())
            }
        }
    }

    /// Total canonical comparator for keys.
    ///
    /// Scalars order among themselves by value collation; every tuple
    /// orders after every scalar; tuples order element-wise, then by arity.
    #[must_use]
    pub fn canonical_cmp(left: &Self, right: &Self) -> Ordering {
        match (left, right) {
            (Self::Scalar(a), Self::Scalar(b)) => Value::canonical_cmp(a, b),
            (Self::Scalar(_), Self::Tuple(_)) => Ordering::Less,
            (Self::Tuple(_), Self::Scalar(_)) => Ordering::Greater,
            (Self::Tuple(a), Self::Tuple(b)) => cmp_elements(a, b),
        }
    }
}

fn cmp_elements(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = Value::canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

// Equality must agree with the canonical comparator so that numerically
// equal keys (e.g. Int 3 and Uint 3) are one key, not two.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        Self::canonical_cmp(self, other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::canonical_cmp(self, other)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Self::canonical_cmp(self, other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, ")")
            }
        }
    }
}
