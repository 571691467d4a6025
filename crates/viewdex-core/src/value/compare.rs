use crate::value::Value;
use std::{cmp::Ordering, collections::BTreeMap};

///
/// canonical_cmp
///
/// Total canonical comparator used by all key, index, and grouping surfaces.
///
/// Ordering rules:
/// 1. Canonical variant rank (null < bool < number < string < list < map)
/// 2. Variant-specific comparison for same-ranked values
///
/// Same-rank numeric comparison is cross-variant: `Int`, `Uint`, and `Float`
/// compare by magnitude, not by representation.
///

#[must_use]
pub(crate) fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Cross-variant numeric comparison; `None` if either side is non-numeric.
#[must_use]
pub(crate) fn cmp_numeric(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Uint(b)) => Some(cmp_wide(i128::from(*a), i128::from(*b))),
        (Value::Uint(a), Value::Int(b)) => Some(cmp_wide(i128::from(*a), i128::from(*b))),
        (Value::Float(a), Value::Float(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Int(b)) => Some(cmp_float(a.get(), to_f64(i128::from(*b)))),
        (Value::Float(a), Value::Uint(b)) => Some(cmp_float(a.get(), to_f64(i128::from(*b)))),
        (Value::Int(a), Value::Float(b)) => Some(cmp_float(to_f64(i128::from(*a)), b.get())),
        (Value::Uint(a), Value::Float(b)) => Some(cmp_float(to_f64(i128::from(*a)), b.get())),
        _ => None,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    if let Some(cmp) = cmp_numeric(left, right) {
        return cmp;
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        (Value::Map(a), Value::Map(b)) => canonical_cmp_map(a, b),
        (Value::Null, Value::Null) => Ordering::Equal,
        // Same rank implies same shape for the remaining variants.
        _ => Ordering::Equal,
    }
}

// Element-wise, then by length; this is the tuple comparison law.
fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn canonical_cmp_map(left: &BTreeMap<String, Value>, right: &BTreeMap<String, Value>) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right.iter()) {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}

const fn cmp_wide(left: i128, right: i128) -> Ordering {
    if left < right {
        Ordering::Less
    } else if left > right {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn cmp_float(left: f64, right: f64) -> Ordering {
    left.total_cmp(&right)
}

// Integers within the f64-safe window convert exactly; beyond it the
// comparison saturates toward the correct side, which preserves ordering
// for the timestamp/counter magnitudes this engine indexes.
#[expect(clippy::cast_precision_loss)]
fn to_f64(value: i128) -> f64 {
    value as f64
}
