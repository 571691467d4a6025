use crate::value::Value;

///
/// Canonical Value Rank
///
/// Stable rank used for cross-variant ordering: null < bool < number <
/// string < list < map. All three numeric variants share one rank so that
/// numbers collate numerically rather than by representation.
///
/// IMPORTANT:
/// Rank order is part of deterministic index behavior and must remain fixed
/// unless an intentional breaking migration is performed.
///

pub(crate) const RANK_NULL: u8 = 0;
pub(crate) const RANK_BOOL: u8 = 1;
pub(crate) const RANK_NUMBER: u8 = 2;
pub(crate) const RANK_TEXT: u8 = 3;
pub(crate) const RANK_LIST: u8 = 4;
pub(crate) const RANK_MAP: u8 = 5;

#[must_use]
pub(crate) const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => RANK_NULL,
        Value::Bool(_) => RANK_BOOL,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => RANK_NUMBER,
        Value::Text(_) => RANK_TEXT,
        Value::List(_) => RANK_LIST,
        Value::Map(_) => RANK_MAP,
    }
}
