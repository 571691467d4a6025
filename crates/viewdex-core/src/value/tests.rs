use crate::value::{Float64, Value};
use std::cmp::Ordering;

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn rank_order_matches_fixed_collation() {
    let ladder = [
        Value::Null,
        Value::Bool(true),
        Value::Int(999),
        text("a"),
        Value::List(vec![Value::Null]),
    ];

    for window in ladder.windows(2) {
        assert_eq!(
            Value::canonical_cmp(&window[0], &window[1]),
            Ordering::Less,
            "{} must collate before {}",
            window[0],
            window[1],
        );
    }
}

#[test]
fn bool_orders_false_before_true() {
    assert_eq!(
        Value::canonical_cmp(&Value::Bool(false), &Value::Bool(true)),
        Ordering::Less
    );
}

#[test]
fn numbers_collate_across_variants() {
    assert_eq!(
        Value::canonical_cmp(&Value::Int(-1), &Value::Uint(0)),
        Ordering::Less
    );
    assert_eq!(
        Value::canonical_cmp(&Value::Uint(3), &Value::Int(3)),
        Ordering::Equal
    );
    assert_eq!(
        Value::canonical_cmp(&Value::Float(Float64::new(2.5)), &Value::Int(2)),
        Ordering::Greater
    );
    assert_eq!(
        Value::canonical_cmp(&Value::Float(Float64::new(2.0)), &Value::Uint(2)),
        Ordering::Equal
    );
}

#[test]
fn text_orders_by_code_unit() {
    assert_eq!(Value::canonical_cmp(&text("A"), &text("a")), Ordering::Less);
    assert_eq!(
        Value::canonical_cmp(&text("ab"), &text("abc")),
        Ordering::Less
    );
}

#[test]
fn lists_compare_element_wise_then_by_length() {
    let short = Value::List(vec![text("a"), Value::Int(1)]);
    let long = Value::List(vec![text("a"), Value::Int(1), Value::Int(0)]);
    let greater = Value::List(vec![text("a"), Value::Int(2)]);

    assert_eq!(Value::canonical_cmp(&short, &long), Ordering::Less);
    assert_eq!(Value::canonical_cmp(&short, &greater), Ordering::Less);
    assert_eq!(Value::canonical_cmp(&greater, &long), Ordering::Greater);
}

#[test]
fn cmp_numeric_rejects_non_numeric_operands() {
    assert!(Value::Int(1).cmp_numeric(&text("1")).is_none());
    assert!(Value::Null.cmp_numeric(&Value::Int(1)).is_none());
}

#[test]
fn truthiness_follows_portal_convention() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!text("").is_truthy());
    assert!(text("x").is_truthy());
    assert!(Value::Uint(1).is_truthy());
    // Lists are truthy even when empty.
    assert!(Value::List(vec![]).is_truthy());
}

#[test]
fn json_numbers_map_to_narrowest_variant() {
    let from_int: Value = serde_json::json!(-4).into();
    let from_uint: Value = serde_json::json!(u64::MAX).into();
    let from_float: Value = serde_json::json!(1.25).into();

    assert_eq!(from_int, Value::Int(-4));
    assert_eq!(from_uint, Value::Uint(u64::MAX));
    assert_eq!(from_float, Value::Float(Float64::new(1.25)));
}

#[test]
fn json_object_round_trips_through_map() {
    let value: Value = serde_json::json!({
        "changed": { "login_failure": "bad password" },
        "tags": ["Project:Alpha", "solo"],
    })
    .into();

    let map = value.as_map().expect("object should convert to map");
    let changed = map.get("changed").and_then(Value::as_map).expect("nested");
    assert_eq!(
        changed.get("login_failure").and_then(Value::as_text),
        Some("bad password")
    );
    assert_eq!(
        map.get("tags").and_then(Value::as_list).map(<[Value]>::len),
        Some(2)
    );
}

#[test]
fn scalar_predicate_excludes_collections() {
    assert!(Value::Null.is_scalar());
    assert!(text("x").is_scalar());
    assert!(!Value::List(vec![]).is_scalar());
    assert!(!Value::Map(std::collections::BTreeMap::new()).is_scalar());
}

#[test]
fn numeric_predicate_covers_all_three_variants() {
    assert!(Value::Int(-1).is_numeric());
    assert!(Value::Uint(1).is_numeric());
    assert!(Value::Float(Float64::new(0.5)).is_numeric());
    assert!(!text("1").is_numeric());
    assert!(!Value::Bool(true).is_numeric());
}

#[test]
fn float_total_order_handles_nan() {
    let nan = Value::Float(Float64::new(f64::NAN));
    let one = Value::Float(Float64::new(1.0));

    assert_eq!(Value::canonical_cmp(&one, &nan), Ordering::Less);
    assert_eq!(Value::canonical_cmp(&nan, &nan), Ordering::Equal);
}
