//! End-to-end behavior of the indexing layer: registration, incremental
//! maintenance, range/point reads, and grouped counting over one maintainer.

use viewdex_core::{
    catalog,
    document::{DocId, Document},
    key::Key,
    maintain::IndexMaintainer,
    projection::{EngineConfig, ProjectionEngine},
    query::{QueryError, QueryExecutor, ScanRange, ScanWindow},
    reduce::ReduceAggregator,
    store::{DocumentStore, MemoryStore},
    value::Value,
    view::{Projection, ValueSpec, ViewDefinition, ViewName},
};

fn standard_maintainer() -> IndexMaintainer {
    let mut maintainer = IndexMaintainer::new(ProjectionEngine::new(EngineConfig::default()));
    for view in catalog::standard_views() {
        maintainer.register(view).expect("register catalog view");
    }
    assert_eq!(maintainer.registry().len(), 27);

    maintainer
}

fn view(name: &str) -> ViewName {
    ViewName::from(name)
}

fn widget_order() -> Document {
    Document::new("d1", "1-a", "order")
        .with_field("owner", "a@x.com")
        .with_field("status", "enabled")
        .with_field("modified", "2024-01-01T00:00:00Z")
        .with_field("title", "Widget Order")
}

#[test]
fn owner_status_modified_scenario_indexes_and_unindexes_one_order() {
    let maintainer = standard_maintainer();
    maintainer.apply_document(&widget_order());

    let executor = QueryExecutor::new(&maintainer);
    let entries = executor
        .range_scan(
            &view("order/owner_status"),
            &ScanRange::all(),
            &ScanWindow::default(),
        )
        .expect("scan");

    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].key,
        Key::tuple(vec![
            Value::from("a@x.com"),
            Value::from("enabled"),
            Value::from("2024-01-01T00:00:00Z"),
        ])
        .expect("key")
    );
    assert_eq!(entries[0].value, Value::Int(1));

    let reducer = ReduceAggregator::new(&maintainer);
    assert_eq!(
        reducer
            .count(&view("order/owner_status"), None, None)
            .expect("count"),
        1
    );

    maintainer.apply_delete(&DocId::from("d1"));
    assert_eq!(
        reducer
            .count(&view("order/owner_status"), None, None)
            .expect("count"),
        0
    );
}

#[test]
fn count_equals_range_scan_length_over_sample_ranges() {
    let maintainer = standard_maintainer();
    for (id, status, modified) in [
        ("o1", "enabled", "2024-01-01"),
        ("o2", "enabled", "2024-02-01"),
        ("o3", "disabled", "2024-03-01"),
        ("o4", "pending", "2024-04-01"),
    ] {
        maintainer.apply_document(
            &Document::new(id, "1-a", "order")
                .with_field("owner", "a@x.com")
                .with_field("status", status)
                .with_field("modified", modified)
                .with_field("title", "Order"),
        );
    }

    let executor = QueryExecutor::new(&maintainer);
    let reducer = ReduceAggregator::new(&maintainer);
    let status_view = view("order/status");

    let ranges = [
        (None, None),
        (Some(Key::tuple(vec![Value::from("enabled")]).expect("key")), None),
        (
            None,
            Some(Key::tuple(vec![Value::from("enabled"), Value::from("2024-02-01")]).expect("key")),
        ),
    ];

    for (start, end) in ranges {
        let mut range = ScanRange::all();
        if let Some(key) = start.clone() {
            range = range.with_start(key);
        }
        if let Some(key) = end.clone() {
            range = range.with_end(key);
        }

        let scanned = executor
            .range_scan(&status_view, &range, &ScanWindow::default())
            .expect("scan");
        let counted = reducer
            .count(&status_view, start.as_ref(), end.as_ref())
            .expect("count");

        assert_eq!(counted, scanned.len() as u64);
    }
}

#[test]
fn point_lookup_returns_every_fan_out_entry_for_a_key() {
    let maintainer = standard_maintainer();
    maintainer.apply_document(
        &Document::new("g1", "1-a", "group")
            .with_field("name", "Lab West")
            .with_field(
                "members",
                Value::List(vec![Value::from("a@x.com"), Value::from("b@x.com")]),
            ),
    );
    maintainer.apply_document(
        &Document::new("g2", "1-a", "group")
            .with_field("name", "Lab East")
            .with_field("members", Value::List(vec![Value::from("a@x.com")])),
    );

    let executor = QueryExecutor::new(&maintainer);
    let entries = executor
        .point_lookup(&view("group/member"), &Key::text("a@x.com"))
        .expect("lookup");

    assert_eq!(entries.len(), 2);
    // Insertion-stable under an equal key: ordered by doc id.
    assert_eq!(entries[0].doc_id, DocId::from("g1"));
    assert_eq!(entries[1].doc_id, DocId::from("g2"));
    assert_eq!(entries[0].value, Value::from("Lab West"));
}

#[test]
fn tag_lookup_matches_qualified_and_bare_forms() {
    let maintainer = standard_maintainer();
    maintainer.apply_document(
        &Document::new("o1", "1-a", "order")
            .with_field("title", "Widget Order")
            .with_field("owner", "a@x.com")
            .with_field("status", "enabled")
            .with_field("modified", "2024-01-01")
            .with_field(
                "tags",
                Value::List(vec![Value::from("Project:Alpha"), Value::from("solo")]),
            ),
    );

    let executor = QueryExecutor::new(&maintainer);
    for key in ["project:alpha", "alpha", "solo"] {
        let entries = executor
            .point_lookup(&view("order/tag"), &Key::text(key))
            .expect("lookup");
        assert_eq!(entries.len(), 1, "tag key {key}");
        assert_eq!(entries[0].value, Value::from("Widget Order"));
    }
}

#[test]
fn descending_scan_expects_pre_swapped_bounds() {
    let maintainer = standard_maintainer();
    for (id, modified) in [("o1", "2024-01-01"), ("o2", "2024-02-01"), ("o3", "2024-03-01")] {
        maintainer.apply_document(
            &Document::new(id, "1-a", "order")
                .with_field("owner", "a@x.com")
                .with_field("status", "enabled")
                .with_field("modified", modified)
                .with_field("title", "Order"),
        );
    }

    let executor = QueryExecutor::new(&maintainer);
    let modified_view = view("order/modified");

    // Descending: start is the upper bound.
    let swapped = ScanRange::all()
        .with_start(Key::text("2024-02-01"))
        .with_end(Key::text("2024-01-01"))
        .descending();
    let entries = executor
        .range_scan(&modified_view, &swapped, &ScanWindow::default())
        .expect("scan");
    let keys: Vec<&Key> = entries.iter().map(|e| &e.key).collect();
    assert_eq!(keys, vec![&Key::text("2024-02-01"), &Key::text("2024-01-01")]);

    // Un-swapped bounds with descending read as an empty range.
    let unswapped = ScanRange::all()
        .with_start(Key::text("2024-01-01"))
        .with_end(Key::text("2024-02-01"))
        .descending();
    assert!(
        executor
            .range_scan(&modified_view, &unswapped, &ScanWindow::default())
            .expect("scan")
            .is_empty()
    );
}

#[test]
fn exclusive_bounds_trim_both_ends() {
    let maintainer = standard_maintainer();
    for (id, modified) in [("o1", "2024-01-01"), ("o2", "2024-02-01"), ("o3", "2024-03-01")] {
        maintainer.apply_document(
            &Document::new(id, "1-a", "order")
                .with_field("owner", "a@x.com")
                .with_field("status", "enabled")
                .with_field("modified", modified)
                .with_field("title", "Order"),
        );
    }

    let executor = QueryExecutor::new(&maintainer);
    let range = ScanRange::all()
        .with_start(Key::text("2024-01-01"))
        .with_end(Key::text("2024-03-01"))
        .exclusive_start()
        .exclusive_end();
    let entries = executor
        .range_scan(&view("order/modified"), &range, &ScanWindow::default())
        .expect("scan");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, Key::text("2024-02-01"));
}

#[test]
fn pagination_is_post_scan_windowing() {
    let maintainer = standard_maintainer();
    for n in 1..=5 {
        maintainer.apply_document(
            &Document::new(format!("o{n}"), "1-a", "order")
                .with_field("owner", "a@x.com")
                .with_field("status", "enabled")
                .with_field("modified", format!("2024-0{n}-01"))
                .with_field("title", "Order"),
        );
    }

    let executor = QueryExecutor::new(&maintainer);
    let page = executor
        .range_scan(
            &view("order/modified"),
            &ScanRange::all(),
            &ScanWindow::new(1, Some(2)),
        )
        .expect("scan");

    let keys: Vec<&Key> = page.iter().map(|e| &e.key).collect();
    assert_eq!(keys, vec![&Key::text("2024-02-01"), &Key::text("2024-03-01")]);
}

#[test]
fn keyword_prefix_scan_uses_the_shared_tokenization() {
    let maintainer = standard_maintainer();
    maintainer.apply_document(&widget_order());
    maintainer.apply_document(
        &Document::new("d2", "1-a", "order")
            .with_field("owner", "b@x.com")
            .with_field("status", "enabled")
            .with_field("modified", "2024-02-01")
            .with_field("title", "Widgets and Sprockets"),
    );

    let executor = QueryExecutor::new(&maintainer);
    let entries = executor
        .prefix_scan(&view("order/keyword"), "widget", &ScanWindow::default())
        .expect("scan");

    // 'widget' from d1 and 'widgets' from d2 both match the prefix.
    assert_eq!(entries.len(), 2);

    // Client-side search terms re-derive with the same policy the index used.
    let engine = ProjectionEngine::new(EngineConfig::default());
    let terms = engine.config().tokenizer.search_terms("Widget; Widget order");
    assert_eq!(terms, vec!["widget", "order"]);
}

#[test]
fn grouped_count_truncates_composite_keys_by_level() {
    let maintainer = standard_maintainer();
    for (id, owner, status, modified) in [
        ("o1", "a@x.com", "enabled", "2024-01-01"),
        ("o2", "a@x.com", "enabled", "2024-02-01"),
        ("o3", "a@x.com", "closed", "2024-03-01"),
        ("o4", "b@x.com", "enabled", "2024-04-01"),
    ] {
        maintainer.apply_document(
            &Document::new(id, "1-a", "order")
                .with_field("owner", owner)
                .with_field("status", status)
                .with_field("modified", modified)
                .with_field("title", "Order"),
        );
    }

    let reducer = ReduceAggregator::new(&maintainer);
    let owner_status = view("order/owner_status");

    let by_owner = reducer.grouped_count(&owner_status, 1).expect("grouped");
    assert_eq!(by_owner.get(&Key::text("a@x.com")), Some(&3));
    assert_eq!(by_owner.get(&Key::text("b@x.com")), Some(&1));

    let by_owner_status = reducer.grouped_count(&owner_status, 2).expect("grouped");
    let a_enabled = Key::tuple(vec![Value::from("a@x.com"), Value::from("enabled")]).expect("key");
    assert_eq!(by_owner_status.get(&a_enabled), Some(&2));
    assert_eq!(by_owner_status.len(), 3);

    // Level 0 groups by the entire key: every entry is its own group here.
    let exact = reducer.grouped_count(&owner_status, 0).expect("grouped");
    assert_eq!(exact.len(), 4);
    assert!(exact.values().all(|count| *count == 1));
}

#[test]
fn unknown_view_surfaces_to_the_caller() {
    let maintainer = standard_maintainer();
    let executor = QueryExecutor::new(&maintainer);

    let err = executor
        .range_scan(
            &view("order/nonexistent"),
            &ScanRange::all(),
            &ScanWindow::default(),
        )
        .expect_err("unregistered view");
    assert!(matches!(err, QueryError::UnknownView { .. }));
}

#[test]
fn change_feed_sync_matches_direct_application() {
    let store = MemoryStore::new();
    store.put(widget_order());
    store.put(
        Document::new("d2", "1-a", "order")
            .with_field("owner", "b@x.com")
            .with_field("status", "pending")
            .with_field("modified", "2024-05-01")
            .with_field("title", "Sprocket Order"),
    );

    let mut synced = standard_maintainer();
    synced.sync(&store).expect("sync");

    let direct = standard_maintainer();
    for doc in store.list_all().expect("list") {
        direct.apply_document(&doc);
    }

    for name in ["order/owner_status", "order/keyword", "order/tag"] {
        let left = synced.snapshot(&view(name)).expect("view");
        let right = direct.snapshot(&view(name)).expect("view");
        assert_eq!(left.entries(), right.entries(), "view {name}");
    }
}

#[test]
fn registering_a_custom_view_alongside_the_catalog() {
    let mut maintainer = standard_maintainer();
    maintainer
        .register(ViewDefinition::new(
            "order/year",
            "order",
            Projection::Field {
                field: "year".to_string(),
                value: ValueSpec::Null,
            },
        ))
        .expect("register");

    maintainer.apply_document(
        &Document::new("o1", "1-a", "order")
            .with_field("owner", "a@x.com")
            .with_field("status", "enabled")
            .with_field("modified", "2024-01-01")
            .with_field("title", "Order")
            .with_field("year", Value::Uint(2024)),
    );

    let executor = QueryExecutor::new(&maintainer);
    let entries = executor
        .point_lookup(
            &view("order/year"),
            &Key::scalar(Value::Uint(2024)).expect("key"),
        )
        .expect("lookup");
    assert_eq!(entries.len(), 1);
}
