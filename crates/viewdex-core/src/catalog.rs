//! The standard view catalog of the order-management portal.
//!
//! Each function returns the view family for one document type; `standard_views`
//! returns the whole catalog. Names follow the `doctype/purpose` convention.

use crate::view::{EmitFilter, Projection, ReduceKind, ValueSpec, ViewDefinition};

///
/// Document type tags
///

pub const ACCOUNT: &str = "account";
pub const FORM: &str = "form";
pub const GROUP: &str = "group";
pub const LOG: &str = "log";
pub const MESSAGE: &str = "message";
pub const ORDER: &str = "order";

fn field(name: &str) -> ValueSpec {
    ValueSpec::field(name)
}

fn field_key(field: &str, value: ValueSpec) -> Projection {
    Projection::Field {
        field: field.to_string(),
        value,
    }
}

fn composite(fields: &[&str], value: ValueSpec) -> Projection {
    Projection::Composite {
        fields: fields.iter().map(ToString::to_string).collect(),
        value,
    }
}

fn fan_out(field: &str, append: &[&str], value: ValueSpec) -> Projection {
    Projection::FanOut {
        field: field.to_string(),
        append: append.iter().map(ToString::to_string).collect(),
        value,
    }
}

/// Order views: plain sorts, counted composites for the list pages, and the
/// keyword/tag search indexes.
#[must_use]
pub fn order_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            "order/modified",
            ORDER,
            field_key("modified", field("title")),
        ),
        ViewDefinition::new(
            "order/identifier",
            ORDER,
            field_key("identifier", field("title")),
        )
        .with_filter(EmitFilter::present("identifier")),
        ViewDefinition::new(
            "order/form",
            ORDER,
            composite(&["form", "modified"], ValueSpec::One),
        )
        .with_reduce(ReduceKind::Count),
        ViewDefinition::new(
            "order/owner",
            ORDER,
            composite(&["owner", "modified"], ValueSpec::One),
        )
        .with_reduce(ReduceKind::Count),
        ViewDefinition::new(
            "order/status",
            ORDER,
            composite(&["status", "modified"], ValueSpec::One),
        )
        .with_reduce(ReduceKind::Count),
        ViewDefinition::new(
            "order/owner_status",
            ORDER,
            composite(&["owner", "status", "modified"], ValueSpec::One),
        )
        .with_reduce(ReduceKind::Count),
        ViewDefinition::new(
            "order/keyword",
            ORDER,
            Projection::Keyword {
                field: "title".to_string(),
            },
        ),
        ViewDefinition::new(
            "order/tag",
            ORDER,
            Projection::Tag {
                field: "tags".to_string(),
                value: field("title"),
            },
        ),
    ]
}

/// Account views: lookups by email/api-key and the sorts behind the account
/// listing pages.
#[must_use]
pub fn account_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            "account/email",
            ACCOUNT,
            field_key(
                "email",
                ValueSpec::Fields(vec!["first_name".to_string(), "last_name".to_string()]),
            ),
        ),
        ViewDefinition::new("account/api_key", ACCOUNT, field_key("api_key", field("email")))
            .with_filter(EmitFilter::present("api_key")),
        ViewDefinition::new("account/role", ACCOUNT, field_key("role", field("email"))),
        ViewDefinition::new("account/status", ACCOUNT, field_key("status", field("email"))),
        ViewDefinition::new("account/login", ACCOUNT, field_key("login", field("email")))
            .with_filter(EmitFilter::present("login")),
        ViewDefinition::new(
            "account/university",
            ACCOUNT,
            field_key("university", field("email")),
        ),
    ]
}

/// Form views: the status-partitioned family plus the modified sort.
/// Each partition is its own view so it can be range-scanned independently.
#[must_use]
pub fn form_views() -> Vec<ViewDefinition> {
    let partition = |status: &str| {
        ViewDefinition::new(
            format!("form/{status}"),
            FORM,
            field_key("modified", field("title")),
        )
        .with_filter(EmitFilter::equals("status", status))
    };

    vec![
        ViewDefinition::new("form/modified", FORM, field_key("modified", field("title"))),
        partition("enabled"),
        partition("disabled"),
        partition("pending"),
    ]
}

/// Group views: member/invited fan-out and owner/modified sorts.
#[must_use]
pub fn group_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new("group/member", GROUP, fan_out("members", &[], field("name"))),
        ViewDefinition::new("group/invited", GROUP, fan_out("invited", &[], field("name"))),
        ViewDefinition::new("group/owner", GROUP, field_key("owner", field("name"))),
        ViewDefinition::new("group/modified", GROUP, field_key("modified", ValueSpec::One))
            .with_reduce(ReduceKind::Count),
    ]
}

/// Message views: recipient fan-out (counted) and the unsent backlog.
#[must_use]
pub fn message_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            "message/recipient",
            MESSAGE,
            fan_out("recipients", &["modified"], ValueSpec::One),
        )
        .with_reduce(ReduceKind::Count),
        ViewDefinition::new("message/unsent", MESSAGE, field_key("_id", field("subject")))
            .with_filter(EmitFilter::absent("sent")),
    ]
}

/// Log views: entity/account trails ordered by modification time.
#[must_use]
pub fn log_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            "log/entity",
            LOG,
            composite(&["entity", "modified"], ValueSpec::Null),
        ),
        ViewDefinition::new(
            "log/account",
            LOG,
            composite(&["account", "modified"], ValueSpec::Null),
        )
        .with_filter(EmitFilter::present("account")),
        ViewDefinition::new(
            "log/login_failure",
            LOG,
            composite(&["entity", "modified"], field("changed.login_failure")),
        )
        .with_filter(EmitFilter::present("changed.login_failure")),
    ]
}

/// The whole standard catalog.
#[must_use]
pub fn standard_views() -> Vec<ViewDefinition> {
    let mut views = Vec::new();
    views.extend(order_views());
    views.extend(account_views());
    views.extend(form_views());
    views.extend(group_views());
    views.extend(message_views());
    views.extend(log_views());

    views
}

///
/// TESTS
///
