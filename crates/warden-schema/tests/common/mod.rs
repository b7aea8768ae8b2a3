// crates/warden-schema/tests/common/mod.rs
// =============================================================================
// Module: Schema Test Fixtures
// Description: Shared registry and document fixtures for integration tests.
// Purpose: Reduce duplication across warden-schema test suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use serde_json::Value;
use serde_json::json;

use warden_core::Capability;
use warden_core::CapabilityRegistry;
use warden_core::Registries;
use warden_core::ResourceType;
use warden_schema::fragments;

/// Builds the two-type registry bundle used across the suites.
///
/// `ec2` carries lifecycle actions, a `mark` alias for `tag`, documented
/// per-type filters, and the `query` overlay; `s3` carries tagging actions
/// and an ACL filter. Both share the baseline value/event/and/or filters.
pub fn sample_registries() -> Registries {
    let mut registries = Registries::new();
    registries.register("ec2", ec2());
    registries.register("s3", s3());
    registries
}

/// Filters shared by every resource type in the fixture.
fn baseline_filters() -> CapabilityRegistry {
    let mut filters = CapabilityRegistry::new();
    filters.register(
        "value",
        Capability::with_doc(
            fragments::value_filter(),
            "Generic filter comparing a resource attribute against a value.",
        )
        .into_ref(),
    );
    filters.register("event", Capability::new(fragments::event_filter()).into_ref());
    let sequence = json!({ "type": "array" });
    filters.register(
        "and",
        Capability::with_doc(sequence.clone(), "Require every nested filter to match.").into_ref(),
    );
    filters.register(
        "or",
        Capability::with_doc(sequence, "Require at least one nested filter to match.").into_ref(),
    );
    filters
}

/// Compute instance resource type.
fn ec2() -> ResourceType {
    let mut actions = CapabilityRegistry::new();
    actions.register("start", Capability::new(lifecycle_action("start")).into_ref());
    actions.register("stop", Capability::new(lifecycle_action("stop")).into_ref());
    actions.register("terminate", Capability::new(lifecycle_action("terminate")).into_ref());
    let tag = Capability::with_doc(tag_action(), "Apply a tag to matched resources.").into_ref();
    actions.register("tag", tag.clone());
    actions.register("mark", tag);

    let mut filters = baseline_filters();
    filters.register(
        "tag-count",
        Capability::with_doc(
            json!({
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": { "enum": ["tag-count"] },
                    "count": { "type": "integer", "minimum": 0 },
                    "op": { "enum": ["eq", "gte", "lte"] }
                }
            }),
            "Filter resources by their total tag count.",
        )
        .into_ref(),
    );
    filters.register(
        "instance-age",
        Capability::new(json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "enum": ["instance-age"] },
                "days": { "type": "number" }
            }
        }))
        .into_ref(),
    );

    ResourceType::new(actions, filters).with_overlay("query", json!({}))
}

/// Storage bucket resource type.
fn s3() -> ResourceType {
    let mut actions = CapabilityRegistry::new();
    let tag = Capability::with_doc(tag_action(), "Apply a tag to matched buckets.").into_ref();
    actions.register("tag", tag.clone());
    actions.register("mark", tag);
    actions.register("delete", Capability::new(lifecycle_action("delete")).into_ref());

    let mut filters = baseline_filters();
    filters.register(
        "global-grants",
        Capability::new(json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "enum": ["global-grants"] },
                "permissions": { "type": "array", "items": { "type": "string" } }
            }
        }))
        .into_ref(),
    );

    ResourceType::new(actions, filters)
}

/// Fragment for a bare action carrying only its discriminator.
fn lifecycle_action(name: &str) -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "enum": [name] }
        }
    })
}

/// Fragment for the tagging action, aliased as `mark`.
fn tag_action() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "enum": ["tag", "mark"] },
            "key": { "type": "string" },
            "value": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } }
        }
    })
}

/// Structurally valid document with one policy per fixture resource type.
///
/// Exercises the shared value fragment, nested boolean composition, the
/// key=value shortcut, bare-name shortcuts, alias forms, the execution
/// mode, and the ec2 query overlay.
pub fn valid_document() -> Value {
    json!({
        "policies": [
            {
                "name": "keep-tagged-instances",
                "resource": "ec2",
                "mode": { "type": "periodic" },
                "query": [{ "instance-state-name": "running" }],
                "filters": [
                    { "type": "value", "key": "State.Name", "op": "eq", "value": "running" },
                    { "or": [
                        { "type": "tag-count", "count": 8, "op": "gte" },
                        { "and": [
                            { "type": "instance-age", "days": 30 },
                            { "tag:owner": "absent" }
                        ] }
                    ] },
                    "tag-count",
                    { "tag:env": "present" }
                ],
                "actions": [
                    "stop",
                    { "type": "mark", "key": "owner", "value": "governance" }
                ]
            },
            {
                "name": "bucket-acl-audit",
                "resource": "s3",
                "filters": [{ "type": "global-grants" }],
                "actions": [{ "type": "tag", "tags": ["flagged"] }]
            }
        ]
    })
}

/// Scenario document whose only defect is an unregistered `s3` action.
pub fn unregistered_action_document() -> Value {
    json!({
        "policies": [{
            "name": "foo",
            "resource": "s3",
            "filters": [{ "tag:custodian_tagging": "not-null" }],
            "actions": [{ "type": "untag", "tags": ["custodian_cleanup"] }]
        }]
    })
}
