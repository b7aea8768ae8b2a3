// crates/warden-cli/src/catalog.rs
// ============================================================================
// Module: Capability Catalog
// Description: Built-in resource type registrations for the CLI.
// Purpose: Stand in for the external resource-loading collaborator.
// Dependencies: serde_json, warden-core, warden-schema
// ============================================================================

//! ## Overview
//! The catalog constructs the registry bundle the CLI validates against:
//! the baseline filters every resource type carries plus a small set of
//! resource types exercising aliasing, per-type overlays, and the shared
//! fragments. Cloud execution stays out of scope — these capabilities only
//! describe policy shape and documentation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use warden_core::Capability;
use warden_core::CapabilityRegistry;
use warden_core::Registries;
use warden_core::ResourceType;
use warden_schema::fragments;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Builds the registry bundle for every built-in resource type.
pub(crate) fn registries() -> Registries {
    let mut registries = Registries::new();
    registries.register("ec2", ec2());
    registries.register("s3", s3());
    registries
}

/// Filters shared by every resource type.
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
    filters.register(
        "event",
        Capability::with_doc(
            fragments::event_filter(),
            "Filter resources by attributes of the triggering event.",
        )
        .into_ref(),
    );
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
    actions.register(
        "start",
        Capability::with_doc(lifecycle_action("start"), "Start stopped instances.").into_ref(),
    );
    actions.register(
        "stop",
        Capability::with_doc(lifecycle_action("stop"), "Stop running instances.").into_ref(),
    );
    actions.register(
        "terminate",
        Capability::with_doc(lifecycle_action("terminate"), "Terminate instances permanently.")
            .into_ref(),
    );
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
        Capability::with_doc(
            json!({
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": { "enum": ["instance-age"] },
                    "days": { "type": "number" }
                }
            }),
            "Filter instances by days since launch.",
        )
        .into_ref(),
    );

    // ec2 policies may carry a server-side query clause
    ResourceType::new(actions, filters).with_overlay("query", json!({}))
}

/// Storage bucket resource type.
fn s3() -> ResourceType {
    let mut actions = CapabilityRegistry::new();
    let tag = Capability::with_doc(tag_action(), "Apply a tag to matched buckets.").into_ref();
    actions.register("tag", tag.clone());
    actions.register("mark", tag);
    actions.register(
        "delete",
        Capability::with_doc(lifecycle_action("delete"), "Delete matched buckets.").into_ref(),
    );

    let mut filters = baseline_filters();
    filters.register(
        "global-grants",
        Capability::with_doc(
            json!({
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": { "enum": ["global-grants"] },
                    "permissions": { "type": "array", "items": { "type": "string" } }
                }
            }),
            "Filter buckets whose ACL grants global access.",
        )
        .into_ref(),
    );

    ResourceType::new(actions, filters)
}

// ============================================================================
// SECTION: Fragment Helpers
// ============================================================================

/// Fragment for a bare lifecycle action carrying only its discriminator.
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
