// crates/warden-schema/src/fragments.rs
// ============================================================================
// Module: Shared Schema Fragments
// Description: Reusable draft-4 fragments referenced by the composite schema.
// Purpose: Define the global filter fragments and the generic policy envelope.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! The composite schema shares a handful of fragments across every resource
//! type: the generic value/event/age filters, the key=value shortcut form,
//! and the policy envelope with its execution-mode sub-schema. Builders
//! reference these by `$ref` instead of copying them, so registry growth
//! never requires touching the shared definitions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Policy name pattern: starts with a letter, alphanumeric segments joined
/// by single hyphens, no leading/trailing/double hyphens.
pub const NAME_PATTERN: &str = "^[A-Za-z][A-Za-z0-9]*(-[A-Za-z0-9]+)*$";

/// Comparison operators accepted by the generic value-style filters.
const COMPARISON_OPERATORS: [&str; 17] = [
    "absent",
    "eq",
    "equal",
    "ge",
    "glob",
    "gt",
    "gte",
    "in",
    "le",
    "lt",
    "lte",
    "ne",
    "not-equal",
    "not-in",
    "not-null",
    "present",
    "regex",
];

// ============================================================================
// SECTION: Filter Fragments
// ============================================================================

/// Returns the shared generic value filter fragment.
#[must_use]
pub fn value_filter() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "enum": ["value"] },
            "key": { "type": "string" },
            "op": { "enum": COMPARISON_OPERATORS },
            "value": comparison_value(),
            "value_type": {
                "enum": ["age", "cidr", "cidr_size", "expiration", "integer", "normalize", "size", "swap"]
            },
            "default": {}
        }
    })
}

/// Returns the shared generic event filter fragment.
#[must_use]
pub fn event_filter() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "enum": ["event"] },
            "key": { "type": "string" },
            "op": { "enum": COMPARISON_OPERATORS },
            "value": comparison_value()
        }
    })
}

/// Returns the shared generic age filter fragment.
#[must_use]
pub fn age_filter() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": { "enum": ["age"] },
            "days": { "type": "number" },
            "op": { "enum": COMPARISON_OPERATORS }
        }
    })
}

/// Returns the key=value shortcut fragment: exactly one property.
#[must_use]
pub fn value_shortcut() -> Value {
    json!({
        "type": "object",
        "minProperties": 1,
        "maxProperties": 1
    })
}

/// Schema for the comparison value of value-style filters.
fn comparison_value() -> Value {
    json!({
        "oneOf": [
            { "type": "array" },
            { "type": "string" },
            { "type": "boolean" },
            { "type": "number" },
            { "type": "null" }
        ]
    })
}

// ============================================================================
// SECTION: Policy Envelope
// ============================================================================

/// Returns the generic policy envelope shared by every resource type.
#[must_use]
pub fn policy_envelope() -> Value {
    json!({
        "type": "object",
        "required": ["name", "resource"],
        "additionalProperties": false,
        "properties": {
            "name": { "type": "string", "pattern": NAME_PATTERN },
            "resource": { "type": "string" },
            "region": { "type": "string" },
            "max-resources": { "type": "integer" },
            "comment": { "type": "string" },
            "comments": { "type": "string" },
            "description": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } },
            "mode": { "$ref": "#/definitions/policy-mode" },
            "actions": { "type": "array" },
            "filters": { "type": "array" },
            // server-side query support lives here rather than per type:
            // draft-4 reference inheritance cannot extend allowed properties,
            // so types opt in through their overlay instead
            "query": {
                "type": "array",
                "items": { "type": "object", "minProperties": 1, "maxProperties": 1 }
            }
        }
    })
}

/// Returns the execution-mode sub-schema referenced by the envelope.
#[must_use]
pub fn policy_mode() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": {
                "enum": [
                    "cloudtrail",
                    "ec2-instance-state",
                    "asg-instance-state",
                    "config-rule",
                    "periodic"
                ]
            },
            "events": {
                "type": "array",
                "items": {
                    "oneOf": [
                        { "type": "string" },
                        {
                            "type": "object",
                            "required": ["event", "source", "ids"],
                            "properties": {
                                "event": { "type": "string" },
                                "source": { "type": "string" },
                                "ids": { "type": "string" }
                            }
                        }
                    ]
                }
            }
        }
    })
}
