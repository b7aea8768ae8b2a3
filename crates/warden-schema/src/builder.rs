// crates/warden-schema/src/builder.rs
// ============================================================================
// Module: Schema Builder
// Description: Assembles the composite policy schema from the registries.
// Purpose: Produce one cross-referencing draft-4 document per registry set.
// Dependencies: serde_json, warden-core
// ============================================================================

//! ## Overview
//! The builder walks every resource type's action and filter registries and
//! emits a single draft-4 schema document with shared, reference-linked
//! definitions. Each distinct capability implementation is processed exactly
//! once; every alias name is registered as a `$ref` to the canonical
//! definition so later registry growth never requires touching alias
//! entries. The document is a pure function of the registries: rebuilding
//! from identical registries yields a byte-identical document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use warden_core::CapabilityRegistry;
use warden_core::Registries;
use warden_core::ResourceType;

use crate::fragments;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed document identifier for the generated schema.
pub const SCHEMA_ID: &str = "http://schema.warden.dev/v0/warden.json";

/// Draft-4 meta-schema identifier declared by generated documents.
pub(crate) const DRAFT4_URI: &str = "http://json-schema.org/draft-04/schema#";

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Composite schema builder over an explicit registry bundle.
///
/// # Invariants
/// - The builder never mutates the registries it reads.
#[derive(Clone, Copy)]
pub struct SchemaBuilder<'a> {
    /// Registry bundle the schema is derived from.
    registries: &'a Registries,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder over the given registries.
    #[must_use]
    pub const fn new(registries: &'a Registries) -> Self {
        Self {
            registries,
        }
    }

    /// Builds the composite schema document.
    ///
    /// When `resource_types` is given, only the named types are included —
    /// an optimization for large registries. An empty registry set yields a
    /// `policies` item union with no alternatives, which no policy can
    /// satisfy: no resource types means no valid policy exists.
    #[must_use]
    pub fn build(&self, resource_types: Option<&BTreeSet<String>>) -> Value {
        let mut resource_defs = Map::new();
        let mut resource_refs = Vec::new();
        for (type_name, resource) in self.registries.iter() {
            if let Some(wanted) = resource_types
                && !wanted.contains(type_name)
            {
                continue;
            }
            resource_refs.push(process_resource(type_name, resource, &mut resource_defs));
        }
        json!({
            "$schema": DRAFT4_URI,
            "id": SCHEMA_ID,
            "definitions": {
                "resources": resource_defs,
                "filters": {
                    "value": fragments::value_filter(),
                    "event": fragments::event_filter(),
                    "age": fragments::age_filter(),
                    "valuekv": fragments::value_shortcut()
                },
                "policy": fragments::policy_envelope(),
                "policy-mode": fragments::policy_mode()
            },
            "type": "object",
            "required": ["policies"],
            "additionalProperties": false,
            "properties": {
                "vars": { "type": "object" },
                "policies": {
                    "type": "array",
                    "additionalItems": false,
                    "items": { "anyOf": resource_refs }
                }
            }
        })
    }
}

// ============================================================================
// SECTION: Resource Composition
// ============================================================================

/// Emits one resource type's definitions and returns its policy reference.
fn process_resource(
    type_name: &str,
    resource: &ResourceType,
    resource_defs: &mut Map<String, Value>,
) -> Value {
    let actions = action_definitions(type_name, resource.actions());
    let action_refs = action_alternatives(type_name, resource.actions());
    let filters = filter_definitions(type_name, resource.filters());
    let filter_refs = filter_alternatives(type_name, resource.filters());

    let mut narrowed = Map::new();
    narrowed.insert("resource".to_string(), json!({ "enum": [type_name] }));
    narrowed.insert(
        "filters".to_string(),
        json!({ "type": "array", "items": { "anyOf": filter_refs } }),
    );
    narrowed.insert(
        "actions".to_string(),
        json!({ "type": "array", "items": { "anyOf": action_refs } }),
    );
    for (property, fragment) in resource.overlays() {
        narrowed.insert(property.clone(), fragment.clone());
    }

    resource_defs.insert(
        type_name.to_string(),
        json!({
            "actions": actions,
            "filters": filters,
            "policy": {
                "allOf": [
                    { "$ref": "#/definitions/policy" },
                    { "properties": narrowed }
                ]
            }
        }),
    );
    json!({ "$ref": format!("#/definitions/resources/{type_name}/policy") })
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Emits action definitions: canonical fragments plus alias references.
fn action_definitions(type_name: &str, registry: &CapabilityRegistry) -> Map<String, Value> {
    let mut definitions = Map::new();
    for group in registry.distinct() {
        definitions.insert(group.name.to_string(), group.provider.schema());
        for alias in group.aliases {
            definitions
                .insert(alias.to_string(), json!({ "$ref": action_ref(type_name, group.name) }));
        }
    }
    definitions
}

/// Builds the action alternatives list for a resource policy.
///
/// One `$ref` per registered name (aliases included) plus a trailing enum
/// accepting any bare action name as a single-word shortcut.
fn action_alternatives(type_name: &str, registry: &CapabilityRegistry) -> Vec<Value> {
    let names: Vec<&str> = registry.names().collect();
    let mut alternatives: Vec<Value> =
        names.iter().map(|&name| json!({ "$ref": action_ref(type_name, name) })).collect();
    alternatives.push(json!({ "enum": names }));
    alternatives
}

/// Returns the definition reference for one action name.
fn action_ref(type_name: &str, name: &str) -> String {
    format!("#/definitions/resources/{type_name}/actions/{name}")
}

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Emits filter definitions with the name-specific composition rules.
///
/// `value` and `event` reference the shared global fragments; `and`/`or`
/// share one nested-alternatives array shape (shape validation cannot
/// evaluate boolean truth, only structure); every other name contributes
/// its implementation's fragment verbatim. Aliases reference canonicals.
fn filter_definitions(type_name: &str, registry: &CapabilityRegistry) -> Map<String, Value> {
    let nested = nested_filter_alternatives(type_name, registry);
    let mut definitions = Map::new();
    for group in registry.distinct() {
        let fragment = match group.name {
            "value" => {
                definitions.insert(
                    "valuekv".to_string(),
                    json!({ "$ref": "#/definitions/filters/valuekv" }),
                );
                json!({ "$ref": "#/definitions/filters/value" })
            }
            "event" => json!({ "$ref": "#/definitions/filters/event" }),
            "and" | "or" => json!({ "type": "array", "items": { "anyOf": nested.clone() } }),
            _ => group.provider.schema(),
        };
        definitions.insert(group.name.to_string(), fragment);
        for alias in group.aliases {
            definitions
                .insert(alias.to_string(), json!({ "$ref": filter_ref(type_name, group.name) }));
        }
    }
    definitions
}

/// Builds the nested alternatives shared by both boolean combinators.
///
/// Items of an `and`/`or` sequence may be any of the type's filters (the
/// self-references make boolean composition nest arbitrarily) or the
/// key=value shortcut.
fn nested_filter_alternatives(type_name: &str, registry: &CapabilityRegistry) -> Vec<Value> {
    let mut alternatives: Vec<Value> =
        registry.names().map(|name| json!({ "$ref": filter_ref(type_name, name) })).collect();
    alternatives.push(json!({ "$ref": "#/definitions/filters/valuekv" }));
    alternatives
}

/// Builds the filter alternatives list for a resource policy.
///
/// One `$ref` per registered name, the key=value shortcut, and a trailing
/// enum accepting any bare filter name.
fn filter_alternatives(type_name: &str, registry: &CapabilityRegistry) -> Vec<Value> {
    let names: Vec<&str> = registry.names().collect();
    let mut alternatives: Vec<Value> =
        names.iter().map(|&name| json!({ "$ref": filter_ref(type_name, name) })).collect();
    alternatives.push(json!({ "$ref": "#/definitions/filters/valuekv" }));
    alternatives.push(json!({ "enum": names }));
    alternatives
}

/// Returns the definition reference for one filter name.
fn filter_ref(type_name: &str, name: &str) -> String {
    format!("#/definitions/resources/{type_name}/filters/{name}")
}
