// crates/warden-schema/src/validate.rs
// ============================================================================
// Module: Policy Validator
// Description: Draft-4 validation of policy documents plus name uniqueness.
// Purpose: Report every schema violation as data; fail fast on bad schemas.
// Dependencies: jsonschema, serde_json, warden-core
// ============================================================================

//! ## Overview
//! The validator compiles the composite schema once and checks policy
//! documents against it. Structural checks run first; the duplicate-name
//! invariant over `policies[*].name` is only reported once a document is
//! structurally clean, since uniqueness errors are noise on top of broken
//! input. A compiled validator is immutable and safe to share across
//! concurrent validations; reloading registries means building a new one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;

use warden_core::Registries;
use warden_core::SchemaError;
use warden_core::SchemaViolation;
use warden_core::Violation;

use crate::builder::SchemaBuilder;

// ============================================================================
// SECTION: Policy Names
// ============================================================================

/// Accumulator for the policy-name namespace of one validation run.
///
/// Policies across every document validated in the same run share one
/// execution namespace, so duplicate detection spans documents.
#[derive(Debug, Clone, Default)]
pub struct PolicyNames {
    /// Every policy name seen so far in the run.
    seen: BTreeSet<String>,
}

impl PolicyNames {
    /// Creates an empty namespace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seen: BTreeSet::new(),
        }
    }

    /// Records a document's policy names, returning sorted duplicates.
    fn record(&mut self, document: &Value) -> Vec<String> {
        let mut duplicates = BTreeSet::new();
        for name in policy_names(document) {
            if !self.seen.insert(name.to_string()) {
                duplicates.insert(name.to_string());
            }
        }
        duplicates.into_iter().collect()
    }
}

/// Iterates the policy names of a document, tolerating any shape.
fn policy_names(document: &Value) -> impl Iterator<Item = &str> {
    document
        .get("policies")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|policy| policy.get("name").and_then(Value::as_str))
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Compiled policy document validator.
pub struct PolicyValidator {
    /// Composite schema document the validator was compiled from.
    schema: Value,
    /// Compiled draft-4 validator.
    compiled: Validator,
}

impl PolicyValidator {
    /// Compiles a validator from a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema does not compile as draft 4.
    pub fn new(schema: Value) -> Result<Self, SchemaError> {
        let compiled = compile_draft4(&schema)?;
        Ok(Self {
            schema,
            compiled,
        })
    }

    /// Builds the composite schema for the registries and compiles it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the generated schema fails its
    /// self-check — that indicates a registry or builder defect, never a
    /// user content error.
    pub fn for_registries(registries: &Registries) -> Result<Self, SchemaError> {
        Self::new(SchemaBuilder::new(registries).build(None))
    }

    /// Returns the schema document the validator was compiled from.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validates a single document in its own namespace.
    #[must_use]
    pub fn validate(&self, document: &Value) -> Vec<Violation> {
        let mut names = PolicyNames::new();
        self.validate_in_run(document, &mut names)
    }

    /// Validates a document within a shared run namespace.
    ///
    /// Returns an empty sequence on success. Policy names are recorded in
    /// the namespace even for structurally broken documents, but duplicate
    /// violations are only reported when the structure is already clean.
    #[must_use]
    pub fn validate_in_run(&self, document: &Value, names: &mut PolicyNames) -> Vec<Violation> {
        let violations: Vec<Violation> = self
            .compiled
            .iter_errors(document)
            .map(|error| Violation::Schema(to_schema_violation(&error)))
            .collect();
        let duplicates = names.record(document);
        if !violations.is_empty() {
            return violations;
        }
        if !duplicates.is_empty() {
            return vec![Violation::DuplicateNames {
                names: duplicates,
            }];
        }
        Vec::new()
    }
}

// ============================================================================
// SECTION: Engine Adapters
// ============================================================================

/// Compiles a schema with explicit draft-4 semantics.
pub(crate) fn compile_draft4(schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(Draft::Draft4)
        .build(schema)
        .map_err(|error| SchemaError::SelfCheck(error.to_string()))
}

/// Converts an engine error into violation data.
pub(crate) fn to_schema_violation(error: &jsonschema::ValidationError<'_>) -> SchemaViolation {
    let schema_path = error.schema_path().to_string();
    SchemaViolation {
        keyword: keyword_of(&schema_path),
        message: error.to_string(),
        instance_path: error.instance_path().to_string(),
        schema_path,
    }
}

/// Derives the failing validator keyword from a schema path.
fn keyword_of(schema_path: &str) -> String {
    schema_path.rsplit('/').next().unwrap_or_default().to_string()
}
