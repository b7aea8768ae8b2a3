// crates/warden-schema/src/specialize.rs
// ============================================================================
// Module: Error Specializer
// Description: Narrows ambiguous union-type violations to specific causes.
// Purpose: Turn "matched none of N alternatives" into a field-level diagnosis.
// Dependencies: serde_json, warden-core
// ============================================================================

//! ## Overview
//! Generic union-type validators report only "matched none of the
//! alternatives", which is useless at schema depth greater than one. The
//! specializer re-walks the schema using the same discriminator fields a
//! human reader would use — `resource` on policies, `type` on filters and
//! actions — to select the intended branch and re-derive its own most
//! specific violation. Specialization is strictly best-effort: every
//! internal lookup is optional, and any failure falls back to the original
//! violation rather than raising past this boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use warden_core::SchemaViolation;
use warden_core::Violation;

use crate::validate::compile_draft4;
use crate::validate::to_schema_violation;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Recursion bound for branch narrowing.
const MAX_DEPTH: usize = 8;

// ============================================================================
// SECTION: Diagnosis
// ============================================================================

/// Best-guess violation plus the offending policy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    /// Specialized violation.
    pub violation: Violation,
    /// Offending policy name, or `unknown` when it cannot be derived.
    pub policy_name: String,
}

/// Diagnoses a non-empty raw violation list.
///
/// The first violation is specialized; duplicate-name violations already
/// carry their offending names and pass through unchanged.
#[must_use]
pub fn diagnose(schema: &Value, document: &Value, violations: &[Violation]) -> Option<Diagnosis> {
    let first = violations.first()?;
    match first {
        Violation::Schema(raw) => Some(Diagnosis {
            violation: Violation::Schema(specialize(schema, document, raw)),
            policy_name: offending_name(document, raw),
        }),
        Violation::DuplicateNames {
            names,
        } => Some(Diagnosis {
            violation: first.clone(),
            policy_name: names.join(", "),
        }),
    }
}

/// Derives the offending policy name from the failing instance.
fn offending_name(document: &Value, violation: &SchemaViolation) -> String {
    document
        .pointer(&violation.instance_path)
        .and_then(|instance| instance.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

// ============================================================================
// SECTION: Specialization
// ============================================================================

/// Returns the most specific violation derivable from an ambiguous one.
///
/// Violations whose keyword is not `anyOf`/`oneOf` are already specific and
/// come back unchanged; so does any violation whose branch cannot be
/// resolved.
#[must_use]
pub fn specialize(schema: &Value, document: &Value, violation: &SchemaViolation) -> SchemaViolation {
    narrow(schema, document, violation, MAX_DEPTH)
}

/// One narrowing level with the explicit fallback contract applied.
fn narrow(schema: &Value, instance: &Value, violation: &SchemaViolation, depth: usize) -> SchemaViolation {
    if !violation.is_ambiguous() {
        return violation.clone();
    }
    try_narrow(schema, instance, violation, depth).unwrap_or_else(|| violation.clone())
}

/// Attempts to narrow an ambiguous violation to its intended branch.
///
/// Returns `None` whenever a lookup fails; callers fall back to the
/// unspecialized violation.
fn try_narrow(
    schema: &Value,
    instance: &Value,
    violation: &SchemaViolation,
    depth: usize,
) -> Option<SchemaViolation> {
    if depth == 0 {
        return None;
    }
    let alternatives = schema.pointer(&violation.schema_path)?.as_array()?;
    let failing = instance.pointer(&violation.instance_path)?;
    let target = match_discriminator(alternatives, failing)?;
    let branch = schema.pointer(&target)?;
    let wrapper = wrap_branch(schema, branch)?;
    let compiled = compile_draft4(&wrapper).ok()?;
    let child = compiled.iter_errors(failing).next().map(|error| to_schema_violation(&error))?;
    let narrowed = narrow(&wrapper, failing, &child, depth - 1);
    Some(rebase(narrowed, &violation.instance_path, &target))
}

/// Selects the alternative matching the instance's discriminator field.
///
/// Policies carry a `resource` discriminator matched against the reference
/// path segments; filters and actions carry a `type` discriminator matched
/// against the final path segment (exact segment equality, so `tag` never
/// matches `untag`). Returns the matched reference as a JSON Pointer.
fn match_discriminator(alternatives: &[Value], instance: &Value) -> Option<String> {
    let fields = instance.as_object()?;
    if let Some(resource) = fields.get("resource").and_then(Value::as_str) {
        let matched = alternatives.iter().find_map(|alternative| {
            let reference = alternative.get("$ref")?.as_str()?;
            reference.split('/').any(|segment| segment == resource).then_some(reference)
        });
        if let Some(reference) = matched {
            return ref_pointer(reference);
        }
    }
    if let Some(kind) = fields.get("type").and_then(Value::as_str) {
        let matched = alternatives.iter().find_map(|alternative| {
            let reference = alternative.get("$ref")?.as_str()?;
            (reference.rsplit('/').next() == Some(kind)).then_some(reference)
        });
        if let Some(reference) = matched {
            return ref_pointer(reference);
        }
    }
    None
}

/// Converts an in-document `$ref` into a JSON Pointer.
fn ref_pointer(reference: &str) -> Option<String> {
    reference.strip_prefix('#').map(str::to_string)
}

/// Rehosts a branch schema so its in-document references stay resolvable.
fn wrap_branch(schema: &Value, branch: &Value) -> Option<Value> {
    let mut wrapper = branch.as_object()?.clone();
    wrapper.insert("definitions".to_string(), schema.get("definitions")?.clone());
    Some(Value::Object(wrapper))
}

/// Re-bases a narrowed violation's paths under the originals.
///
/// Instance paths always concatenate: each level resolves its failing
/// instance relative to the previous one. A schema path that already
/// begins at the definitions root was re-based by a deeper branch jump and
/// stays as-is; only branch-local paths get the jump target prefixed.
fn rebase(violation: SchemaViolation, instance_base: &str, schema_base: &str) -> SchemaViolation {
    let schema_path = if violation.schema_path.starts_with("/definitions/") {
        violation.schema_path
    } else {
        format!("{schema_base}{}", violation.schema_path)
    };
    SchemaViolation {
        instance_path: format!("{instance_base}{}", violation.instance_path),
        schema_path,
        ..violation
    }
}
