// crates/warden-core/src/violation.rs
// ============================================================================
// Module: Violations
// Description: Validation violation data and fatal schema errors.
// Purpose: Report user content errors as data and builder defects as errors.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Policy document problems are reported as [`Violation`] values, never as
//! panics: structural schema violations carry their document and schema
//! paths, and duplicate policy names are a derived violation of their own.
//! [`SchemaError`] is the fatal class reserved for registry or builder
//! defects (a generated schema that fails its own self-check) — it must
//! never be surfaced as if it were a user content error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Violations
// ============================================================================

/// Raw schema violation reported by the draft-4 engine.
///
/// # Invariants
/// - Paths are JSON Pointers; the empty string addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON Pointer into the offending document.
    pub instance_path: String,
    /// JSON Pointer into the schema that rejected it.
    pub schema_path: String,
    /// Failing draft-4 validator keyword.
    pub keyword: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl SchemaViolation {
    /// Returns true when the violation is an ambiguous union-type failure.
    ///
    /// Only `anyOf`/`oneOf` failures are candidates for specialization;
    /// every other keyword already names a specific cause.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.keyword == "anyOf" || self.keyword == "oneOf"
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Validation outcome entry for one policy document check.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum Violation {
    /// Structural schema violation.
    #[error("{0}")]
    Schema(SchemaViolation),
    /// Duplicate policy names within one execution namespace.
    #[error("only one policy with a given name allowed, duplicates: {}", .names.join(", "))]
    DuplicateNames {
        /// Every duplicated policy name, sorted.
        names: Vec<String>,
    },
}

// ============================================================================
// SECTION: Fatal Errors
// ============================================================================

/// Fatal schema-construction failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Generated or supplied schema failed to compile as draft 4.
    #[error("schema failed draft-4 self-check: {0}")]
    SelfCheck(String),
}
