// crates/warden-schema/src/lib.rs
// ============================================================================
// Module: Warden Schema Library
// Description: Composite schema generation and policy document validation.
// Purpose: Build, validate against, and diagnose the policy document schema.
// Dependencies: jsonschema, serde, serde_json, warden-core
// ============================================================================

//! ## Overview
//! `warden-schema` walks the capability registries and assembles one
//! composite, cross-referencing JSON-Schema (draft 4) document; validates
//! arbitrary policy documents against it; and, on failure, re-derives a
//! specific, actionable violation from ambiguous union-type failures. All
//! operations are pure, synchronous computations over immutable inputs: a
//! compiled schema is safe to share across concurrent validations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod fragments;
pub mod specialize;
pub mod validate;
pub mod vocabulary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::SCHEMA_ID;
pub use builder::SchemaBuilder;
pub use specialize::Diagnosis;
pub use specialize::diagnose;
pub use specialize::specialize;
pub use validate::PolicyNames;
pub use validate::PolicyValidator;
pub use vocabulary::CapabilityDocs;
pub use vocabulary::ResourceVocabulary;
pub use vocabulary::Vocabulary;
pub use vocabulary::VocabularySummary;
pub use vocabulary::summarize;
pub use vocabulary::vocabulary;
