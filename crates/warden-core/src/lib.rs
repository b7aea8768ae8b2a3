// crates/warden-core/src/lib.rs
// ============================================================================
// Module: Warden Core Library
// Description: Capability registry model and validation error data.
// Purpose: Single source of truth for registry and violation semantics.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `warden-core` defines the read-only capability registry model consumed by
//! the schema builder, plus the violation and fatal error types shared across
//! the workspace. Registries are constructed once by the resource-loading
//! caller and never mutated afterwards; validation errors are data, never
//! panics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod provider;
pub mod registry;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use provider::Capability;
pub use provider::CapabilityRef;
pub use provider::SchemaProvider;
pub use registry::CapabilityRegistry;
pub use registry::DistinctCapability;
pub use registry::Registries;
pub use registry::RegistryError;
pub use registry::ResourceType;
pub use violation::SchemaError;
pub use violation::SchemaViolation;
pub use violation::Violation;
