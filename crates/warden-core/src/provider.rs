// crates/warden-core/src/provider.rs
// ============================================================================
// Module: Capability Providers
// Description: Schema provider contract for filter and action capabilities.
// Purpose: Expose schema fragments and documentation without introspection.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Every filter or action capability exposes a JSON-Schema-shaped fragment
//! describing its configuration shape, plus an explicit documentation string.
//! Providers are shared behind [`CapabilityRef`] handles; several registry
//! names may point at the same provider (aliasing), and identity comparison
//! on the handle is the only way aliases are collapsed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

// ============================================================================
// SECTION: Provider Contract
// ============================================================================

/// Schema and documentation contract for a single capability.
///
/// Implementations must be pure: the fragment returned by [`Self::schema`]
/// may not change over the process lifetime, since the composite schema is
/// built once and shared read-only.
pub trait SchemaProvider: Send + Sync {
    /// Returns the capability's configuration schema fragment.
    fn schema(&self) -> Value;

    /// Returns the capability's documentation, when it has any.
    fn doc(&self) -> Option<&str>;
}

/// Shared handle to a capability implementation.
pub type CapabilityRef = Arc<dyn SchemaProvider>;

// ============================================================================
// SECTION: Stored Capability
// ============================================================================

/// Capability backed by a stored fragment and optional documentation.
#[derive(Debug, Clone)]
pub struct Capability {
    /// JSON-Schema-shaped configuration fragment.
    fragment: Value,
    /// Documentation surfaced by vocabulary listings.
    doc: Option<String>,
}

impl Capability {
    /// Creates an undocumented capability from its schema fragment.
    #[must_use]
    pub const fn new(fragment: Value) -> Self {
        Self {
            fragment,
            doc: None,
        }
    }

    /// Creates a documented capability from its schema fragment.
    #[must_use]
    pub fn with_doc(fragment: Value, doc: impl Into<String>) -> Self {
        Self {
            fragment,
            doc: Some(doc.into()),
        }
    }

    /// Wraps the capability in a shareable registry handle.
    #[must_use]
    pub fn into_ref(self) -> CapabilityRef {
        Arc::new(self)
    }
}

impl SchemaProvider for Capability {
    fn schema(&self) -> Value {
        self.fragment.clone()
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}
