// crates/warden-core/src/registry.rs
// ============================================================================
// Module: Capability Registries
// Description: Ordered name-to-provider registries for resource types.
// Purpose: Give the schema builder a read-only, alias-aware registry view.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`CapabilityRegistry`] maps capability names to shared provider handles
//! in deterministic name order. Two names may resolve to the same provider
//! (aliasing); [`CapabilityRegistry::distinct`] collapses such groups by
//! handle identity while preserving every alias name for reference
//! generation. [`Registries`] bundles one action and one filter registry per
//! resource type and is passed explicitly into the schema builder — there is
//! no process-wide registry state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::provider::CapabilityRef;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Alias target is not registered.
    #[error("unknown capability: {name}")]
    UnknownCapability {
        /// Name that failed to resolve.
        name: String,
    },
}

// ============================================================================
// SECTION: Capability Registry
// ============================================================================

/// Ordered mapping from capability name to shared provider handle.
///
/// # Invariants
/// - Iteration order is name order, making downstream builds deterministic.
/// - Names are never deduplicated; only [`Self::distinct`] collapses aliases.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    /// Name-to-provider entries in name order.
    entries: BTreeMap<String, CapabilityRef>,
}

/// Capability group produced by alias collapse.
pub struct DistinctCapability<'a> {
    /// Canonical name: the first name in registry order for this provider.
    pub name: &'a str,
    /// Provider implementation shared by every name in the group.
    pub provider: &'a CapabilityRef,
    /// Remaining names bound to the same provider, in registry order.
    pub aliases: Vec<&'a str>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registers a provider under the given name.
    ///
    /// Registering an existing provider handle under a second name is how
    /// aliases are created; the registry itself treats both names alike.
    pub fn register(&mut self, name: impl Into<String>, provider: CapabilityRef) {
        self.entries.insert(name.into(), provider);
    }

    /// Binds an additional name to an already-registered capability.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCapability`] when `existing` is not
    /// registered.
    pub fn alias(&mut self, alias: impl Into<String>, existing: &str) -> Result<(), RegistryError> {
        let provider =
            self.entries.get(existing).cloned().ok_or_else(|| RegistryError::UnknownCapability {
                name: existing.to_string(),
            })?;
        self.entries.insert(alias.into(), provider);
        Ok(())
    }

    /// Looks up a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CapabilityRef> {
        self.entries.get(name)
    }

    /// Iterates capability names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates `(name, provider)` entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapabilityRef)> {
        self.entries.iter().map(|(name, provider)| (name.as_str(), provider))
    }

    /// Collapses aliases into distinct capability groups.
    ///
    /// Grouping compares provider handle identity, never names: two distinct
    /// providers that happen to produce equal fragments stay separate, and a
    /// provider registered under many names forms a single group.
    #[must_use]
    pub fn distinct(&self) -> Vec<DistinctCapability<'_>> {
        let mut groups: Vec<DistinctCapability<'_>> = Vec::new();
        for (name, provider) in &self.entries {
            if let Some(group) =
                groups.iter_mut().find(|group| Arc::ptr_eq(group.provider, provider))
            {
                group.aliases.push(name.as_str());
            } else {
                groups.push(DistinctCapability {
                    name: name.as_str(),
                    provider,
                    aliases: Vec::new(),
                });
            }
        }
        groups
    }

    /// Returns the number of registered names, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no capability is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Resource Types
// ============================================================================

/// Capability surface of one resource type.
///
/// # Invariants
/// - Constructed once by the resource-loading caller; the schema builder
///   only ever reads it.
#[derive(Clone, Default)]
pub struct ResourceType {
    /// Action capabilities registered for the type.
    actions: CapabilityRegistry,
    /// Filter capabilities registered for the type.
    filters: CapabilityRegistry,
    /// Extra top-level policy properties allowed for the type.
    overlays: BTreeMap<String, Value>,
}

impl ResourceType {
    /// Creates a resource type from its action and filter registries.
    #[must_use]
    pub const fn new(actions: CapabilityRegistry, filters: CapabilityRegistry) -> Self {
        Self {
            actions,
            filters,
            overlays: BTreeMap::new(),
        }
    }

    /// Declares an extra top-level policy property for this type.
    ///
    /// This is the per-type escape hatch (for example a server-side `query`
    /// clause); the shared policy envelope is never altered by it.
    #[must_use]
    pub fn with_overlay(mut self, property: impl Into<String>, fragment: Value) -> Self {
        self.overlays.insert(property.into(), fragment);
        self
    }

    /// Returns the action registry.
    #[must_use]
    pub const fn actions(&self) -> &CapabilityRegistry {
        &self.actions
    }

    /// Returns the filter registry.
    #[must_use]
    pub const fn filters(&self) -> &CapabilityRegistry {
        &self.filters
    }

    /// Returns the extra policy properties declared for this type.
    #[must_use]
    pub const fn overlays(&self) -> &BTreeMap<String, Value> {
        &self.overlays
    }
}

// ============================================================================
// SECTION: Registries
// ============================================================================

/// Explicit bundle of every resource type registry.
///
/// # Invariants
/// - Iteration order is type-name order.
/// - Independent bundles never interfere; builders take them by reference.
#[derive(Clone, Default)]
pub struct Registries {
    /// Resource types in type-name order.
    types: BTreeMap<String, ResourceType>,
}

impl Registries {
    /// Creates an empty bundle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Registers a resource type under its type name.
    pub fn register(&mut self, type_name: impl Into<String>, resource: ResourceType) {
        self.types.insert(type_name.into(), resource);
    }

    /// Looks up a resource type by name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&ResourceType> {
        self.types.get(type_name)
    }

    /// Iterates type names in order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Iterates `(type name, resource type)` entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceType)> {
        self.types.iter().map(|(name, resource)| (name.as_str(), resource))
    }

    /// Returns the number of registered resource types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when no resource type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::*;
    use crate::provider::Capability;

    #[test]
    fn distinct_collapses_aliases_by_identity() {
        let mut registry = CapabilityRegistry::new();
        let tag = Capability::new(json!({"type": "object"})).into_ref();
        registry.register("tag", tag.clone());
        registry.register("mark", tag);
        registry.register("stop", Capability::new(json!({"type": "object"})).into_ref());

        let groups = registry.distinct();
        assert_eq!(groups.len(), 2, "aliases must collapse to one group");
        assert_eq!(groups[0].name, "mark", "canonical name is first in registry order");
        assert_eq!(groups[0].aliases, vec!["tag"]);
        assert_eq!(groups[1].name, "stop");
        assert!(groups[1].aliases.is_empty());
    }

    #[test]
    fn distinct_keeps_equal_fragments_separate() {
        let mut registry = CapabilityRegistry::new();
        registry.register("first", Capability::new(json!({"type": "object"})).into_ref());
        registry.register("second", Capability::new(json!({"type": "object"})).into_ref());

        assert_eq!(registry.distinct().len(), 2, "equal fragments are not aliases");
    }

    #[test]
    fn alias_requires_registered_target() {
        let mut registry = CapabilityRegistry::new();
        registry.register("tag", Capability::new(json!({})).into_ref());

        assert!(registry.alias("mark", "tag").is_ok());
        assert!(registry.get("mark").is_some());
        let missing = registry.alias("unmark", "untag");
        assert!(missing.is_err(), "aliasing an unknown capability must fail");
    }
}
