// crates/warden-schema/src/vocabulary.rs
// ============================================================================
// Module: Vocabulary
// Description: Human-browsable capability summary over the registries.
// Purpose: Back the CLI's list/describe surface; no validation logic here.
// Dependencies: serde, warden-core
// ============================================================================

//! ## Overview
//! The vocabulary is a pure read over the registries: for every resource
//! type, its sorted filter and action names (aliases included) and the
//! documentation each provider exposes. Capabilities without documentation
//! stay `None` — the "no help available" sentinel belongs to the consumer,
//! not to this component.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use warden_core::CapabilityRegistry;
use warden_core::Registries;

// ============================================================================
// SECTION: Vocabulary Model
// ============================================================================

/// Documentation entries for one resource type's capability categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityDocs {
    /// Filter name to documentation.
    pub filters: BTreeMap<String, Option<String>>,
    /// Action name to documentation.
    pub actions: BTreeMap<String, Option<String>>,
}

/// Browsable capability summary for one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceVocabulary {
    /// Sorted filter names, aliases included.
    pub filters: Vec<String>,
    /// Sorted action names, aliases included.
    pub actions: Vec<String>,
    /// Documentation for both categories.
    pub docs: CapabilityDocs,
}

/// Capability vocabulary over every resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    /// Resource type name to its capability summary.
    #[serde(flatten)]
    resources: BTreeMap<String, ResourceVocabulary>,
}

impl Vocabulary {
    /// Looks up one resource type's summary.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&ResourceVocabulary> {
        self.resources.get(type_name)
    }

    /// Iterates resource type names in order.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Iterates `(type name, summary)` entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceVocabulary)> {
        self.resources.iter().map(|(name, resource)| (name.as_str(), resource))
    }

    /// Returns the number of resource types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true when no resource type is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Builds the vocabulary for a registry bundle.
#[must_use]
pub fn vocabulary(registries: &Registries) -> Vocabulary {
    let resources = registries
        .iter()
        .map(|(type_name, resource)| {
            (
                type_name.to_string(),
                ResourceVocabulary {
                    filters: names_of(resource.filters()),
                    actions: names_of(resource.actions()),
                    docs: CapabilityDocs {
                        filters: docs_of(resource.filters()),
                        actions: docs_of(resource.actions()),
                    },
                },
            )
        })
        .collect();
    Vocabulary {
        resources,
    }
}

/// Collects a registry's names; registry order is already sorted.
fn names_of(registry: &CapabilityRegistry) -> Vec<String> {
    registry.names().map(str::to_string).collect()
}

/// Collects a registry's documentation entries.
fn docs_of(registry: &CapabilityRegistry) -> BTreeMap<String, Option<String>> {
    registry
        .iter()
        .map(|(name, provider)| (name.to_string(), provider.doc().map(str::to_string)))
        .collect()
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregate vocabulary counts for the CLI summary view.
///
/// Capabilities present on every resource type count as common; the rest
/// count once per resource type that carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularySummary {
    /// Number of resource types.
    pub resource_count: usize,
    /// Actions shared by every resource type.
    pub common_action_count: usize,
    /// Per-type actions beyond the common set.
    pub unique_action_count: usize,
    /// Filters shared by every resource type.
    pub common_filter_count: usize,
    /// Per-type filters beyond the common set.
    pub unique_filter_count: usize,
}

/// Summarizes a vocabulary into aggregate counts.
#[must_use]
pub fn summarize(vocabulary: &Vocabulary) -> VocabularySummary {
    let common_actions = common_names(vocabulary, |resource| &resource.actions);
    let common_filters = common_names(vocabulary, |resource| &resource.filters);
    VocabularySummary {
        resource_count: vocabulary.len(),
        common_action_count: common_actions.len(),
        unique_action_count: unique_count(vocabulary, |resource| &resource.actions, &common_actions),
        common_filter_count: common_filters.len(),
        unique_filter_count: unique_count(vocabulary, |resource| &resource.filters, &common_filters),
    }
}

/// Intersects one capability category across every resource type.
fn common_names<'a>(
    vocabulary: &'a Vocabulary,
    select: impl Fn(&'a ResourceVocabulary) -> &'a Vec<String>,
) -> BTreeSet<&'a str> {
    let mut resources = vocabulary.iter();
    let Some((_, first)) = resources.next() else {
        return BTreeSet::new();
    };
    let mut common: BTreeSet<&str> = select(first).iter().map(String::as_str).collect();
    for (_, resource) in resources {
        let names: BTreeSet<&str> = select(resource).iter().map(String::as_str).collect();
        common.retain(|name| names.contains(name));
    }
    common
}

/// Counts per-type capabilities outside the common set.
fn unique_count<'a>(
    vocabulary: &'a Vocabulary,
    select: impl Fn(&'a ResourceVocabulary) -> &'a Vec<String>,
    common: &BTreeSet<&str>,
) -> usize {
    vocabulary
        .iter()
        .map(|(_, resource)| {
            select(resource).iter().filter(|name| !common.contains(name.as_str())).count()
        })
        .sum()
}
