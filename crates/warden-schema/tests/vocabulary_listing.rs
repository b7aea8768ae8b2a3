//! Vocabulary and summary tests for warden-schema.
// crates/warden-schema/tests/vocabulary_listing.rs
// =============================================================================
// Module: Vocabulary Listing Tests
// Description: Read-only capability summaries over the registries.
// Purpose: Pin sorted listings, documentation exposure, and summary counts.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test fixtures use explicit asserts and unwraps for clarity."
)]

use warden_schema::summarize;
use warden_schema::vocabulary;

mod common;

#[test]
fn vocabulary_lists_every_resource_type_in_order() {
    let vocabulary = vocabulary(&common::sample_registries());
    let names: Vec<&str> = vocabulary.resource_names().collect();
    assert_eq!(names, vec!["ec2", "s3"]);
}

#[test]
fn capability_names_are_sorted_and_include_aliases() {
    let vocabulary = vocabulary(&common::sample_registries());
    let ec2 = vocabulary.get("ec2").unwrap();
    assert_eq!(
        ec2.filters,
        vec!["and", "event", "instance-age", "or", "tag-count", "value"]
    );
    assert_eq!(ec2.actions, vec!["mark", "start", "stop", "tag", "terminate"]);
}

#[test]
fn documented_capabilities_expose_their_docs() {
    let vocabulary = vocabulary(&common::sample_registries());
    let ec2 = vocabulary.get("ec2").unwrap();
    let doc = ec2.docs.filters.get("tag-count").unwrap();
    assert_eq!(doc.as_deref(), Some("Filter resources by their total tag count."));
}

#[test]
fn undocumented_capabilities_stay_none() {
    let vocabulary = vocabulary(&common::sample_registries());
    let ec2 = vocabulary.get("ec2").unwrap();
    // the sentinel for missing help belongs to the consumer, not here
    assert_eq!(ec2.docs.filters.get("instance-age"), Some(&None));
    assert_eq!(ec2.docs.actions.get("start"), Some(&None));
}

#[test]
fn aliases_share_the_implementation_doc() {
    let vocabulary = vocabulary(&common::sample_registries());
    let ec2 = vocabulary.get("ec2").unwrap();
    assert_eq!(ec2.docs.actions.get("tag"), ec2.docs.actions.get("mark"));
}

#[test]
fn summary_splits_common_and_per_type_capabilities() {
    let vocabulary = vocabulary(&common::sample_registries());
    let summary = summarize(&vocabulary);

    assert_eq!(summary.resource_count, 2);
    // value/event/and/or are carried by both fixture types
    assert_eq!(summary.common_filter_count, 4);
    // tag-count + instance-age on ec2, global-grants on s3
    assert_eq!(summary.unique_filter_count, 3);
    // mark + tag appear on both types
    assert_eq!(summary.common_action_count, 2);
    // start/stop/terminate on ec2, delete on s3
    assert_eq!(summary.unique_action_count, 4);
}

#[test]
fn empty_registries_produce_an_empty_vocabulary() {
    let vocabulary = vocabulary(&warden_core::Registries::new());
    assert!(vocabulary.is_empty());
    let summary = summarize(&vocabulary);
    assert_eq!(summary.resource_count, 0);
    assert_eq!(summary.common_filter_count, 0);
}
