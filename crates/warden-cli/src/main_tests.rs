// crates/warden-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Selector parsing, document loading, and catalog checks.
// Purpose: Keep the operator surface honest without spawning the binary.
// Dependencies: serde_json, tempfile, warden-schema
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test fixtures use explicit asserts and unwraps for clarity."
)]

use std::io::Write as _;

use serde_json::Value;
use serde_json::json;

use warden_core::Violation;
use warden_schema::PolicyValidator;
use warden_schema::diagnose;
use warden_schema::vocabulary;

use crate::EXIT_FATAL;
use crate::EXIT_USAGE;
use crate::catalog;
use crate::describe_selector;
use crate::load_document;

/// Valid policy document exercising shortcut and alias forms.
fn valid_document() -> Value {
    json!({
        "policies": [{
            "name": "foo",
            "resource": "s3",
            "filters": [{ "tag:custodian_tagging": "not-null" }],
            "actions": [{ "type": "tag", "tags": ["custodian_cleanup"] }]
        }]
    })
}

#[test]
fn selector_lists_resource_capabilities() {
    let vocabulary = vocabulary(&catalog::registries());
    let rendered = match describe_selector(&vocabulary, "ec2") {
        Ok(rendered) => rendered,
        Err(error) => panic!("selector failed: {}", error.message),
    };
    assert!(rendered.contains("tag-count"), "ec2 listing must include its filters");
    assert!(rendered.contains("mark"), "ec2 listing must include alias names");
}

#[test]
fn selector_prints_capability_doc() {
    let vocabulary = vocabulary(&catalog::registries());
    let rendered = match describe_selector(&vocabulary, "ec2.filters.tag-count") {
        Ok(rendered) => rendered,
        Err(error) => panic!("selector failed: {}", error.message),
    };
    assert_eq!(rendered, "Filter resources by their total tag count.");
}

#[test]
fn selector_is_case_insensitive() {
    let vocabulary = vocabulary(&catalog::registries());
    assert!(describe_selector(&vocabulary, "EC2.Filters.Tag-Count").is_ok());
}

#[test]
fn selector_rejects_unknown_resource() {
    let vocabulary = vocabulary(&catalog::registries());
    let error = match describe_selector(&vocabulary, "lambda") {
        Ok(rendered) => panic!("unknown resource accepted: {rendered}"),
        Err(error) => error,
    };
    assert_eq!(error.code, EXIT_USAGE);
}

#[test]
fn selector_rejects_unknown_category_and_item() {
    let vocabulary = vocabulary(&catalog::registries());
    let category = describe_selector(&vocabulary, "ec2.modes");
    assert!(category.is_err_and(|error| error.code == EXIT_USAGE));
    let item = describe_selector(&vocabulary, "ec2.actions.untag");
    assert!(item.is_err_and(|error| error.code == EXIT_USAGE));
}

#[test]
fn selector_rejects_extra_components() {
    let vocabulary = vocabulary(&catalog::registries());
    let error = match describe_selector(&vocabulary, "ec2.actions.tag.extra") {
        Ok(rendered) => panic!("over-deep selector accepted: {rendered}"),
        Err(error) => error,
    };
    assert_eq!(error.code, EXIT_USAGE);
}

#[test]
fn load_document_reads_yaml_and_json() {
    let document = valid_document();

    let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    let rendered = serde_yaml::to_string(&document).unwrap();
    yaml.write_all(rendered.as_bytes()).unwrap();
    yaml.flush().unwrap();
    assert_eq!(load_document(yaml.path()).ok().unwrap(), document);

    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    json_file.write_all(document.to_string().as_bytes()).unwrap();
    json_file.flush().unwrap();
    assert_eq!(load_document(json_file.path()).ok().unwrap(), document);
}

#[test]
fn load_document_escalates_missing_path() {
    let error = match load_document(std::path::Path::new("fake.yaml")) {
        Ok(document) => panic!("missing path accepted: {document}"),
        Err(error) => error,
    };
    assert_eq!(error.code, EXIT_FATAL, "missing config is a fatal input error");
}

#[test]
fn load_document_rejects_unknown_format() {
    let mut other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    other.write_all(b"policies = []").unwrap();
    other.flush().unwrap();
    let error = match load_document(other.path()) {
        Ok(document) => panic!("unknown format accepted: {document}"),
        Err(error) => error,
    };
    assert_eq!(error.code, EXIT_FATAL);
}

#[test]
fn catalog_accepts_valid_policies() {
    let registries = catalog::registries();
    let validator = match PolicyValidator::for_registries(&registries) {
        Ok(validator) => validator,
        Err(error) => panic!("catalog schema failed self-check: {error}"),
    };
    assert!(validator.validate(&valid_document()).is_empty());
}

#[test]
fn catalog_diagnoses_unregistered_action() {
    let registries = catalog::registries();
    let validator = match PolicyValidator::for_registries(&registries) {
        Ok(validator) => validator,
        Err(error) => panic!("catalog schema failed self-check: {error}"),
    };
    let document = json!({
        "policies": [{
            "name": "foo",
            "resource": "s3",
            "filters": [{ "tag:custodian_tagging": "not-null" }],
            "actions": [{ "type": "untag", "tags": ["custodian_cleanup"] }]
        }]
    });
    let violations = validator.validate(&document);
    assert!(!violations.is_empty(), "unregistered action must be rejected");
    let diagnosis = diagnose(validator.schema(), &document, &violations).unwrap();
    assert_eq!(diagnosis.policy_name, "foo");
    match diagnosis.violation {
        Violation::Schema(violation) => {
            assert!(
                violation.instance_path.starts_with("/policies/0/actions"),
                "diagnosis must be attributable to the actions array, got {}",
                violation.instance_path
            );
        }
        Violation::DuplicateNames {
            ..
        } => panic!("expected a schema violation"),
    }
}
