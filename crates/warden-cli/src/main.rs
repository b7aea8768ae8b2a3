// crates/warden-cli/src/main.rs
// ============================================================================
// Module: Warden CLI Entry Point
// Description: Command dispatcher for policy validation and schema browsing.
// Purpose: Thin operator surface over the schema builder and validator.
// Dependencies: clap, serde_json, serde_yaml, warden-core, warden-schema
// ============================================================================

//! ## Overview
//! The Warden CLI validates policy configuration files against the generated
//! composite schema and exposes the capability vocabulary for browsing.
//! Exit statuses are distinguishable by failure class: 0 for success, 1 for
//! invalid policy content, 2 for usage errors, 3 for fatal input or
//! internal errors. All operator-facing output goes through explicit
//! stdout/stderr writer helpers.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod catalog;
#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use warden_schema::PolicyNames;
use warden_schema::PolicyValidator;
use warden_schema::SchemaBuilder;
use warden_schema::Vocabulary;
use warden_schema::diagnose;
use warden_schema::summarize;
use warden_schema::vocabulary;

// ============================================================================
// SECTION: Exit Statuses
// ============================================================================

/// Exit status for invalid policy content.
const EXIT_INVALID: u8 = 1;
/// Exit status for usage errors.
const EXIT_USAGE: u8 = 2;
/// Exit status for fatal input or internal errors.
const EXIT_FATAL: u8 = 3;

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// Warden: governance policies for cloud resources.
#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "Validate and inspect governance policy documents")]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Validate policy configuration files against the generated schema.
    Validate(ValidateCommand),
    /// Inspect the capability vocabulary or dump the composite schema.
    Schema(SchemaCommand),
    /// Print the version.
    Version,
}

/// Arguments for `warden validate`.
#[derive(Debug, Args)]
struct ValidateCommand {
    /// Policy configuration files (YAML or JSON).
    configs: Vec<PathBuf>,
    /// Policy configuration file (legacy spelling of the positional form).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

/// Arguments for `warden schema`.
#[derive(Debug, Args)]
struct SchemaCommand {
    /// Optional RESOURCE[.CATEGORY[.ITEM]] selector.
    selector: Option<String>,
    /// Dump the full composite schema as JSON.
    #[arg(long)]
    json: bool,
    /// Print aggregate vocabulary counts.
    #[arg(long)]
    summary: bool,
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// CLI failure with its process exit status.
struct CliError {
    /// Human-readable error message.
    message: String,
    /// Process exit status class.
    code: u8,
}

impl CliError {
    /// Usage error: the CLI was invoked incorrectly.
    fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: EXIT_USAGE,
        }
    }

    /// Fatal input or internal error.
    fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: EXIT_FATAL,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => emit_error(&error),
    }
}

/// Parses arguments and dispatches the selected subcommand.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate(command) => command_validate(command),
        Command::Schema(command) => command_schema(command),
        Command::Version => command_version(),
    }
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Validates every supplied config in one shared run namespace.
fn command_validate(command: ValidateCommand) -> CliResult<ExitCode> {
    let mut configs = command.configs;
    if let Some(config) = command.config {
        configs.push(config);
    }
    if configs.is_empty() {
        return Err(CliError::usage("no config files specified"));
    }

    let registries = catalog::registries();
    let validator = PolicyValidator::for_registries(&registries)
        .map_err(|error| CliError::fatal(error.to_string()))?;

    let mut names = PolicyNames::new();
    let mut invalid = false;
    for path in &configs {
        let document = load_document(path)?;
        let violations = validator.validate_in_run(&document, &mut names);
        if violations.is_empty() {
            print_line(&format!("configuration valid: {}", path.display()))?;
            continue;
        }
        invalid = true;
        print_error_line(&format!("configuration invalid: {}", path.display()))?;
        if let Some(diagnosis) = diagnose(validator.schema(), &document, &violations) {
            print_error_line(&format!("  policy: {}", diagnosis.policy_name))?;
            print_error_line(&format!("  {}", diagnosis.violation))?;
        }
        for violation in violations.iter().skip(1) {
            print_error_line(&format!("  {violation}"))?;
        }
    }
    if invalid {
        return Ok(ExitCode::from(EXIT_INVALID));
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads one policy document from a YAML or JSON config file.
fn load_document(path: &Path) -> CliResult<Value> {
    if !path.exists() {
        return Err(CliError::fatal(format!("invalid path for config {}", path.display())));
    }
    let raw = fs::read_to_string(path)
        .map_err(|error| CliError::fatal(format!("failed to read {}: {error}", path.display())))?;
    match path.extension().and_then(OsStr::to_str) {
        Some("yml" | "yaml") => serde_yaml::from_str(&raw)
            .map_err(|error| CliError::fatal(format!("failed to parse {}: {error}", path.display()))),
        Some("json") => serde_json::from_str(&raw)
            .map_err(|error| CliError::fatal(format!("failed to parse {}: {error}", path.display()))),
        _ => Err(CliError::fatal(format!("unsupported config format: {}", path.display()))),
    }
}

// ============================================================================
// SECTION: Schema Command
// ============================================================================

/// Dumps the schema or browses the capability vocabulary.
fn command_schema(command: SchemaCommand) -> CliResult<ExitCode> {
    let registries = catalog::registries();
    if command.json {
        let schema = SchemaBuilder::new(&registries).build(None);
        let rendered = serde_json::to_string_pretty(&schema)
            .map_err(|error| CliError::fatal(format!("failed to render schema: {error}")))?;
        print_line(&rendered)?;
        return Ok(ExitCode::SUCCESS);
    }

    let vocabulary = vocabulary(&registries);
    if command.summary {
        return command_schema_summary(&vocabulary);
    }

    let Some(selector) = command.selector.as_deref() else {
        let names: Vec<&str> = vocabulary.resource_names().collect();
        print_line(&render_yaml(&json!({ "resources": names }))?)?;
        return Ok(ExitCode::SUCCESS);
    };
    print_line(&describe_selector(&vocabulary, selector)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the aggregate vocabulary counts.
fn command_schema_summary(vocabulary: &Vocabulary) -> CliResult<ExitCode> {
    let summary = summarize(vocabulary);
    print_line(&format!("resource count: {}", summary.resource_count))?;
    print_line(&format!("unique actions: {}", summary.unique_action_count))?;
    print_line(&format!("common actions: {}", summary.common_action_count))?;
    print_line(&format!("unique filters: {}", summary.unique_filter_count))?;
    print_line(&format!("common filters: {}", summary.common_filter_count))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders the vocabulary view selected by RESOURCE[.CATEGORY[.ITEM]].
fn describe_selector(vocabulary: &Vocabulary, selector: &str) -> CliResult<String> {
    let components: Vec<&str> = selector.split('.').collect();
    if components.len() > 3 {
        return Err(CliError::usage(format!(
            "invalid selector '{selector}': at most 3 components in the format RESOURCE.CATEGORY.ITEM"
        )));
    }

    let resource_name = components[0].to_ascii_lowercase();
    let resource = vocabulary
        .get(&resource_name)
        .ok_or_else(|| CliError::usage(format!("{resource_name} is not a valid resource")))?;
    if components.len() == 1 {
        let mut body = Map::new();
        body.insert("actions".to_string(), json!(&resource.actions));
        body.insert("filters".to_string(), json!(&resource.filters));
        let mut document = Map::new();
        document.insert(resource_name, Value::Object(body));
        return render_yaml(&Value::Object(document));
    }

    let category = components[1].to_ascii_lowercase();
    let names = match category.as_str() {
        "actions" => &resource.actions,
        "filters" => &resource.filters,
        _ => {
            return Err(CliError::usage(format!(
                "valid choices are 'actions' and 'filters', you supplied '{category}'"
            )));
        }
    };
    if components.len() == 2 {
        let mut body = Map::new();
        body.insert(category, json!(names));
        let mut document = Map::new();
        document.insert(resource_name, Value::Object(body));
        return render_yaml(&Value::Object(document));
    }

    let item = components[2].to_ascii_lowercase();
    if !names.contains(&item) {
        return Err(CliError::usage(format!(
            "{item} is not in the {category} list for resource {resource_name}"
        )));
    }
    let docs = match category.as_str() {
        "actions" => &resource.docs.actions,
        _ => &resource.docs.filters,
    };
    let doc = docs.get(&item).and_then(|entry| entry.as_deref());
    Ok(doc
        .filter(|text| !text.is_empty())
        .map_or_else(|| "No help is available for this item.".to_string(), str::to_string))
}

// ============================================================================
// SECTION: Version Command
// ============================================================================

/// Prints the crate version.
fn command_version() -> CliResult<ExitCode> {
    print_line(env!("CARGO_PKG_VERSION"))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Renders a value as trimmed YAML.
fn render_yaml(value: &Value) -> CliResult<String> {
    serde_yaml::to_string(value)
        .map(|rendered| rendered.trim_end().to_string())
        .map_err(|error| CliError::fatal(format!("failed to render yaml: {error}")))
}

/// Writes one line to stdout, mapping failures to fatal errors.
fn print_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|error| CliError::fatal(output_error("stdout", &error)))
}

/// Writes one line to stderr, mapping failures to fatal errors.
fn print_error_line(message: &str) -> CliResult<()> {
    write_stderr_line(message).map_err(|error| CliError::fatal(output_error("stderr", &error)))
}

/// Writes one line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes one line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a stream write failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Reports a CLI error and maps it to its exit status.
fn emit_error(error: &CliError) -> ExitCode {
    let _ = write_stderr_line(&error.message);
    ExitCode::from(error.code)
}
