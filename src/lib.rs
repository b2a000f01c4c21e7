//! recordkit: architecture decision record tooling for agent rule trees.
//!
//! Projects that keep rule files for an AI coding assistant usually also keep
//! Architecture Decision Records next to them. recordkit scans those records,
//! checks their structure, and keeps the index document honest.
//!
//! # Layout
//!
//! - Project-wide records: `docs/records/RECORD-NNN-*.md`
//! - Design-specific records: `designs/<N>-<feature>/records/RECORD-NNN-*.md`
//! - Index: `docs/records/INDEX.md`
//!
//! All three locations can be changed in `recordkit.toml`.
//!
//! # Commands
//!
//! ```bash
//! recordkit validate-all      # structure of every record
//! recordkit check-references  # local links in the index resolve
//! recordkit verify-index      # index mentions every record
//! recordkit update-index      # rebuild the index from disk
//! recordkit list              # inventory
//! ```
//!
//! Every check exits non-zero when it has findings.
//!
//! # Crate Structure
//!
//! - [`crate::core::record`]: record model and line parsers
//! - [`crate::core::store`]: `RecordStore` and scanning
//! - [`crate::core::validate`]: structural validation
//! - [`crate::core::index`]: index checks and regeneration

pub mod cli;
pub mod core;

use cli::{Cli, Command, OutputFormat};
use crate::core::{
    config, error, index, output,
    store::{RecordCollection, RecordStore, RootPaths},
    validate, workspace,
};

use clap::Parser;
use serde_json::json;

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report.
    Clean,
    /// Violations or index errors were printed.
    Findings,
}

pub fn run() -> Result<Outcome, error::RecordkitError> {
    let cli = Cli::parse();
    if cli.verbose {
        output::enable_trace();
    }

    let current_dir = std::env::current_dir()?;
    let project_root = workspace::resolve_project_root(cli.root.as_deref(), &current_dir)?;
    let config = config::load_config(&project_root)?;
    output::trace(&format!("project root {}", project_root.display()));

    let store = RecordStore::new(RootPaths::from_config(&project_root, &config));
    let json = cli.format == OutputFormat::Json;

    match cli.command {
        Command::ValidateAll => run_validate_all(&store, json),
        Command::CheckReferences => {
            let findings = index::check_references(&store);
            Ok(report_findings(
                "check-references",
                &findings,
                "Reference errors found:",
                "All record references in the index are valid!",
                json,
            ))
        }
        Command::VerifyIndex => {
            let findings = index::check_completeness(&store);
            Ok(report_findings(
                "verify-index",
                &findings,
                "Index verification errors:",
                "Index is complete and up to date!",
                json,
            ))
        }
        Command::UpdateIndex => {
            let path = index::regenerate(&store)?;
            if json {
                print_json(&json!({
                    "cmd": "update-index",
                    "status": "ok",
                    "path": path.display().to_string(),
                }));
            } else {
                output::success(&format!("Updated {}", path.display()));
            }
            Ok(Outcome::Clean)
        }
        Command::List => {
            let collection = store.scan();
            if json {
                print_json(&json!({
                    "cmd": "list",
                    "status": "ok",
                    "records": collection,
                }));
            } else {
                print_inventory(&collection);
            }
            Ok(Outcome::Clean)
        }
    }
}

fn run_validate_all(store: &RecordStore, json: bool) -> Result<Outcome, error::RecordkitError> {
    let results = validate::validate_all(store);
    let outcome = if results.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Findings
    };

    if json {
        let files: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(path, violations)| (path.display().to_string(), json!(violations)))
            .collect();
        print_json(&json!({
            "cmd": "validate-all",
            "status": status_label(outcome),
            "files": files,
        }));
        return Ok(outcome);
    }

    if results.is_empty() {
        output::success("All record files are valid!");
    } else {
        output::heading("Validation errors found:");
        for (path, violations) in &results {
            println!("\n{}:", path.display());
            for violation in violations {
                output::finding(&violation.to_string());
            }
        }
    }
    Ok(outcome)
}

fn report_findings(
    cmd: &str,
    findings: &[index::IndexFinding],
    failed_heading: &str,
    clean_message: &str,
    json: bool,
) -> Outcome {
    let outcome = if findings.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Findings
    };

    if json {
        print_json(&json!({
            "cmd": cmd,
            "status": status_label(outcome),
            "errors": findings,
        }));
    } else if findings.is_empty() {
        output::success(clean_message);
    } else {
        output::heading(failed_heading);
        for finding in findings {
            output::finding(&finding.to_string());
        }
    }
    outcome
}

fn print_inventory(collection: &RecordCollection) {
    if collection.is_empty() {
        println!("No records found.");
        return;
    }
    if !collection.project_wide.is_empty() {
        output::heading("Project-wide records:");
        for rec in &collection.project_wide {
            println!(
                "  {}  {:<11} {}",
                rec.label(),
                rec.status.as_str(),
                output::compact_line(&rec.title, 72)
            );
        }
    }
    for (design, records) in &collection.design_specific {
        output::heading(&format!("{}:", design));
        for rec in records {
            println!(
                "  {}  {:<11} {}",
                rec.label(),
                rec.status.as_str(),
                output::compact_line(&rec.title, 72)
            );
        }
    }
}

fn status_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Clean => "ok",
        Outcome::Findings => "failed",
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => output::failure(&format!("Failed to render JSON: {}", e)),
    }
}
