//! Structural validation of decision records.
//!
//! Validation is exhaustive: every check runs and every violation is kept.
//! Violations are data, never errors; the CLI turns a non-empty report into
//! a non-zero exit code.

use crate::core::output;
use crate::core::record::{self, CONSEQUENCE_SECTIONS, REQUIRED_SECTIONS, Status};
use crate::core::store::RecordStore;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingFile(PathBuf),
    Unreadable { path: PathBuf, cause: String },
    BadHeading,
    MissingSection(&'static str),
    InvalidStatus(String),
    MissingConsequence(&'static str),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingFile(path) => write!(f, "File does not exist: {}", path.display()),
            Violation::Unreadable { path, cause } => {
                write!(f, "File could not be read: {} ({})", path.display(), cause)
            }
            Violation::BadHeading => write!(
                f,
                "Missing or incorrect record title format (should be '# {}XXX: Title')",
                record::RECORD_PREFIX
            ),
            Violation::MissingSection(section) => {
                write!(f, "Missing required section: {}", section)
            }
            Violation::InvalidStatus(value) => write!(
                f,
                "Invalid status: {}. Must be one of: {}",
                value,
                Status::VALID.join(", ")
            ),
            Violation::MissingConsequence(subsection) => {
                write!(f, "Missing consequences subsection: {}", subsection)
            }
        }
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Check one file against the record structure. Empty means conformant.
pub fn validate_record(path: &Path) -> Vec<Violation> {
    if !path.exists() {
        return vec![Violation::MissingFile(path.to_path_buf())];
    }

    match fs::read_to_string(path) {
        Ok(content) => validate_content(&content),
        Err(e) => vec![Violation::Unreadable {
            path: path.to_path_buf(),
            cause: e.to_string(),
        }],
    }
}

/// Structural checks over record text.
pub fn validate_content(content: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if record::parse_heading(content).is_none() {
        violations.push(Violation::BadHeading);
    }

    for section in REQUIRED_SECTIONS {
        if !record::has_section(content, section) {
            violations.push(Violation::MissingSection(section));
        }
    }

    if let Some(value) = record::parse_status_line(content) {
        if !Status::from_line(&value).is_valid() {
            violations.push(Violation::InvalidStatus(value));
        }
    }

    if let Some(pos) = content.find("## Consequences") {
        let after = &content[pos + "## Consequences".len()..];
        for subsection in CONSEQUENCE_SECTIONS {
            if !after.contains(subsection) {
                violations.push(Violation::MissingConsequence(subsection));
            }
        }
    }

    violations
}

/// Validate every record a scan finds. Only offending paths are kept.
pub fn validate_all(store: &RecordStore) -> BTreeMap<PathBuf, Vec<Violation>> {
    let collection = store.scan();
    let mut results = BTreeMap::new();

    for rec in collection.iter() {
        let violations = validate_record(&rec.source_path);
        if violations.is_empty() {
            continue;
        }
        if output::trace_enabled() {
            let messages: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            output::trace(&format!(
                "{}: {}",
                rec.source_path.display(),
                output::preview_messages(&messages, 3, 80)
            ));
        }
        results.insert(rec.source_path.clone(), violations);
    }

    results
}
