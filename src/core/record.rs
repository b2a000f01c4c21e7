//! Decision record model and the line-level rules used to read one.
//!
//! A record is a markdown file shaped like:
//!
//! ```text
//! # RECORD-007: Use widgets
//!
//! ## Status
//! Accepted
//!
//! ## Context
//! ## Decision
//! ## Consequences
//! ### Positive
//! ### Negative
//! ### Neutral
//! ```
//!
//! Three extraction rules are exposed separately so each can be tested on
//! its own: [`parse_heading`], [`parse_status_line`], and [`has_section`].

use crate::core::output;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const RECORD_PREFIX: &str = "RECORD-";

/// Section headings every record must carry, in document order.
pub const REQUIRED_SECTIONS: [&str; 4] =
    ["## Status", "## Context", "## Decision", "## Consequences"];

/// Subsections expected after `## Consequences`.
pub const CONSEQUENCE_SECTIONS: [&str; 3] = ["### Positive", "### Negative", "### Neutral"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Proposed,
    Accepted,
    Deprecated,
    Superseded,
    /// No status line present.
    Unknown,
    /// A status line holding something other than the four lifecycle values.
    Other(String),
}

impl Status {
    pub const VALID: [&'static str; 4] = ["Proposed", "Accepted", "Deprecated", "Superseded"];

    /// Map the trimmed text of a status line onto a lifecycle value.
    pub fn from_line(text: &str) -> Self {
        match text.trim() {
            "Proposed" => Status::Proposed,
            "Accepted" => Status::Accepted,
            "Deprecated" => Status::Deprecated,
            "Superseded" => Status::Superseded,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Status::Unknown | Status::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Proposed => "Proposed",
            Status::Accepted => "Accepted",
            Status::Deprecated => "Deprecated",
            Status::Superseded => "Superseded",
            Status::Unknown => "Unknown",
            Status::Other(text) => text,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized as the status text, so unrecognized values stay plain strings.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a record lives, decided purely by its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    ProjectWide,
    DesignSpecific { design: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRecord {
    pub identifier: String,
    pub title: String,
    pub status: Status,
    pub source_path: PathBuf,
    pub scope: Scope,
}

impl DecisionRecord {
    /// Base name of the source file, e.g. `RECORD-001-use-widgets.md`.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `RECORD-<identifier>`
    pub fn label(&self) -> String {
        format!("{}{}", RECORD_PREFIX, self.identifier)
    }
}

/// Identifier and title taken from a `# RECORD-NNN: Title` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub identifier: String,
    pub title: String,
}

/// First line of the form `#` + optional whitespace + `RECORD-NNN:` + title.
pub fn parse_heading(content: &str) -> Option<Heading> {
    content.lines().find_map(heading_from_line)
}

fn heading_from_line(line: &str) -> Option<Heading> {
    let rest = line.strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix(RECORD_PREFIX)?;

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() != 3 {
        return None;
    }
    let title = rest[digits.len()..].strip_prefix(':')?.trim();
    if title.is_empty() {
        return None;
    }

    Some(Heading {
        identifier: digits,
        title: title.to_string(),
    })
}

/// Text of the first non-blank line after the first `## Status` heading.
///
/// Returns `None` when no status heading is followed by any text.
pub fn parse_status_line(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        if !is_status_heading(line) {
            continue;
        }
        if let Some(value) = lines[idx + 1..].iter().find(|l| !l.trim().is_empty()) {
            return Some(value.trim().to_string());
        }
    }
    None
}

fn is_status_heading(line: &str) -> bool {
    line.strip_prefix("##")
        .map(|rest| rest.trim() == "Status" && !rest.starts_with('#'))
        .unwrap_or(false)
}

/// A section counts as present when its literal heading text appears anywhere.
pub fn has_section(content: &str, section: &str) -> bool {
    content.contains(section)
}

/// Build a record from file text. `None` when the heading line is absent.
pub fn record_from_content(
    content: &str,
    source_path: &Path,
    scope: Scope,
) -> Option<DecisionRecord> {
    let heading = parse_heading(content)?;
    let status = parse_status_line(content)
        .map(|s| Status::from_line(&s))
        .unwrap_or(Status::Unknown);

    Some(DecisionRecord {
        identifier: heading.identifier,
        title: heading.title,
        status,
        source_path: source_path.to_path_buf(),
        scope,
    })
}

/// Read and parse one record file.
///
/// Read failures are reported on stderr and yield `None` so a scan can carry on.
pub fn parse_record(path: &Path, scope: Scope) -> Option<DecisionRecord> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let record = record_from_content(&content, path, scope);
            if record.is_none() {
                output::trace(&format!("skipping {}: no record heading", path.display()));
            }
            record
        }
        Err(e) => {
            output::warning(&format!("Error parsing {}: {}", path.display(), e));
            None
        }
    }
}

/// File names the scanner treats as record candidates.
pub fn is_record_file_name(name: &str) -> bool {
    name.starts_with(RECORD_PREFIX) && name.ends_with(".md")
}
