//! Index document checks and regeneration.
//!
//! The index (`<docs_dir>/INDEX.md` by default) is meant to list every
//! record. Two read-only checks compare it against the filesystem, and
//! [`regenerate`] rebuilds it from a fresh scan.
//!
//! Completeness is a textual containment check: a record counts as listed
//! when its file name, title, or `<design>/<records>/<file>` reference
//! appears anywhere in the index text. For design records, a design whose
//! name is absent from the index is reported once and its records are not
//! checked individually, so a missing design can hide further omissions.

use crate::core::error::RecordkitError;
use crate::core::output;
use crate::core::record::DecisionRecord;
use crate::core::store::{RecordCollection, RecordStore, RootPaths};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));

static DESIGN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-(\w+)-(.+)").expect("valid design name regex"));

/// Title keywords that place a project-wide record under "Architecture & Framework".
pub const ARCHITECTURE_KEYWORDS: [&str; 5] =
    ["architecture", "framework", "rule", "import", "strategy"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexFinding {
    IndexMissing { index_name: String },
    BrokenLink { text: String, path: String },
    MissingRecord { reference: String, title: String },
    DesignNotMentioned { design: String },
}

impl fmt::Display for IndexFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexFinding::IndexMissing { index_name } => write!(f, "{} file not found", index_name),
            IndexFinding::BrokenLink { text, path } => {
                write!(f, "Broken link in index: {} (link text: '{}')", path, text)
            }
            IndexFinding::MissingRecord { reference, title } => {
                write!(f, "Missing from index: {} - {}", reference, title)
            }
            IndexFinding::DesignNotMentioned { design } => {
                write!(f, "Design '{}' not mentioned in index", design)
            }
        }
    }
}

impl Serialize for IndexFinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A markdown link found in the index, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub path: String,
}

pub fn extract_links(markdown: &str) -> Vec<Link> {
    LINK_RE
        .captures_iter(markdown)
        .map(|caps| Link {
            text: caps[1].to_string(),
            path: caps[2].to_string(),
        })
        .collect()
}

/// External and in-page links are not checked against the filesystem.
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with('#')
}

/// Resolve a link target against the index document's directory.
pub fn resolve_link(index_dir: &Path, link_path: &str) -> PathBuf {
    match link_path.strip_prefix("./") {
        Some(rest) => index_dir.join(rest),
        None => index_dir.join(link_path),
    }
}

fn read_index(store: &RecordStore) -> Result<String, IndexFinding> {
    let missing = || IndexFinding::IndexMissing {
        index_name: store.roots().index_name.clone(),
    };
    let index_path = store.index_path();
    if !index_path.exists() {
        return Err(missing());
    }
    fs::read_to_string(&index_path).map_err(|e| {
        output::warning(&format!("Error reading {}: {}", index_path.display(), e));
        missing()
    })
}

/// Every local link in the index must point at an existing file.
pub fn check_references(store: &RecordStore) -> Vec<IndexFinding> {
    let content = match read_index(store) {
        Ok(c) => c,
        Err(finding) => return vec![finding],
    };
    let index_path = store.index_path();
    let index_dir = index_path.parent().unwrap_or(Path::new("."));

    let mut findings = Vec::new();
    for link in extract_links(&content) {
        if is_external(&link.path) {
            continue;
        }
        let target = resolve_link(index_dir, &link.path);
        output::trace(&format!("link {} -> {}", link.path, target.display()));
        if !target.exists() {
            findings.push(IndexFinding::BrokenLink {
                text: link.text,
                path: link.path,
            });
        }
    }
    findings
}

/// Every scanned record must be mentioned in the index.
pub fn check_completeness(store: &RecordStore) -> Vec<IndexFinding> {
    let content = match read_index(store) {
        Ok(c) => c,
        Err(finding) => return vec![finding],
    };
    let collection = store.scan();
    completeness_findings(&content, &collection, store.roots())
}

/// Containment rules applied to already-loaded index text.
pub fn completeness_findings(
    index_text: &str,
    collection: &RecordCollection,
    roots: &RootPaths,
) -> Vec<IndexFinding> {
    let mut findings = Vec::new();

    for rec in &collection.project_wide {
        let file_name = rec.file_name();
        if !index_text.contains(&file_name) {
            findings.push(IndexFinding::MissingRecord {
                reference: file_name,
                title: rec.title.clone(),
            });
        }
    }

    for (design, records) in &collection.design_specific {
        if !index_text.contains(design.as_str()) {
            findings.push(IndexFinding::DesignNotMentioned {
                design: design.clone(),
            });
            continue;
        }
        for rec in records {
            let reference = roots.design_reference(design, &rec.file_name());
            if !index_text.contains(&reference) && !index_text.contains(&rec.title) {
                findings.push(IndexFinding::MissingRecord {
                    reference,
                    title: rec.title.clone(),
                });
            }
        }
    }

    findings
}

/// Rebuild the index from a fresh scan and write it over the old one.
pub fn regenerate(store: &RecordStore) -> Result<PathBuf, RecordkitError> {
    let collection = store.scan();
    let content = render_index(&collection, store.roots());

    let index_path = store.index_path();
    let parent = index_path.parent().ok_or_else(|| {
        RecordkitError::PathError(format!("Index has no parent: {}", index_path.display()))
    })?;
    fs::create_dir_all(parent)?;

    let tmp_path = parent.join(format!(".{}.tmp", store.roots().index_name));
    fs::write(&tmp_path, content)?;
    if let Err(e) = fs::rename(&tmp_path, &index_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    output::trace(&format!("wrote {}", index_path.display()));
    Ok(index_path)
}

/// Render the full index document. Same collection, same bytes.
pub fn render_index(collection: &RecordCollection, roots: &RootPaths) -> String {
    let mut content = String::new();
    render_intro(&mut content, roots);
    render_project_wide(&mut content, collection, roots);
    render_design_specific(&mut content, collection, roots);
    render_quick_reference(&mut content, collection);
    render_maintenance_notes(&mut content);
    content
}

fn render_intro(content: &mut String, roots: &RootPaths) {
    content.push_str("# Decision Record Index\n\n");
    content.push_str("## Overview\n\n");
    content.push_str(
        "This index lists every Architecture Decision Record in the project. \
         Records capture important architectural decisions and their rationale.\n\n",
    );

    content.push_str("### Record Organization\n\n");
    content.push_str("Records are organized in two places:\n\n");
    content.push_str(&format!(
        "- **Project-wide records** are stored in `{}/` and affect the entire project\n",
        roots.docs_rel
    ));
    content.push_str(&format!(
        "- **Design-specific records** are stored with their features in `{}/*/{}/` and document feature-specific decisions\n",
        roots.designs_rel, roots.records_dir_name
    ));

    content.push_str("\n### Classification Criteria\n");
    content.push_str("\n**Project-wide records** cover decisions that:\n\n");
    for line in [
        "Affect multiple features or the entire codebase",
        "Establish conventions or standards",
        "Define technology choices used across features",
        "Set security or performance policies",
        "Impact the development workflow",
        "Define architectural patterns or principles",
    ] {
        content.push_str(&format!("- {}\n", line));
    }

    content.push_str("\n**Design-specific records** cover decisions that:\n\n");
    for line in [
        "Only affect the specific feature implementation",
        "Document trade-offs unique to that feature",
        "Explain implementation choices within established conventions",
        "Describe optimizations specific to the feature",
    ] {
        content.push_str(&format!("- {}\n", line));
    }
}

fn is_architecture_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    ARCHITECTURE_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn sorted_by_identifier(records: &[DecisionRecord]) -> Vec<&DecisionRecord> {
    let mut sorted: Vec<&DecisionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    sorted
}

fn render_project_wide(content: &mut String, collection: &RecordCollection, roots: &RootPaths) {
    content.push_str("\n## Project-wide Records\n");
    content.push_str(&format!("\nLocated in `{}/`\n", roots.docs_rel));

    let (architecture, process): (Vec<&DecisionRecord>, Vec<&DecisionRecord>) =
        sorted_by_identifier(&collection.project_wide)
            .into_iter()
            .partition(|rec| is_architecture_title(&rec.title));

    for (heading, bucket) in [
        ("Architecture & Framework", architecture),
        ("Development Process", process),
    ] {
        if bucket.is_empty() {
            continue;
        }
        content.push_str(&format!("\n### {}\n\n", heading));
        for rec in bucket {
            content.push_str(&format!(
                "- [{}](./{}) - {}\n",
                rec.label(),
                rec.file_name(),
                rec.title
            ));
        }
    }
}

/// Leading decimal ordinal of a design directory name, e.g. `3` for `03-auth-oauth`.
pub fn design_ordinal(design: &str) -> u64 {
    let digits: String = design.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(u64::MAX)
}

/// Heading for a design section: `Auth: Oauth (03)` for `03-auth-oauth`,
/// or the raw directory name when it does not follow `<N>-<category>-<description>`.
pub fn design_heading(design: &str) -> String {
    match DESIGN_NAME_RE.captures(design) {
        Some(caps) => {
            let category = title_case(&caps[1]);
            let description = title_case(&caps[2].replace('-', " "));
            let ordinal = design.split('-').next().unwrap_or(design);
            format!("{}: {} ({})", category, description, ordinal)
        }
        None => design.to_string(),
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn render_design_specific(content: &mut String, collection: &RecordCollection, roots: &RootPaths) {
    content.push_str("\n## Design-specific Records\n");

    let mut designs: Vec<(&String, &Vec<DecisionRecord>)> =
        collection.design_specific.iter().collect();
    designs.sort_by(|(a, _), (b, _)| design_ordinal(a).cmp(&design_ordinal(b)).then(a.cmp(b)));

    for (design, records) in designs {
        content.push_str(&format!("\n### {}\n\n", design_heading(design)));
        content.push_str(&format!(
            "Located in `{}/{}/{}/`\n\n",
            roots.designs_rel, design, roots.records_dir_name
        ));
        for rec in sorted_by_identifier(records) {
            content.push_str(&format!(
                "- [{}]({}) - {}\n",
                rec.label(),
                roots.design_link(design, &rec.file_name()),
                rec.title
            ));
        }
    }
}

fn render_quick_reference(content: &mut String, collection: &RecordCollection) {
    content.push_str("\n## Quick Reference\n\n");
    content.push_str("| Record | Title | Location | Status |\n");
    content.push_str("|--------|-------|----------|--------|\n");

    for rec in sorted_by_identifier(&collection.project_wide) {
        content.push_str(&format!(
            "| {} | {} | Project-wide | {} |\n",
            rec.label(),
            rec.title,
            rec.status
        ));
    }

    for (design, records) in &collection.design_specific {
        let ordinal = design.split('-').next().unwrap_or(design);
        for rec in sorted_by_identifier(records) {
            content.push_str(&format!(
                "| {}/{} | {} | Design-specific | {} |\n",
                ordinal,
                rec.label(),
                rec.title,
                rec.status
            ));
        }
    }
}

fn render_maintenance_notes(content: &mut String) {
    content.push_str("\n## Maintenance Notes\n\n");
    content.push_str("- This index should be updated whenever a new record is created\n");
    content.push_str(
        "- Run `recordkit update-index` to regenerate it and `recordkit verify-index` to check it\n",
    );
    content.push_str(
        "- When records are superseded or deprecated, update their status and link to the replacement\n",
    );
}
