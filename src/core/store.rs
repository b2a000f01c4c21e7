//! Record inventory for a project.
//!
//! Records live in two places:
//! - Project-wide: `<docs_dir>/RECORD-*.md`, next to the index document.
//! - Design-specific: `<designs_dir>/<N>-<feature>/<records_dir_name>/RECORD-*.md`.
//!
//! Scanning is best-effort: unparseable files are skipped and unreadable
//! ones produce a warning. Nothing is cached between calls.

use crate::core::config::RecordkitConfig;
use crate::core::output;
use crate::core::record::{self, DecisionRecord, Scope};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The directories a [`RecordStore`] reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPaths {
    /// Directory holding project-wide records and the index document.
    pub docs_dir: PathBuf,
    /// Directory holding numbered feature designs.
    pub designs_dir: PathBuf,
    /// Records folder name inside each feature design.
    pub records_dir_name: String,
    /// Index document file name inside `docs_dir`.
    pub index_name: String,
    /// `docs_dir` as written in configuration, used in generated text.
    pub docs_rel: String,
    /// `designs_dir` as written in configuration, used in generated text.
    pub designs_rel: String,
}

impl RootPaths {
    pub fn from_config(project_root: &Path, config: &RecordkitConfig) -> Self {
        let docs_rel = normalize_rel(&config.docs_dir);
        let designs_rel = normalize_rel(&config.designs_dir);
        Self {
            docs_dir: project_root.join(&docs_rel),
            designs_dir: project_root.join(&designs_rel),
            records_dir_name: config.records_dir_name.clone(),
            index_name: config.index_name.clone(),
            docs_rel,
            designs_rel,
        }
    }

    /// Default layout under `project_root`.
    pub fn with_defaults(project_root: &Path) -> Self {
        Self::from_config(project_root, &RecordkitConfig::default())
    }

    pub fn index_path(&self) -> PathBuf {
        self.docs_dir.join(&self.index_name)
    }

    /// Relative path from the index document's directory to a design record.
    /// With the default layout this is `../../designs/<design>/records/<file>`.
    pub fn design_link(&self, design: &str, file_name: &str) -> String {
        let depth = Path::new(&self.docs_rel)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        format!(
            "{}{}/{}/{}/{}",
            "../".repeat(depth),
            self.designs_rel,
            design,
            self.records_dir_name,
            file_name
        )
    }

    /// Reference string `<design>/<records>/<file>` searched for in the index.
    pub fn design_reference(&self, design: &str, file_name: &str) -> String {
        format!("{}/{}/{}", design, self.records_dir_name, file_name)
    }
}

fn normalize_rel(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}

/// All records found by one scan, partitioned by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordCollection {
    pub project_wide: Vec<DecisionRecord>,
    pub design_specific: BTreeMap<String, Vec<DecisionRecord>>,
}

impl RecordCollection {
    pub fn len(&self) -> usize {
        self.project_wide.len() + self.design_specific.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project-wide records first, then design records by design name.
    pub fn iter(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.project_wide
            .iter()
            .chain(self.design_specific.values().flatten())
    }
}

pub struct RecordStore {
    roots: RootPaths,
}

impl RecordStore {
    pub fn new(roots: RootPaths) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &RootPaths {
        &self.roots
    }

    pub fn index_path(&self) -> PathBuf {
        self.roots.index_path()
    }

    /// Walk both record locations and parse every candidate file.
    pub fn scan(&self) -> RecordCollection {
        let mut collection = RecordCollection::default();

        for path in record_files(&self.roots.docs_dir) {
            if path.file_name().and_then(|n| n.to_str()) == Some(self.roots.index_name.as_str()) {
                continue;
            }
            if let Some(rec) = record::parse_record(&path, Scope::ProjectWide) {
                collection.project_wide.push(rec);
            }
        }

        for design_dir in design_dirs(&self.roots.designs_dir) {
            let Some(name) = design_dir.file_name() else {
                continue;
            };
            let design = name.to_string_lossy().into_owned();
            let records_dir = design_dir.join(&self.roots.records_dir_name);
            if !records_dir.is_dir() {
                continue;
            }

            let records: Vec<DecisionRecord> = record_files(&records_dir)
                .into_iter()
                .filter_map(|path| {
                    record::parse_record(
                        &path,
                        Scope::DesignSpecific {
                            design: design.clone(),
                        },
                    )
                })
                .collect();
            if !records.is_empty() {
                collection.design_specific.insert(design, records);
            }
        }

        output::trace(&format!(
            "scan found {} project-wide and {} design-specific records",
            collection.project_wide.len(),
            collection.len() - collection.project_wide.len()
        ));
        collection
    }
}

/// `RECORD-*.md` files directly inside `dir`, sorted by name.
fn record_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = list_dir(dir)
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(record::is_record_file_name)
        })
        .collect();
    files.sort();
    files
}

/// Subdirectories of `designs_dir` whose name starts with a digit, sorted by name.
fn design_dirs(designs_dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = list_dir(designs_dir)
        .into_iter()
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.chars().next())
                .is_some_and(|c| c.is_ascii_digit())
        })
        .collect();
    dirs.sort();
    dirs
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            output::warning(&format!("Error reading {}: {}", dir.display(), e));
            Vec::new()
        }
    }
}
