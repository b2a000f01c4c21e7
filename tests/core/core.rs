use recordkit::core::config::{self, CONFIG_FILE};
use recordkit::core::index::{self, IndexFinding};
use recordkit::core::record::{self, Scope, Status};
use recordkit::core::store::{RecordStore, RootPaths};
use recordkit::core::validate::{self, Violation};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn record_text(id: &str, title: &str, status: &str) -> String {
    format!(
        "# RECORD-{id}: {title}\n\n## Status\n{status}\n\n## Context\nBackground.\n\n## Decision\nChoice.\n\n## Consequences\n\n### Positive\n- good\n\n### Negative\n- bad\n\n### Neutral\n- meh\n"
    )
}

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, content).expect("write");
    path
}

fn project() -> (TempDir, RecordStore) {
    let tmp = tempdir().expect("tempdir");
    write(tmp.path(), "CLAUDE.md", "# rules\n");
    let store = RecordStore::new(RootPaths::with_defaults(tmp.path()));
    (tmp, store)
}

#[test]
fn scan_partitions_records_by_location() {
    let (tmp, store) = project();
    let root = tmp.path();
    write(root, "docs/records/RECORD-002-b.md", &record_text("002", "Second", "Proposed"));
    write(root, "docs/records/RECORD-001-a.md", &record_text("001", "First", "Accepted"));
    write(root, "docs/records/INDEX.md", "# RECORD-999: Not a record\n");
    write(root, "docs/records/notes.md", &record_text("003", "Wrong name", "Accepted"));
    write(root, "docs/records/RECORD-004-broken.md", "no heading here\n");
    write(
        root,
        "designs/03-auth-oauth/records/RECORD-010-token-storage.md",
        &record_text("010", "Token storage", "Proposed"),
    );
    write(
        root,
        "designs/drafts/records/RECORD-020-ignored.md",
        &record_text("020", "Ignored", "Proposed"),
    );
    write(
        root,
        "designs/04-ui-theme/RECORD-030-outside.md",
        &record_text("030", "Outside records dir", "Proposed"),
    );

    let collection = store.scan();

    let ids: Vec<&str> = collection
        .project_wide
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["001", "002"]);
    assert!(collection.project_wide.iter().all(|r| r.scope == Scope::ProjectWide));
    assert_eq!(collection.project_wide[0].status, Status::Accepted);

    assert_eq!(collection.design_specific.len(), 1);
    let auth = &collection.design_specific["03-auth-oauth"];
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].title, "Token storage");
    assert_eq!(
        auth[0].scope,
        Scope::DesignSpecific {
            design: "03-auth-oauth".to_string()
        }
    );
    assert_eq!(collection.len(), 3);
}

#[test]
fn scan_of_empty_project_is_empty() {
    let (_tmp, store) = project();
    assert!(store.scan().is_empty());
}

#[test]
fn unreadable_record_is_skipped() {
    let (tmp, store) = project();
    let path = tmp.path().join("docs/records/RECORD-001-binary.md");
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).expect("write");

    assert!(record::parse_record(&path, Scope::ProjectWide).is_none());
    assert!(store.scan().project_wide.is_empty());
}

#[test]
fn parse_record_never_fails_on_malformed_heading() {
    let (tmp, _store) = project();
    let path = write(
        tmp.path(),
        "docs/records/RECORD-001-x.md",
        "# RECORD-1: Short\n## Status\nAccepted\n",
    );
    assert!(record::parse_record(&path, Scope::ProjectWide).is_none());
}

#[test]
fn widgets_record_valid_but_missing_from_index() {
    let (tmp, store) = project();
    write(
        tmp.path(),
        "docs/records/RECORD-001-use-widgets.md",
        &record_text("001", "Use widgets", "Accepted"),
    );
    write(tmp.path(), "docs/records/INDEX.md", "# Index\n\nNothing yet.\n");

    let findings = index::check_completeness(&store);
    assert_eq!(
        findings,
        vec![IndexFinding::MissingRecord {
            reference: "RECORD-001-use-widgets.md".to_string(),
            title: "Use widgets".to_string(),
        }]
    );
    let message = findings[0].to_string();
    assert!(message.contains("RECORD-001-use-widgets.md"));
    assert!(message.contains("Use widgets"));

    assert!(validate::validate_all(&store).is_empty());
}

#[test]
fn validate_all_reports_only_offending_files() {
    let (tmp, store) = project();
    write(tmp.path(), "docs/records/RECORD-001-ok.md", &record_text("001", "Fine", "Accepted"));
    let bad = write(
        tmp.path(),
        "designs/02-data-sync/records/RECORD-001-bad.md",
        &record_text("001", "Bad", "WIP").replace("### Neutral\n- meh\n", ""),
    );

    let results = validate::validate_all(&store);
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[&bad],
        vec![
            Violation::InvalidStatus("WIP".to_string()),
            Violation::MissingConsequence("### Neutral"),
        ]
    );
}

#[test]
fn index_checks_report_missing_index() {
    let (_tmp, store) = project();
    let expected = vec![IndexFinding::IndexMissing {
        index_name: "INDEX.md".to_string(),
    }];
    assert_eq!(index::check_references(&store), expected);
    assert_eq!(index::check_completeness(&store), expected);
    assert_eq!(expected[0].to_string(), "INDEX.md file not found");
}

#[test]
fn check_references_flags_only_missing_local_targets() {
    let (tmp, store) = project();
    write(tmp.path(), "docs/records/present.md", "here\n");
    write(
        tmp.path(),
        "docs/records/INDEX.md",
        "[gone](./missing.md)\n[here](./present.md)\n[web](http://example.com/missing.md)\n[sec](#missing)\n[tls](https://example.com)\n[gone again](./missing.md)\n",
    );

    let findings = index::check_references(&store);
    assert_eq!(
        findings,
        vec![
            IndexFinding::BrokenLink {
                text: "gone".to_string(),
                path: "./missing.md".to_string(),
            },
            IndexFinding::BrokenLink {
                text: "gone again".to_string(),
                path: "./missing.md".to_string(),
            },
        ]
    );
}

#[test]
fn check_references_resolves_parent_links() {
    let (tmp, store) = project();
    write(
        tmp.path(),
        "designs/01-core-api/records/RECORD-001-v.md",
        &record_text("001", "Versioning", "Accepted"),
    );
    write(
        tmp.path(),
        "docs/records/INDEX.md",
        "[ok](../../designs/01-core-api/records/RECORD-001-v.md)\n[bad](../../designs/01-core-api/records/RECORD-002-v.md)\n",
    );

    let findings = index::check_references(&store);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].to_string().contains("RECORD-002-v.md"));
}

#[test]
fn regenerate_renders_design_sections() {
    let (tmp, store) = project();
    write(
        tmp.path(),
        "designs/03-auth-oauth/records/RECORD-010-token-storage.md",
        &record_text("010", "Token storage", "Proposed"),
    );

    let path = index::regenerate(&store).expect("regenerate");
    assert_eq!(path, tmp.path().join("docs/records/INDEX.md"));

    let text = fs::read_to_string(&path).expect("read index");
    assert!(text.contains("### Auth: Oauth (03)"));
    assert!(text.contains("../../designs/03-auth-oauth/records/RECORD-010-token-storage.md"));
    assert!(text.contains("| 03/RECORD-010 | Token storage | Design-specific | Proposed |"));
    assert!(!tmp.path().join("docs/records/.INDEX.md.tmp").exists());
}

#[test]
fn failed_index_write_leaves_no_temp_file() {
    let (tmp, store) = project();
    write(tmp.path(), "docs/records/RECORD-001-a.md", &record_text("001", "Alpha", "Accepted"));
    // A non-empty directory where the index should go makes the rename fail.
    write(tmp.path(), "docs/records/INDEX.md/keep", "x\n");

    assert!(index::regenerate(&store).is_err());
    assert!(!tmp.path().join("docs/records/.INDEX.md.tmp").exists());
    assert!(tmp.path().join("docs/records/INDEX.md/keep").is_file());
}

#[test]
fn regenerate_is_idempotent() {
    let (tmp, store) = project();
    write(
        tmp.path(),
        "docs/records/RECORD-002-commits.md",
        &record_text("002", "Commit style", "Accepted"),
    );
    write(
        tmp.path(),
        "docs/records/RECORD-001-rules.md",
        &record_text("001", "Rule imports", "Superseded"),
    );
    write(
        tmp.path(),
        "designs/10-core-api/records/RECORD-001-v.md",
        &record_text("001", "Versioning", "Deprecated"),
    );
    write(
        tmp.path(),
        "designs/2-cli-help/records/RECORD-001-help.md",
        &record_text("001", "Help layout", "Accepted"),
    );

    let path = index::regenerate(&store).expect("first");
    let first = fs::read(&path).expect("read");
    index::regenerate(&store).expect("second");
    let second = fs::read(&path).expect("read");
    assert_eq!(first, second);

    let text = String::from_utf8(first).expect("utf8");
    let cli = text.find("### Cli: Help (2)").expect("cli heading");
    let core = text.find("### Core: Api (10)").expect("core heading");
    assert!(cli < core, "designs must sort by numeric ordinal");
}

#[test]
fn regenerated_index_passes_both_checks() {
    let (tmp, store) = project();
    write(
        tmp.path(),
        "docs/records/RECORD-001-widgets.md",
        &record_text("001", "Use widgets", "Accepted"),
    );
    write(
        tmp.path(),
        "designs/03-auth-oauth/records/RECORD-010-token-storage.md",
        &record_text("010", "Token storage", "Proposed"),
    );

    index::regenerate(&store).expect("regenerate");
    assert!(index::check_references(&store).is_empty());
    assert!(index::check_completeness(&store).is_empty());
}

#[test]
fn configured_layout_is_honored() {
    let tmp = tempdir().expect("tempdir");
    write(
        tmp.path(),
        CONFIG_FILE,
        "docs_dir = \"adr\"\ndesigns_dir = \"features\"\nrecords_dir_name = \"decisions\"\n",
    );
    write(tmp.path(), "adr/RECORD-001-a.md", &record_text("001", "Alpha", "Accepted"));
    write(
        tmp.path(),
        "features/01-core-api/decisions/RECORD-001-b.md",
        &record_text("001", "Beta", "Accepted"),
    );

    let cfg = config::load_config(tmp.path()).expect("config");
    let store = RecordStore::new(RootPaths::from_config(tmp.path(), &cfg));
    assert_eq!(store.scan().len(), 2);

    let path = index::regenerate(&store).expect("regenerate");
    assert_eq!(path, tmp.path().join("adr/INDEX.md"));
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("(../features/01-core-api/decisions/RECORD-001-b.md)"));
    assert!(index::check_references(&store).is_empty());
    assert!(index::check_completeness(&store).is_empty());
}

#[test]
fn duplicate_identifiers_pass_through() {
    let (tmp, store) = project();
    write(tmp.path(), "docs/records/RECORD-001-a.md", &record_text("001", "One", "Accepted"));
    write(tmp.path(), "docs/records/RECORD-001-b.md", &record_text("001", "Other one", "Accepted"));
    assert_eq!(store.scan().project_wide.len(), 2);
}
