//! Engine-level integration tests over real files.
//!
//! Exercises the reconciliation engine and due-check driver against the
//! filesystem document store, with the backend and notifier mocked.

use duewatch::check::DueChecker;
use duewatch::config::DuewatchConfig;
use duewatch::store::{DocumentStore, FsDocumentStore};
use duewatch::sync::{SyncEngine, SyncOutcome, SyncSummary};
use duewatch::testing::{MockNotifier, MockTaskBackend};
use duewatch::Urgency;
use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ID: &str = "8ad2e3db-914d-4832-b0e6-72fa04f6e331";

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn md_store(dir: &Path) -> FsDocumentStore {
    FsDocumentStore::discover(
        &[dir.to_path_buf()],
        &["md".to_string(), "markdown".to_string()],
    )
}

#[test]
fn test_sync_round_trips_through_the_filesystem() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        "# errands\n\
         TODO: pick up the trash @due(2025-08-06)\n\
         some prose\n",
    );

    let mut store = md_store(temp.path());
    let backend = MockTaskBackend::new().with_identifiers(vec![ID.to_string()]);
    let doc = store.list_documents().unwrap()[0];

    let outcome = SyncEngine::new(&mut store, &backend).sync(doc).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Completed(SyncSummary {
            synced: 1,
            skipped: 0,
            failed: 0
        })
    );

    let content = std::fs::read_to_string(temp.path().join("tasks.md")).unwrap();
    assert_eq!(
        content,
        format!(
            "# errands\n\
             TODO: pick up the trash @due(2025-08-06)\n\
             <!-- TW-UUID: {ID} -->\n\
             some prose\n"
        )
    );
    assert_eq!(
        backend.create_calls(),
        vec![("pick up the trash".to_string(), "2025-08-06".to_string())]
    );
}

#[test]
fn test_second_sync_pass_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        "TODO: a @due(2025-01-01)\nTODO: b @due(2025-02-02)\n",
    );

    let mut store = md_store(temp.path());
    let backend = MockTaskBackend::new();
    let doc = store.list_documents().unwrap()[0];

    SyncEngine::new(&mut store, &backend).sync(doc).unwrap();
    assert_eq!(backend.create_calls().len(), 2);

    // Fresh discovery over the mutated files, as a later run would do.
    let mut store = md_store(temp.path());
    let doc = store.list_documents().unwrap()[0];
    let outcome = SyncEngine::new(&mut store, &backend).sync(doc).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Completed(SyncSummary {
            synced: 0,
            skipped: 2,
            failed: 0
        })
    );
    assert_eq!(backend.create_calls().len(), 2);
}

#[test]
fn test_reap_touches_only_orphaned_comments() {
    let alive = "aaaaaaaa-1111-2222-3333-444444444444";
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        &format!(
            "TODO: alive @due(2025-01-01)\n\
             <!-- TW-UUID: {alive} -->\n\
             TODO: gone @due(2025-02-02)\n\
             <!-- TW-UUID: {ID} -->\n\
             trailing prose\n"
        ),
    );

    let mut store = md_store(temp.path());
    let backend = MockTaskBackend::new().with_existing(vec![alive.to_string()]);
    let doc = store.list_documents().unwrap()[0];

    let summary = SyncEngine::new(&mut store, &backend)
        .reap_orphans(doc)
        .unwrap();
    assert_eq!(summary.removed, 1);

    let content = std::fs::read_to_string(temp.path().join("tasks.md")).unwrap();
    assert!(content.contains(alive));
    assert!(!content.contains(ID));
    assert!(content.contains("TODO: gone"));
    assert!(content.contains("trailing prose"));
}

#[test]
fn test_due_check_across_multiple_files() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "overdue.md",
        "- [ ] TODO: renew passport @due(2020-01-01)\n",
    );
    write(
        temp.path(),
        "soon.markdown",
        "TODO: pick up the trash @due(2025-08-06)\n",
    );
    write(temp.path(), "ignored.txt", "TODO: invisible @due(2020-01-01)\n");

    let store = md_store(temp.path());
    let notifier = MockNotifier::new();
    let config = DuewatchConfig::default();
    let now = Local.with_ymd_and_hms(2025, 8, 5, 0, 0, 0).single().unwrap();

    let summary = DueChecker::new(&store, &notifier, &config).run(now).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.due_soon, 1);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);

    let overdue = sent.iter().find(|n| n.title == "TODO Overdue!").unwrap();
    assert!(overdue.message.contains("renew passport"));
    assert!(overdue.message.contains("was due 2020-01-01"));
    assert_eq!(overdue.urgency, Urgency::Critical);

    let soon = sent.iter().find(|n| n.title == "TODO Due Soon").unwrap();
    assert!(soon.message.contains("pick up the trash"));
    assert!(soon.message.contains("due 2025-08-06, 24h left"));
    assert_eq!(soon.urgency, Urgency::Normal);
}

#[test]
fn test_sync_then_check_whole_cycle() {
    // Spec walkthrough: sync a marker, then a due check still sees it.
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        "TODO: pick up the trash @due(2025-08-06)\n",
    );

    let mut store = md_store(temp.path());
    let backend = MockTaskBackend::new().with_identifiers(vec![ID.to_string()]);
    let doc = store.list_documents().unwrap()[0];
    SyncEngine::new(&mut store, &backend).sync(doc).unwrap();

    let store = md_store(temp.path());
    let notifier = MockNotifier::new();
    let config = DuewatchConfig::default();
    let now = Local.with_ymd_and_hms(2025, 8, 5, 0, 0, 0).single().unwrap();

    let summary = DueChecker::new(&store, &notifier, &config).run(now).unwrap();
    assert_eq!(summary.due_soon, 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn test_discovery_handles_nested_directories() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("projects").join("home");
    std::fs::create_dir_all(&nested).unwrap();
    write(&nested, "deep.md", "TODO: nested @due(2020-01-01)\n");

    let store = md_store(temp.path());
    assert_eq!(store.list_documents().unwrap().len(), 1);

    let roots: Vec<PathBuf> = vec![temp.path().to_path_buf()];
    let store = FsDocumentStore::discover(&roots, &["markdown".to_string()]);
    assert!(store.list_documents().unwrap().is_empty());
}
