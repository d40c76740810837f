//! Integration tests for the duewatch CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the duewatch binary
fn duewatch() -> Command {
    Command::new(cargo::cargo_bin!("duewatch"))
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// Write a config that points the backend at the given executable.
fn write_config(dir: &Path, task_bin: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, format!("task_bin = \"{task_bin}\"\n")).unwrap();
    path
}

/// Drop a fake TaskWarrior that answers `add` with a fixed UUID and
/// `_get` with nothing (no record exists).
#[cfg(unix)]
fn write_fake_task(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-task");
    std::fs::write(
        &path,
        "#!/bin/sh\n\
         case \"$*\" in\n\
           *add*) echo 'Created task 8ad2e3db-914d-4832-b0e6-72fa04f6e331.' ;;\n\
           *_get*) : ;;\n\
         esac\n\
         exit 0\n",
    )
    .unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[test]
fn test_help() {
    duewatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Markdown TODO reconciliation"));
}

#[test]
fn test_version() {
    duewatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_check_reports_overdue() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        "- [ ] TODO: renew passport @due(2020-01-01)\n",
    );

    duewatch()
        .arg("--dir")
        .arg(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 overdue"));
}

#[test]
fn test_check_empty_directory_is_quiet() {
    let temp = TempDir::new().unwrap();

    duewatch()
        .arg("--dir")
        .arg(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing urgent"));
}

#[test]
fn test_check_ignores_non_markdown() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tasks.txt", "TODO: hidden @due(2020-01-01)\n");

    duewatch()
        .arg("--dir")
        .arg(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing urgent"));
}

#[test]
fn test_sync_nothing_to_sync() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "notes.md", "# prose only\n");
    let config = write_config(temp.path(), "/nonexistent/task-binary");

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to sync"));
}

#[test]
fn test_sync_counts_backend_failures_without_mutating() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tasks.md", "TODO: doomed @due(2025-01-01)\n");
    let config = write_config(temp.path(), "/nonexistent/task-binary");

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let content = std::fs::read_to_string(temp.path().join("tasks.md")).unwrap();
    assert!(!content.contains("TW-UUID"));
}

#[cfg(unix)]
#[test]
fn test_sync_writes_identifier_and_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tasks.md", "TODO: pick up the trash @due(2025-08-06)\n");
    let fake_task = write_fake_task(temp.path());
    let config = write_config(temp.path(), &fake_task.display().to_string());

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 new TODOs"));

    let content = std::fs::read_to_string(temp.path().join("tasks.md")).unwrap();
    assert!(content.contains(
        "<!-- TW-UUID: 8ad2e3db-914d-4832-b0e6-72fa04f6e331 -->"
    ));

    // Second run finds the identifier comment and syncs nothing new.
    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 0 new TODOs"));
}

#[cfg(unix)]
#[test]
fn test_reap_removes_orphaned_identifier() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tasks.md",
        "TODO: gone @due(2025-01-01)\n\
         <!-- TW-UUID: 8ad2e3db-914d-4832-b0e6-72fa04f6e331 -->\n",
    );
    let fake_task = write_fake_task(temp.path());
    let config = write_config(temp.path(), &fake_task.display().to_string());

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("reap")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 1 orphaned"));

    let content = std::fs::read_to_string(temp.path().join("tasks.md")).unwrap();
    assert!(!content.contains("TW-UUID"));
    assert!(content.contains("TODO: gone"));
}

#[test]
fn test_reap_reports_clean_documents() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tasks.md", "TODO: untracked @due(2025-01-01)\n");
    let config = write_config(temp.path(), "/nonexistent/task-binary");

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("reap")
        .assert()
        .success()
        .stdout(predicate::str::contains("no orphaned identifiers"));
}

#[test]
fn test_doctor_survives_missing_backend() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "/nonexistent/task-binary");

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_doctor_json_report() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "notes.md",
        "TODO: tracked one @due(2025-01-01)\n\
         <!-- TW-UUID: 8ad2e3db-914d-4832-b0e6-72fa04f6e331 -->\n\
         TODO: new one @due(2025-02-02)\n",
    );
    let config = write_config(temp.path(), "/nonexistent/task-binary");

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(temp.path())
        .arg("doctor")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"documents\": 1"))
        .stdout(predicate::str::contains("\"todos\": 2"))
        .stdout(predicate::str::contains("\"tracked\": 1"))
        .stdout(predicate::str::contains("\"backend_responds\": false"));
}

#[test]
fn test_malformed_config_fails_with_config_exit_code() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "threshold_hours = \"tomorrow\"\n").unwrap();

    duewatch()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .failure()
        .code(7);
}
