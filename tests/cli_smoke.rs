use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

fn write_graph_skeleton(root: &Path) {
    write_file(&root.join("logseq/config.edn"), "{}");
    write_file(&root.join("pages/apollo.md"), "See [[Launch]] and #tag1.\n");
    write_file(&root.join("pages/launch.md"), "Nothing links back here.\n");
}

#[test]
fn cli_reports_fatal_error_on_missing_graph() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("logseq-analyzer").unwrap();
    cmd.arg("--graph-folder").arg(dir.path());
    cmd.assert().failure().stderr(predicate::str::contains("not found"));
}

#[test]
fn cli_analyzes_a_minimal_graph_and_prints_json_report() {
    let dir = tempdir().unwrap();
    write_graph_skeleton(dir.path());

    let mut cmd = Command::cargo_bin("logseq-analyzer").unwrap();
    cmd.arg("--graph-folder").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"summary_files_general\""))
        .stdout(predicate::str::contains("\"launch\""));
}

#[test]
fn cli_write_graph_flag_includes_the_full_index() {
    let dir = tempdir().unwrap();
    write_graph_skeleton(dir.path());

    let mut cmd = Command::cargo_bin("logseq-analyzer").unwrap();
    cmd.arg("--graph-folder").arg(dir.path()).arg("--write-graph");
    cmd.assert().success().stdout(predicate::str::contains("\"raw_text\""));
}

#[test]
fn cli_graph_folder_env_var_is_honored_without_the_flag() {
    let dir = tempdir().unwrap();
    write_graph_skeleton(dir.path());

    let mut cmd = Command::cargo_bin("logseq-analyzer").unwrap();
    cmd.env("LOGSEQ_ANALYZER_GRAPH_FOLDER", dir.path());
    cmd.assert().success().stdout(predicate::str::contains("\"launch\""));
}

#[test]
fn cli_second_run_reuses_the_cache_file() {
    let dir = tempdir().unwrap();
    write_graph_skeleton(dir.path());

    Command::cargo_bin("logseq-analyzer")
        .unwrap()
        .arg("--graph-folder")
        .arg(dir.path())
        .assert()
        .success();

    let cache_path: PathBuf = dir.path().join(".logseq-analyzer-cache.json");
    assert!(cache_path.exists());

    Command::cargo_bin("logseq-analyzer")
        .unwrap()
        .arg("--graph-folder")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_files\": 2"));
}
