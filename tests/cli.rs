use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn codescribe(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codescribe").unwrap();
    cmd.current_dir(cwd).env_remove("CODESCRIBE_CONFIG");
    cmd
}

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();
    fs::write(root.join("readme.md"), "# Project\n\nFifty bytes of readme text go right here.\n").unwrap();
    fs::write(root.join("logo.png"), vec![0x89u8; 2048]).unwrap();
    fs::write(root.join("secret.log"), "token=123").unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
    fs::write(root.join("node_modules/left-pad/index.js"), "module.exports = 1;").unwrap();
    temp_dir
}

#[test]
fn test_default_run_writes_snapshot() {
    let project = project();
    let root = project.path();

    codescribe(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Codebase documentation generated"))
        .stdout(predicate::str::contains("codebase_snapshot.md"));

    let document = fs::read_to_string(root.join("codebase_snapshot.md")).unwrap();
    assert!(document.starts_with("# Codebase Documentation\n\n"));
    assert!(document.contains("### readme.md\n```\n# Project\n"));
    assert!(document.contains("### logo.png\n```\n[Binary file - content not extracted]\n```\n\n"));
    assert!(document.contains("### src/main.rs\n```\nfn main() {}\n\n```\n\n"));
    assert!(!document.contains("secret.log"));
    assert!(!document.contains("node_modules"));
    assert!(!document.contains("### codebase_snapshot.md"));

    // Root files come before files in subdirectories.
    let readme = document.find("### readme.md").unwrap();
    let main = document.find("### src/main.rs").unwrap();
    assert!(readme < main);
}

#[test]
fn test_tiny_size_limit_from_config_file() {
    let project = project();
    let root = project.path();
    fs::write(root.join("ten.txt"), "0123456789").unwrap();
    fs::write(root.join("twenty.txt"), "01234567890123456789").unwrap();
    let config = root.join("tiny.json");
    fs::write(
        &config,
        r#"{"ignore_patterns": ["node_modules", "out.md", "tiny.json"], "max_file_size_mb": 0.00001}"#,
    )
    .unwrap();

    codescribe(root)
        .args(["--config", "tiny.json", "--output", "out.md", "--no-metadata"])
        .assert()
        .success();

    let document = fs::read_to_string(root.join("out.md")).unwrap();
    assert!(document.contains("### ten.txt"));
    assert!(!document.contains("twenty.txt"));
    // Absent ignore_extensions means nothing is ignored by extension.
    assert!(document.contains("### secret.log"));
}

#[test]
fn test_missing_include_path_warns_and_continues() {
    let project = project();
    let root = project.path();

    codescribe(root)
        .args([
            "--include",
            "does-not-exist.rs",
            "src",
            "--output",
            "out.md",
            "--output-format",
            "plain",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Included path not found: does-not-exist.rs",
        ));

    let document = fs::read_to_string(root.join("out.md")).unwrap();
    assert!(document.contains("### src/main.rs"));
    assert!(!document.contains("### readme.md"));
    assert!(document.contains("\"does-not-exist.rs\""));
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let project = project();
    let root = project.path();
    fs::write(root.join("broken.json"), "{ this is not json").unwrap();

    codescribe(root)
        .args(["--config", "broken.json", "--output", "out.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error loading config file"))
        .stderr(predicate::str::contains("Using default config"));

    let document = fs::read_to_string(root.join("out.md")).unwrap();
    assert!(!document.contains("secret.log"));
    assert!(document.contains("### readme.md"));
}

#[test]
fn test_legacy_fences_flag() {
    let project = project();
    let root = project.path();

    codescribe(root)
        .args(["--output", "out.md", "--legacy-fences", "--include", "logo.png"])
        .assert()
        .success();

    let document = fs::read_to_string(root.join("out.md")).unwrap();
    assert!(document.ends_with("### logo.png\n```\n```\n[Binary file - content not extracted]\n```\n\n"));
}

#[test]
fn test_base_dir_option() {
    let project = project();
    let elsewhere = TempDir::new().unwrap();
    let output = elsewhere.path().join("snap.md");

    codescribe(elsewhere.path())
        .arg("--base-dir")
        .arg(project.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let document = fs::read_to_string(&output).unwrap();
    assert!(document.contains("### src/main.rs"));
}

#[test]
fn test_unwritable_output_reports_error() {
    let project = project();

    codescribe(project.path())
        .args(["--output", "missing-dir/out.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error during extraction"));
}

#[test]
fn test_dry_run_lists_files_without_writing() {
    let project = project();
    let root = project.path();

    codescribe(root)
        .args(["--dry-run", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md"))
        .stdout(predicate::str::contains("logo.png (2.0 KB) [listed only]"))
        .stdout(predicate::str::contains("secret.log").not());

    assert!(!root.join("codebase_snapshot.md").exists());
}

#[test]
fn test_generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    codescribe(temp_dir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("codebase_config.json"));

    let sample = fs::read_to_string(temp_dir.path().join("codebase_config.json")).unwrap();
    assert!(sample.contains("\"ignore_patterns\""));
    assert!(sample.contains("\"max_file_size_mb\""));
}
