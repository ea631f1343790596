//! Integration tests for the embed-migrate binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("embed_migrate_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Creates a database file containing a bare `news_items` table.
fn seed_database(dir: &TempDir) -> PathBuf {
    let path = dir.join("news.db");
    let conn = rusqlite::Connection::open(&path).expect("failed to create database");
    conn.execute_batch(
        "CREATE TABLE news_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL
        );",
    )
    .expect("failed to create news_items");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_embed-migrate"))
        .args(args)
        .output()
        .expect("failed to run embed-migrate")
}

#[test]
fn apply_then_status_reports_fully_applied() {
    let dir = TempDir::new("apply_status");
    let db = seed_database(&dir);
    let db = db.to_str().unwrap();

    let output = run(&["apply", "--db", db]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4 column(s)"), "{stdout}");
    assert!(stdout.contains("3 index(es)"), "{stdout}");

    let output = run(&["status", "--db", db]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("embedding_status: present"), "{stdout}");
    assert!(stdout.contains("Fully applied: yes"), "{stdout}");
}

#[test]
fn second_apply_reports_up_to_date() {
    let dir = TempDir::new("reapply");
    let db = seed_database(&dir);
    let db = db.to_str().unwrap();

    assert!(run(&["apply", "--db", db]).status.success());
    let output = run(&["apply", "--db", db]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Already up to date."), "{stdout}");
}

#[test]
fn plan_prints_pending_statements() {
    let dir = TempDir::new("plan");
    let db = seed_database(&dir);
    let db = db.to_str().unwrap();

    let output = run(&["plan", "--db", db]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ALTER TABLE news_items ADD COLUMN embedding_status"),
        "{stdout}"
    );
    assert!(
        stdout.contains("CREATE INDEX IF NOT EXISTS idx_news_items_embedded_at"),
        "{stdout}"
    );

    assert!(run(&["apply", "--db", db]).status.success());
    let output = run(&["plan", "--db", db]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to do."), "{stdout}");
}

#[test]
fn missing_table_fails_with_error() {
    let dir = TempDir::new("missing_table");
    let db = dir.join("empty.db");
    rusqlite::Connection::open(&db).expect("failed to create database");

    let output = run(&["apply", "--db", db.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("table not found"), "{stderr}");
}

#[test]
fn init_writes_a_loadable_change_set() {
    let dir = TempDir::new("init");
    let path = dir.join("changes.json");

    let output = run(&["init", "--output", path.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");

    let raw = fs::read_to_string(&path).expect("init output missing");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("invalid JSON");
    assert_eq!(value["table"], "news_items");
    assert_eq!(value["columns"].as_array().unwrap().len(), 4);
    assert_eq!(value["indexes"].as_array().unwrap().len(), 3);
}

#[test]
fn custom_change_set_file_is_honored() {
    let dir = TempDir::new("custom_set");
    let db = seed_database(&dir);
    let changes = dir.join("custom.json");
    fs::write(
        &changes,
        r#"{
            "table": "news_items",
            "columns": [{"name": "summary", "column_type": "text"}],
            "indexes": []
        }"#,
    )
    .expect("failed to write change set");

    let output = run(&[
        "apply",
        "--db",
        db.to_str().unwrap(),
        "--changes",
        changes.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 column(s)"), "{stdout}");
}
