use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_customers");

/// Runs `customers` with `args`, feeding `script` on stdin.
fn run_customers(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn customers");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("failed to write script");
    child.wait_with_output().expect("failed to wait for customers")
}

fn db_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

// ---------------------------------------------------------------------------
// Interactive session tests
// ---------------------------------------------------------------------------

#[test]
fn creates_tables_and_adds_contact() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");

    let script = "yes\n1\nAna\nLee\na@x.com\n1\n2\n+1 (202) 555-0143\n0\n0\n";
    let out = run_customers(&["--db", db_arg(&db)], script);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout.contains("Create tables? (yes/no): "));
    assert!(stdout.contains("Contact added: Ana Lee [a@x.com]"));
    assert!(stdout.contains("Phone number +1 (202) 555 01-43 added"));

    let status = run_customers(&["migrate", "status", "--db", db_arg(&db)], "");
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Tables exist: yes"), "stdout: {stdout}");
    assert!(stdout.contains("Contact count: 1"));
    assert!(stdout.contains("Phone count: 1"));
}

#[test]
fn finds_contact_in_later_session() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");

    let setup = "yes\n1\nAna\nLee\na@x.com\n0\n1\nBo\nKim\nb@y.org\n0\n0\n";
    assert!(run_customers(&["--db", db_arg(&db)], setup).status.success());

    let out = run_customers(&["--db", db_arg(&db)], "2\n2\nkim\n9\n1\n0\n0\n");
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(!stdout.contains("Create tables?"));
    assert!(stdout.contains("Contact: Bo Kim [b@y.org]"));
}

#[test]
fn declining_table_creation_stops() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");

    let out = run_customers(&["--db", db_arg(&db)], "no\n");
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("Cannot continue"));
    assert!(!stdout.contains("Main menu:"));
}

#[test]
fn invalid_menu_choice_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");

    let out = run_customers(&["--db", db_arg(&db)], "yes\nquit\n");
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(!out.status.success());
    assert!(stderr.contains("invalid menu choice"), "stderr: {stderr}");
}

#[test]
fn reprompts_for_unreachable_database() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing").join("customers.db");
    let good = dir.path().join("customers.db");

    let script = format!("{}\nyes\n0\n", db_arg(&good));
    let out = run_customers(&["--db", db_arg(&missing)], &script);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("Database file (empty to quit): "));
    assert!(stdout.contains("Main menu:"));
    assert!(good.exists());
}

// ---------------------------------------------------------------------------
// Configuration tests
// ---------------------------------------------------------------------------

#[test]
fn config_file_sets_prefix_and_page_size() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");
    let config = dir.path().join("customers.yml");
    std::fs::write(
        &config,
        format!("database: {}\ntable_prefix: crm_\npage_size: 1\n", db_arg(&db)),
    )
    .unwrap();
    let config = db_arg(&config);

    let setup = "yes\n1\nAna\nLee\na@x.com\n0\n1\nBo\nKim\nb@y.org\n0\n2\n9\n>\n0\n0\n";
    let out = run_customers(&["--config", config], setup);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("Contacts (page 2 of 2):"));

    let prefixed = run_customers(&["migrate", "status", "--db", db_arg(&db), "--prefix", "crm_"], "");
    let plain = run_customers(&["migrate", "status", "--db", db_arg(&db)], "");
    assert!(String::from_utf8_lossy(&prefixed.stdout).contains("Contact count: 2"));
    assert!(String::from_utf8_lossy(&plain.stdout).contains("Tables exist: no"));
}

#[test]
fn rejects_invalid_prefix() {
    let out = run_customers(&["--prefix", "crm-", "--db", "unused.db"], "");
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(!out.status.success());
    assert!(stderr.contains("invalid table prefix"), "stderr: {stderr}");
}

#[test]
fn rejects_zero_page_size() {
    let out = run_customers(&["--page-size", "0", "--db", "unused.db"], "");
    assert!(!out.status.success());
}

// ---------------------------------------------------------------------------
// Migrate tests
// ---------------------------------------------------------------------------

#[test]
fn migrate_up_then_down() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("customers.db");

    let up = run_customers(&["migrate", "up", "--db", db_arg(&db), "--prefix", "cs_"], "");
    assert!(up.status.success(), "migrate up should succeed");

    let status = run_customers(&["migrate", "status", "--db", db_arg(&db), "--prefix", "cs_"], "");
    assert!(String::from_utf8_lossy(&status.stdout).contains("Tables exist: yes"));

    let down = run_customers(&["migrate", "down", "--db", db_arg(&db), "--prefix", "cs_"], "");
    assert!(down.status.success(), "migrate down should succeed");

    let status = run_customers(&["migrate", "status", "--db", db_arg(&db), "--prefix", "cs_"], "");
    assert!(String::from_utf8_lossy(&status.stdout).contains("Tables exist: no"));
}
