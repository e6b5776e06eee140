#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary with `HOME` pointed at a per-test directory so no real
/// configuration is read or written.
pub fn rti(name: &str) -> Command {
    let home = env::temp_dir().join(format!("{name}_rattendance_home"));
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("rattendance");
    cmd.env("HOME", &home)
        .env_remove("RATTENDANCE_USER")
        .env_remove("RATTENDANCE_PASSWORD")
        .env_remove("RATTENDANCE_LOG");
    cmd
}

/// `rti` already logged in as the built-in admin against `db_path`.
pub fn rti_as_admin(name: &str, db_path: &str) -> Command {
    let mut cmd = rti(name);
    cmd.args(["--db", db_path, "--user", "admin", "--password", "flb23"]);
    cmd
}

/// Fresh home directory for a test.
pub fn reset_home(name: &str) {
    let home = env::temp_dir().join(format!("{name}_rattendance_home"));
    fs::remove_dir_all(&home).ok();
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    reset_home(name);
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_rattendance.sqlite"));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the schema in test mode (no config file written).
pub fn init_test_db(name: &str, db_path: &str) {
    rti(name)
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Schema plus two registered students.
pub fn init_db_with_students(name: &str, db_path: &str) {
    init_test_db(name, db_path);

    rti_as_admin(name, db_path)
        .args(["add", "123", "Anna Muster"])
        .assert()
        .success();

    rti_as_admin(name, db_path)
        .args(["add", "456", "Bernd Beispiel"])
        .assert()
        .success();
}
