use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_students, init_test_db, rti_as_admin, setup_test_db};

#[test]
fn test_add_and_list_students() {
    let name = "registry_add_list";
    let db_path = setup_test_db(name);
    init_db_with_students(name, &db_path);

    rti_as_admin(name, &db_path)
        .arg("students")
        .assert()
        .success()
        .stdout(contains("Anna Muster"))
        .stdout(contains("Bernd Beispiel"))
        .stdout(contains("2 Schüler"));
}

#[test]
fn test_duplicate_barcode_keeps_first_name() {
    let name = "registry_duplicate";
    let db_path = setup_test_db(name);
    init_db_with_students(name, &db_path);

    rti_as_admin(name, &db_path)
        .args(["add", "123", "Someone Else"])
        .assert()
        .failure()
        .stderr(contains("already registered"));

    rti_as_admin(name, &db_path)
        .arg("students")
        .assert()
        .success()
        .stdout(contains("Anna Muster").and(contains("Someone Else").not()));
}

#[test]
fn test_rename_unknown_barcode_fails() {
    let name = "registry_rename_unknown";
    let db_path = setup_test_db(name);
    init_test_db(name, &db_path);

    rti_as_admin(name, &db_path)
        .args(["rename", "999", "Nobody"])
        .assert()
        .failure()
        .stderr(contains("No student registered with barcode ID '999'"));
}

#[test]
fn test_rename_and_delete() {
    let name = "registry_rename_delete";
    let db_path = setup_test_db(name);
    init_db_with_students(name, &db_path);

    rti_as_admin(name, &db_path)
        .args(["rename", "123", "Anna Schmidt"])
        .assert()
        .success();

    rti_as_admin(name, &db_path)
        .args(["del", "456"])
        .assert()
        .success();

    // deleting again is not an error
    rti_as_admin(name, &db_path)
        .args(["del", "456"])
        .assert()
        .success()
        .stdout(contains("nichts zu tun"));

    rti_as_admin(name, &db_path)
        .arg("students")
        .assert()
        .success()
        .stdout(contains("Anna Schmidt"))
        .stdout(contains("Bernd Beispiel").not());
}

#[test]
fn test_blank_name_is_rejected() {
    let name = "registry_blank_name";
    let db_path = setup_test_db(name);
    init_test_db(name, &db_path);

    rti_as_admin(name, &db_path)
        .args(["add", "123", "   "])
        .assert()
        .failure()
        .stderr(contains("Invalid input"));
}
