//! End-to-end pipeline scenarios against a real DuckDB database

use duckdb::Connection;
use sqlgate_core::{CheckKind, Validator};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Create a throwaway academic database file and return its path.
fn academic_db() -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "sqlgate-validator-{}-{}.duckdb",
        std::process::id(),
        DB_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Student (name VARCHAR, year INTEGER, semester INTEGER);
         CREATE TABLE Course (title VARCHAR, credits INTEGER);",
    )
    .unwrap();
    path
}

#[test]
fn well_formed_query_passes_all_four_layers() {
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome = validator.validate("SELECT name FROM Student WHERE year = 1 AND semester = 1");

    assert!(outcome.valid);
    assert_eq!(outcome.results.len(), 4);
    assert!(outcome.results.iter().all(|r| r.valid));
    assert_eq!(
        outcome.results.iter().map(|r| r.check).collect::<Vec<_>>(),
        [
            CheckKind::Syntax,
            CheckKind::Semantics,
            CheckKind::DataRange,
            CheckKind::Security
        ]
    );
}

#[test]
fn out_of_range_year_fails_at_the_data_range_layer() {
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome = validator.validate("SELECT * FROM Student WHERE year = 5");

    assert!(!outcome.valid);
    assert_eq!(outcome.results.len(), 3);
    let failure = outcome.first_failure().unwrap();
    assert_eq!(failure.check, CheckKind::DataRange);
    assert_eq!(failure.message, "Invalid year value (must be 1-4)");
}

#[test]
fn unknown_table_fails_at_the_semantics_layer() {
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome = validator.validate("SELECT * FROM Nonexistent");

    assert!(!outcome.valid);
    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results[0].valid, "parse-only syntax layer must pass");
    let failure = outcome.first_failure().unwrap();
    assert_eq!(failure.check, CheckKind::Semantics);
    assert_eq!(failure.message, "No valid tables referenced");
}

#[test]
fn truncated_query_fails_at_the_syntax_layer() {
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome = validator.validate("SELECT * FROM Student WHERE year = ");

    assert!(!outcome.valid);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.first_failure().unwrap().check, CheckKind::Syntax);
}

#[test]
fn multi_statement_injection_is_always_rejected() {
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome = validator.validate("SELECT * FROM Student; DROP TABLE Student;");

    // Rejected no later than the Security layer, regardless of which
    // earlier layer happens to catch it first.
    assert!(!outcome.valid);
    assert!(outcome.first_failure().is_some());
    assert!(outcome.results.len() <= 4);
}

#[test]
fn non_read_only_statements_are_rejected() {
    let validator = Validator::connect(academic_db()).unwrap();
    for query in [
        "DELETE FROM Student WHERE year = 1",
        "UPDATE Student SET year = 2",
        "INSERT INTO Student VALUES ('a', 1, 1)",
        "DROP TABLE Student",
    ] {
        let outcome = validator.validate(query);
        assert!(!outcome.valid, "expected rejection for {query:?}");
    }
}

#[test]
fn validation_is_idempotent_for_an_unchanged_schema() {
    let validator = Validator::connect(academic_db()).unwrap();
    let query = "SELECT title FROM Course WHERE credits = 3";
    assert_eq!(validator.validate(query), validator.validate(query));

    let rejected = "SELECT * FROM Student WHERE semester = 12";
    assert_eq!(validator.validate(rejected), validator.validate(rejected));
}

#[test]
fn join_with_one_known_table_is_accepted_leniently() {
    // The semantic layer accepts a query when any referenced table is
    // known, even if a join partner is not. Deliberate; tightening this
    // should fail here first.
    let validator = Validator::connect(academic_db()).unwrap();
    let outcome =
        validator.validate("SELECT * FROM Student JOIN Phantom ON Student.name = Phantom.name");
    let semantics = &outcome.results[1];
    assert_eq!(semantics.check, CheckKind::Semantics);
    assert!(semantics.valid);
}

#[test]
fn syntax_round_trip_timeout_is_a_syntax_layer_rejection() {
    // A bound the engine round trip cannot possibly meet: the pipeline
    // must stop at the first layer with a rejection, not crash.
    let validator = Validator::connect(academic_db())
        .unwrap()
        .with_syntax_timeout(Duration::from_nanos(1));
    let outcome = validator.validate("SELECT name FROM Student");

    assert!(!outcome.valid);
    assert_eq!(outcome.results.len(), 1);
    let failure = outcome.first_failure().unwrap();
    assert_eq!(failure.check, CheckKind::Syntax);
    assert_eq!(failure.message, "syntax check timed out");
}

#[test]
fn connecting_to_an_unreachable_store_fails_fast() {
    let missing = std::env::temp_dir().join("sqlgate-no-such-dir/absent.duckdb");
    assert!(Validator::connect(missing).is_err());
}
