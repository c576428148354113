mod common;

use common::create_test_db;
use pantry_core::{
    db::{Migration, MigrationRunner},
    Database, Result, StoreError,
};
use rusqlite::types::Value;
use tempfile::TempDir;

fn table_names(db: &Database) -> Vec<String> {
    db.query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        &[],
        |row| row.get(0),
    )
    .expect("Failed to list tables")
}

fn create_notes(db: &Database) -> Result<()> {
    db.execute_batch("CREATE TABLE IF NOT EXISTS notes (id TEXT PRIMARY KEY)")
}

fn drop_notes(db: &Database) -> Result<()> {
    db.execute_batch("DROP TABLE IF EXISTS notes")
}

fn add_note_index(db: &Database) -> Result<()> {
    db.execute_batch("CREATE INDEX IF NOT EXISTS idx_notes_id ON notes(id)")
}

fn drop_note_index(db: &Database) -> Result<()> {
    db.execute_batch("DROP INDEX IF EXISTS idx_notes_id")
}

fn broken(db: &Database) -> Result<()> {
    db.execute_batch("CREATE TABLE broken (")
}

#[test]
fn test_fresh_database_is_migrated() {
    let (temp_dir, db) = create_test_db();

    assert!(temp_dir.path().join("test.db").exists());
    assert!(db.is_ready());
    assert_eq!(db.user_version().unwrap(), 2);
    assert_eq!(
        table_names(&db),
        vec!["meal_plans", "recipes", "shopping_list_items"]
    );
}

#[test]
fn test_rerunning_migrations_is_a_no_op() {
    let (_temp_dir, db) = create_test_db();
    let runner = MigrationRunner::with_builtin();

    assert_eq!(runner.run_migrations(&db).unwrap(), 0);
    assert!(runner.is_up_to_date(&db).unwrap());
    assert!(runner.pending_migrations(&db).unwrap().is_empty());
}

#[test]
fn test_migrations_apply_in_version_order() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("order.db")).unwrap();

    let mut runner = MigrationRunner::new();
    runner
        .register(Migration {
            version: 2,
            name: "002_note_index",
            description: "Index notes",
            up: add_note_index,
            down: drop_note_index,
        })
        .unwrap();
    runner
        .register(Migration {
            version: 1,
            name: "001_notes",
            description: "Create notes",
            up: create_notes,
            down: drop_notes,
        })
        .unwrap();

    // The index needs the table, so this only succeeds if 1 runs before 2.
    assert_eq!(runner.run_migrations(&db).unwrap(), 2);
    assert_eq!(db.user_version().unwrap(), 2);
}

#[test]
fn test_duplicate_version_is_rejected() {
    let mut runner = MigrationRunner::new();
    let notes = Migration {
        version: 1,
        name: "001_notes",
        description: "Create notes",
        up: create_notes,
        down: drop_notes,
    };
    runner.register(notes).unwrap();
    let result = runner.register(notes);
    assert!(matches!(result, Err(StoreError::Configuration { .. })));
}

#[test]
fn test_failed_migration_keeps_last_good_version() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path().join("broken.db")).unwrap();

    let mut runner = MigrationRunner::new();
    runner
        .register(Migration {
            version: 1,
            name: "001_notes",
            description: "Create notes",
            up: create_notes,
            down: drop_notes,
        })
        .unwrap();
    runner
        .register(Migration {
            version: 2,
            name: "002_broken",
            description: "Malformed statement",
            up: broken,
            down: drop_notes,
        })
        .unwrap();

    let result = runner.run_migrations(&db);
    assert!(matches!(
        result,
        Err(StoreError::MigrationFailed { version: 2, .. })
    ));
    assert_eq!(db.user_version().unwrap(), 1);
    assert_eq!(table_names(&db), vec!["notes"]);
}

#[test]
fn test_status_and_rollback() {
    let (_temp_dir, db) = create_test_db();
    let runner = MigrationRunner::with_builtin();

    let status = runner.status(&db).unwrap();
    assert_eq!(status.current_version, 2);
    assert_eq!(status.latest_version, 2);
    assert_eq!(status.pending_count, 0);
    assert!(status.migrations.iter().all(|m| m.applied));

    assert_eq!(runner.rollback_to_version(&db, 0).unwrap(), 2);
    assert_eq!(db.user_version().unwrap(), 0);
    assert!(table_names(&db).is_empty());

    let status = runner.status(&db).unwrap();
    assert_eq!(status.pending_count, 2);
    assert!(!status.is_up_to_date);

    assert_eq!(runner.run_migrations(&db).unwrap(), 2);
    assert_eq!(table_names(&db).len(), 3);
}

#[test]
fn test_reset_drops_everything() {
    let (_temp_dir, db) = create_test_db();
    MigrationRunner::with_builtin().reset(&db).unwrap();
    assert_eq!(db.user_version().unwrap(), 0);
    assert!(table_names(&db).is_empty());
}

#[test]
fn test_nested_transactions_join_the_outer_one() {
    let (_temp_dir, db) = create_test_db();
    db.execute_batch("CREATE TABLE notes (id TEXT PRIMARY KEY)")
        .unwrap();

    let result: Result<()> = db.transaction(|db| {
        db.execute(
            "INSERT INTO notes (id) VALUES (?1)",
            &[Value::Text("outer".to_string())],
        )?;
        db.transaction(|db| {
            db.execute(
                "INSERT INTO notes (id) VALUES (?1)",
                &[Value::Text("inner".to_string())],
            )
        })?;
        Err(StoreError::validation("Note", vec!["rejected".to_string()]))
    });

    assert!(result.is_err());
    assert!(!db.in_transaction());
    assert_eq!(db.query_count("SELECT COUNT(*) FROM notes", &[]).unwrap(), 0);
}

#[test]
fn test_foreign_transaction_is_reported() {
    let (_temp_dir, db) = create_test_db();
    db.execute_batch("BEGIN").unwrap();

    let result = db.transaction(|_| Ok(()));
    assert!(matches!(result, Err(StoreError::TransactionActive)));

    db.execute_batch("ROLLBACK").unwrap();
    assert!(db.transaction(|_| Ok(())).is_ok());
}

#[test]
fn test_statement_errors_carry_context() {
    let (_temp_dir, db) = create_test_db();

    let read = db.query_count("SELECT COUNT(*) FROM missing_table", &[]);
    match read {
        Err(StoreError::QueryFailed { statement, .. }) => {
            assert!(statement.contains("missing_table"));
        }
        other => panic!("expected QueryFailed, got {other:?}"),
    }

    let write = db.execute(
        "DELETE FROM missing_table WHERE id = ?1",
        &[Value::Text("x".to_string())],
    );
    match write {
        Err(StoreError::WriteFailed { params, .. }) => assert_eq!(params.len(), 1),
        other => panic!("expected WriteFailed, got {other:?}"),
    }
}

#[test]
fn test_closed_database_reports_not_initialized() {
    let (_temp_dir, mut db) = create_test_db();
    assert!(db.health_check());

    db.close().unwrap();
    assert!(!db.is_ready());
    assert!(!db.health_check());
    assert!(matches!(db.user_version(), Err(StoreError::NotInitialized)));

    // Closing twice is harmless.
    db.close().unwrap();
}
