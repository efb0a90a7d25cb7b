use rusqlite::Connection;
use userbase_core::db::migrations::latest_version;
use userbase_core::db::{open_db, open_db_in_memory, open_target, DbError, DbTarget};
use userbase_core::{RepoError, SqliteAccountRepository, SqliteProfileRepository};

#[test]
fn open_db_in_memory_applies_bootstrap_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "accounts");
    assert_table_exists(&conn, "profiles");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("userbase.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO accounts (email, full_name, created_at) VALUES ('a@x.se', 'A', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_target(&DbTarget::File(path)).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreachable_database_surfaces_as_connection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("userbase.sqlite3");

    let err = RepoError::from(open_db(&path).unwrap_err());
    assert!(
        matches!(err, RepoError::ConnectionFailure(_)),
        "unexpected error: {err}"
    );
}

#[test]
fn non_database_file_surfaces_as_connection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.sqlite3");
    std::fs::write(&path, vec![0x5a_u8; 4096]).unwrap();

    let err = RepoError::from(open_db(&path).unwrap_err());
    assert!(
        matches!(err, RepoError::ConnectionFailure(_)),
        "unexpected error: {err}"
    );
}

#[test]
fn stores_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAccountRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn stores_reject_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAccountRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("accounts"))
    ));
    assert!(matches!(
        SqliteProfileRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("profiles"))
    ));
}

#[test]
fn profile_store_rejects_table_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            nickname TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteProfileRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "profiles",
            column: "phone_number"
        })
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
