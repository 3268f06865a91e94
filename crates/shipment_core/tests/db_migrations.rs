use rusqlite::Connection;
use shipment_core::db::migrations::latest_version;
use shipment_core::db::{ensure_connection_ready, open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("open in-memory db");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "sales_shipment");
    assert_index_exists(&conn, "idx_sales_shipment_order_id");
    ensure_connection_ready(&conn).unwrap();
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("shipments.db");

    let conn_first = open_db(&path).expect("open file db");
    conn_first
        .execute("INSERT INTO sales_shipment (order_id) VALUES (1);", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).expect("open file db");
    assert_eq!(schema_version(&conn_second), latest_version());
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM sales_shipment;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("open raw file connection");
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
fn connection_with_version_but_no_table_is_not_ready() {
    let conn = Connection::open_in_memory().expect("open raw in-memory connection");
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        ensure_connection_ready(&conn),
        Err(DbError::MissingRequiredTable("sales_shipment"))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
