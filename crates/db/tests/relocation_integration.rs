//! Table relocation tests against a real database.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p shiftedblog-db --test relocation_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `shiftedblog_test`)
//!   `TEST_DB_PASSWORD` (default: `shiftedblog_test`)

#![allow(clippy::unwrap_used)]

use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, TransactionTrait};
use sea_orm_migration::{MigratorTrait, SchemaManager};
use shiftedblog_db::migrations::Migrator;
use shiftedblog_db::relocation::{OnDelete, TableRelocation, relocate};
use shiftedblog_db::test_utils::TestDatabase;

async fn query_one<C: ConnectionTrait>(conn: &C, sql: &str) -> Option<QueryResult> {
    conn.query_one(Statement::from_string(DatabaseBackend::Postgres, sql.to_string()))
        .await
        .unwrap()
}

async fn table_exists<C: ConnectionTrait>(conn: &C, table: &str) -> bool {
    let row = query_one(conn, &format!("SELECT to_regclass('{table}')::text AS t"))
        .await
        .unwrap();
    row.try_get::<Option<String>>("", "t").unwrap().is_some()
}

async fn fk_target<C: ConnectionTrait>(conn: &C, table: &str, column: &str) -> String {
    let row = query_one(
        conn,
        &format!(
            "SELECT c.confrelid::regclass::text AS target
             FROM pg_constraint c
             JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = ANY(c.conkey)
             WHERE c.conrelid = '{table}'::regclass AND c.contype = 'f' AND a.attname = '{column}'"
        ),
    )
    .await
    .unwrap();
    row.try_get("", "target").unwrap()
}

async fn seed_old_table<C: ConnectionTrait>(conn: &C) {
    conn.execute_unprepared(
        r"
        CREATE TABLE old_t (
            id bigint GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name varchar(50) NOT NULL DEFAULT ''
        );
        CREATE TABLE ref_t (
            id bigserial PRIMARY KEY,
            old_t_id bigint NOT NULL REFERENCES old_t (id) ON DELETE CASCADE
        );
        INSERT INTO old_t (name) VALUES ('one'), ('two'), ('three'), ('four'), ('five');
        INSERT INTO ref_t (old_t_id) VALUES (2), (5);
        ",
    )
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_relocate_copies_rows_and_repoints_references() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();
    seed_old_table(conn).await;

    let txn = conn.begin().await.unwrap();
    let manager = SchemaManager::new(&txn);
    relocate(&manager, TableRelocation::new().move_table("old_t", "new_t"))
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let count = query_one(conn, "SELECT COUNT(*) AS n FROM new_t").await.unwrap();
    assert_eq!(count.try_get::<i64>("", "n").unwrap(), 5);

    let third = query_one(conn, "SELECT name FROM new_t WHERE id = 3").await.unwrap();
    assert_eq!(third.try_get::<String>("", "name").unwrap(), "three");

    let inserted = query_one(conn, "INSERT INTO new_t (name) VALUES ('six') RETURNING id")
        .await
        .unwrap();
    assert_eq!(inserted.try_get::<i64>("", "id").unwrap(), 6);

    assert_eq!(fk_target(conn, "ref_t", "old_t_id").await, "new_t");
    let refs = query_one(conn, "SELECT SUM(old_t_id)::bigint AS s FROM ref_t").await.unwrap();
    assert_eq!(refs.try_get::<i64>("", "s").unwrap(), 7);

    assert!(!table_exists(conn, "old_t").await);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_failed_relocation_leaves_old_table() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();
    seed_old_table(conn).await;

    let txn = conn.begin().await.unwrap();
    let manager = SchemaManager::new(&txn);
    let result = relocate(
        &manager,
        TableRelocation::new()
            .move_table("old_t", "new_t")
            .foreign_key("new_t", "missing_id", "missing_t", OnDelete::Cascade),
    )
    .await;
    assert!(result.is_err());
    txn.rollback().await.unwrap();

    assert!(table_exists(conn, "old_t").await);
    assert!(!table_exists(conn, "new_t").await);
    assert_eq!(fk_target(conn, "ref_t", "old_t_id").await, "old_t");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_schema_history_relocates_every_namespace() {
    let db = TestDatabase::create_migrated().await.unwrap();
    let conn = db.connection();

    for table in ["core_user", "editor_post", "editor_postseries", "team_person", "team_skill"] {
        assert!(table_exists(conn, table).await, "{table} missing");
    }
    for table in ["blog_user", "blog_post", "blog_person"] {
        assert!(!table_exists(conn, table).await, "{table} left behind");
    }

    assert_eq!(fk_target(conn, "admin_log", "user_id").await, "core_user");
    assert_eq!(fk_target(conn, "otp_device", "user_id").await, "core_user");
    assert_eq!(fk_target(conn, "editor_post", "author_id").await, "core_user");
    assert_eq!(fk_target(conn, "team_account", "person_id").await, "team_person");

    let labels = query_one(
        conn,
        "SELECT app_label FROM content_type WHERE model = 'postseries'",
    )
    .await
    .unwrap();
    assert_eq!(labels.try_get::<String>("", "app_label").unwrap(), "editor");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_schema_history_round_trips() {
    let db = TestDatabase::create_migrated().await.unwrap();
    let conn = db.connection();

    Migrator::down(conn, None).await.unwrap();
    assert!(!table_exists(conn, "content_type").await);

    Migrator::up(conn, None).await.unwrap();
    assert!(table_exists(conn, "editor_postgalleryimage").await);

    db.drop_database().await.unwrap();
}
