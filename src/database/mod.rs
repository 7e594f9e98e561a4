// Copyright 2023 Remi Bernotavicius

use crate::error::{Result, StorageError};
use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const IN_MEMORY: &str = ":memory:";

/// Opens (creating if needed) the SQLite file at `path` and brings its schema up to date.
pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let url = path
        .to_str()
        .ok_or_else(|| StorageError::Path(path.to_owned()))?;
    log::debug!("opening database at {url}");
    prepare(Connection::establish(url)?)
}

pub fn establish_in_memory_connection() -> Result<Connection> {
    prepare(Connection::establish(IN_MEMORY)?)
}

fn prepare(mut connection: Connection) -> Result<Connection> {
    // Must happen outside of a transaction or SQLite ignores it.
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;

    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(StorageError::Schema)?;
    for version in applied {
        log::info!("applied migration {version}");
    }
    Ok(connection)
}

#[test]
fn migrations_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.sqlite");

    for _ in 0..2 {
        let mut conn = establish_connection(&path).unwrap();
        assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
    }
}

#[test]
fn migrations_redo() {
    let mut conn = establish_in_memory_connection().unwrap();
    conn.revert_last_migration(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());
    conn.run_pending_migrations(MIGRATIONS).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    use diesel::sql_types::Integer;

    #[derive(diesel::QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    let mut conn = establish_in_memory_connection().unwrap();
    let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(pragma.foreign_keys, 1);
}
