use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "dha.db";

/// An open SQLite connection with foreign keys on and the schema migrated.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn new() -> Result<Db> {
        Self::with_storage(&DataStorage::new())
    }

    pub fn with_storage(storage: &DataStorage) -> Result<Db> {
        let db_file_path = storage.get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        Self::prepare(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Db> {
        Self::prepare(Connection::open_in_memory()?)
    }

    /// Opens the file without touching the schema, for migration inspection.
    pub fn new_without_migrations(path: impl AsRef<Path>) -> Result<Db> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Db { conn })
    }

    fn prepare(mut conn: Connection) -> Result<Db> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }
}
