use super::error::DbError;
use super::migrations::init_with_migrations;
use crate::libs::config::Config;
use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Provider names accepted by [`initialize_database`].
const SQLITE_PROVIDERS: &[&str] = &["sqlite", "sqlite3", "system.data.sqlite", "microsoft.data.sqlite"];

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database and brings its schema up to date.
    pub fn new() -> Result<Db> {
        let path = Config::read()?.database_path()?;
        Self::open(path)
    }

    /// Opens the database at `path` and brings its schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut conn = Self::connect(path.as_ref())?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Opens a connection without touching the schema.
    pub fn new_without_migrations<P: AsRef<Path>>(path: P) -> Result<Connection> {
        Self::connect(path.as_ref())
    }

    fn connect(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(conn)
    }
}

/// Creates (or upgrades) a database from a connection string and provider name.
///
/// The connection string is either a bare file path or an ADO-style
/// `Data Source=<path>;...` string. Only SQLite providers are accepted.
pub fn initialize_database(connection_string: &str, provider: &str) -> Result<Db> {
    if !SQLITE_PROVIDERS.contains(&provider.trim().to_lowercase().as_str()) {
        return Err(DbError::UnsupportedProvider(provider.to_string()).into());
    }
    Db::open(data_source(connection_string))
}

fn data_source(connection_string: &str) -> PathBuf {
    for part in connection_string.split(';') {
        if let Some((key, value)) = part.split_once('=') {
            let key = key.trim().to_lowercase();
            if key == "data source" || key == "datasource" || key == "filename" {
                return PathBuf::from(value.trim());
            }
        }
    }
    PathBuf::from(connection_string.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_parsing() {
        assert_eq!(data_source("Data Source=fleet.db;Version=3;"), PathBuf::from("fleet.db"));
        assert_eq!(data_source("datasource = /tmp/bus.db"), PathBuf::from("/tmp/bus.db"));
        assert_eq!(data_source("plain.db"), PathBuf::from("plain.db"));
    }

    #[test]
    fn test_rejects_sql_server_provider() {
        let err = initialize_database("Server=.;Database=BusBuddy", "System.Data.SqlClient").err().unwrap();
        assert_eq!(
            err.downcast_ref::<DbError>(),
            Some(&DbError::UnsupportedProvider("System.Data.SqlClient".to_string()))
        );
    }
}
