//! Typed failures raised by the repositories.
//!
//! Repositories return `anyhow::Result`, but the failures callers need to react
//! to (a missing row, a row still referenced elsewhere) are raised as
//! [`DbError`] so they can be recovered with `downcast_ref`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbError {
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} #{id} is still referenced by other records and cannot be deleted")]
    InUse { entity: &'static str, id: i64 },

    #[error("{entity} has no id; save it before updating")]
    MissingId { entity: &'static str },

    #[error("{entity} '{value}' already exists")]
    Duplicate { entity: &'static str, value: String },

    #[error("unsupported database provider '{0}', only SQLite is available")]
    UnsupportedProvider(String),
}

/// Translates a constraint failure raised while deleting `entity #id`.
pub fn map_delete_error(err: rusqlite::Error, entity: &'static str, id: i64) -> anyhow::Error {
    if is_constraint(&err) {
        return DbError::InUse { entity, id }.into();
    }
    err.into()
}

/// Translates a unique-constraint failure raised while writing `value`.
pub fn map_write_error(err: rusqlite::Error, entity: &'static str, value: &str) -> anyhow::Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => DbError::Duplicate {
            entity,
            value: value.to_string(),
        }
        .into(),
        _ => err.into(),
    }
}

fn is_constraint(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}
