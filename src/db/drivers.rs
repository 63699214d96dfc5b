//! Driver records.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Driver";
const COLUMNS: &str = "id, name, phone, email, address, city, state, zip, license_type, cdl_expiration, training_complete, is_active, notes";
const INSERT_DRIVER: &str = "INSERT INTO drivers (name, phone, email, address, city, state, zip, license_type, cdl_expiration, training_complete, is_active, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";
const UPDATE_DRIVER: &str = "UPDATE drivers SET name = ?2, phone = ?3, email = ?4, address = ?5, city = ?6, state = ?7, zip = ?8,
    license_type = ?9, cdl_expiration = ?10, training_complete = ?11, is_active = ?12, notes = ?13 WHERE id = ?1";

pub const LICENSE_CDL: &str = "CDL";
pub const LICENSE_PASSENGER: &str = "Passenger";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub license_type: Option<String>,
    pub cdl_expiration: Option<NaiveDate>,
    pub training_complete: bool,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl Driver {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            phone: None,
            email: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            license_type: None,
            cdl_expiration: None,
            training_complete: false,
            is_active: true,
            notes: None,
        }
    }

    pub fn is_cdl(&self) -> bool {
        self.license_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(LICENSE_CDL))
    }

    /// True when the driver holds a CDL that has lapsed by `today`.
    pub fn cdl_expired(&self, today: NaiveDate) -> bool {
        self.is_cdl() && self.cdl_expiration.is_some_and(|expires| expires < today)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Driver {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            address: row.get(4)?,
            city: row.get(5)?,
            state: row.get(6)?,
            zip: row.get(7)?,
            license_type: row.get(8)?,
            cdl_expiration: row.get(9)?,
            training_complete: row.get(10)?,
            is_active: row.get(11)?,
            notes: row.get(12)?,
        })
    }
}

pub struct Drivers {
    conn: Connection,
}

impl From<Db> for Drivers {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl Drivers {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Driver>> {
        self.query(&format!("SELECT {} FROM drivers ORDER BY name", COLUMNS), [])
    }

    pub fn list_active(&self) -> Result<Vec<Driver>> {
        self.query(&format!("SELECT {} FROM drivers WHERE is_active ORDER BY name", COLUMNS), [])
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Driver>> {
        self.conn
            .query_row(&format!("SELECT {} FROM drivers WHERE id = ?1", COLUMNS), params![id], Driver::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, driver: &Driver) -> Result<i64> {
        self.conn.execute(
            INSERT_DRIVER,
            params![
                driver.name.trim(),
                driver.phone,
                driver.email,
                driver.address,
                driver.city,
                driver.state,
                driver.zip,
                driver.license_type,
                driver.cdl_expiration,
                driver.training_complete,
                driver.is_active,
                driver.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %driver.name, "driver inserted");
        Ok(id)
    }

    pub fn update(&mut self, driver: &Driver) -> Result<()> {
        let id = driver.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_DRIVER,
            params![
                id,
                driver.name.trim(),
                driver.phone,
                driver.email,
                driver.address,
                driver.city,
                driver.state,
                driver.zip,
                driver.license_type,
                driver.cdl_expiration,
                driver.training_complete,
                driver.is_active,
                driver.notes,
            ],
        )?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM drivers WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        tracing::debug!(id, "driver deleted");
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM drivers", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Driver>> {
        let mut stmt = self.conn.prepare(sql)?;
        let drivers = stmt.query_map(params, Driver::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(drivers)
    }
}
