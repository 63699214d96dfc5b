//! Maintenance work performed on vehicles.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Maintenance record";
const COLUMNS: &str = "id, date, vehicle_id, odometer, category, vendor, cost, notes";
const INSERT_MAINTENANCE: &str = "INSERT INTO maintenance (date, vehicle_id, odometer, category, vendor, cost, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_MAINTENANCE: &str = "UPDATE maintenance SET date = ?2, vehicle_id = ?3, odometer = ?4, category = ?5, vendor = ?6,
    cost = ?7, notes = ?8 WHERE id = ?1";

pub const CATEGORIES: &[&str] = &["Oil Change", "Brakes", "Tires", "Inspection", "Windshield", "AC", "Engine", "Transmission", "Other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub vehicle_id: i64,
    pub odometer: Option<f64>,
    pub category: String,
    pub vendor: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
}

impl Maintenance {
    pub fn new(vehicle_id: i64, date: NaiveDate, category: &str) -> Self {
        Self {
            id: None,
            date,
            vehicle_id,
            odometer: None,
            category: category.to_string(),
            vendor: None,
            cost: None,
            notes: None,
        }
    }

    /// Case-insensitive substring match on the category ("oil" matches "Oil Change").
    pub fn is_category(&self, keyword: &str) -> bool {
        self.category.to_lowercase().contains(&keyword.to_lowercase())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Maintenance {
            id: row.get(0)?,
            date: row.get(1)?,
            vehicle_id: row.get(2)?,
            odometer: row.get(3)?,
            category: row.get(4)?,
            vendor: row.get(5)?,
            cost: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}

pub struct MaintenanceRecords {
    conn: Connection,
}

impl From<Db> for MaintenanceRecords {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl MaintenanceRecords {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Maintenance>> {
        self.query(&format!("SELECT {} FROM maintenance ORDER BY date DESC, id DESC", COLUMNS), [])
    }

    /// Maintenance history of one vehicle, oldest first.
    pub fn list_by_vehicle(&self, vehicle_id: i64) -> Result<Vec<Maintenance>> {
        self.query(
            &format!("SELECT {} FROM maintenance WHERE vehicle_id = ?1 ORDER BY date, id", COLUMNS),
            params![vehicle_id],
        )
    }

    pub fn latest_for_vehicle(&self, vehicle_id: i64) -> Result<Option<Maintenance>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM maintenance WHERE vehicle_id = ?1 ORDER BY date DESC, id DESC LIMIT 1", COLUMNS),
                params![vehicle_id],
                Maintenance::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Maintenance>> {
        self.conn
            .query_row(&format!("SELECT {} FROM maintenance WHERE id = ?1", COLUMNS), params![id], Maintenance::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, record: &Maintenance) -> Result<i64> {
        self.conn.execute(
            INSERT_MAINTENANCE,
            params![
                record.date,
                record.vehicle_id,
                record.odometer,
                record.category.trim(),
                record.vendor,
                record.cost,
                record.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, vehicle_id = record.vehicle_id, category = %record.category, "maintenance inserted");
        Ok(id)
    }

    pub fn update(&mut self, record: &Maintenance) -> Result<()> {
        let id = record.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_MAINTENANCE,
            params![
                id,
                record.date,
                record.vehicle_id,
                record.odometer,
                record.category.trim(),
                record.vendor,
                record.cost,
                record.notes,
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
            .execute("DELETE FROM maintenance WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM maintenance", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Maintenance>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt.query_map(params, Maintenance::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
