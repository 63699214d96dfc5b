//! Fuel purchases per vehicle.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Fuel record";
const COLUMNS: &str = "id, fuel_date, location, vehicle_id, odometer, fuel_type, gallons, cost, notes";
const INSERT_FUEL: &str = "INSERT INTO fuel (fuel_date, location, vehicle_id, odometer, fuel_type, gallons, cost, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const UPDATE_FUEL: &str = "UPDATE fuel SET fuel_date = ?2, location = ?3, vehicle_id = ?4, odometer = ?5, fuel_type = ?6,
    gallons = ?7, cost = ?8, notes = ?9 WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuel {
    pub id: Option<i64>,
    pub fuel_date: NaiveDate,
    pub location: Option<String>,
    pub vehicle_id: i64,
    pub odometer: Option<f64>,
    pub fuel_type: Option<String>,
    pub gallons: Option<f64>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
}

impl Fuel {
    pub fn new(vehicle_id: i64, fuel_date: NaiveDate, gallons: f64, cost: f64) -> Self {
        Self {
            id: None,
            fuel_date,
            location: None,
            vehicle_id,
            odometer: None,
            fuel_type: None,
            gallons: Some(gallons),
            cost: Some(cost),
            notes: None,
        }
    }

    pub fn cost_per_gallon(&self) -> Option<f64> {
        match (self.cost, self.gallons) {
            (Some(cost), Some(gallons)) if gallons > 0.0 => Some(cost / gallons),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Fuel {
            id: row.get(0)?,
            fuel_date: row.get(1)?,
            location: row.get(2)?,
            vehicle_id: row.get(3)?,
            odometer: row.get(4)?,
            fuel_type: row.get(5)?,
            gallons: row.get(6)?,
            cost: row.get(7)?,
            notes: row.get(8)?,
        })
    }
}

pub struct FuelRecords {
    conn: Connection,
}

impl From<Db> for FuelRecords {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl FuelRecords {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Fuel>> {
        self.query(&format!("SELECT {} FROM fuel ORDER BY fuel_date DESC, id DESC", COLUMNS), [])
    }

    /// Fuel history of one vehicle, oldest first.
    pub fn list_by_vehicle(&self, vehicle_id: i64) -> Result<Vec<Fuel>> {
        self.query(
            &format!("SELECT {} FROM fuel WHERE vehicle_id = ?1 ORDER BY fuel_date, id", COLUMNS),
            params![vehicle_id],
        )
    }

    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Fuel>> {
        self.query(
            &format!("SELECT {} FROM fuel WHERE fuel_date BETWEEN ?1 AND ?2 ORDER BY fuel_date, id", COLUMNS),
            params![from, to],
        )
    }

    pub fn list_for_vehicle_between(&self, vehicle_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<Fuel>> {
        self.query(
            &format!(
                "SELECT {} FROM fuel WHERE vehicle_id = ?1 AND fuel_date BETWEEN ?2 AND ?3 ORDER BY fuel_date, id",
                COLUMNS
            ),
            params![vehicle_id, from, to],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Fuel>> {
        self.conn
            .query_row(&format!("SELECT {} FROM fuel WHERE id = ?1", COLUMNS), params![id], Fuel::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, fuel: &Fuel) -> Result<i64> {
        self.conn.execute(
            INSERT_FUEL,
            params![
                fuel.fuel_date,
                fuel.location,
                fuel.vehicle_id,
                fuel.odometer,
                fuel.fuel_type,
                fuel.gallons,
                fuel.cost,
                fuel.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, vehicle_id = fuel.vehicle_id, "fuel record inserted");
        Ok(id)
    }

    pub fn update(&mut self, fuel: &Fuel) -> Result<()> {
        let id = fuel.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_FUEL,
            params![
                id,
                fuel.fuel_date,
                fuel.location,
                fuel.vehicle_id,
                fuel.odometer,
                fuel.fuel_type,
                fuel.gallons,
                fuel.cost,
                fuel.notes,
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
            .execute("DELETE FROM fuel WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM fuel", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Fuel>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt.query_map(params, Fuel::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
