//! Vehicle records: the buses and support vehicles of the fleet.

use super::db::Db;
use super::error::{map_delete_error, map_write_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Vehicle";
const COLUMNS: &str = "id, vehicle_number, year, make, model, seating_capacity, vin, license_number, last_inspection, status, fuel_type, notes";
const INSERT_VEHICLE: &str = "INSERT INTO vehicles (vehicle_number, year, make, model, seating_capacity, vin, license_number, last_inspection, status, fuel_type, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_VEHICLE: &str = "UPDATE vehicles SET vehicle_number = ?2, year = ?3, make = ?4, model = ?5, seating_capacity = ?6, vin = ?7,
    license_number = ?8, last_inspection = ?9, status = ?10, fuel_type = ?11, notes = ?12 WHERE id = ?1";
const DELETE_VEHICLE: &str = "DELETE FROM vehicles WHERE id = ?1";

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_MAINTENANCE: &str = "Maintenance";
pub const STATUS_INACTIVE: &str = "Inactive";
pub const STATUS_RETIRED: &str = "Retired";
pub const STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_MAINTENANCE, STATUS_INACTIVE, STATUS_RETIRED];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Option<i64>,
    pub vehicle_number: String,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub seating_capacity: Option<i32>,
    pub vin: Option<String>,
    pub license_number: Option<String>,
    pub last_inspection: Option<NaiveDate>,
    pub status: String,
    pub fuel_type: Option<String>,
    pub notes: Option<String>,
}

impl Vehicle {
    pub fn new(vehicle_number: &str) -> Self {
        Self {
            id: None,
            vehicle_number: vehicle_number.to_string(),
            year: None,
            make: None,
            model: None,
            seating_capacity: None,
            vin: None,
            license_number: None,
            last_inspection: None,
            status: STATUS_ACTIVE.to_string(),
            fuel_type: None,
            notes: None,
        }
    }

    /// Buses are referred to by number on every screen; same value as `vehicle_number`.
    pub fn bus_number(&self) -> &str {
        &self.vehicle_number
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ACTIVE)
    }

    /// `"#12 2019 Blue Bird Vision"`, skipping missing parts.
    pub fn label(&self) -> String {
        let mut parts = vec![format!("#{}", self.vehicle_number)];
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        parts.extend(self.make.iter().cloned());
        parts.extend(self.model.iter().cloned());
        parts.join(" ")
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Vehicle {
            id: row.get(0)?,
            vehicle_number: row.get(1)?,
            year: row.get(2)?,
            make: row.get(3)?,
            model: row.get(4)?,
            seating_capacity: row.get(5)?,
            vin: row.get(6)?,
            license_number: row.get(7)?,
            last_inspection: row.get(8)?,
            status: row.get(9)?,
            fuel_type: row.get(10)?,
            notes: row.get(11)?,
        })
    }
}

pub struct Vehicles {
    conn: Connection,
}

impl From<Db> for Vehicles {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl Vehicles {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Vehicle>> {
        self.query(&format!("SELECT {} FROM vehicles ORDER BY vehicle_number", COLUMNS), [])
    }

    pub fn list_by_status(&self, status: &str) -> Result<Vec<Vehicle>> {
        self.query(
            &format!("SELECT {} FROM vehicles WHERE status = ?1 COLLATE NOCASE ORDER BY vehicle_number", COLUMNS),
            params![status],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Vehicle>> {
        self.conn
            .query_row(&format!("SELECT {} FROM vehicles WHERE id = ?1", COLUMNS), params![id], Vehicle::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_by_number(&self, vehicle_number: &str) -> Result<Option<Vehicle>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM vehicles WHERE vehicle_number = ?1", COLUMNS),
                params![vehicle_number.trim()],
                Vehicle::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, vehicle: &Vehicle) -> Result<i64> {
        self.conn
            .execute(
                INSERT_VEHICLE,
                params![
                    vehicle.vehicle_number.trim(),
                    vehicle.year,
                    vehicle.make,
                    vehicle.model,
                    vehicle.seating_capacity,
                    vehicle.vin,
                    vehicle.license_number,
                    vehicle.last_inspection,
                    vehicle.status,
                    vehicle.fuel_type,
                    vehicle.notes,
                ],
            )
            .map_err(|e| map_write_error(e, ENTITY, &vehicle.vehicle_number))?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, number = %vehicle.vehicle_number, "vehicle inserted");
        Ok(id)
    }

    pub fn update(&mut self, vehicle: &Vehicle) -> Result<()> {
        let id = vehicle.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self
            .conn
            .execute(
                UPDATE_VEHICLE,
                params![
                    id,
                    vehicle.vehicle_number.trim(),
                    vehicle.year,
                    vehicle.make,
                    vehicle.model,
                    vehicle.seating_capacity,
                    vehicle.vin,
                    vehicle.license_number,
                    vehicle.last_inspection,
                    vehicle.status,
                    vehicle.fuel_type,
                    vehicle.notes,
                ],
            )
            .map_err(|e| map_write_error(e, ENTITY, &vehicle.vehicle_number))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn set_status(&mut self, id: i64, status: &str) -> Result<()> {
        let affected = self.conn.execute("UPDATE vehicles SET status = ?2 WHERE id = ?1", params![id, status])?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_VEHICLE, params![id]).map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        tracing::debug!(id, "vehicle deleted");
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Vehicle>> {
        let mut stmt = self.conn.prepare(sql)?;
        let vehicles = stmt.query_map(params, Vehicle::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(vehicles)
    }
}
