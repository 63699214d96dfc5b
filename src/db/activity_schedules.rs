//! Planned trips: the schedule of upcoming sports, activity and field trips.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Schedule";
const COLUMNS: &str = "id, date, trip_type, vehicle_id, destination, leave_time, event_time, return_time, riders, driver_id, notes";
const INSERT_SCHEDULE: &str = "INSERT INTO activity_schedules (date, trip_type, vehicle_id, destination, leave_time, event_time, return_time, riders, driver_id, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_SCHEDULE: &str = "UPDATE activity_schedules SET date = ?2, trip_type = ?3, vehicle_id = ?4, destination = ?5, leave_time = ?6,
    event_time = ?7, return_time = ?8, riders = ?9, driver_id = ?10, notes = ?11 WHERE id = ?1";

pub const TRIP_TYPES: &[&str] = &["Sports Trip", "Activity Trip", "Field Trip"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySchedule {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub trip_type: Option<String>,
    pub vehicle_id: Option<i64>,
    pub destination: String,
    pub leave_time: Option<NaiveTime>,
    pub event_time: Option<NaiveTime>,
    pub return_time: Option<NaiveTime>,
    pub riders: Option<i32>,
    pub driver_id: Option<i64>,
    pub notes: Option<String>,
}

impl ActivitySchedule {
    pub fn new(date: NaiveDate, destination: &str) -> Self {
        Self {
            id: None,
            date,
            trip_type: None,
            vehicle_id: None,
            destination: destination.to_string(),
            leave_time: None,
            event_time: None,
            return_time: None,
            riders: None,
            driver_id: None,
            notes: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ActivitySchedule {
            id: row.get(0)?,
            date: row.get(1)?,
            trip_type: row.get(2)?,
            vehicle_id: row.get(3)?,
            destination: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            leave_time: row.get(5)?,
            event_time: row.get(6)?,
            return_time: row.get(7)?,
            riders: row.get(8)?,
            driver_id: row.get(9)?,
            notes: row.get(10)?,
        })
    }
}

pub struct ActivitySchedules {
    conn: Connection,
}

impl From<Db> for ActivitySchedules {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl ActivitySchedules {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<ActivitySchedule>> {
        self.query(&format!("SELECT {} FROM activity_schedules ORDER BY date, leave_time", COLUMNS), [])
    }

    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ActivitySchedule>> {
        self.query(
            &format!("SELECT {} FROM activity_schedules WHERE date BETWEEN ?1 AND ?2 ORDER BY date, leave_time", COLUMNS),
            params![from, to],
        )
    }

    pub fn list_by_driver(&self, driver_id: i64) -> Result<Vec<ActivitySchedule>> {
        self.query(
            &format!("SELECT {} FROM activity_schedules WHERE driver_id = ?1 ORDER BY date, leave_time", COLUMNS),
            params![driver_id],
        )
    }

    pub fn list_for_driver_between(&self, driver_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<ActivitySchedule>> {
        self.query(
            &format!(
                "SELECT {} FROM activity_schedules WHERE driver_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date, leave_time",
                COLUMNS
            ),
            params![driver_id, from, to],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<ActivitySchedule>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM activity_schedules WHERE id = ?1", COLUMNS),
                params![id],
                ActivitySchedule::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, schedule: &ActivitySchedule) -> Result<i64> {
        self.conn.execute(
            INSERT_SCHEDULE,
            params![
                schedule.date,
                schedule.trip_type,
                schedule.vehicle_id,
                schedule.destination.trim(),
                schedule.leave_time,
                schedule.event_time,
                schedule.return_time,
                schedule.riders,
                schedule.driver_id,
                schedule.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&mut self, schedule: &ActivitySchedule) -> Result<()> {
        let id = schedule.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_SCHEDULE,
            params![
                id,
                schedule.date,
                schedule.trip_type,
                schedule.vehicle_id,
                schedule.destination.trim(),
                schedule.leave_time,
                schedule.event_time,
                schedule.return_time,
                schedule.riders,
                schedule.driver_id,
                schedule.notes,
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
            .execute("DELETE FROM activity_schedules WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<ActivitySchedule>> {
        let mut stmt = self.conn.prepare(sql)?;
        let schedules = stmt.query_map(params, ActivitySchedule::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(schedules)
    }
}
