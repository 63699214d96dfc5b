//! Activity trips requested outside the regular routes (sports, field trips).

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Activity";
const COLUMNS: &str = "id, date, activity_type, destination, leave_time, event_time, return_time, requested_by, vehicle_id, driver_id, notes";
const INSERT_ACTIVITY: &str = "INSERT INTO activities (date, activity_type, destination, leave_time, event_time, return_time, requested_by, vehicle_id, driver_id, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_ACTIVITY: &str = "UPDATE activities SET date = ?2, activity_type = ?3, destination = ?4, leave_time = ?5, event_time = ?6,
    return_time = ?7, requested_by = ?8, vehicle_id = ?9, driver_id = ?10, notes = ?11 WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub activity_type: Option<String>,
    pub destination: String,
    pub leave_time: Option<NaiveTime>,
    pub event_time: Option<NaiveTime>,
    pub return_time: Option<NaiveTime>,
    pub requested_by: Option<String>,
    pub vehicle_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(date: NaiveDate, destination: &str) -> Self {
        Self {
            id: None,
            date,
            activity_type: None,
            destination: destination.to_string(),
            leave_time: None,
            event_time: None,
            return_time: None,
            requested_by: None,
            vehicle_id: None,
            driver_id: None,
            notes: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Activity {
            id: row.get(0)?,
            date: row.get(1)?,
            activity_type: row.get(2)?,
            destination: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            leave_time: row.get(4)?,
            event_time: row.get(5)?,
            return_time: row.get(6)?,
            requested_by: row.get(7)?,
            vehicle_id: row.get(8)?,
            driver_id: row.get(9)?,
            notes: row.get(10)?,
        })
    }
}

pub struct Activities {
    conn: Connection,
}

impl From<Db> for Activities {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl Activities {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Activity>> {
        self.query(&format!("SELECT {} FROM activities ORDER BY date DESC, leave_time", COLUMNS), [])
    }

    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Activity>> {
        self.query(
            &format!("SELECT {} FROM activities WHERE date BETWEEN ?1 AND ?2 ORDER BY date, leave_time", COLUMNS),
            params![from, to],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Activity>> {
        self.conn
            .query_row(&format!("SELECT {} FROM activities WHERE id = ?1", COLUMNS), params![id], Activity::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, activity: &Activity) -> Result<i64> {
        self.conn.execute(
            INSERT_ACTIVITY,
            params![
                activity.date,
                activity.activity_type,
                activity.destination.trim(),
                activity.leave_time,
                activity.event_time,
                activity.return_time,
                activity.requested_by,
                activity.vehicle_id,
                activity.driver_id,
                activity.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&mut self, activity: &Activity) -> Result<()> {
        let id = activity.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_ACTIVITY,
            params![
                id,
                activity.date,
                activity.activity_type,
                activity.destination.trim(),
                activity.leave_time,
                activity.event_time,
                activity.return_time,
                activity.requested_by,
                activity.vehicle_id,
                activity.driver_id,
                activity.notes,
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
            .execute("DELETE FROM activities WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM activities", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(sql)?;
        let activities = stmt.query_map(params, Activity::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }
}
