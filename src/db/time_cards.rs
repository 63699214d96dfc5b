//! Driver time cards: one row per driver per day.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Time card";
const COLUMNS: &str = "id, driver_id, date, day_type, am_clock_in, lunch_clock_out, lunch_clock_in, pm_clock_out,
    route_am_clock_out, route_am_clock_in, route_pm_clock_out, route_pm_clock_in, total_hours, overtime_hours, notes";
const INSERT_TIME_CARD: &str = "INSERT INTO time_cards (driver_id, date, day_type, am_clock_in, lunch_clock_out, lunch_clock_in, pm_clock_out,
    route_am_clock_out, route_am_clock_in, route_pm_clock_out, route_pm_clock_in, total_hours, overtime_hours, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const UPDATE_TIME_CARD: &str = "UPDATE time_cards SET driver_id = ?2, date = ?3, day_type = ?4, am_clock_in = ?5, lunch_clock_out = ?6,
    lunch_clock_in = ?7, pm_clock_out = ?8, route_am_clock_out = ?9, route_am_clock_in = ?10, route_pm_clock_out = ?11,
    route_pm_clock_in = ?12, total_hours = ?13, overtime_hours = ?14, notes = ?15 WHERE id = ?1";

pub const DAY_TYPES: &[&str] = &["Normal Day", "Route Day", "Sick Day", "Holiday", "Vacation", "Training"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCard {
    pub id: Option<i64>,
    pub driver_id: i64,
    pub date: NaiveDate,
    pub day_type: Option<String>,
    pub am_clock_in: Option<NaiveTime>,
    pub lunch_clock_out: Option<NaiveTime>,
    pub lunch_clock_in: Option<NaiveTime>,
    pub pm_clock_out: Option<NaiveTime>,
    pub route_am_clock_out: Option<NaiveTime>,
    pub route_am_clock_in: Option<NaiveTime>,
    pub route_pm_clock_out: Option<NaiveTime>,
    pub route_pm_clock_in: Option<NaiveTime>,
    pub total_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
    pub notes: Option<String>,
}

impl TimeCard {
    pub fn new(driver_id: i64, date: NaiveDate) -> Self {
        Self {
            id: None,
            driver_id,
            date,
            day_type: None,
            am_clock_in: None,
            lunch_clock_out: None,
            lunch_clock_in: None,
            pm_clock_out: None,
            route_am_clock_out: None,
            route_am_clock_in: None,
            route_pm_clock_out: None,
            route_pm_clock_in: None,
            total_hours: None,
            overtime_hours: None,
            notes: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(TimeCard {
            id: row.get(0)?,
            driver_id: row.get(1)?,
            date: row.get(2)?,
            day_type: row.get(3)?,
            am_clock_in: row.get(4)?,
            lunch_clock_out: row.get(5)?,
            lunch_clock_in: row.get(6)?,
            pm_clock_out: row.get(7)?,
            route_am_clock_out: row.get(8)?,
            route_am_clock_in: row.get(9)?,
            route_pm_clock_out: row.get(10)?,
            route_pm_clock_in: row.get(11)?,
            total_hours: row.get(12)?,
            overtime_hours: row.get(13)?,
            notes: row.get(14)?,
        })
    }
}

pub struct TimeCards {
    conn: Connection,
}

impl From<Db> for TimeCards {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl TimeCards {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<TimeCard>> {
        self.query(&format!("SELECT {} FROM time_cards ORDER BY date DESC, driver_id", COLUMNS), [])
    }

    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeCard>> {
        self.query(
            &format!("SELECT {} FROM time_cards WHERE date BETWEEN ?1 AND ?2 ORDER BY date, driver_id", COLUMNS),
            params![from, to],
        )
    }

    pub fn list_by_driver(&self, driver_id: i64) -> Result<Vec<TimeCard>> {
        self.query(&format!("SELECT {} FROM time_cards WHERE driver_id = ?1 ORDER BY date", COLUMNS), params![driver_id])
    }

    pub fn list_for_driver_between(&self, driver_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeCard>> {
        self.query(
            &format!("SELECT {} FROM time_cards WHERE driver_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date", COLUMNS),
            params![driver_id, from, to],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<TimeCard>> {
        self.conn
            .query_row(&format!("SELECT {} FROM time_cards WHERE id = ?1", COLUMNS), params![id], TimeCard::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, card: &TimeCard) -> Result<i64> {
        self.conn.execute(
            INSERT_TIME_CARD,
            params![
                card.driver_id,
                card.date,
                card.day_type,
                card.am_clock_in,
                card.lunch_clock_out,
                card.lunch_clock_in,
                card.pm_clock_out,
                card.route_am_clock_out,
                card.route_am_clock_in,
                card.route_pm_clock_out,
                card.route_pm_clock_in,
                card.total_hours,
                card.overtime_hours,
                card.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, driver_id = card.driver_id, date = %card.date, "time card inserted");
        Ok(id)
    }

    pub fn update(&mut self, card: &TimeCard) -> Result<()> {
        let id = card.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_TIME_CARD,
            params![
                id,
                card.driver_id,
                card.date,
                card.day_type,
                card.am_clock_in,
                card.lunch_clock_out,
                card.lunch_clock_in,
                card.pm_clock_out,
                card.route_am_clock_out,
                card.route_am_clock_in,
                card.route_pm_clock_out,
                card.route_pm_clock_in,
                card.total_hours,
                card.overtime_hours,
                card.notes,
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
            .execute("DELETE FROM time_cards WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<TimeCard>> {
        let mut stmt = self.conn.prepare(sql)?;
        let cards = stmt.query_map(params, TimeCard::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }
}
