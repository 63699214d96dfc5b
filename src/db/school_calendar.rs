//! School calendar entries: school days, holidays and breaks.
//!
//! An entry covers `date..=end_date` (a single day when `end_date` is empty).
//! `route_needed` marks the days on which regular routes run.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Calendar entry";
const COLUMNS: &str = "id, date, end_date, category, description, route_needed";
const INSERT_ENTRY: &str = "INSERT INTO school_calendar (date, end_date, category, description, route_needed) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_ENTRY: &str = "UPDATE school_calendar SET date = ?2, end_date = ?3, category = ?4, description = ?5, route_needed = ?6 WHERE id = ?1";
const OVERLAPPING: &str = "WHERE date <= ?2 AND COALESCE(end_date, date) >= ?1";

pub const CATEGORIES: &[&str] = &["School Day", "Holiday", "Thanksgiving Break", "Christmas Break", "Spring Break", "Key Event"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolCalendar {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub description: Option<String>,
    pub route_needed: bool,
}

impl SchoolCalendar {
    pub fn new(date: NaiveDate, category: &str, route_needed: bool) -> Self {
        Self {
            id: None,
            date,
            end_date: None,
            category: category.to_string(),
            description: None,
            route_needed,
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.date)
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.date <= day && day <= self.last_day()
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SchoolCalendar {
            id: row.get(0)?,
            date: row.get(1)?,
            end_date: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            route_needed: row.get(5)?,
        })
    }
}

pub struct SchoolCalendars {
    conn: Connection,
}

impl From<Db> for SchoolCalendars {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl SchoolCalendars {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<SchoolCalendar>> {
        self.query(&format!("SELECT {} FROM school_calendar ORDER BY date", COLUMNS), [])
    }

    /// Entries overlapping `from..=to`.
    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SchoolCalendar>> {
        self.query(&format!("SELECT {} FROM school_calendar {} ORDER BY date", COLUMNS, OVERLAPPING), params![from, to])
    }

    pub fn entries_on(&self, day: NaiveDate) -> Result<Vec<SchoolCalendar>> {
        self.list_between(day, day)
    }

    /// Whether any entry covering `day` calls for regular routes.
    pub fn is_route_day(&self, day: NaiveDate) -> Result<bool> {
        Ok(self.entries_on(day)?.iter().any(|entry| entry.route_needed))
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<SchoolCalendar>> {
        self.conn
            .query_row(&format!("SELECT {} FROM school_calendar WHERE id = ?1", COLUMNS), params![id], SchoolCalendar::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, entry: &SchoolCalendar) -> Result<i64> {
        self.conn.execute(
            INSERT_ENTRY,
            params![entry.date, entry.end_date, entry.category.trim(), entry.description, entry.route_needed],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&mut self, entry: &SchoolCalendar) -> Result<()> {
        let id = entry.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_ENTRY,
            params![id, entry.date, entry.end_date, entry.category.trim(), entry.description, entry.route_needed],
        )?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM school_calendar WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<SchoolCalendar>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt.query_map(params, SchoolCalendar::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
