//! Daily route records with separate AM and PM runs.
//!
//! Each row is one route on one date. The morning and afternoon runs carry their
//! own vehicle, driver, odometer readings and rider count, and any of them may
//! be blank when a run did not happen.

use super::db::Db;
use super::error::{map_delete_error, DbError};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENTITY: &str = "Route";
const COLUMNS: &str = "id, date, route_name, am_vehicle_id, am_begin_miles, am_end_miles, am_riders, am_driver_id,
    pm_vehicle_id, pm_begin_miles, pm_end_miles, pm_riders, pm_driver_id, notes";
const INSERT_ROUTE: &str = "INSERT INTO routes (date, route_name, am_vehicle_id, am_begin_miles, am_end_miles, am_riders, am_driver_id,
    pm_vehicle_id, pm_begin_miles, pm_end_miles, pm_riders, pm_driver_id, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const UPDATE_ROUTE: &str = "UPDATE routes SET date = ?2, route_name = ?3, am_vehicle_id = ?4, am_begin_miles = ?5, am_end_miles = ?6,
    am_riders = ?7, am_driver_id = ?8, pm_vehicle_id = ?9, pm_begin_miles = ?10, pm_end_miles = ?11, pm_riders = ?12,
    pm_driver_id = ?13, notes = ?14 WHERE id = ?1";

/// One half of a route day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRun {
    pub vehicle_id: Option<i64>,
    pub begin_miles: Option<f64>,
    pub end_miles: Option<f64>,
    pub riders: Option<i32>,
    pub driver_id: Option<i64>,
}

impl RouteRun {
    /// Odometer distance of the run; 0 when a reading is missing or reversed.
    pub fn miles(&self) -> f64 {
        match (self.begin_miles, self.end_miles) {
            (Some(begin), Some(end)) if end >= begin => end - begin,
            _ => 0.0,
        }
    }

    pub fn riders(&self) -> i32 {
        self.riders.unwrap_or(0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        *self == RouteRun::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub route_name: String,
    pub am: RouteRun,
    pub pm: RouteRun,
    pub notes: Option<String>,
}

impl Route {
    pub fn new(date: NaiveDate, route_name: &str) -> Self {
        Self {
            id: None,
            date,
            route_name: route_name.to_string(),
            am: RouteRun::default(),
            pm: RouteRun::default(),
            notes: None,
        }
    }

    pub fn total_miles(&self) -> f64 {
        self.am.miles() + self.pm.miles()
    }

    pub fn total_riders(&self) -> i32 {
        self.am.riders() + self.pm.riders()
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Route {
            id: row.get(0)?,
            date: row.get(1)?,
            route_name: row.get(2)?,
            am: RouteRun {
                vehicle_id: row.get(3)?,
                begin_miles: row.get(4)?,
                end_miles: row.get(5)?,
                riders: row.get(6)?,
                driver_id: row.get(7)?,
            },
            pm: RouteRun {
                vehicle_id: row.get(8)?,
                begin_miles: row.get(9)?,
                end_miles: row.get(10)?,
                riders: row.get(11)?,
                driver_id: row.get(12)?,
            },
            notes: row.get(13)?,
        })
    }
}

pub struct Routes {
    conn: Connection,
}

impl From<Db> for Routes {
    fn from(db: Db) -> Self {
        Self { conn: db.conn }
    }
}

impl Routes {
    pub fn new() -> Result<Self> {
        Ok(Db::new()?.into())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Db::open(path)?.into())
    }

    pub fn list(&self) -> Result<Vec<Route>> {
        self.query(&format!("SELECT {} FROM routes ORDER BY date DESC, route_name", COLUMNS), [])
    }

    pub fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Route>> {
        self.query(&format!("SELECT {} FROM routes WHERE date = ?1 ORDER BY route_name", COLUMNS), params![date])
    }

    /// Routes dated within `from..=to`, oldest first.
    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Route>> {
        self.query(
            &format!("SELECT {} FROM routes WHERE date BETWEEN ?1 AND ?2 ORDER BY date, route_name", COLUMNS),
            params![from, to],
        )
    }

    pub fn list_by_vehicle(&self, vehicle_id: i64) -> Result<Vec<Route>> {
        self.query(
            &format!("SELECT {} FROM routes WHERE am_vehicle_id = ?1 OR pm_vehicle_id = ?1 ORDER BY date", COLUMNS),
            params![vehicle_id],
        )
    }

    pub fn list_by_driver(&self, driver_id: i64) -> Result<Vec<Route>> {
        self.query(
            &format!("SELECT {} FROM routes WHERE am_driver_id = ?1 OR pm_driver_id = ?1 ORDER BY date", COLUMNS),
            params![driver_id],
        )
    }

    /// Routes matching every filter given; `None` leaves that filter out.
    pub fn search(&self, range: Option<(NaiveDate, NaiveDate)>, vehicle_id: Option<i64>, driver_id: Option<i64>) -> Result<Vec<Route>> {
        let (from, to) = range.unzip();
        self.query(
            &format!(
                "SELECT {} FROM routes
                 WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
                   AND (?3 IS NULL OR am_vehicle_id = ?3 OR pm_vehicle_id = ?3)
                   AND (?4 IS NULL OR am_driver_id = ?4 OR pm_driver_id = ?4)
                 ORDER BY date, route_name",
                COLUMNS
            ),
            params![from, to, vehicle_id, driver_id],
        )
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Route>> {
        self.conn
            .query_row(&format!("SELECT {} FROM routes WHERE id = ?1", COLUMNS), params![id], Route::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn insert(&mut self, route: &Route) -> Result<i64> {
        self.conn.execute(
            INSERT_ROUTE,
            params![
                route.date,
                route.route_name.trim(),
                route.am.vehicle_id,
                route.am.begin_miles,
                route.am.end_miles,
                route.am.riders,
                route.am.driver_id,
                route.pm.vehicle_id,
                route.pm.begin_miles,
                route.pm.end_miles,
                route.pm.riders,
                route.pm.driver_id,
                route.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, route = %route.route_name, date = %route.date, "route inserted");
        Ok(id)
    }

    pub fn update(&mut self, route: &Route) -> Result<()> {
        let id = route.id.ok_or(DbError::MissingId { entity: ENTITY })?;
        let affected = self.conn.execute(
            UPDATE_ROUTE,
            params![
                id,
                route.date,
                route.route_name.trim(),
                route.am.vehicle_id,
                route.am.begin_miles,
                route.am.end_miles,
                route.am.riders,
                route.am.driver_id,
                route.pm.vehicle_id,
                route.pm.begin_miles,
                route.pm.end_miles,
                route.pm.riders,
                route.pm.driver_id,
                route.notes,
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
            .execute("DELETE FROM routes WHERE id = ?1", params![id])
            .map_err(|e| map_delete_error(e, ENTITY, id))?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: ENTITY, id }.into());
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))?)
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Route>> {
        let mut stmt = self.conn.prepare(sql)?;
        let routes = stmt.query_map(params, Route::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_miles_guards_missing_and_reversed_readings() {
        let run = RouteRun {
            begin_miles: Some(1000.0),
            end_miles: Some(1042.5),
            ..Default::default()
        };
        assert_eq!(run.miles(), 42.5);

        let reversed = RouteRun {
            begin_miles: Some(1042.5),
            end_miles: Some(1000.0),
            ..Default::default()
        };
        assert_eq!(reversed.miles(), 0.0);

        let partial = RouteRun {
            begin_miles: Some(1000.0),
            ..Default::default()
        };
        assert_eq!(partial.miles(), 0.0);
    }

    #[test]
    fn test_route_totals() {
        let mut route = Route::new(NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(), "North");
        route.am = RouteRun {
            begin_miles: Some(100.0),
            end_miles: Some(130.0),
            riders: Some(22),
            ..Default::default()
        };
        route.pm = RouteRun {
            begin_miles: Some(130.0),
            end_miles: Some(158.0),
            riders: Some(-3),
            ..Default::default()
        };
        assert_eq!(route.total_miles(), 58.0);
        assert_eq!(route.total_riders(), 22);
    }
}
