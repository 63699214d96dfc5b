//! Versioned schema migrations for the BusBuddy database.
//!
//! Each migration is a function applied inside a transaction and recorded in the
//! `migrations` table, so opening a database repeatedly only runs what is
//! missing. Foreign keys carry no cascade actions: a referenced row cannot be
//! deleted while its dependants exist.
//!
//! ```rust
//! use busbuddy::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of schema migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: the fleet itself
        self.add_migration(1, "create_fleet_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS vehicles (
                    id INTEGER PRIMARY KEY,
                    vehicle_number TEXT NOT NULL UNIQUE,
                    year INTEGER,
                    make TEXT,
                    model TEXT,
                    seating_capacity INTEGER,
                    vin TEXT,
                    license_number TEXT,
                    last_inspection DATE,
                    status TEXT NOT NULL DEFAULT 'Active',
                    fuel_type TEXT,
                    notes TEXT
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS drivers (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    phone TEXT,
                    email TEXT,
                    address TEXT,
                    city TEXT,
                    state TEXT,
                    zip TEXT,
                    license_type TEXT,
                    cdl_expiration DATE,
                    training_complete BOOLEAN NOT NULL DEFAULT FALSE,
                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    notes TEXT
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: daily routes and trips
        self.add_migration(2, "create_operations_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS routes (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    route_name TEXT NOT NULL,
                    am_vehicle_id INTEGER,
                    am_begin_miles REAL,
                    am_end_miles REAL,
                    am_riders INTEGER,
                    am_driver_id INTEGER,
                    pm_vehicle_id INTEGER,
                    pm_begin_miles REAL,
                    pm_end_miles REAL,
                    pm_riders INTEGER,
                    pm_driver_id INTEGER,
                    notes TEXT,
                    FOREIGN KEY (am_vehicle_id) REFERENCES vehicles(id),
                    FOREIGN KEY (am_driver_id) REFERENCES drivers(id),
                    FOREIGN KEY (pm_vehicle_id) REFERENCES vehicles(id),
                    FOREIGN KEY (pm_driver_id) REFERENCES drivers(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS activities (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    activity_type TEXT,
                    destination TEXT,
                    leave_time TIME,
                    event_time TIME,
                    return_time TIME,
                    requested_by TEXT,
                    vehicle_id INTEGER,
                    driver_id INTEGER,
                    notes TEXT,
                    FOREIGN KEY (vehicle_id) REFERENCES vehicles(id),
                    FOREIGN KEY (driver_id) REFERENCES drivers(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS activity_schedules (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    trip_type TEXT,
                    vehicle_id INTEGER,
                    destination TEXT,
                    leave_time TIME,
                    event_time TIME,
                    return_time TIME,
                    riders INTEGER,
                    driver_id INTEGER,
                    notes TEXT,
                    FOREIGN KEY (vehicle_id) REFERENCES vehicles(id),
                    FOREIGN KEY (driver_id) REFERENCES drivers(id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 3: running costs
        self.add_migration(3, "create_cost_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS fuel (
                    id INTEGER PRIMARY KEY,
                    fuel_date DATE NOT NULL,
                    location TEXT,
                    vehicle_id INTEGER NOT NULL,
                    odometer REAL,
                    fuel_type TEXT,
                    gallons REAL,
                    cost REAL,
                    notes TEXT,
                    FOREIGN KEY (vehicle_id) REFERENCES vehicles(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS maintenance (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    vehicle_id INTEGER NOT NULL,
                    odometer REAL,
                    category TEXT NOT NULL,
                    vendor TEXT,
                    cost REAL,
                    notes TEXT,
                    FOREIGN KEY (vehicle_id) REFERENCES vehicles(id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 4: staffing and calendar
        self.add_migration(4, "create_staffing_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS time_cards (
                    id INTEGER PRIMARY KEY,
                    driver_id INTEGER NOT NULL,
                    date DATE NOT NULL,
                    day_type TEXT,
                    am_clock_in TIME,
                    lunch_clock_out TIME,
                    lunch_clock_in TIME,
                    pm_clock_out TIME,
                    route_am_clock_out TIME,
                    route_am_clock_in TIME,
                    route_pm_clock_out TIME,
                    route_pm_clock_in TIME,
                    total_hours REAL,
                    overtime_hours REAL,
                    notes TEXT,
                    FOREIGN KEY (driver_id) REFERENCES drivers(id)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS school_calendar (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    end_date DATE,
                    category TEXT NOT NULL,
                    description TEXT,
                    route_needed BOOLEAN NOT NULL DEFAULT FALSE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 5: lookup indices
        self.add_migration(5, "create_indices", |tx| {
            let indices = [
                "CREATE INDEX IF NOT EXISTS idx_routes_date ON routes(date)",
                "CREATE INDEX IF NOT EXISTS idx_routes_am_vehicle ON routes(am_vehicle_id)",
                "CREATE INDEX IF NOT EXISTS idx_routes_pm_vehicle ON routes(pm_vehicle_id)",
                "CREATE INDEX IF NOT EXISTS idx_fuel_vehicle ON fuel(vehicle_id)",
                "CREATE INDEX IF NOT EXISTS idx_fuel_date ON fuel(fuel_date)",
                "CREATE INDEX IF NOT EXISTS idx_maintenance_vehicle ON maintenance(vehicle_id)",
                "CREATE INDEX IF NOT EXISTS idx_maintenance_date ON maintenance(date)",
                "CREATE INDEX IF NOT EXISTS idx_time_cards_driver_date ON time_cards(driver_id, date)",
                "CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date)",
                "CREATE INDEX IF NOT EXISTS idx_activity_schedules_date ON activity_schedules(date)",
                "CREATE INDEX IF NOT EXISTS idx_school_calendar_date ON school_calendar(date)",
            ];
            for sql in indices {
                tx.execute(sql, [])?;
            }
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }
        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Returns `(version, name, applied_at)` for each applied migration.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    /// Forgets migrations above `target_version`. Schema objects are left in place.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;
        if target_version >= current_version {
            msg_info!(Message::NothingToRollback);
            return Ok(());
        }

        msg_info!(Message::RollingBack(current_version, target_version));
        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;
        msg_success!(Message::RollbackCompleted(target_version));
        Ok(())
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

/// Highest applied migration version, 0 for an empty database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
