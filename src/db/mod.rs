//! Database layer for BusBuddy.
//!
//! Every entity has its own repository type owning a SQLite connection. Opening
//! any repository applies pending migrations first, so a fresh file is usable
//! straight away.
//!
//! ```rust,no_run
//! use busbuddy::db::vehicles::{Vehicle, Vehicles};
//!
//! let mut vehicles = Vehicles::open("fleet.db")?;
//! let id = vehicles.insert(&Vehicle::new("12"))?;
//! assert!(vehicles.get_by_id(id)?.is_some());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Deleting a row that other rows still reference fails with
//! [`DbError::InUse`](error::DbError::InUse); foreign keys are enforced on
//! every connection.

/// Connection management and database initialization.
pub mod db;

/// Typed errors for missing rows and constraint violations.
pub mod error;

/// Versioned schema migrations.
pub mod migrations;

pub mod activities;
pub mod activity_schedules;
pub mod drivers;
pub mod fuel;
pub mod maintenance;
pub mod routes;
pub mod school_calendar;
pub mod time_cards;
pub mod vehicles;
