//! # BusBuddy - school bus fleet management
//!
//! A command-line utility for running a school transportation department:
//! vehicles, drivers, daily AM/PM routes, activity trips, fuel and maintenance
//! logs, driver time cards and the school calendar, all kept in a local SQLite
//! database.
//!
//! ## Features
//!
//! - **Records**: list, add, edit and delete every kind of record
//! - **Validation**: field rules and reference checks before anything is saved
//! - **Analytics**: route mileage and ridership, driver totals, fuel economy
//! - **Forecast**: upcoming oil changes, brakes, tires and inspections
//! - **Time cards**: daily hours, overtime, weekly and monthly totals
//! - **Export**: CSV, JSON and Excel
//!
//! ## Usage
//!
//! ```rust,no_run
//! use busbuddy::commands::Cli;
//!
//! fn main() -> anyhow::Result<std::process::ExitCode> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
