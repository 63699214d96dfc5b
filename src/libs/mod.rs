//! Core library modules for BusBuddy.
//!
//! ## Features
//!
//! - **Core Infrastructure**: configuration, data storage, messaging
//! - **Business Rules**: validation, fleet rules, time card rules
//! - **Analysis**: route analytics, maintenance forecast, joined detail views
//! - **User Interface**: console tables, interactive prompts, data export
//!
//! ## Usage
//!
//! ```rust,no_run
//! use busbuddy::db::vehicles::Vehicle;
//! use busbuddy::libs::fleet::Fleet;
//!
//! let mut bus = Vehicle::new("42");
//! bus.year = Some(2021);
//! match Fleet::new()?.add_vehicle(&bus, 2024)? {
//!     Ok(id) => println!("saved as {}", id),
//!     Err(problems) => println!("{:?}", problems.errors),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analytics;
pub mod config;
pub mod data_storage;
pub mod dates;
pub mod details;
pub mod export;
pub mod fleet;
pub mod forecast;
pub mod messages;
pub mod prompt;
pub mod time_entry;
pub mod validation;
pub mod view;
