pub mod activity;
pub mod analytics;
pub mod calendar;
pub mod dashboard;
pub mod driver;
pub mod export;
pub mod forecast;
pub mod fuel;
pub mod init;
pub mod maintenance;
pub mod migrations;
pub mod route;
pub mod schedule;
pub mod timecard;
pub mod vehicle;

use crate::{
    db::error::DbError,
    libs::{dates::parse_date, messages::Message, validation::ValidationResult},
    msg_error, msg_print,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use thiserror::Error;

/// A failure that has already been shown to the user.
#[derive(Debug, Error)]
#[error("validation failed")]
pub struct Rejected;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage buses and other vehicles")]
    Vehicle(vehicle::VehicleArgs),
    #[command(about = "Manage drivers")]
    Driver(driver::DriverArgs),
    #[command(about = "Record daily AM/PM route runs")]
    Route(route::RouteArgs),
    #[command(about = "Manage activity trips")]
    Activity(activity::ActivityArgs),
    #[command(about = "Manage the activity trip schedule")]
    Schedule(schedule::ScheduleArgs),
    #[command(about = "Log fuel purchases")]
    Fuel(fuel::FuelArgs),
    #[command(about = "Log maintenance work")]
    Maintenance(maintenance::MaintenanceArgs),
    #[command(about = "Manage the school calendar")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "Driver time cards")]
    Timecard(timecard::TimecardArgs),
    #[command(about = "Route and fuel analytics")]
    Analytics(analytics::AnalyticsArgs),
    #[command(about = "Upcoming maintenance by priority")]
    Forecast(forecast::ForecastArgs),
    #[command(about = "Fleet overview for today")]
    Dashboard(dashboard::DashboardArgs),
    #[command(about = "Export data to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Database schema version and history")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Runs the chosen command. Data and validation failures are printed and
    /// end with a failing exit status.
    pub fn menu() -> Result<ExitCode> {
        let cli = Self::parse();
        let result = match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Vehicle(args) => vehicle::cmd(args),
            Commands::Driver(args) => driver::cmd(args),
            Commands::Route(args) => route::cmd(args),
            Commands::Activity(args) => activity::cmd(args),
            Commands::Schedule(args) => schedule::cmd(args),
            Commands::Fuel(args) => fuel::cmd(args),
            Commands::Maintenance(args) => maintenance::cmd(args),
            Commands::Calendar(args) => calendar::cmd(args),
            Commands::Timecard(args) => timecard::cmd(args),
            Commands::Analytics(args) => analytics::cmd(args),
            Commands::Forecast(args) => forecast::cmd(args),
            Commands::Dashboard(args) => dashboard::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
        };
        match succeeded(result)? {
            true => Ok(ExitCode::SUCCESS),
            false => Ok(ExitCode::FAILURE),
        }
    }
}

/// Prints validation problems and fails with [`Rejected`] when there are any.
pub(crate) fn ensure_valid(result: &ValidationResult) -> Result<()> {
    if result.is_valid() {
        return Ok(());
    }
    msg_error!(Message::ValidationFailed);
    for error in &result.errors {
        msg_print!(Message::ValidationError(error.clone()));
    }
    Err(Rejected.into())
}

/// Expected data failures (missing or referenced rows, duplicates) are shown to
/// the user instead of aborting with a backtrace. Returns whether the command
/// succeeded; any other error is passed through.
fn succeeded(result: Result<()>) -> Result<bool> {
    let Err(err) = result else {
        return Ok(true);
    };
    if err.is::<Rejected>() {
        return Ok(false);
    }
    match err.downcast_ref::<DbError>() {
        Some(db_err) => {
            msg_error!(Message::DataError(db_err.to_string()));
            Ok(false)
        }
        None => Err(err),
    }
}

/// Resolves optional `--from`/`--to` arguments. A missing end defaults to the start.
pub(crate) fn date_range(from: Option<&str>, to: Option<&str>) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let Some(from) = from else {
        return Ok(None);
    };
    let from = parse_date(from)?;
    let to = match to {
        Some(to) => parse_date(to)?,
        None => from,
    };
    Ok(Some((from.min(to), from.max(to))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_fail_without_propagating() {
        let in_use: Result<()> = Err(DbError::InUse { entity: "Vehicle", id: 1 }.into());
        assert!(!succeeded(in_use).unwrap());

        let missing: Result<()> = Err(DbError::NotFound { entity: "Driver", id: 9 }.into());
        assert!(!succeeded(missing).unwrap());
    }

    #[test]
    fn test_validation_failure_is_a_failed_command() {
        let mut problems = ValidationResult::new();
        problems.add("Route name is required");

        let result = ensure_valid(&problems);
        assert!(result.as_ref().unwrap_err().is::<Rejected>());
        assert!(!succeeded(result).unwrap());
        assert!(ensure_valid(&ValidationResult::new()).is_ok());
    }

    #[test]
    fn test_other_errors_pass_through() {
        assert!(succeeded(Ok(())).unwrap());
        assert!(succeeded(Err(anyhow::anyhow!("disk full"))).is_err());
    }

    #[test]
    fn test_date_range_orders_bounds() {
        let range = date_range(Some("2024-06-30"), Some("2024-06-01")).unwrap().unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert!(date_range(None, Some("2024-06-01")).unwrap().is_none());
    }
}
