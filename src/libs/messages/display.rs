//! Display implementation for BusBuddy messages.
//!
//! All user-facing text lives here, so commands only ever refer to a
//! [`Message`] variant and its parameters.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === RECORD MESSAGES ===
            Message::RecordCreated(entity, id) => format!("{} #{} created", entity, id),
            Message::RecordUpdated(entity, id) => format!("{} #{} updated", entity, id),
            Message::RecordDeleted(entity, id) => format!("{} #{} deleted", entity, id),
            Message::RecordNotFound(entity, id) => format!("{} #{} not found", entity, id),
            Message::NoRecordsFound(entities) => format!("No {} found", entities.to_lowercase()),
            Message::ListHeader(entities) => format!("{}:", entities),
            Message::EditingRecord(label) => format!("Editing {} (press enter to keep a value)", label),
            Message::ConfirmDelete(label) => format!("Delete {}? This cannot be undone", label),
            Message::NoChangesDetected => "No changes detected".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::DataError(error) => error.clone(),

            // === VALIDATION MESSAGES ===
            Message::ValidationFailed => "The record was not saved:".to_string(),
            Message::ValidationError(error) => format!("  - {}", error),

            // === FLEET MESSAGES ===
            Message::VehicleStatusChanged(id, status) => format!("Vehicle #{} is now {}", id, status),
            Message::InvalidVehicleStatus(status) => {
                format!("Unknown vehicle status '{}'. Use Active, Maintenance, Inactive or Retired", status)
            }
            Message::CdlExpired(name) => format!("CDL of {} has expired", name),
            Message::HoursRecorded(total, overtime) => format!("{:.2} hours recorded, {:.2} overtime", total, overtime),

            // === CALENDAR MESSAGES ===
            Message::RouteDay(date) => format!("Routes run on {}", date),
            Message::NoRouteDay(date) => format!("No routes on {}", date),
            Message::RoutesNotRecorded(date) => format!("{} is a route day but no routes have been recorded", date),

            // === REPORT HEADERS ===
            Message::DashboardHeader => "Fleet dashboard".to_string(),
            Message::RouteSummaryHeader => "Routes:".to_string(),
            Message::DriverPerformanceHeader => "Drivers:".to_string(),
            Message::FuelEfficiencyHeader => "Fuel economy:".to_string(),
            Message::ForecastHeader(count) => format!("{} maintenance items due, most urgent first:", count),
            Message::NoMaintenanceDue => "No maintenance due".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file found".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleMaintenance => "Maintenance thresholds".to_string(),
            Message::ConfigModuleTimeCard => "Time card rules".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptDatabasePath => "Database file".to_string(),
            Message::PromptOilChangeMiles => "Miles between oil changes".to_string(),
            Message::PromptBrakeMiles => "Miles between brake services".to_string(),
            Message::PromptTireMiles => "Miles between tire replacements".to_string(),
            Message::PromptInspectionDays => "Days between inspections".to_string(),
            Message::PromptReplacementAge => "Age in years that triggers a replacement review".to_string(),
            Message::PromptRegularDailyHours => "Regular hours per day".to_string(),
            Message::PromptMaxDailyHours => "Maximum hours per day".to_string(),
            Message::PromptRegularWeeklyHours => "Regular hours per week".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportingData(data, format) => format!("Exporting {} as {}...", data, format),
            Message::ExportingAllData => "Exporting all data...".to_string(),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),

            // === DATABASE MESSAGES ===
            Message::DatabaseInitialized(path) => format!("Database ready at {}", path),
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationHistoryEntry(version, name, applied_at) => format!("  v{}: {} (applied: {})", version, name, applied_at),
            Message::NothingToRollback => "Nothing to rollback".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rollback to v{} completed", version),
        };

        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_messages_use_plural_labels() {
        assert_eq!(Message::ListHeader("Fuel records").to_string(), "Fuel records:");
        assert_eq!(Message::NoRecordsFound("Time cards").to_string(), "No time cards found");
        assert_eq!(Message::RecordDeleted("Fuel record", 3).to_string(), "Fuel record #3 deleted");
    }
}
