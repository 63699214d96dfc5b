#[derive(Debug, Clone)]
pub enum Message {
    // === RECORD MESSAGES ===
    RecordCreated(&'static str, i64),
    RecordUpdated(&'static str, i64),
    RecordDeleted(&'static str, i64),
    RecordNotFound(&'static str, i64),
    NoRecordsFound(&'static str),
    ListHeader(&'static str),
    EditingRecord(String),
    ConfirmDelete(String),
    NoChangesDetected,
    OperationCancelled,
    DataError(String),

    // === VALIDATION MESSAGES ===
    ValidationFailed,
    ValidationError(String),

    // === FLEET MESSAGES ===
    VehicleStatusChanged(i64, String), // id, status
    InvalidVehicleStatus(String),
    CdlExpired(String), // driver name
    HoursRecorded(f64, f64), // total, overtime

    // === CALENDAR MESSAGES ===
    RouteDay(String),
    NoRouteDay(String),
    RoutesNotRecorded(String),

    // === REPORT HEADERS ===
    DashboardHeader,
    RouteSummaryHeader,
    DriverPerformanceHeader,
    FuelEfficiencyHeader,
    ForecastHeader(usize),
    NoMaintenanceDue,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleDatabase,
    ConfigModuleMaintenance,
    ConfigModuleTimeCard,
    PromptSelectModules,
    PromptDatabasePath,
    PromptOilChangeMiles,
    PromptBrakeMiles,
    PromptTireMiles,
    PromptInspectionDays,
    PromptReplacementAge,
    PromptRegularDailyHours,
    PromptMaxDailyHours,
    PromptRegularWeeklyHours,

    // === EXPORT MESSAGES ===
    ExportingData(String, String), // data set, format
    ExportingAllData,
    ExportCompleted(String),

    // === DATABASE MESSAGES ===
    DatabaseInitialized(String),
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    MigrationHistoryEntry(u32, String, String), // version, name, applied at
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
}
