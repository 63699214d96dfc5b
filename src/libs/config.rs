//! Configuration management for BusBuddy.
//!
//! Settings live in `config.json` inside the platform data directory (see
//! [`DataStorage`]). A missing file is not an error: every section is optional
//! and falls back to its `Default`.
//!
//! ## Sections
//!
//! - **database**: location of the SQLite file
//! - **maintenance**: thresholds used by the maintenance forecast
//! - **timecard**: working-hour limits used when validating time cards
//!
//! The `BUSBUDDY_DB_PATH` environment variable (also read from a `.env` file)
//! overrides the configured database path.
//!
//! ```rust,no_run
//! use busbuddy::libs::config::Config;
//!
//! let config = Config::read()?;
//! let thresholds = config.maintenance.unwrap_or_default();
//! println!("Oil change every {} miles", thresholds.oil_change_miles);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "busbuddy.db";
pub const DB_PATH_ENV: &str = "BUSBUDDY_DB_PATH";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Thresholds for the predictive maintenance heuristics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MaintenanceConfig {
    /// Miles between oil changes
    pub oil_change_miles: f64,
    /// Miles between brake services
    pub brake_miles: f64,
    /// Miles between tire replacements
    pub tire_miles: f64,
    /// Days between annual inspections
    pub inspection_days: i64,
    /// Days before an inspection is due at which a warning is raised
    pub inspection_warning_days: i64,
    /// Vehicle age (years) that triggers a replacement review
    pub replacement_age_years: i32,
    /// Drop in miles per gallon, in percent, that flags a vehicle
    pub efficiency_drop_percent: f64,
}

/// Working-hour limits for time cards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeCardConfig {
    pub regular_daily_hours: f64,
    pub max_daily_hours: f64,
    pub regular_weekly_hours: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<MaintenanceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timecard: Option<TimeCardConfig>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        MaintenanceConfig {
            oil_change_miles: 5_000.0,
            brake_miles: 25_000.0,
            tire_miles: 40_000.0,
            inspection_days: 365,
            inspection_warning_days: 30,
            replacement_age_years: 15,
            efficiency_drop_percent: 15.0,
        }
    }
}

impl Default for TimeCardConfig {
    fn default() -> Self {
        TimeCardConfig {
            regular_daily_hours: 8.0,
            max_daily_hours: 16.0,
            regular_weekly_hours: 40.0,
        }
    }
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` when there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Resolves the database file: env override, then config, then the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Ok(path) = env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        match &self.database {
            Some(database) => Ok(database.path.clone()),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }

    /// Runs the interactive setup wizard, starting from the saved values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "database".to_string(),
                name: "Database".to_string(),
            },
            ConfigModule {
                key: "maintenance".to_string(),
                name: "Maintenance thresholds".to_string(),
            },
            ConfigModule {
                key: "timecard".to_string(),
                name: "Time card rules".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "database" => {
                    let default = config.database_path()?;
                    msg_print!(Message::ConfigModuleDatabase);
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default.display().to_string())
                        .interact_text()?;
                    config.database = Some(DatabaseConfig { path: PathBuf::from(path) });
                }
                "maintenance" => {
                    let default = config.maintenance.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleMaintenance);
                    config.maintenance = Some(MaintenanceConfig {
                        oil_change_miles: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptOilChangeMiles.to_string())
                            .default(default.oil_change_miles)
                            .interact_text()?,
                        brake_miles: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBrakeMiles.to_string())
                            .default(default.brake_miles)
                            .interact_text()?,
                        tire_miles: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTireMiles.to_string())
                            .default(default.tire_miles)
                            .interact_text()?,
                        inspection_days: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInspectionDays.to_string())
                            .default(default.inspection_days)
                            .interact_text()?,
                        inspection_warning_days: default.inspection_warning_days,
                        replacement_age_years: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptReplacementAge.to_string())
                            .default(default.replacement_age_years)
                            .interact_text()?,
                        efficiency_drop_percent: default.efficiency_drop_percent,
                    });
                }
                "timecard" => {
                    let default = config.timecard.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTimeCard);
                    config.timecard = Some(TimeCardConfig {
                        regular_daily_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRegularDailyHours.to_string())
                            .default(default.regular_daily_hours)
                            .interact_text()?,
                        max_daily_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxDailyHours.to_string())
                            .default(default.max_daily_hours)
                            .interact_text()?,
                        regular_weekly_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRegularWeeklyHours.to_string())
                            .default(default.regular_weekly_hours)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
