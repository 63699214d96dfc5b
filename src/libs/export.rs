//! Export of fleet records to CSV, JSON and Excel.
//!
//! Each data set is first turned into an [`ExportTable`] (headers plus typed
//! cells) for the tabular formats, or into plain serialized records for JSON.
//! Exporting `all` writes one JSON document, one Excel workbook with a sheet per
//! data set, or one CSV file per data set with the data set name appended to
//! the file stem.

use crate::{
    db::{drivers::Drivers, fuel::FuelRecords, maintenance::MaintenanceRecords, routes::Routes, time_cards::TimeCards, vehicles::Vehicles},
    libs::{
        analytics::RouteMetrics,
        config::Config,
        dates::{format_date, format_time},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    Vehicles,
    Drivers,
    Routes,
    Fuel,
    Maintenance,
    TimeCards,
    All,
}

impl ExportData {
    const SETS: [ExportData; 6] = [
        ExportData::Vehicles,
        ExportData::Drivers,
        ExportData::Routes,
        ExportData::Fuel,
        ExportData::Maintenance,
        ExportData::TimeCards,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportData::Vehicles => "vehicles",
            ExportData::Drivers => "drivers",
            ExportData::Routes => "routes",
            ExportData::Fuel => "fuel",
            ExportData::Maintenance => "maintenance",
            ExportData::TimeCards => "time_cards",
            ExportData::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn opt_text(value: &Option<String>) -> Self {
        value.as_ref().map_or(Cell::Empty, |v| Cell::Text(v.clone()))
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    fn id(value: Option<i64>) -> Self {
        value.map_or(Cell::Empty, |v| Cell::Number(v as f64))
    }

    fn to_csv(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(number) => number.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
    db_path: PathBuf,
}

impl Exporter {
    /// Exporter over the configured database.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Result<Self> {
        let db_path = Config::read()?.database_path()?;
        Ok(Self::with_database(format, output_path, db_path))
    }

    /// Without an output path the file is named `busbuddy_export_<timestamp>.<ext>`.
    pub fn with_database(format: ExportFormat, output_path: Option<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "busbuddy_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });
        Self {
            format,
            output_path,
            db_path: db_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the export and returns the files created.
    pub fn export(&self, data: ExportData) -> Result<Vec<PathBuf>> {
        let written = match (data, self.format) {
            (ExportData::All, ExportFormat::Json) => {
                msg_info!(Message::ExportingAllData);
                let mut document = serde_json::Map::new();
                document.insert("export_date".to_string(), Value::String(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()));
                for set in ExportData::SETS {
                    document.insert(set.name().to_string(), self.json(set)?);
                }
                self.write_json(&self.output_path, &Value::Object(document))?;
                vec![self.output_path.clone()]
            }
            (ExportData::All, ExportFormat::Excel) => {
                msg_info!(Message::ExportingAllData);
                let tables = ExportData::SETS.iter().map(|set| self.table(*set)).collect::<Result<Vec<_>>>()?;
                write_excel(&self.output_path, &tables)?;
                vec![self.output_path.clone()]
            }
            (ExportData::All, ExportFormat::Csv) => {
                msg_info!(Message::ExportingAllData);
                let mut written = Vec::new();
                for set in ExportData::SETS {
                    let path = self.suffixed_path(set.name());
                    write_csv(&path, &self.table(set)?)?;
                    written.push(path);
                }
                written
            }
            (set, ExportFormat::Json) => {
                self.write_json(&self.output_path, &self.json(set)?)?;
                vec![self.output_path.clone()]
            }
            (set, ExportFormat::Excel) => {
                write_excel(&self.output_path, &[self.table(set)?])?;
                vec![self.output_path.clone()]
            }
            (set, ExportFormat::Csv) => {
                write_csv(&self.output_path, &self.table(set)?)?;
                vec![self.output_path.clone()]
            }
        };

        for path in &written {
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        Ok(written)
    }

    /// Tabular form of one data set.
    pub fn table(&self, data: ExportData) -> Result<ExportTable> {
        let path = self.db_path.as_path();
        let table = match data {
            ExportData::Vehicles => ExportTable {
                name: "Vehicles",
                headers: vec!["ID", "Number", "Year", "Make", "Model", "Capacity", "VIN", "License", "Last Inspection", "Status", "Fuel Type"],
                rows: Vehicles::open(path)?
                    .list()?
                    .into_iter()
                    .map(|v| {
                        vec![
                            Cell::id(v.id),
                            Cell::text(v.vehicle_number),
                            Cell::number(v.year.map(f64::from)),
                            Cell::opt_text(&v.make),
                            Cell::opt_text(&v.model),
                            Cell::number(v.seating_capacity.map(f64::from)),
                            Cell::opt_text(&v.vin),
                            Cell::opt_text(&v.license_number),
                            Cell::text(format_date(v.last_inspection)),
                            Cell::text(v.status),
                            Cell::opt_text(&v.fuel_type),
                        ]
                    })
                    .collect(),
            },
            ExportData::Drivers => ExportTable {
                name: "Drivers",
                headers: vec!["ID", "Name", "Phone", "Email", "License", "CDL Expiration", "Trained", "Active"],
                rows: Drivers::open(path)?
                    .list()?
                    .into_iter()
                    .map(|d| {
                        vec![
                            Cell::id(d.id),
                            Cell::text(d.name),
                            Cell::opt_text(&d.phone),
                            Cell::opt_text(&d.email),
                            Cell::opt_text(&d.license_type),
                            Cell::text(format_date(d.cdl_expiration)),
                            Cell::text(yes_no(d.training_complete)),
                            Cell::text(yes_no(d.is_active)),
                        ]
                    })
                    .collect(),
            },
            ExportData::Routes => ExportTable {
                name: "Routes",
                headers: vec![
                    "ID", "Date", "Route", "AM Vehicle", "AM Driver", "AM Miles", "AM Riders", "PM Vehicle", "PM Driver", "PM Miles", "PM Riders",
                    "Total Miles", "Total Riders", "Miles/Rider",
                ],
                rows: Routes::open(path)?
                    .list()?
                    .into_iter()
                    .map(|r| {
                        let metrics = RouteMetrics::from_route(&r);
                        vec![
                            Cell::id(r.id),
                            Cell::text(r.date.format("%Y-%m-%d").to_string()),
                            Cell::text(r.route_name),
                            Cell::id(r.am.vehicle_id),
                            Cell::id(r.am.driver_id),
                            Cell::Number(metrics.am_miles),
                            Cell::Number(r.am.riders() as f64),
                            Cell::id(r.pm.vehicle_id),
                            Cell::id(r.pm.driver_id),
                            Cell::Number(metrics.pm_miles),
                            Cell::Number(r.pm.riders() as f64),
                            Cell::Number(metrics.total_miles),
                            Cell::Number(metrics.total_riders as f64),
                            Cell::number(metrics.miles_per_rider.map(round2)),
                        ]
                    })
                    .collect(),
            },
            ExportData::Fuel => ExportTable {
                name: "Fuel",
                headers: vec!["ID", "Date", "Vehicle", "Location", "Odometer", "Fuel Type", "Gallons", "Cost", "Cost/Gallon"],
                rows: FuelRecords::open(path)?
                    .list()?
                    .into_iter()
                    .map(|f| {
                        let per_gallon = f.cost_per_gallon().map(round2);
                        vec![
                            Cell::id(f.id),
                            Cell::text(f.fuel_date.format("%Y-%m-%d").to_string()),
                            Cell::Number(f.vehicle_id as f64),
                            Cell::opt_text(&f.location),
                            Cell::number(f.odometer),
                            Cell::opt_text(&f.fuel_type),
                            Cell::number(f.gallons),
                            Cell::number(f.cost),
                            Cell::number(per_gallon),
                        ]
                    })
                    .collect(),
            },
            ExportData::Maintenance => ExportTable {
                name: "Maintenance",
                headers: vec!["ID", "Date", "Vehicle", "Odometer", "Category", "Vendor", "Cost", "Notes"],
                rows: MaintenanceRecords::open(path)?
                    .list()?
                    .into_iter()
                    .map(|m| {
                        vec![
                            Cell::id(m.id),
                            Cell::text(m.date.format("%Y-%m-%d").to_string()),
                            Cell::Number(m.vehicle_id as f64),
                            Cell::number(m.odometer),
                            Cell::text(m.category),
                            Cell::opt_text(&m.vendor),
                            Cell::number(m.cost),
                            Cell::opt_text(&m.notes),
                        ]
                    })
                    .collect(),
            },
            ExportData::TimeCards => ExportTable {
                name: "Time Cards",
                headers: vec!["ID", "Driver", "Date", "Day Type", "AM In", "Lunch Out", "Lunch In", "PM Out", "Total Hours", "Overtime"],
                rows: TimeCards::open(path)?
                    .list()?
                    .into_iter()
                    .map(|c| {
                        vec![
                            Cell::id(c.id),
                            Cell::Number(c.driver_id as f64),
                            Cell::text(c.date.format("%Y-%m-%d").to_string()),
                            Cell::opt_text(&c.day_type),
                            Cell::text(format_time(c.am_clock_in)),
                            Cell::text(format_time(c.lunch_clock_out)),
                            Cell::text(format_time(c.lunch_clock_in)),
                            Cell::text(format_time(c.pm_clock_out)),
                            Cell::number(c.total_hours),
                            Cell::number(c.overtime_hours),
                        ]
                    })
                    .collect(),
            },
            ExportData::All => anyhow::bail!("`all` is not a single table"),
        };
        Ok(table)
    }

    /// Serialized records of one data set; routes carry their computed metrics.
    pub fn json(&self, data: ExportData) -> Result<Value> {
        let path = self.db_path.as_path();
        let value = match data {
            ExportData::Vehicles => serde_json::to_value(Vehicles::open(path)?.list()?)?,
            ExportData::Drivers => serde_json::to_value(Drivers::open(path)?.list()?)?,
            ExportData::Routes => Value::Array(
                Routes::open(path)?
                    .list()?
                    .into_iter()
                    .map(|route| {
                        let metrics = RouteMetrics::from_route(&route);
                        serde_json::json!({ "route": route, "metrics": metrics })
                    })
                    .collect(),
            ),
            ExportData::Fuel => serde_json::to_value(FuelRecords::open(path)?.list()?)?,
            ExportData::Maintenance => serde_json::to_value(MaintenanceRecords::open(path)?.list()?)?,
            ExportData::TimeCards => serde_json::to_value(TimeCards::open(path)?.list()?)?,
            ExportData::All => anyhow::bail!("`all` is not a single data set"),
        };
        Ok(value)
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        File::create(path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn suffixed_path(&self, suffix: &str) -> PathBuf {
        let stem = self.output_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "busbuddy_export".to_string());
        let extension = self
            .output_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.format.extension().to_string());
        self.output_path.with_file_name(format!("{}_{}.{}", stem, suffix, extension))
    }
}

fn write_csv(path: &Path, table: &ExportTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(Cell::to_csv))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_excel(path: &Path, tables: &[ExportTable]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.name)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let row_index = i as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_index, col as u16, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_index, col as u16, *number)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
        worksheet.autofit();
    }

    workbook.save(path)?;
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
