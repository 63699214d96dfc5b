//! Field validation for every record type.
//!
//! The `validate_*` functions only look at the record itself and return a
//! [`ValidationResult`] listing every problem found, so a form can show all of
//! them at once. [`Validator`] adds the checks that need the database: whether
//! referenced vehicles and drivers exist and are in service.

use crate::db::activities::Activity;
use crate::db::activity_schedules::ActivitySchedule;
use crate::db::drivers::{Driver, Drivers, LICENSE_CDL, LICENSE_PASSENGER};
use crate::db::fuel::Fuel;
use crate::db::maintenance::Maintenance;
use crate::db::routes::{Route, RouteRun};
use crate::db::school_calendar::SchoolCalendar;
use crate::db::vehicles::{Vehicle, Vehicles, STATUSES};
use crate::libs::fleet::is_valid_vehicle_number;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use std::path::Path;

pub const MAX_SEATING_CAPACITY: i32 = 90;
pub const VIN_LENGTH: usize = 17;
pub const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Adds `message` when `condition` does not hold.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) {
        if !condition {
            self.add(message);
        }
    }
}

pub fn validate_vehicle(vehicle: &Vehicle, current_year: i32) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(
        is_valid_vehicle_number(&vehicle.vehicle_number),
        "Vehicle number must be 1 to 10 letters, digits or dashes",
    );
    if let Some(year) = vehicle.year {
        result.check(
            (1900..=current_year + 1).contains(&year),
            format!("Year must be between 1900 and {}", current_year + 1),
        );
    }
    if let Some(capacity) = vehicle.seating_capacity {
        result.check(
            (1..=MAX_SEATING_CAPACITY).contains(&capacity),
            format!("Seating capacity must be between 1 and {}", MAX_SEATING_CAPACITY),
        );
    }
    if let Some(vin) = non_blank(&vehicle.vin) {
        result.check(
            vin.len() == VIN_LENGTH && vin.chars().all(|c| c.is_ascii_alphanumeric()),
            format!("VIN must be {} letters or digits", VIN_LENGTH),
        );
    }
    result.check(
        STATUSES.iter().any(|s| s.eq_ignore_ascii_case(vehicle.status.trim())),
        format!("Status must be one of: {}", STATUSES.join(", ")),
    );
    result
}

pub fn validate_driver(driver: &Driver) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(!driver.name.trim().is_empty(), "Driver name is required");
    if let Some(email) = non_blank(&driver.email) {
        result.check(email.contains('@'), "Email address must contain @");
    }
    if let Some(phone) = non_blank(&driver.phone) {
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        result.check(digits == PHONE_DIGITS, format!("Phone number must have {} digits", PHONE_DIGITS));
    }
    if let Some(license) = non_blank(&driver.license_type) {
        result.check(
            license.eq_ignore_ascii_case(LICENSE_CDL) || license.eq_ignore_ascii_case(LICENSE_PASSENGER),
            format!("License type must be {} or {}", LICENSE_CDL, LICENSE_PASSENGER),
        );
    }
    result
}

pub fn validate_route(route: &Route) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(!route.route_name.trim().is_empty(), "Route name is required");
    validate_run(&mut result, "AM", &route.am);
    validate_run(&mut result, "PM", &route.pm);
    result
}

fn validate_run(result: &mut ValidationResult, label: &str, run: &RouteRun) {
    if let (Some(begin), Some(end)) = (run.begin_miles, run.end_miles) {
        result.check(end >= begin, format!("{} ending miles cannot be less than beginning miles", label));
    }
    for miles in [run.begin_miles, run.end_miles].into_iter().flatten() {
        result.check(miles >= 0.0, format!("{} mileage cannot be negative", label));
    }
    if let Some(riders) = run.riders {
        result.check(riders >= 0, format!("{} riders cannot be negative", label));
    }
    if run.begin_miles.is_some() || run.end_miles.is_some() {
        result.check(run.vehicle_id.is_some(), format!("{} run with mileage needs a vehicle", label));
    }
}

pub fn validate_fuel(fuel: &Fuel, today: NaiveDate) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(fuel.vehicle_id > 0, "A vehicle is required");
    match fuel.gallons {
        Some(gallons) => result.check(gallons > 0.0, "Fuel amount must be greater than zero"),
        None => result.add("Fuel amount is required"),
    }
    if let Some(cost) = fuel.cost {
        result.check(cost >= 0.0, "Fuel cost cannot be negative");
    }
    if let Some(odometer) = fuel.odometer {
        result.check(odometer >= 0.0, "Odometer reading cannot be negative");
    }
    result.check(fuel.fuel_date <= today, "Fuel date cannot be in the future");
    result
}

pub fn validate_maintenance(record: &Maintenance, today: NaiveDate) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(record.vehicle_id > 0, "A vehicle is required");
    result.check(!record.category.trim().is_empty(), "Maintenance category is required");
    if let Some(cost) = record.cost {
        result.check(cost >= 0.0, "Repair cost cannot be negative");
    }
    if let Some(odometer) = record.odometer {
        result.check(odometer >= 0.0, "Odometer reading cannot be negative");
    }
    result.check(record.date <= today, "Maintenance date cannot be in the future");
    result
}

pub fn validate_activity(activity: &Activity) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(!activity.destination.trim().is_empty(), "Destination is required");
    check_trip_times(&mut result, activity.leave_time, activity.event_time, activity.return_time);
    result
}

pub fn validate_schedule(schedule: &ActivitySchedule) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(!schedule.destination.trim().is_empty(), "Destination is required");
    check_trip_times(&mut result, schedule.leave_time, schedule.event_time, schedule.return_time);
    if let Some(riders) = schedule.riders {
        result.check(riders >= 0, "Riders cannot be negative");
    }
    result
}

pub fn validate_calendar(entry: &SchoolCalendar) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.check(!entry.category.trim().is_empty(), "Category is required");
    if let Some(end) = entry.end_date {
        result.check(end >= entry.date, "End date cannot be before the start date");
    }
    result
}

fn check_trip_times(result: &mut ValidationResult, leave: Option<NaiveTime>, event: Option<NaiveTime>, ret: Option<NaiveTime>) {
    if let (Some(leave), Some(event)) = (leave, event) {
        result.check(leave <= event, "Leave time must be before the event time");
    }
    if let (Some(event), Some(ret)) = (event, ret) {
        result.check(event <= ret, "Return time must be after the event time");
    }
    if let (Some(leave), Some(ret)) = (leave, ret) {
        result.check(leave <= ret, "Return time must be after the leave time");
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validation that consults the database for referenced vehicles and drivers.
pub struct Validator {
    vehicles: Vehicles,
    drivers: Drivers,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            vehicles: Vehicles::new()?,
            drivers: Drivers::new()?,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            vehicles: Vehicles::open(path.as_ref())?,
            drivers: Drivers::open(path.as_ref())?,
        })
    }

    /// Adds an error unless the vehicle exists and is in active service.
    pub fn check_vehicle(&self, result: &mut ValidationResult, vehicle_id: Option<i64>) -> Result<()> {
        let Some(id) = vehicle_id else {
            return Ok(());
        };
        match self.vehicles.get_by_id(id)? {
            Some(vehicle) if vehicle.is_active() => {}
            Some(vehicle) => result.add(format!("Vehicle #{} is not active ({})", vehicle.vehicle_number, vehicle.status)),
            None => result.add(format!("Vehicle {} does not exist", id)),
        }
        Ok(())
    }

    /// Adds an error unless the driver exists and is active.
    pub fn check_driver(&self, result: &mut ValidationResult, driver_id: Option<i64>) -> Result<()> {
        let Some(id) = driver_id else {
            return Ok(());
        };
        match self.drivers.get_by_id(id)? {
            Some(driver) if driver.is_active => {}
            Some(driver) => result.add(format!("Driver {} is not active", driver.name)),
            None => result.add(format!("Driver {} does not exist", id)),
        }
        Ok(())
    }

    /// Fuel may be logged for a vehicle in the shop, so only existence is required.
    pub fn fuel(&self, fuel: &Fuel, today: NaiveDate) -> Result<ValidationResult> {
        let mut result = validate_fuel(fuel, today);
        if fuel.vehicle_id > 0 && self.vehicles.get_by_id(fuel.vehicle_id)?.is_none() {
            result.add(format!("Vehicle {} does not exist", fuel.vehicle_id));
        }
        Ok(result)
    }

    pub fn maintenance(&self, record: &Maintenance, today: NaiveDate) -> Result<ValidationResult> {
        let mut result = validate_maintenance(record, today);
        if record.vehicle_id > 0 && self.vehicles.get_by_id(record.vehicle_id)?.is_none() {
            result.add(format!("Vehicle {} does not exist", record.vehicle_id));
        }
        Ok(result)
    }

    pub fn route(&self, route: &Route) -> Result<ValidationResult> {
        let mut result = validate_route(route);
        for run in [&route.am, &route.pm] {
            self.check_vehicle(&mut result, run.vehicle_id)?;
            self.check_driver(&mut result, run.driver_id)?;
        }
        Ok(result)
    }

    pub fn activity(&self, activity: &Activity) -> Result<ValidationResult> {
        let mut result = validate_activity(activity);
        self.check_vehicle(&mut result, activity.vehicle_id)?;
        self.check_driver(&mut result, activity.driver_id)?;
        Ok(result)
    }

    pub fn schedule(&self, schedule: &ActivitySchedule) -> Result<ValidationResult> {
        let mut result = validate_schedule(schedule);
        self.check_vehicle(&mut result, schedule.vehicle_id)?;
        self.check_driver(&mut result, schedule.driver_id)?;
        if let (Some(vehicle_id), Some(riders)) = (schedule.vehicle_id, schedule.riders) {
            if let Some(capacity) = self.vehicles.get_by_id(vehicle_id)?.and_then(|v| v.seating_capacity) {
                result.check(riders <= capacity, format!("{} riders exceed the vehicle capacity of {}", riders, capacity));
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_vehicle_rules() {
        let mut vehicle = Vehicle::new("17");
        vehicle.year = Some(2019);
        vehicle.seating_capacity = Some(72);
        assert!(validate_vehicle(&vehicle, 2024).is_valid());

        vehicle.year = Some(2030);
        vehicle.seating_capacity = Some(0);
        vehicle.vin = Some("SHORT".to_string());
        vehicle.status = "Parked".to_string();
        let result = validate_vehicle(&vehicle, 2024);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_driver_rules() {
        let mut driver = Driver::new("Pat Lee");
        driver.phone = Some("(555) 123-4567".to_string());
        driver.email = Some("pat@district.org".to_string());
        driver.license_type = Some("cdl".to_string());
        assert!(validate_driver(&driver).is_valid());

        // Local district mail hosts have no dot
        driver.email = Some("pat@district".to_string());
        assert!(validate_driver(&driver).is_valid());

        driver.email = Some("pat.district.org".to_string());
        driver.phone = Some("555-1234".to_string());
        driver.license_type = Some("Motorcycle".to_string());
        assert_eq!(validate_driver(&driver).errors.len(), 3);

        assert!(!validate_driver(&Driver::new("  ")).is_valid());
    }

    #[test]
    fn test_route_rejects_reversed_odometer() {
        let mut route = Route::new(date(2024, 9, 3), "East");
        route.am = RouteRun {
            vehicle_id: Some(1),
            begin_miles: Some(500.0),
            end_miles: Some(480.0),
            riders: Some(10),
            driver_id: Some(1),
        };
        let result = validate_route(&route);
        assert_eq!(result.errors, vec!["AM ending miles cannot be less than beginning miles".to_string()]);
    }

    #[test]
    fn test_route_mileage_needs_vehicle() {
        let mut route = Route::new(date(2024, 9, 3), "East");
        route.pm.begin_miles = Some(10.0);
        assert!(!validate_route(&route).is_valid());
    }

    #[test]
    fn test_fuel_date_cannot_be_in_future() {
        let today = date(2024, 9, 3);
        let fuel = Fuel::new(1, date(2024, 9, 4), 30.0, 105.0);
        let result = validate_fuel(&fuel, today);
        assert_eq!(result.errors, vec!["Fuel date cannot be in the future".to_string()]);

        let empty = Fuel::new(1, today, 0.0, 0.0);
        assert!(!validate_fuel(&empty, today).is_valid());
    }

    #[test]
    fn test_trip_time_ordering() {
        let mut activity = Activity::new(date(2024, 10, 1), "Stadium");
        activity.leave_time = NaiveTime::from_hms_opt(15, 0, 0);
        activity.event_time = NaiveTime::from_hms_opt(17, 0, 0);
        activity.return_time = NaiveTime::from_hms_opt(16, 0, 0);
        assert!(!validate_activity(&activity).is_valid());

        activity.return_time = NaiveTime::from_hms_opt(21, 30, 0);
        assert!(validate_activity(&activity).is_valid());
    }

    #[test]
    fn test_calendar_end_before_start() {
        let mut entry = SchoolCalendar::new(date(2024, 12, 20), "Christmas Break", false);
        entry.end_date = Some(date(2024, 12, 19));
        assert!(!validate_calendar(&entry).is_valid());
    }
}
