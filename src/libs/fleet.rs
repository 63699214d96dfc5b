//! Vehicle rules and fleet-level operations.

use crate::db::error::DbError;
use crate::db::vehicles::{Vehicle, Vehicles, STATUSES};
use crate::libs::messages::Message;
use crate::libs::validation::{validate_vehicle, ValidationResult};
use crate::msg_error_anyhow;
use anyhow::Result;
use std::path::Path;

pub const MAX_VEHICLE_NUMBER_LENGTH: usize = 10;

/// A vehicle number is 1 to 10 ASCII letters, digits or dashes once trimmed.
pub fn is_valid_vehicle_number(number: &str) -> bool {
    let number = number.trim();
    !number.is_empty() && number.len() <= MAX_VEHICLE_NUMBER_LENGTH && number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Age in whole years as of `current_year`; `None` when the model year is unknown.
pub fn vehicle_age(vehicle: &Vehicle, current_year: i32) -> Option<i32> {
    vehicle.year.map(|year| (current_year - year).max(0))
}

pub fn active_vehicles(vehicles: &[Vehicle]) -> Vec<&Vehicle> {
    vehicles.iter().filter(|v| v.is_active()).collect()
}

pub fn average_age(vehicles: &[Vehicle], current_year: i32) -> Option<f64> {
    let ages: Vec<i32> = vehicles.iter().filter_map(|v| vehicle_age(v, current_year)).collect();
    if ages.is_empty() {
        return None;
    }
    Some(ages.iter().sum::<i32>() as f64 / ages.len() as f64)
}

pub struct Fleet {
    vehicles: Vehicles,
}

impl Fleet {
    pub fn new() -> Result<Self> {
        Ok(Self { vehicles: Vehicles::new()? })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            vehicles: Vehicles::open(path)?,
        })
    }

    /// Validates and stores a vehicle.
    ///
    /// Returns the validation problems instead of writing when there are any.
    /// A duplicate vehicle number is reported as a validation problem too.
    pub fn add_vehicle(&mut self, vehicle: &Vehicle, current_year: i32) -> Result<std::result::Result<i64, ValidationResult>> {
        let mut result = validate_vehicle(vehicle, current_year);
        if result.is_valid() && self.vehicles.get_by_number(&vehicle.vehicle_number)?.is_some() {
            result.add(DbError::Duplicate {
                entity: "Vehicle",
                value: vehicle.vehicle_number.trim().to_string(),
            }
            .to_string());
        }
        if !result.is_valid() {
            return Ok(Err(result));
        }
        Ok(Ok(self.vehicles.insert(vehicle)?))
    }

    pub fn active(&self) -> Result<Vec<Vehicle>> {
        let all = self.vehicles.list()?;
        Ok(active_vehicles(&all).into_iter().cloned().collect())
    }

    pub fn set_status(&mut self, id: i64, status: &str) -> Result<()> {
        let status = STATUSES
            .iter()
            .find(|s| s.eq_ignore_ascii_case(status.trim()))
            .ok_or_else(|| msg_error_anyhow!(Message::InvalidVehicleStatus(status.to_string())))?;
        self.vehicles.set_status(id, status)
    }

    pub fn vehicles(&self) -> &Vehicles {
        &self.vehicles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::vehicles::STATUS_RETIRED;

    #[test]
    fn test_vehicle_number_length() {
        assert!(is_valid_vehicle_number("12"));
        assert!(is_valid_vehicle_number(" BUS-07 "));
        assert!(is_valid_vehicle_number("ABCDEFGHIJ"));
        assert!(!is_valid_vehicle_number("ABCDEFGHIJK"));
        assert!(!is_valid_vehicle_number(""));
        assert!(!is_valid_vehicle_number("   "));
        assert!(!is_valid_vehicle_number("12 A"));
    }

    #[test]
    fn test_vehicle_age() {
        let mut vehicle = Vehicle::new("5");
        assert_eq!(vehicle_age(&vehicle, 2024), None);
        vehicle.year = Some(2010);
        assert_eq!(vehicle_age(&vehicle, 2024), Some(14));
        vehicle.year = Some(2025);
        assert_eq!(vehicle_age(&vehicle, 2024), Some(0));
    }

    #[test]
    fn test_active_filter_and_average_age() {
        let mut old = Vehicle::new("1");
        old.year = Some(2004);
        old.status = STATUS_RETIRED.to_string();
        let mut new = Vehicle::new("2");
        new.year = Some(2020);
        new.status = "active".to_string();
        let fleet = vec![old, new];

        let active = active_vehicles(&fleet);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].bus_number(), "2");
        assert_eq!(average_age(&fleet, 2024), Some(12.0));
        assert_eq!(average_age(&[], 2024), None);
    }
}
