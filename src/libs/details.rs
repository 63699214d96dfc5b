//! Joined views over several tables: one record plus everything that refers to it.

use crate::db::activities::Activities;
use crate::db::drivers::{Driver, Drivers};
use crate::db::fuel::{Fuel, FuelRecords};
use crate::db::maintenance::{Maintenance, MaintenanceRecords};
use crate::db::routes::{Route, RouteRun, Routes};
use crate::db::school_calendar::SchoolCalendars;
use crate::db::time_cards::{TimeCard, TimeCards};
use crate::db::vehicles::{Vehicle, Vehicles};
use crate::libs::analytics::{vehicle_efficiency, vehicle_route_miles, RouteMetrics, VehicleEfficiency};
use crate::libs::config::Config;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct RunDetails {
    pub vehicle: Option<Vehicle>,
    pub driver: Option<Driver>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteDetails {
    pub route: Route,
    pub am: RunDetails,
    pub pm: RunDetails,
    pub metrics: RouteMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleDetails {
    pub vehicle: Vehicle,
    pub fuel: Vec<Fuel>,
    pub maintenance: Vec<Maintenance>,
    pub total_fuel_cost: f64,
    pub total_gallons: f64,
    pub total_maintenance_cost: f64,
    pub route_miles: f64,
    pub efficiency: VehicleEfficiency,
}

impl VehicleDetails {
    pub fn total_cost(&self) -> f64 {
        self.total_fuel_cost + self.total_maintenance_cost
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverDetails {
    pub driver: Driver,
    pub time_cards: Vec<TimeCard>,
    pub routes: Vec<Route>,
    pub total_hours: f64,
    pub overtime_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: Option<NaiveDate>,
    pub vehicles: i64,
    pub active_vehicles: usize,
    pub drivers: i64,
    pub active_drivers: usize,
    pub routes: i64,
    pub activities: i64,
    pub fuel_records: i64,
    pub maintenance_records: i64,
    pub todays_routes: usize,
    pub route_day: bool,
}

pub struct FleetDetails {
    vehicles: Vehicles,
    drivers: Drivers,
    routes: Routes,
    activities: Activities,
    fuel: FuelRecords,
    maintenance: MaintenanceRecords,
    time_cards: TimeCards,
    calendar: SchoolCalendars,
}

impl FleetDetails {
    pub fn new() -> Result<Self> {
        let path = Config::read()?.database_path()?;
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            vehicles: Vehicles::open(path)?,
            drivers: Drivers::open(path)?,
            routes: Routes::open(path)?,
            activities: Activities::open(path)?,
            fuel: FuelRecords::open(path)?,
            maintenance: MaintenanceRecords::open(path)?,
            time_cards: TimeCards::open(path)?,
            calendar: SchoolCalendars::open(path)?,
        })
    }

    pub fn route_details(&self, id: i64) -> Result<Option<RouteDetails>> {
        let Some(route) = self.routes.get_by_id(id)? else {
            return Ok(None);
        };
        let am = self.run_details(&route.am)?;
        let pm = self.run_details(&route.pm)?;
        let metrics = RouteMetrics::from_route(&route);
        Ok(Some(RouteDetails { route, am, pm, metrics }))
    }

    pub fn vehicle_details(&self, id: i64) -> Result<Option<VehicleDetails>> {
        let Some(vehicle) = self.vehicles.get_by_id(id)? else {
            return Ok(None);
        };
        let fuel = self.fuel.list_by_vehicle(id)?;
        let maintenance = self.maintenance.list_by_vehicle(id)?;
        let routes = self.routes.list_by_vehicle(id)?;

        Ok(Some(VehicleDetails {
            total_fuel_cost: fuel.iter().filter_map(|f| f.cost).sum(),
            total_gallons: fuel.iter().filter_map(|f| f.gallons).sum(),
            total_maintenance_cost: maintenance.iter().filter_map(|m| m.cost).sum(),
            route_miles: vehicle_route_miles(&routes, id),
            efficiency: vehicle_efficiency(id, &fuel),
            vehicle,
            fuel,
            maintenance,
        }))
    }

    pub fn driver_details(&self, id: i64) -> Result<Option<DriverDetails>> {
        let Some(driver) = self.drivers.get_by_id(id)? else {
            return Ok(None);
        };
        let time_cards = self.time_cards.list_by_driver(id)?;
        let routes = self.routes.list_by_driver(id)?;

        Ok(Some(DriverDetails {
            total_hours: time_cards.iter().filter_map(|c| c.total_hours).sum(),
            overtime_hours: time_cards.iter().filter_map(|c| c.overtime_hours).sum(),
            driver,
            time_cards,
            routes,
        }))
    }

    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        Ok(Dashboard {
            date: Some(today),
            vehicles: self.vehicles.count()?,
            active_vehicles: self.vehicles.list()?.iter().filter(|v| v.is_active()).count(),
            drivers: self.drivers.count()?,
            active_drivers: self.drivers.list_active()?.len(),
            routes: self.routes.count()?,
            activities: self.activities.count()?,
            fuel_records: self.fuel.count()?,
            maintenance_records: self.maintenance.count()?,
            todays_routes: self.routes.list_by_date(today)?.len(),
            route_day: self.calendar.is_route_day(today)?,
        })
    }

    fn run_details(&self, run: &RouteRun) -> Result<RunDetails> {
        let vehicle = match run.vehicle_id {
            Some(id) => self.vehicles.get_by_id(id)?,
            None => None,
        };
        let driver = match run.driver_id {
            Some(id) => self.drivers.get_by_id(id)?,
            None => None,
        };
        Ok(RunDetails { vehicle, driver })
    }
}
