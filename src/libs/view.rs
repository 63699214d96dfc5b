use crate::db::{
    activities::Activity, activity_schedules::ActivitySchedule, drivers::Driver, fuel::Fuel, maintenance::Maintenance, routes::Route,
    school_calendar::SchoolCalendar, time_cards::TimeCard, vehicles::Vehicle,
};
use crate::libs::analytics::{DriverPerformance, RouteSummary, VehicleEfficiency};
use crate::libs::dates::{format_date, format_time};
use crate::libs::details::{Dashboard, DriverDetails, RouteDetails, RunDetails, VehicleDetails};
use crate::libs::forecast::Prediction;
use crate::libs::time_entry::PeriodTotals;
use anyhow::Result;
use prettytable::{row, Table};
use std::collections::BTreeMap;
use std::fmt::Display;

pub struct View {}

impl View {
    pub fn vehicles(vehicles: &[Vehicle]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NUMBER", "YEAR", "MAKE", "MODEL", "SEATS", "STATUS", "LAST INSPECTION"]);
        for v in vehicles {
            table.add_row(row![
                opt(&v.id),
                v.vehicle_number,
                opt(&v.year),
                opt(&v.make),
                opt(&v.model),
                opt(&v.seating_capacity),
                v.status,
                format_date(v.last_inspection)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn drivers(drivers: &[Driver]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NAME", "PHONE", "LICENSE", "CDL EXPIRES", "TRAINED", "ACTIVE"]);
        for d in drivers {
            table.add_row(row![
                opt(&d.id),
                d.name,
                opt(&d.phone),
                opt(&d.license_type),
                format_date(d.cdl_expiration),
                yes_no(d.training_complete),
                yes_no(d.is_active)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn routes(routes: &[Route]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "ROUTE", "AM BUS", "AM MILES", "AM RIDERS", "PM BUS", "PM MILES", "PM RIDERS"]);
        for r in routes {
            table.add_row(row![
                opt(&r.id),
                r.date,
                r.route_name,
                opt(&r.am.vehicle_id),
                format!("{:.1}", r.am.miles()),
                r.am.riders(),
                opt(&r.pm.vehicle_id),
                format!("{:.1}", r.pm.miles()),
                r.pm.riders()
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn activities(activities: &[Activity]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "TYPE", "DESTINATION", "LEAVE", "EVENT", "RETURN", "REQUESTED BY", "BUS", "DRIVER"]);
        for a in activities {
            table.add_row(row![
                opt(&a.id),
                a.date,
                opt(&a.activity_type),
                a.destination,
                format_time(a.leave_time),
                format_time(a.event_time),
                format_time(a.return_time),
                opt(&a.requested_by),
                opt(&a.vehicle_id),
                opt(&a.driver_id)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn schedules(schedules: &[ActivitySchedule]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "TRIP", "DESTINATION", "LEAVE", "RETURN", "RIDERS", "BUS", "DRIVER"]);
        for s in schedules {
            table.add_row(row![
                opt(&s.id),
                s.date,
                opt(&s.trip_type),
                s.destination,
                format_time(s.leave_time),
                format_time(s.return_time),
                opt(&s.riders),
                opt(&s.vehicle_id),
                opt(&s.driver_id)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn fuel(records: &[Fuel]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "BUS", "LOCATION", "ODOMETER", "GALLONS", "COST", "$/GAL"]);
        for f in records {
            table.add_row(row![
                opt(&f.id),
                f.fuel_date,
                f.vehicle_id,
                opt(&f.location),
                decimal(f.odometer, 0),
                decimal(f.gallons, 2),
                money(f.cost),
                money(f.cost_per_gallon())
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn maintenance(records: &[Maintenance]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "BUS", "CATEGORY", "ODOMETER", "VENDOR", "COST"]);
        for m in records {
            table.add_row(row![
                opt(&m.id),
                m.date,
                m.vehicle_id,
                m.category,
                decimal(m.odometer, 0),
                opt(&m.vendor),
                money(m.cost)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn calendar(entries: &[SchoolCalendar]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "FROM", "TO", "CATEGORY", "DESCRIPTION", "ROUTES"]);
        for e in entries {
            table.add_row(row![opt(&e.id), e.date, e.last_day(), e.category, opt(&e.description), yes_no(e.route_needed)]);
        }
        table.printstd();
        Ok(())
    }

    pub fn time_cards(cards: &[TimeCard]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DRIVER", "DATE", "DAY", "IN", "LUNCH OUT", "LUNCH IN", "OUT", "HOURS", "OVERTIME"]);
        for c in cards {
            table.add_row(row![
                opt(&c.id),
                c.driver_id,
                c.date,
                opt(&c.day_type),
                format_time(c.am_clock_in),
                format_time(c.lunch_clock_out),
                format_time(c.lunch_clock_in),
                format_time(c.pm_clock_out),
                decimal(c.total_hours, 2),
                decimal(c.overtime_hours, 2)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn period_totals(periods: &[PeriodTotals]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["PERIOD START", "DAYS", "TOTAL", "REGULAR", "OVERTIME"]);
        for p in periods {
            table.add_row(row![
                p.period_start,
                p.days_worked,
                format!("{:.2}", p.total_hours),
                format!("{:.2}", p.regular_hours),
                format!("{:.2}", p.overtime_hours)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn predictions(predictions: &[Prediction]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["BUS", "PRIORITY", "SERVICE", "DUE", "REASON", "EST. COST"]);
        for p in predictions {
            table.add_row(row![
                p.vehicle_number,
                p.priority,
                p.kind,
                format_date(p.due_date),
                p.reason,
                format!("${:.2}", p.estimated_cost)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn route_summaries(summaries: &BTreeMap<String, RouteSummary>, overall: &RouteSummary) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ROUTE", "DAYS", "MILES", "RIDERS", "AVG MILES", "AVG RIDERS", "MILES/RIDER"]);
        for (name, summary) in summaries {
            table.add_row(summary_row(name, summary));
        }
        table.add_row(summary_row("TOTAL", overall));
        table.printstd();
        Ok(())
    }

    pub fn driver_performance(performance: &[DriverPerformance], names: &BTreeMap<i64, String>) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["DRIVER", "RUNS", "MILES", "RIDERS", "AVG RIDERS/RUN"]);
        for p in performance {
            let name = names.get(&p.driver_id).cloned().unwrap_or_else(|| p.driver_id.to_string());
            table.add_row(row![name, p.runs, format!("{:.1}", p.total_miles), p.total_riders, decimal(p.average_riders_per_run, 1)]);
        }
        table.printstd();
        Ok(())
    }

    pub fn efficiency(rows: &[(Vehicle, VehicleEfficiency)]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["BUS", "FILLS", "MILES", "GALLONS", "FUEL COST", "MPG", "$/MILE"]);
        for (vehicle, e) in rows {
            table.add_row(row![
                vehicle.vehicle_number,
                e.fill_count,
                format!("{:.0}", e.miles),
                format!("{:.1}", e.gallons),
                format!("${:.2}", e.total_cost),
                decimal(e.miles_per_gallon, 2),
                money(e.cost_per_mile)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn route_details(details: &RouteDetails) -> Result<()> {
        let route = &details.route;
        let mut table = Table::new();
        table.add_row(row!["", "AM", "PM"]);
        table.add_row(row!["Bus", run_vehicle(&details.am), run_vehicle(&details.pm)]);
        table.add_row(row!["Driver", run_driver(&details.am), run_driver(&details.pm)]);
        table.add_row(row!["Begin miles", decimal(route.am.begin_miles, 1), decimal(route.pm.begin_miles, 1)]);
        table.add_row(row!["End miles", decimal(route.am.end_miles, 1), decimal(route.pm.end_miles, 1)]);
        table.add_row(row!["Miles", format!("{:.1}", details.metrics.am_miles), format!("{:.1}", details.metrics.pm_miles)]);
        table.add_row(row!["Riders", route.am.riders(), route.pm.riders()]);
        println!("{} on {}", route.route_name, route.date);
        table.printstd();
        println!(
            "Total: {:.1} miles, {} riders, {} miles per rider",
            details.metrics.total_miles,
            details.metrics.total_riders,
            decimal(details.metrics.miles_per_rider, 2)
        );
        Ok(())
    }

    pub fn vehicle_details(details: &VehicleDetails) -> Result<()> {
        let v = &details.vehicle;
        let mut table = Table::new();
        table.add_row(row!["Vehicle", v.label()]);
        table.add_row(row!["Status", v.status]);
        table.add_row(row!["VIN", opt(&v.vin)]);
        table.add_row(row!["License", opt(&v.license_number)]);
        table.add_row(row!["Last inspection", format_date(v.last_inspection)]);
        table.add_row(row!["Route miles", format!("{:.1}", details.route_miles)]);
        table.add_row(row!["Fuel", format!("{:.1} gal, ${:.2}", details.total_gallons, details.total_fuel_cost)]);
        table.add_row(row!["MPG", decimal(details.efficiency.miles_per_gallon, 2)]);
        table.add_row(row!["Maintenance", format!("${:.2}", details.total_maintenance_cost)]);
        table.add_row(row!["Total cost", format!("${:.2}", details.total_cost())]);
        table.printstd();

        if !details.fuel.is_empty() {
            Self::fuel(&details.fuel)?;
        }
        if !details.maintenance.is_empty() {
            Self::maintenance(&details.maintenance)?;
        }
        Ok(())
    }

    pub fn driver_details(details: &DriverDetails) -> Result<()> {
        let d = &details.driver;
        let mut table = Table::new();
        table.add_row(row!["Driver", d.name]);
        table.add_row(row!["Phone", opt(&d.phone)]);
        table.add_row(row!["Email", opt(&d.email)]);
        table.add_row(row!["License", opt(&d.license_type)]);
        table.add_row(row!["CDL expires", format_date(d.cdl_expiration)]);
        table.add_row(row!["Routes driven", details.routes.len()]);
        table.add_row(row!["Hours", format!("{:.2}", details.total_hours)]);
        table.add_row(row!["Overtime", format!("{:.2}", details.overtime_hours)]);
        table.printstd();

        if !details.time_cards.is_empty() {
            Self::time_cards(&details.time_cards)?;
        }
        Ok(())
    }

    pub fn dashboard(dashboard: &Dashboard) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["Date", format_date(dashboard.date)]);
        table.add_row(row!["Vehicles", format!("{} ({} active)", dashboard.vehicles, dashboard.active_vehicles)]);
        table.add_row(row!["Drivers", format!("{} ({} active)", dashboard.drivers, dashboard.active_drivers)]);
        table.add_row(row!["Routes", dashboard.routes]);
        table.add_row(row!["Activities", dashboard.activities]);
        table.add_row(row!["Fuel records", dashboard.fuel_records]);
        table.add_row(row!["Maintenance records", dashboard.maintenance_records]);
        table.add_row(row!["Routes today", dashboard.todays_routes]);
        table.add_row(row!["Route day", yes_no(dashboard.route_day)]);
        table.printstd();
        Ok(())
    }
}

fn summary_row(name: &str, s: &RouteSummary) -> prettytable::Row {
    row![
        name,
        s.route_count,
        format!("{:.1}", s.total_miles),
        s.total_riders,
        decimal(s.average_miles_per_route, 1),
        decimal(s.average_riders_per_route, 1),
        decimal(s.miles_per_rider, 2)
    ]
}

fn run_vehicle(run: &RunDetails) -> String {
    run.vehicle.as_ref().map(Vehicle::label).unwrap_or_default()
}

fn run_driver(run: &RunDetails) -> String {
    run.driver.as_ref().map(|d| d.name.clone()).unwrap_or_default()
}

fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn decimal(value: Option<f64>, places: usize) -> String {
    value.map(|v| format!("{:.*}", places, v)).unwrap_or_default()
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("${:.2}", v)).unwrap_or_default()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
