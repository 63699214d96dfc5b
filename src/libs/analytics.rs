//! Route and fuel analytics.
//!
//! Everything here is arithmetic over records already loaded from the
//! database: mileage from odometer readings, rider counts, and ratios between
//! them. Ratios with a zero denominator come back as `None` rather than
//! infinities.

use crate::db::fuel::Fuel;
use crate::db::routes::{Route, RouteRun};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub route_id: Option<i64>,
    pub route_name: String,
    pub date: NaiveDate,
    pub am_miles: f64,
    pub pm_miles: f64,
    pub total_miles: f64,
    pub total_riders: i32,
    pub miles_per_rider: Option<f64>,
}

impl RouteMetrics {
    pub fn from_route(route: &Route) -> Self {
        let total_miles = route.total_miles();
        let total_riders = route.total_riders();
        Self {
            route_id: route.id,
            route_name: route.route_name.clone(),
            date: route.date,
            am_miles: route.am.miles(),
            pm_miles: route.pm.miles(),
            total_miles,
            total_riders,
            miles_per_rider: ratio(total_miles, total_riders as f64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route_count: usize,
    pub total_miles: f64,
    pub total_riders: i64,
    pub average_miles_per_route: Option<f64>,
    pub average_riders_per_route: Option<f64>,
    pub miles_per_rider: Option<f64>,
}

pub fn summarize(routes: &[Route]) -> RouteSummary {
    let total_miles: f64 = routes.iter().map(Route::total_miles).sum();
    let total_riders: i64 = routes.iter().map(|r| r.total_riders() as i64).sum();
    let count = routes.len() as f64;
    RouteSummary {
        route_count: routes.len(),
        total_miles,
        total_riders,
        average_miles_per_route: ratio(total_miles, count),
        average_riders_per_route: ratio(total_riders as f64, count),
        miles_per_rider: ratio(total_miles, total_riders as f64),
    }
}

/// Per-route-name totals, e.g. all "North" runs across a month.
pub fn summarize_by_name(routes: &[Route]) -> BTreeMap<String, RouteSummary> {
    let mut groups: BTreeMap<String, Vec<Route>> = BTreeMap::new();
    for route in routes {
        groups.entry(route.route_name.clone()).or_default().push(route.clone());
    }
    groups.into_iter().map(|(name, group)| (name, summarize(&group))).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverPerformance {
    pub driver_id: i64,
    pub runs: usize,
    pub total_miles: f64,
    pub total_riders: i64,
    pub average_riders_per_run: Option<f64>,
}

/// Totals per driver over AM and PM runs, ordered by driver id.
pub fn driver_performance(routes: &[Route]) -> Vec<DriverPerformance> {
    let mut by_driver: BTreeMap<i64, DriverPerformance> = BTreeMap::new();
    let runs = routes.iter().flat_map(|r| [&r.am, &r.pm]);
    for run in runs {
        let Some(driver_id) = run.driver_id else {
            continue;
        };
        let entry = by_driver.entry(driver_id).or_insert_with(|| DriverPerformance {
            driver_id,
            ..Default::default()
        });
        entry.runs += 1;
        entry.total_miles += run.miles();
        entry.total_riders += run.riders() as i64;
    }
    by_driver
        .into_values()
        .map(|mut perf| {
            perf.average_riders_per_run = ratio(perf.total_riders as f64, perf.runs as f64);
            perf
        })
        .collect()
}

/// Miles driven by one vehicle on its route runs.
pub fn vehicle_route_miles(routes: &[Route], vehicle_id: i64) -> f64 {
    routes
        .iter()
        .flat_map(|r| [&r.am, &r.pm])
        .filter(|run: &&RouteRun| run.vehicle_id == Some(vehicle_id))
        .map(|run| run.miles())
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleEfficiency {
    pub vehicle_id: i64,
    pub fill_count: usize,
    pub miles: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub miles_per_gallon: Option<f64>,
    pub cost_per_mile: Option<f64>,
}

/// Fill-to-fill fuel economy for one vehicle.
///
/// Fills are ordered by odometer. Miles are the span between the first and last
/// reading; gallons are those pumped after the first fill, since the first tank
/// was burned before the measured span began. Fills without an odometer
/// reading still count toward cost.
pub fn vehicle_efficiency(vehicle_id: i64, fills: &[Fuel]) -> VehicleEfficiency {
    let own: Vec<&Fuel> = fills.iter().filter(|f| f.vehicle_id == vehicle_id).collect();
    let total_cost: f64 = own.iter().filter_map(|f| f.cost).sum();

    let mut measured: Vec<&Fuel> = own.iter().copied().filter(|f| f.odometer.is_some()).collect();
    measured.sort_by(|a, b| a.odometer.partial_cmp(&b.odometer).unwrap_or(std::cmp::Ordering::Equal));

    let (miles, gallons) = match (measured.first(), measured.last()) {
        (Some(first), Some(last)) if measured.len() > 1 => {
            let miles = last.odometer.unwrap_or(0.0) - first.odometer.unwrap_or(0.0);
            let gallons: f64 = measured.iter().skip(1).filter_map(|f| f.gallons).sum();
            (miles.max(0.0), gallons)
        }
        _ => (0.0, 0.0),
    };

    VehicleEfficiency {
        vehicle_id,
        fill_count: own.len(),
        miles,
        gallons,
        total_cost,
        miles_per_gallon: ratio(miles, gallons),
        cost_per_mile: ratio(total_cost, miles),
    }
}

/// `numerator / denominator`, or `None` when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn route(day: u32, name: &str, driver: i64, am: (f64, f64, i32), pm: (f64, f64, i32)) -> Route {
        let mut route = Route::new(date(day), name);
        route.am = RouteRun {
            vehicle_id: Some(1),
            begin_miles: Some(am.0),
            end_miles: Some(am.1),
            riders: Some(am.2),
            driver_id: Some(driver),
        };
        route.pm = RouteRun {
            vehicle_id: Some(1),
            begin_miles: Some(pm.0),
            end_miles: Some(pm.1),
            riders: Some(pm.2),
            driver_id: Some(driver),
        };
        route
    }

    #[test]
    fn test_summary_totals() {
        let routes = vec![
            route(3, "North", 1, (0.0, 30.0, 20), (30.0, 60.0, 20)),
            route(4, "North", 1, (60.0, 90.0, 10), (90.0, 110.0, 10)),
        ];
        let summary = summarize(&routes);
        assert_eq!(summary.route_count, 2);
        assert_eq!(summary.total_miles, 110.0);
        assert_eq!(summary.total_riders, 60);
        assert_eq!(summary.average_miles_per_route, Some(55.0));
        assert_eq!(summary.average_riders_per_route, Some(30.0));
    }

    #[test]
    fn test_zero_riders_has_no_ratio() {
        let routes = vec![route(3, "Empty", 1, (0.0, 12.0, 0), (12.0, 24.0, 0))];
        let metrics = RouteMetrics::from_route(&routes[0]);
        assert_eq!(metrics.total_miles, 24.0);
        assert_eq!(metrics.miles_per_rider, None);
        assert_eq!(summarize(&routes).miles_per_rider, None);
        assert_eq!(summarize(&[]), RouteSummary::default());
    }

    #[test]
    fn test_driver_performance() {
        let mut routes = vec![
            route(3, "North", 1, (0.0, 30.0, 20), (30.0, 60.0, 10)),
            route(3, "South", 2, (0.0, 10.0, 5), (10.0, 20.0, 5)),
        ];
        routes[1].pm.driver_id = Some(1);
        let perf = driver_performance(&routes);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].driver_id, 1);
        assert_eq!(perf[0].runs, 3);
        assert_eq!(perf[0].total_miles, 70.0);
        assert_eq!(perf[0].total_riders, 35);
        assert_eq!(perf[1].runs, 1);
        assert_eq!(perf[1].average_riders_per_run, Some(5.0));
    }

    #[test]
    fn test_fill_to_fill_efficiency() {
        let mut fills = Vec::new();
        for (odometer, gallons, cost) in [(10_000.0, 40.0, 140.0), (10_280.0, 35.0, 122.5), (10_560.0, 35.0, 122.5)] {
            let mut fuel = Fuel::new(7, date(3), gallons, cost);
            fuel.odometer = Some(odometer);
            fills.push(fuel);
        }
        fills.push(Fuel::new(8, date(3), 50.0, 175.0));

        let efficiency = vehicle_efficiency(7, &fills);
        assert_eq!(efficiency.fill_count, 3);
        assert_eq!(efficiency.miles, 560.0);
        assert_eq!(efficiency.gallons, 70.0);
        assert_eq!(efficiency.miles_per_gallon, Some(8.0));
        assert_eq!(efficiency.total_cost, 385.0);
        assert_eq!(efficiency.cost_per_mile, Some(385.0 / 560.0));
    }

    #[test]
    fn test_single_fill_has_no_economy() {
        let mut fuel = Fuel::new(7, date(3), 40.0, 140.0);
        fuel.odometer = Some(10_000.0);
        let efficiency = vehicle_efficiency(7, &[fuel]);
        assert_eq!(efficiency.miles_per_gallon, None);
        assert_eq!(efficiency.cost_per_mile, None);
    }
}
