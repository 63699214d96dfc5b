#[cfg(test)]
mod tests {
    use busbuddy::db::drivers::{Driver, Drivers};
    use busbuddy::db::fuel::{Fuel, FuelRecords};
    use busbuddy::db::maintenance::{Maintenance, MaintenanceRecords};
    use busbuddy::db::routes::{Route, RouteRun, Routes};
    use busbuddy::db::school_calendar::{SchoolCalendar, SchoolCalendars};
    use busbuddy::db::time_cards::{TimeCard, TimeCards};
    use busbuddy::db::vehicles::{Vehicle, Vehicles, STATUS_INACTIVE};
    use busbuddy::libs::details::{Dashboard, FleetDetails};
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct DetailsTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        vehicle_id: i64,
        driver_id: i64,
        route_id: i64,
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    impl TestContext for DetailsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");

            let mut vehicles = Vehicles::open(&db_path).unwrap();
            let vehicle_id = vehicles.insert(&Vehicle::new("5")).unwrap();
            let mut parked = Vehicle::new("6");
            parked.status = STATUS_INACTIVE.to_string();
            vehicles.insert(&parked).unwrap();

            let driver_id = Drivers::open(&db_path).unwrap().insert(&Driver::new("Lee Chen")).unwrap();

            let mut route = Route::new(date(3), "East");
            route.am = RouteRun {
                vehicle_id: Some(vehicle_id),
                begin_miles: Some(100.0),
                end_miles: Some(130.0),
                riders: Some(20),
                driver_id: Some(driver_id),
            };
            route.pm = RouteRun {
                vehicle_id: Some(vehicle_id),
                begin_miles: Some(130.0),
                end_miles: Some(150.0),
                riders: Some(20),
                driver_id: None,
            };
            let route_id = Routes::open(&db_path).unwrap().insert(&route).unwrap();

            DetailsTestContext {
                _temp_dir: temp_dir,
                db_path,
                vehicle_id,
                driver_id,
                route_id,
            }
        }
    }

    #[test_context(DetailsTestContext)]
    #[test]
    fn test_route_details_resolves_runs(ctx: &mut DetailsTestContext) {
        let details = FleetDetails::open(&ctx.db_path).unwrap();
        let route = details.route_details(ctx.route_id).unwrap().unwrap();

        assert_eq!(route.am.vehicle.as_ref().map(|v| v.vehicle_number.as_str()), Some("5"));
        assert_eq!(route.am.driver.as_ref().map(|d| d.name.as_str()), Some("Lee Chen"));
        assert!(route.pm.driver.is_none());
        assert_eq!(route.metrics.total_miles, 50.0);
        assert_eq!(route.metrics.total_riders, 40);
        assert_eq!(route.metrics.miles_per_rider, Some(1.25));

        assert!(details.route_details(ctx.route_id + 100).unwrap().is_none());
    }

    #[test_context(DetailsTestContext)]
    #[test]
    fn test_vehicle_details_totals(ctx: &mut DetailsTestContext) {
        let mut fuel = FuelRecords::open(&ctx.db_path).unwrap();
        let mut first = Fuel::new(ctx.vehicle_id, date(2), 30.0, 100.0);
        first.odometer = Some(1_000.0);
        let mut second = Fuel::new(ctx.vehicle_id, date(9), 25.0, 90.0);
        second.odometer = Some(1_200.0);
        fuel.insert(&first).unwrap();
        fuel.insert(&second).unwrap();

        let mut repair = Maintenance::new(ctx.vehicle_id, date(5), "Brakes");
        repair.cost = Some(400.0);
        MaintenanceRecords::open(&ctx.db_path).unwrap().insert(&repair).unwrap();

        let details = FleetDetails::open(&ctx.db_path).unwrap().vehicle_details(ctx.vehicle_id).unwrap().unwrap();
        assert_eq!(details.fuel.len(), 2);
        assert_eq!(details.total_gallons, 55.0);
        assert_eq!(details.total_fuel_cost, 190.0);
        assert_eq!(details.total_maintenance_cost, 400.0);
        assert_eq!(details.total_cost(), 590.0);
        assert_eq!(details.route_miles, 50.0);
        assert_eq!(details.efficiency.miles, 200.0);
        assert_eq!(details.efficiency.miles_per_gallon, Some(8.0));
    }

    #[test_context(DetailsTestContext)]
    #[test]
    fn test_driver_details_sums_hours(ctx: &mut DetailsTestContext) {
        let mut time_cards = TimeCards::open(&ctx.db_path).unwrap();
        for (day, hours, overtime) in [(3, 9.0, 1.0), (4, 7.5, 0.0)] {
            let mut card = TimeCard::new(ctx.driver_id, date(day));
            card.total_hours = Some(hours);
            card.overtime_hours = Some(overtime);
            time_cards.insert(&card).unwrap();
        }

        let details = FleetDetails::open(&ctx.db_path).unwrap().driver_details(ctx.driver_id).unwrap().unwrap();
        assert_eq!(details.time_cards.len(), 2);
        assert_eq!(details.routes.len(), 1);
        assert_eq!(details.total_hours, 16.5);
        assert_eq!(details.overtime_hours, 1.0);
    }

    #[test_context(DetailsTestContext)]
    #[test]
    fn test_dashboard_counts(ctx: &mut DetailsTestContext) {
        SchoolCalendars::open(&ctx.db_path).unwrap().insert(&SchoolCalendar::new(date(3), "School Day", true)).unwrap();

        let dashboard = FleetDetails::open(&ctx.db_path).unwrap().dashboard(date(3)).unwrap();
        assert_eq!(
            dashboard,
            Dashboard {
                date: Some(date(3)),
                vehicles: 2,
                active_vehicles: 1,
                drivers: 1,
                active_drivers: 1,
                routes: 1,
                activities: 0,
                fuel_records: 0,
                maintenance_records: 0,
                todays_routes: 1,
                route_day: true,
            }
        );
    }
}
