#[cfg(test)]
mod tests {
    use busbuddy::db::drivers::{Driver, Drivers, LICENSE_CDL};
    use busbuddy::db::error::DbError;
    use busbuddy::db::routes::{Route, RouteRun, Routes};
    use busbuddy::db::vehicles::{Vehicle, Vehicles, STATUS_MAINTENANCE};
    use busbuddy::libs::validation::Validator;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RouteTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for RouteTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");
            RouteTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    fn seed(ctx: &RouteTestContext) -> (i64, i64) {
        let vehicle_id = Vehicles::open(&ctx.db_path).unwrap().insert(&Vehicle::new("12")).unwrap();
        let mut driver = Driver::new("Pat Lee");
        driver.license_type = Some(LICENSE_CDL.to_string());
        driver.cdl_expiration = Some(date(30));
        let driver_id = Drivers::open(&ctx.db_path).unwrap().insert(&driver).unwrap();
        (vehicle_id, driver_id)
    }

    fn run(vehicle_id: i64, driver_id: i64, begin: f64, end: f64, riders: i32) -> RouteRun {
        RouteRun {
            vehicle_id: Some(vehicle_id),
            begin_miles: Some(begin),
            end_miles: Some(end),
            riders: Some(riders),
            driver_id: Some(driver_id),
        }
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_driver_crud(ctx: &mut RouteTestContext) {
        let mut drivers = Drivers::open(&ctx.db_path).unwrap();

        let mut driver = Driver::new("Sam Ortiz");
        driver.phone = Some("555-123-4567".to_string());
        driver.training_complete = true;
        let id = drivers.insert(&driver).unwrap();

        let mut fetched = drivers.get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.name, "Sam Ortiz");
        assert!(fetched.training_complete);
        assert!(fetched.is_active);

        fetched.is_active = false;
        drivers.update(&fetched).unwrap();
        assert!(drivers.list_active().unwrap().is_empty());
        assert_eq!(drivers.list().unwrap().len(), 1);

        drivers.delete(id).unwrap();
        assert_eq!(drivers.count().unwrap(), 0);
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_cdl_expiry(ctx: &mut RouteTestContext) {
        let (_, driver_id) = seed(ctx);
        let driver = Drivers::open(&ctx.db_path).unwrap().get_by_id(driver_id).unwrap().unwrap();

        assert!(driver.is_cdl());
        assert!(!driver.cdl_expired(date(30)));
        assert!(driver.cdl_expired(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()));
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_route_runs_roundtrip(ctx: &mut RouteTestContext) {
        let (vehicle_id, driver_id) = seed(ctx);
        let mut routes = Routes::open(&ctx.db_path).unwrap();

        let mut route = Route::new(date(3), "North");
        route.am = run(vehicle_id, driver_id, 1000.0, 1042.5, 31);
        route.pm = run(vehicle_id, driver_id, 1042.5, 1080.0, 29);
        let id = routes.insert(&route).unwrap();

        let fetched = routes.get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.am, route.am);
        assert_eq!(fetched.pm, route.pm);
        assert_eq!(fetched.total_miles(), 80.0);
        assert_eq!(fetched.total_riders(), 60);

        routes.insert(&Route::new(date(10), "South")).unwrap();

        assert_eq!(routes.list_by_driver(driver_id).unwrap().len(), 1);
        assert_eq!(routes.list_by_vehicle(vehicle_id).unwrap().len(), 1);
        assert_eq!(routes.list_between(date(1), date(5)).unwrap().len(), 1);
        assert_eq!(routes.list_by_date(date(10)).unwrap()[0].route_name, "South");
        assert_eq!(routes.count().unwrap(), 2);
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_route_search_combines_filters(ctx: &mut RouteTestContext) {
        let (vehicle_id, driver_id) = seed(ctx);
        let spare_driver = Drivers::open(&ctx.db_path).unwrap().insert(&Driver::new("Kim Fox")).unwrap();
        let mut routes = Routes::open(&ctx.db_path).unwrap();

        let mut january = Route::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "North");
        january.am = run(vehicle_id, driver_id, 0.0, 10.0, 5);
        routes.insert(&january).unwrap();
        let mut early = Route::new(date(3), "North");
        early.am = run(vehicle_id, driver_id, 10.0, 20.0, 5);
        let early_id = routes.insert(&early).unwrap();
        let mut covered = Route::new(date(4), "North");
        covered.pm = run(vehicle_id, spare_driver, 20.0, 30.0, 5);
        let covered_id = routes.insert(&covered).unwrap();

        let september = Some((date(1), date(30)));
        let ids = |found: Vec<Route>| found.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(routes.search(september, Some(vehicle_id), None).unwrap()), vec![Some(early_id), Some(covered_id)]);
        assert_eq!(ids(routes.search(september, None, Some(driver_id)).unwrap()), vec![Some(early_id)]);
        assert_eq!(ids(routes.search(None, Some(vehicle_id), Some(spare_driver)).unwrap()), vec![Some(covered_id)]);
        assert_eq!(routes.search(None, Some(vehicle_id), None).unwrap().len(), 3);
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_assigned_driver_cannot_be_deleted(ctx: &mut RouteTestContext) {
        let (vehicle_id, driver_id) = seed(ctx);
        let mut routes = Routes::open(&ctx.db_path).unwrap();
        let mut route = Route::new(date(3), "North");
        route.am = run(vehicle_id, driver_id, 0.0, 10.0, 5);
        let route_id = routes.insert(&route).unwrap();

        let mut drivers = Drivers::open(&ctx.db_path).unwrap();
        let err = drivers.delete(driver_id).unwrap_err();
        assert_eq!(err.downcast_ref::<DbError>(), Some(&DbError::InUse { entity: "Driver", id: driver_id }));

        routes.delete(route_id).unwrap();
        drivers.delete(driver_id).unwrap();
    }

    #[test_context(RouteTestContext)]
    #[test]
    fn test_route_validation_checks_assignments(ctx: &mut RouteTestContext) {
        let (vehicle_id, driver_id) = seed(ctx);
        let validator = Validator::open(&ctx.db_path).unwrap();

        let mut route = Route::new(date(3), "North");
        route.am = run(vehicle_id, driver_id, 100.0, 140.0, 20);
        assert!(validator.route(&route).unwrap().is_valid());

        Vehicles::open(&ctx.db_path).unwrap().set_status(vehicle_id, STATUS_MAINTENANCE).unwrap();
        route.pm = run(vehicle_id, 999, 150.0, 140.0, 20);
        let result = validator.route(&route).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("not active")));
        assert!(result.errors.iter().any(|e| e.contains("Driver 999 does not exist")));
        assert!(result.errors.iter().any(|e| e.contains("PM ending miles")));
    }
}
