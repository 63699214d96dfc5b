#[cfg(test)]
mod tests {
    use busbuddy::db::error::DbError;
    use busbuddy::db::fuel::{Fuel, FuelRecords};
    use busbuddy::db::vehicles::{Vehicle, Vehicles, STATUS_MAINTENANCE, STATUS_RETIRED};
    use busbuddy::libs::fleet::Fleet;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct VehicleTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for VehicleTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");
            VehicleTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    fn bus(number: &str) -> Vehicle {
        let mut vehicle = Vehicle::new(number);
        vehicle.year = Some(2018);
        vehicle.make = Some("Blue Bird".to_string());
        vehicle.model = Some("Vision".to_string());
        vehicle.seating_capacity = Some(72);
        vehicle.last_inspection = NaiveDate::from_ymd_opt(2024, 8, 1);
        vehicle
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_vehicle_crud(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::open(&ctx.db_path).unwrap();

        // Create
        let id = vehicles.insert(&bus("12")).unwrap();
        assert!(id > 0);

        // Read
        let fetched = vehicles.get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.bus_number(), "12");
        assert_eq!(fetched.make.as_deref(), Some("Blue Bird"));
        assert_eq!(fetched.last_inspection, NaiveDate::from_ymd_opt(2024, 8, 1));
        assert!(fetched.is_active());

        // Update
        let mut changed = fetched.clone();
        changed.seating_capacity = Some(66);
        changed.notes = Some("new seats".to_string());
        vehicles.update(&changed).unwrap();
        assert_eq!(vehicles.get_by_id(id).unwrap().unwrap(), changed);

        // Delete
        vehicles.delete(id).unwrap();
        assert!(vehicles.get_by_id(id).unwrap().is_none());
        assert_eq!(vehicles.count().unwrap(), 0);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_missing_rows_are_typed_errors(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::open(&ctx.db_path).unwrap();

        let err = vehicles.delete(999).unwrap_err();
        assert_eq!(err.downcast_ref::<DbError>(), Some(&DbError::NotFound { entity: "Vehicle", id: 999 }));

        let err = vehicles.update(&bus("7")).unwrap_err();
        assert_eq!(err.downcast_ref::<DbError>(), Some(&DbError::MissingId { entity: "Vehicle" }));

        let mut ghost = bus("7");
        ghost.id = Some(42);
        let err = vehicles.update(&ghost).unwrap_err();
        assert_eq!(err.downcast_ref::<DbError>(), Some(&DbError::NotFound { entity: "Vehicle", id: 42 }));
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_vehicle_with_fuel_cannot_be_deleted(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::open(&ctx.db_path).unwrap();
        let mut fuel = FuelRecords::open(&ctx.db_path).unwrap();

        let id = vehicles.insert(&bus("30")).unwrap();
        let fuel_id = fuel.insert(&Fuel::new(id, NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(), 40.0, 140.0)).unwrap();

        let err = vehicles.delete(id).unwrap_err();
        assert_eq!(err.downcast_ref::<DbError>(), Some(&DbError::InUse { entity: "Vehicle", id }));
        assert!(vehicles.get_by_id(id).unwrap().is_some());

        // Once the fuel history is gone the vehicle can be removed
        fuel.delete(fuel_id).unwrap();
        vehicles.delete(id).unwrap();
        assert!(vehicles.get_by_id(id).unwrap().is_none());
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_duplicate_number_rejected(ctx: &mut VehicleTestContext) {
        let mut vehicles = Vehicles::open(&ctx.db_path).unwrap();
        vehicles.insert(&bus("44")).unwrap();

        let err = vehicles.insert(&bus("44")).unwrap_err();
        assert!(matches!(err.downcast_ref::<DbError>(), Some(DbError::Duplicate { .. })));

        let mut fleet = Fleet::open(&ctx.db_path).unwrap();
        let problems = fleet.add_vehicle(&bus("44"), 2024).unwrap().unwrap_err();
        assert_eq!(problems.errors, vec!["Vehicle '44' already exists".to_string()]);
    }

    #[test_context(VehicleTestContext)]
    #[test]
    fn test_fleet_rules(ctx: &mut VehicleTestContext) {
        let mut fleet = Fleet::open(&ctx.db_path).unwrap();

        let too_long = fleet.add_vehicle(&bus("BUS-NUMBER-1"), 2024).unwrap();
        assert!(too_long.is_err());

        let first = fleet.add_vehicle(&bus("1"), 2024).unwrap().unwrap();
        let second = fleet.add_vehicle(&bus("2"), 2024).unwrap().unwrap();
        fleet.set_status(second, "maintenance").unwrap();

        let active: Vec<i64> = fleet.active().unwrap().iter().filter_map(|v| v.id).collect();
        assert_eq!(active, vec![first]);

        let in_shop = fleet.vehicles().list_by_status(STATUS_MAINTENANCE).unwrap();
        assert_eq!(in_shop.len(), 1);
        assert_eq!(in_shop[0].status, STATUS_MAINTENANCE);

        assert!(fleet.set_status(first, "Parked").is_err());
        fleet.set_status(first, STATUS_RETIRED).unwrap();
        assert!(fleet.active().unwrap().is_empty());
    }
}
