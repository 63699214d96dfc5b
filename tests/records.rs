#[cfg(test)]
mod tests {
    use busbuddy::db::activities::{Activities, Activity};
    use busbuddy::db::activity_schedules::{ActivitySchedule, ActivitySchedules};
    use busbuddy::db::drivers::{Driver, Drivers};
    use busbuddy::db::fuel::{Fuel, FuelRecords};
    use busbuddy::db::maintenance::{Maintenance, MaintenanceRecords};
    use busbuddy::db::school_calendar::{SchoolCalendar, SchoolCalendars};
    use busbuddy::db::time_cards::{TimeCard, TimeCards};
    use busbuddy::db::vehicles::{Vehicle, Vehicles};
    use busbuddy::libs::time_entry::TimeEntryRules;
    use busbuddy::libs::validation::Validator;
    use chrono::{NaiveDate, NaiveTime};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RecordTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        vehicle_id: i64,
        driver_id: i64,
    }

    impl TestContext for RecordTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");

            let mut vehicle = Vehicle::new("21");
            vehicle.seating_capacity = Some(48);
            let vehicle_id = Vehicles::open(&db_path).unwrap().insert(&vehicle).unwrap();
            let driver_id = Drivers::open(&db_path).unwrap().insert(&Driver::new("Jo Park")).unwrap();

            RecordTestContext {
                _temp_dir: temp_dir,
                db_path,
                vehicle_id,
                driver_id,
            }
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_fuel_records(ctx: &mut RecordTestContext) {
        let mut fuel = FuelRecords::open(&ctx.db_path).unwrap();

        let mut fill = Fuel::new(ctx.vehicle_id, date(9, 3), 40.0, 140.0);
        fill.odometer = Some(52_000.0);
        fill.location = Some("District Depot".to_string());
        let id = fuel.insert(&fill).unwrap();

        let fetched = fuel.get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.odometer, Some(52_000.0));
        assert_eq!(fetched.cost_per_gallon(), Some(3.5));

        fuel.insert(&Fuel::new(ctx.vehicle_id, date(10, 1), 35.0, 120.0)).unwrap();
        assert_eq!(fuel.list_by_vehicle(ctx.vehicle_id).unwrap().len(), 2);
        assert_eq!(fuel.list_between(date(9, 1), date(9, 30)).unwrap().len(), 1);

        fuel.delete(id).unwrap();
        assert_eq!(fuel.count().unwrap(), 1);
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_fuel_filtered_by_vehicle_and_dates(ctx: &mut RecordTestContext) {
        let other_id = Vehicles::open(&ctx.db_path).unwrap().insert(&Vehicle::new("22")).unwrap();
        let mut fuel = FuelRecords::open(&ctx.db_path).unwrap();
        fuel.insert(&Fuel::new(ctx.vehicle_id, date(1, 5), 30.0, 100.0)).unwrap();
        let june = fuel.insert(&Fuel::new(ctx.vehicle_id, date(6, 12), 30.0, 105.0)).unwrap();
        fuel.insert(&Fuel::new(other_id, date(6, 14), 30.0, 110.0)).unwrap();

        let found = fuel.list_for_vehicle_between(ctx.vehicle_id, date(6, 1), date(6, 30)).unwrap();
        assert_eq!(found.iter().map(|f| f.id).collect::<Vec<_>>(), vec![Some(june)]);
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_fuel_for_missing_vehicle_fails_validation(ctx: &mut RecordTestContext) {
        let validator = Validator::open(&ctx.db_path).unwrap();
        let result = validator.fuel(&Fuel::new(404, date(9, 3), 10.0, 30.0), date(9, 4)).unwrap();
        assert!(result.errors.contains(&"Vehicle 404 does not exist".to_string()));
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_maintenance_records(ctx: &mut RecordTestContext) {
        let mut records = MaintenanceRecords::open(&ctx.db_path).unwrap();

        let mut oil = Maintenance::new(ctx.vehicle_id, date(3, 1), "Oil Change");
        oil.cost = Some(145.0);
        oil.odometer = Some(48_000.0);
        records.insert(&oil).unwrap();

        let mut brakes = Maintenance::new(ctx.vehicle_id, date(6, 15), "Brakes");
        brakes.vendor = Some("Valley Fleet".to_string());
        let brakes_id = records.insert(&brakes).unwrap();

        let latest = records.latest_for_vehicle(ctx.vehicle_id).unwrap().unwrap();
        assert_eq!(latest.id, Some(brakes_id));
        assert!(latest.is_category("brake"));
        assert!(!latest.is_category("oil"));

        let mut changed = latest.clone();
        changed.cost = Some(880.0);
        records.update(&changed).unwrap();
        assert_eq!(records.get_by_id(brakes_id).unwrap().unwrap().cost, Some(880.0));
        assert_eq!(records.list_by_vehicle(ctx.vehicle_id).unwrap().len(), 2);
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_activities_and_schedules(ctx: &mut RecordTestContext) {
        let mut activities = Activities::open(&ctx.db_path).unwrap();
        let mut activity = Activity::new(date(10, 4), "Science Museum");
        activity.leave_time = Some(time(8, 30));
        activity.return_time = Some(time(15, 0));
        activity.vehicle_id = Some(ctx.vehicle_id);
        let activity_id = activities.insert(&activity).unwrap();
        assert_eq!(activities.get_by_id(activity_id).unwrap().unwrap().leave_time, Some(time(8, 30)));
        assert_eq!(activities.list_between(date(10, 1), date(10, 31)).unwrap().len(), 1);

        let mut schedules = ActivitySchedules::open(&ctx.db_path).unwrap();
        let mut trip = ActivitySchedule::new(date(10, 11), "Away Game");
        trip.trip_type = Some("Sports Trip".to_string());
        trip.vehicle_id = Some(ctx.vehicle_id);
        trip.driver_id = Some(ctx.driver_id);
        trip.riders = Some(30);
        schedules.insert(&trip).unwrap();

        let mut spring_trip = trip.clone();
        spring_trip.date = date(4, 2);
        schedules.insert(&spring_trip).unwrap();
        assert_eq!(schedules.list_by_driver(ctx.driver_id).unwrap().len(), 2);
        let october = schedules.list_for_driver_between(ctx.driver_id, date(10, 1), date(10, 31)).unwrap();
        assert_eq!(october.len(), 1);
        assert_eq!(october[0].date, date(10, 11));

        let validator = Validator::open(&ctx.db_path).unwrap();
        assert!(validator.schedule(&trip).unwrap().is_valid());
        trip.riders = Some(60);
        let result = validator.schedule(&trip).unwrap();
        assert!(result.errors.iter().any(|e| e.contains("exceed the vehicle capacity of 48")));
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_calendar_route_days(ctx: &mut RecordTestContext) {
        let mut calendar = SchoolCalendars::open(&ctx.db_path).unwrap();

        calendar.insert(&SchoolCalendar::new(date(11, 20), "School Day", true)).unwrap();
        let mut thanksgiving = SchoolCalendar::new(date(11, 27), "Thanksgiving Break", false);
        thanksgiving.end_date = Some(date(11, 29));
        let break_id = calendar.insert(&thanksgiving).unwrap();

        assert!(calendar.is_route_day(date(11, 20)).unwrap());
        assert!(!calendar.is_route_day(date(11, 28)).unwrap());
        assert!(!calendar.is_route_day(date(12, 2)).unwrap());
        assert_eq!(calendar.entries_on(date(11, 29)).unwrap()[0].id, Some(break_id));
        assert_eq!(calendar.list_between(date(11, 21), date(11, 27)).unwrap().len(), 1);

        calendar.delete(break_id).unwrap();
        assert!(calendar.entries_on(date(11, 28)).unwrap().is_empty());
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_time_cards_with_totals(ctx: &mut RecordTestContext) {
        let rules = TimeEntryRules::default();
        let mut time_cards = TimeCards::open(&ctx.db_path).unwrap();

        // Monday through Friday, 9.5 hours each with a half hour lunch
        for day in 2..=6 {
            let mut card = TimeCard::new(ctx.driver_id, date(9, day));
            card.am_clock_in = Some(time(6, 0));
            card.lunch_clock_out = Some(time(11, 0));
            card.lunch_clock_in = Some(time(11, 30));
            card.pm_clock_out = Some(time(16, 0));
            card.route_am_clock_out = Some(time(6, 30));
            card.route_am_clock_in = Some(time(8, 0));
            assert!(rules.validate(&card).is_valid());
            rules.apply_totals(&mut card);
            time_cards.insert(&card).unwrap();
        }

        let cards = time_cards.list_for_driver_between(ctx.driver_id, date(9, 1), date(9, 30)).unwrap();
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].total_hours, Some(9.5));
        assert_eq!(cards[0].overtime_hours, Some(1.5));

        let weeks = rules.weekly_totals(&cards);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].period_start, date(9, 2));
        assert_eq!(weeks[0].days_worked, 5);
        assert_eq!(weeks[0].total_hours, 47.5);
        assert_eq!(weeks[0].overtime_hours, 7.5);
        assert_eq!(weeks[0].regular_hours, 40.0);
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_time_cards_between_dates_for_all_drivers(ctx: &mut RecordTestContext) {
        let second_driver = Drivers::open(&ctx.db_path).unwrap().insert(&Driver::new("Max Diaz")).unwrap();
        let mut time_cards = TimeCards::open(&ctx.db_path).unwrap();
        time_cards.insert(&TimeCard::new(ctx.driver_id, date(1, 5))).unwrap();
        time_cards.insert(&TimeCard::new(ctx.driver_id, date(6, 3))).unwrap();
        time_cards.insert(&TimeCard::new(second_driver, date(6, 4))).unwrap();

        let june = time_cards.list_between(date(6, 1), date(6, 30)).unwrap();
        assert_eq!(june.len(), 2);
        assert!(june.iter().all(|c| c.date >= date(6, 1)));
        assert_eq!(time_cards.list().unwrap().len(), 3);
    }

    #[test_context(RecordTestContext)]
    #[test]
    fn test_time_card_route_outside_day_rejected(ctx: &mut RecordTestContext) {
        let mut card = TimeCard::new(ctx.driver_id, date(9, 2));
        card.am_clock_in = Some(time(7, 0));
        card.pm_clock_out = Some(time(15, 0));
        card.route_pm_clock_out = Some(time(14, 30));
        card.route_pm_clock_in = Some(time(16, 0));

        let result = TimeEntryRules::default().validate(&card);
        assert_eq!(result.errors, vec!["PM route must fall within the working day".to_string()]);
    }
}
