#[cfg(test)]
mod tests {
    use busbuddy::db::drivers::{Driver, Drivers};
    use busbuddy::db::fuel::{Fuel, FuelRecords};
    use busbuddy::db::vehicles::{Vehicle, Vehicles};
    use busbuddy::libs::export::{Cell, ExportData, ExportFormat, Exporter};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl ExportTestContext {
        fn output(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join(name)
        }
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");

            let mut vehicle = Vehicle::new("12");
            vehicle.make = Some("Thomas".to_string());
            let vehicle_id = Vehicles::open(&db_path).unwrap().insert(&vehicle).unwrap();
            Drivers::open(&db_path).unwrap().insert(&Driver::new("Ana Ruiz")).unwrap();
            FuelRecords::open(&db_path)
                .unwrap()
                .insert(&Fuel::new(vehicle_id, NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(), 40.0, 150.0))
                .unwrap();

            ExportTestContext { temp_dir, db_path }
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_default_file_name(ctx: &mut ExportTestContext) {
        let exporter = Exporter::with_database(ExportFormat::Json, None, &ctx.db_path);
        let name = exporter.output_path().to_string_lossy().into_owned();
        assert!(name.starts_with("busbuddy_export_"));
        assert!(name.ends_with(".json"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_vehicle_table(ctx: &mut ExportTestContext) {
        let exporter = Exporter::with_database(ExportFormat::Csv, Some(ctx.output("unused.csv")), &ctx.db_path);
        let table = exporter.table(ExportData::Vehicles).unwrap();

        assert_eq!(table.name, "Vehicles");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], Cell::Text("12".to_string()));
        assert_eq!(table.rows[0][3], Cell::Text("Thomas".to_string()));
        assert_eq!(table.rows[0][2], Cell::Empty);
        assert!(exporter.table(ExportData::All).is_err());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export(ctx: &mut ExportTestContext) {
        let output = ctx.output("fuel.csv");
        let exporter = Exporter::with_database(ExportFormat::Csv, Some(output.clone()), &ctx.db_path);

        let written = exporter.export(ExportData::Fuel).unwrap();
        assert_eq!(written, vec![output.clone()]);

        let content = fs::read_to_string(&output).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("ID,Date,Vehicle"));
        let row = lines.next().unwrap();
        assert!(row.contains("2024-09-03"));
        assert!(row.ends_with("40,150,3.75"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export_all_writes_one_file_per_set(ctx: &mut ExportTestContext) {
        let exporter = Exporter::with_database(ExportFormat::Csv, Some(ctx.output("fleet.csv")), &ctx.db_path);

        let written = exporter.export(ExportData::All).unwrap();
        assert_eq!(written.len(), 6);
        assert!(written.contains(&ctx.output("fleet_vehicles.csv")));
        assert!(written.contains(&ctx.output("fleet_time_cards.csv")));
        assert!(written.iter().all(|path| path.exists()));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_json_export_all(ctx: &mut ExportTestContext) {
        let output = ctx.output("fleet.json");
        Exporter::with_database(ExportFormat::Json, Some(output.clone()), &ctx.db_path)
            .export(ExportData::All)
            .unwrap();

        let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(document["export_date"].is_string());
        for key in ["vehicles", "drivers", "routes", "fuel", "maintenance", "time_cards"] {
            assert!(document[key].is_array(), "missing {}", key);
        }
        assert_eq!(document["vehicles"][0]["vehicle_number"], "12");
        assert_eq!(document["drivers"][0]["name"], "Ana Ruiz");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_excel_export(ctx: &mut ExportTestContext) {
        let output = ctx.output("fleet.xlsx");
        let written = Exporter::with_database(ExportFormat::Excel, Some(output.clone()), &ctx.db_path)
            .export(ExportData::All)
            .unwrap();

        assert_eq!(written, vec![output.clone()]);
        assert!(fs::metadata(&output).unwrap().len() > 0);
    }
}
