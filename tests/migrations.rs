#[cfg(test)]
mod tests {
    use busbuddy::db::db::{initialize_database, Db};
    use busbuddy::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use busbuddy::db::vehicles::{Vehicle, Vehicles};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("busbuddy.db");
            MigrationTestContext { _temp_dir: temp_dir, db_path }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_empty_database_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Db::new_without_migrations(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        assert_eq!(history.len() as u32, manager.latest_version());

        // Recorded in order, each with a name and timestamp
        for (i, (version, name, applied_at)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
            assert!(!name.is_empty());
            assert!(!applied_at.is_empty());
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let version1 = get_db_version(&conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();
        let version2 = get_db_version(&conn).unwrap();

        assert_eq!(version1, version2);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len() as u32, version1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_data_survives_reopen(ctx: &mut MigrationTestContext) {
        Vehicles::open(&ctx.db_path).unwrap().insert(&Vehicle::new("8")).unwrap();

        let vehicles = Vehicles::open(&ctx.db_path).unwrap();
        assert_eq!(vehicles.get_by_number("8").unwrap().map(|v| v.vehicle_number), Some("8".to_string()));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_initialize_from_connection_string(ctx: &mut MigrationTestContext) {
        let connection_string = format!("Data Source={};Version=3;", ctx.db_path.display());
        let db = initialize_database(&connection_string, "System.Data.SQLite").unwrap();

        assert!(ctx.db_path.exists());
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[cfg(debug_assertions)]
    #[test_context(MigrationTestContext)]
    #[test]
    fn test_rollback_reapplies_forgotten_migrations(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        manager.rollback_to(&mut conn, 2).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 2);
        assert!(!manager.is_migration_applied(&conn, 3).unwrap());

        // Later migrations are written to be re-runnable
        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), manager.latest_version());
    }
}
