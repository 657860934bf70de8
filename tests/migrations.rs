#[cfg(test)]
mod tests {
    use dha::db::db::Db;
    use dha::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use dha::db::predefined::PredefinedHabits;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl MigrationTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("dha.db")
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.db_path()).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert_eq!(get_db_version(&db.conn).unwrap(), 3);
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_reports_version_zero(ctx: &mut MigrationTestContext) {
        let db = Db::new_without_migrations(ctx.db_path()).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), 0);
        assert!(needs_migration(&db.conn).unwrap());
        assert!(MigrationManager::new().get_migration_history(&db.conn).unwrap().is_empty());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut db = Db::new_without_migrations(ctx.db_path()).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut db.conn).unwrap();

        let history = manager.get_migration_history(&db.conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(version, _, _)| *version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(history[0].1, "create_habits_and_logs");
        assert!(manager.is_migration_applied(&db.conn, 2).unwrap());
        assert!(!manager.is_migration_applied(&db.conn, 4).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut db = Db::new_without_migrations(ctx.db_path()).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut db.conn).unwrap();
        manager.run_migrations(&mut db.conn).unwrap();
        drop(db);

        let db = Db::open(ctx.db_path()).unwrap();
        assert_eq!(manager.get_migration_history(&db.conn).unwrap().len(), 3);
        assert_eq!(PredefinedHabits::new(&db).list().unwrap().len(), 15);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_unique_index_keeps_latest_duplicate(ctx: &mut MigrationTestContext) {
        let mut db = Db::new_without_migrations(ctx.db_path()).unwrap();

        // a database from before the unique index existed
        db.conn
            .execute_batch(
                "CREATE TABLE migrations (
                    id INTEGER PRIMARY KEY,
                    version INTEGER NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );
                INSERT INTO migrations (version, name) VALUES (1, 'create_habits_and_logs'), (2, 'add_predefined_habits');
                CREATE TABLE habits (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    color TEXT NOT NULL DEFAULT '#3b82f6',
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                );
                CREATE TABLE habit_logs (
                    id INTEGER PRIMARY KEY,
                    habit_id INTEGER NOT NULL,
                    date DATE NOT NULL,
                    completed BOOLEAN NOT NULL DEFAULT TRUE,
                    note TEXT,
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (habit_id) REFERENCES habits(id) ON DELETE CASCADE
                );
                INSERT INTO habits (id, name) VALUES (1, 'Read');
                INSERT INTO habit_logs (id, habit_id, date, completed, note) VALUES
                    (1, 1, '2024-03-01', 1, 'first'),
                    (2, 1, '2024-03-01', 0, 'second'),
                    (3, 1, '2024-03-02', 1, NULL);",
            )
            .unwrap();

        MigrationManager::new().run_migrations(&mut db.conn).unwrap();

        let remaining: Vec<(i64, Option<String>)> = db
            .conn
            .prepare("SELECT id, note FROM habit_logs ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(remaining, vec![(2, Some("second".to_string())), (3, None)]);

        let duplicate = db.conn.execute(
            "INSERT INTO habit_logs (habit_id, date, completed) VALUES (1, '2024-03-02', 0)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
