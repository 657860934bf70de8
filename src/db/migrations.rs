//! Database schema migration management and versioning.
//!
//! Every schema change is a numbered migration. Pending migrations run in
//! version order inside a single transaction and are recorded in the
//! `migrations` table, so a database is either fully upgraded or untouched.
//!
//! ```rust
//! use dha::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? >= 1);
//! # Ok::<(), dha::libs::error::DhaError>(())
//! ```

use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Built-in habit templates as (name, description, color), in display order.
pub const PREDEFINED_HABITS: [(&str, &str, &str); 15] = [
    ("Exercise", "Daily physical activity to stay healthy and fit", "#10b981"),
    ("Read", "Read books, articles, or educational content daily", "#3b82f6"),
    ("Meditate", "Practice mindfulness and meditation for mental clarity", "#8b5cf6"),
    ("Drink Water", "Stay hydrated by drinking enough water throughout the day", "#06b6d4"),
    ("Journal", "Write down thoughts, gratitude, or daily reflections", "#f59e0b"),
    ("Eat Healthy", "Make conscious choices about nutrition and meals", "#10b981"),
    ("Sleep Early", "Maintain a consistent sleep schedule for better rest", "#8b5cf6"),
    ("Learn Something New", "Dedicate time to learning a new skill or topic", "#3b82f6"),
    ("Practice Gratitude", "Express gratitude for the positive things in life", "#ec4899"),
    ("Stretch", "Do stretching exercises to improve flexibility", "#f97316"),
    ("Limit Screen Time", "Reduce time spent on phones, tablets, or computers", "#ef4444"),
    ("Connect with Family", "Spend quality time with family members", "#10b981"),
    ("Practice a Hobby", "Engage in activities you enjoy and are passionate about", "#8b5cf6"),
    ("Take a Walk", "Go for a walk to get fresh air and light exercise", "#06b6d4"),
    ("Plan Your Day", "Organize and plan tasks for better productivity", "#f59e0b"),
];

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of all schema migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: habits and their daily logs
        self.add_migration(1, "create_habits_and_logs", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS habits (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    color TEXT NOT NULL DEFAULT '#3b82f6',
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS habit_logs (
                    id INTEGER PRIMARY KEY,
                    habit_id INTEGER NOT NULL,
                    date DATE NOT NULL,
                    completed BOOLEAN NOT NULL DEFAULT TRUE,
                    note TEXT,
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (habit_id) REFERENCES habits(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits(created_at)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_habit_logs_habit_id ON habit_logs(habit_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_habit_logs_date ON habit_logs(date)", [])?;
            Ok(())
        });

        // Version 2: predefined habit templates with the built-in seed
        self.add_migration(2, "add_predefined_habits", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS predefined_habits (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    description TEXT,
                    color TEXT NOT NULL DEFAULT '#3b82f6',
                    display_order INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO predefined_habits (name, description, color, display_order) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (index, (name, description, color)) in PREDEFINED_HABITS.iter().enumerate() {
                stmt.execute(params![name, description, color, index as i64 + 1])?;
            }
            Ok(())
        });

        // Version 3: at most one log per habit and day
        self.add_migration(3, "unique_habit_log_per_day", |tx| {
            tx.execute(
                "DELETE FROM habit_logs WHERE id NOT IN (
                    SELECT MAX(id) FROM habit_logs GROUP BY habit_id, date
                )",
                [],
            )?;
            tx.execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_logs_habit_date ON habit_logs(habit_id, date)",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the database's current version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e.into());
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Applied migrations as (version, name, applied_at), oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(history)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

/// Current schema version; 0 for a database that was never migrated.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(get_db_version(conn)? < manager.latest_version())
}
