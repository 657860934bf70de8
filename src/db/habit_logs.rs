//! Habit log storage and the SQLite side of the upsert contract.

use super::db::Db;
use crate::libs::error::{DhaError, Result};
use crate::libs::habit_log::{HabitLog, LogStore};
use crate::libs::validation;
use chrono::{Local, NaiveDate};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT id, habit_id, date, completed, note, created_at FROM habit_logs";

const INSERT_LOG: &str = "INSERT INTO habit_logs (habit_id, date, completed, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";

const UPDATE_LOG: &str = "UPDATE habit_logs SET completed = ?2, note = ?3 WHERE id = ?1";

const HABIT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1)";

pub struct HabitLogs<'a> {
    conn: &'a Connection,
}

impl<'a> HabitLogs<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn from_conn(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: i64) -> Result<Option<HabitLog>> {
        let log = self
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_log)
            .optional()?;
        Ok(log)
    }

    /// Logs of one habit, newest date first.
    pub fn for_habit(&self, habit_id: i64) -> Result<Vec<HabitLog>> {
        self.query(&format!("{} WHERE habit_id = ?1 ORDER BY date DESC", SELECT_COLUMNS), params![habit_id])
    }

    pub fn for_date(&self, date: NaiveDate) -> Result<Vec<HabitLog>> {
        self.query(&format!("{} WHERE date = ?1 ORDER BY habit_id", SELECT_COLUMNS), params![date])
    }

    /// Logs of every habit between `start` and `end` inclusive, newest first.
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<HabitLog>> {
        validation::date_range(start, end)?;
        self.query(
            &format!("{} WHERE date >= ?1 AND date <= ?2 ORDER BY date DESC", SELECT_COLUMNS),
            params![start, end],
        )
    }

    /// Range query where either bound may be missing; a half-open range
    /// returns every log.
    pub fn all_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Vec<HabitLog>> {
        match (start, end) {
            (Some(start), Some(end)) => self.in_range(start, end),
            _ => self.all(),
        }
    }

    pub fn all(&self) -> Result<Vec<HabitLog>> {
        self.query(&format!("{} ORDER BY date DESC", SELECT_COLUMNS), [])
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<HabitLog>> {
        let mut stmt = self.conn.prepare(sql)?;
        let logs = stmt.query_map(params, map_log)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    fn fetch(&self, id: i64) -> Result<HabitLog> {
        self.get(id)?.ok_or_else(|| DhaError::not_found(format!("Habit log with ID {} not found", id)))
    }
}

impl LogStore for HabitLogs<'_> {
    fn habit_exists(&self, habit_id: i64) -> Result<bool> {
        Ok(self.conn.query_row(HABIT_EXISTS, params![habit_id], |row| row.get(0))?)
    }

    fn find_log(&self, habit_id: i64, date: NaiveDate) -> Result<Option<HabitLog>> {
        let log = self
            .conn
            .query_row(
                &format!("{} WHERE habit_id = ?1 AND date = ?2 LIMIT 1", SELECT_COLUMNS),
                params![habit_id, date],
                map_log,
            )
            .optional()?;
        Ok(log)
    }

    fn insert_log(&self, habit_id: i64, date: NaiveDate, completed: bool, note: Option<&str>) -> Result<HabitLog> {
        let inserted = self
            .conn
            .execute(INSERT_LOG, params![habit_id, date, completed, note, Local::now().naive_local()]);

        match inserted {
            Ok(_) => self.fetch(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => Err(
                DhaError::Conflict(format!("log for habit {} on {} already exists", habit_id, date)),
            ),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                Err(DhaError::not_found(format!("Habit with ID {} not found", habit_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_log(&self, id: i64, completed: bool, note: Option<&str>) -> Result<HabitLog> {
        let affected = self.conn.execute(UPDATE_LOG, params![id, completed, note])?;
        if affected == 0 {
            return Err(DhaError::not_found(format!("Habit log with ID {} not found", id)));
        }
        self.fetch(id)
    }
}

fn map_log(row: &Row) -> rusqlite::Result<HabitLog> {
    Ok(HabitLog {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: row.get(2)?,
        completed: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
    })
}
