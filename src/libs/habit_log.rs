//! Daily completion records and the upsert-by-date write path.
//!
//! A habit has at most one log per calendar day. [`upsert_log`] is the only
//! write path for logs: it updates the day's record when one exists and
//! creates it otherwise, reporting which branch ran so callers can word their
//! output accordingly.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dha::libs::habit_log::{upsert_log, LogEntry, MemoryLogStore};
//!
//! let store = MemoryLogStore::with_habits([7]);
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!
//! let first = upsert_log(&store, &LogEntry::new(7, date, true))?;
//! assert!(first.was_created);
//!
//! let second = upsert_log(&store, &LogEntry::new(7, date, false).note("felt tired"))?;
//! assert!(!second.was_created);
//! assert_eq!(second.record.id, first.record.id);
//! # Ok::<(), dha::libs::error::DhaError>(())
//! ```

use super::error::{DhaError, Result};
use super::validation;
use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One day's completion state for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

/// The arguments of a single upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    pub note: Option<String>,
}

impl LogEntry {
    pub fn new(habit_id: i64, date: NaiveDate, completed: bool) -> Self {
        Self {
            habit_id,
            date,
            completed,
            note: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub record: HabitLog,
    pub was_created: bool,
}

/// Storage operations the upsert relies on.
///
/// `insert_log` must report a duplicate `(habit_id, date)` as
/// [`DhaError::Conflict`] and a missing habit as [`DhaError::NotFound`].
pub trait LogStore {
    fn habit_exists(&self, habit_id: i64) -> Result<bool>;
    fn find_log(&self, habit_id: i64, date: NaiveDate) -> Result<Option<HabitLog>>;
    fn insert_log(&self, habit_id: i64, date: NaiveDate, completed: bool, note: Option<&str>) -> Result<HabitLog>;
    fn update_log(&self, id: i64, completed: bool, note: Option<&str>) -> Result<HabitLog>;
}

/// Creates or updates the log for `(habit_id, date)`.
///
/// The stored record always ends up with exactly the entry's completion flag
/// and note, so an entry without a note clears a previous one. An insert that
/// loses a race against a concurrent writer is applied as an update instead.
pub fn upsert_log<S: LogStore + ?Sized>(store: &S, entry: &LogEntry) -> Result<UpsertOutcome> {
    let note = validation::note(entry.note.as_deref())?;

    if !store.habit_exists(entry.habit_id)? {
        return Err(DhaError::not_found(format!("Habit with ID {} not found", entry.habit_id)));
    }

    if let Some(existing) = store.find_log(entry.habit_id, entry.date)? {
        let record = store.update_log(existing.id, entry.completed, note.as_deref())?;
        return Ok(UpsertOutcome { record, was_created: false });
    }

    match store.insert_log(entry.habit_id, entry.date, entry.completed, note.as_deref()) {
        Ok(record) => Ok(UpsertOutcome { record, was_created: true }),
        Err(DhaError::Conflict(reason)) => {
            debug!(habit_id = entry.habit_id, date = %entry.date, "insert conflicted, retrying as update");
            let existing = store.find_log(entry.habit_id, entry.date)?.ok_or(DhaError::Conflict(reason))?;
            let record = store.update_log(existing.id, entry.completed, note.as_deref())?;
            Ok(UpsertOutcome { record, was_created: false })
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    habits: BTreeSet<i64>,
    logs: Vec<HabitLog>,
    next_id: i64,
}

/// A [`LogStore`] held in memory, with the same uniqueness rules as SQLite.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    state: Mutex<MemoryState>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_habits(ids: impl IntoIterator<Item = i64>) -> Self {
        let store = Self::new();
        for id in ids {
            store.add_habit(id);
        }
        store
    }

    pub fn add_habit(&self, habit_id: i64) {
        self.state.lock().habits.insert(habit_id);
    }

    /// Removes the habit together with its logs.
    pub fn remove_habit(&self, habit_id: i64) {
        let mut state = self.state.lock();
        state.habits.remove(&habit_id);
        state.logs.retain(|log| log.habit_id != habit_id);
    }

    pub fn logs(&self) -> Vec<HabitLog> {
        self.state.lock().logs.clone()
    }
}

impl LogStore for MemoryLogStore {
    fn habit_exists(&self, habit_id: i64) -> Result<bool> {
        Ok(self.state.lock().habits.contains(&habit_id))
    }

    fn find_log(&self, habit_id: i64, date: NaiveDate) -> Result<Option<HabitLog>> {
        let state = self.state.lock();
        Ok(state.logs.iter().find(|log| log.habit_id == habit_id && log.date == date).cloned())
    }

    fn insert_log(&self, habit_id: i64, date: NaiveDate, completed: bool, note: Option<&str>) -> Result<HabitLog> {
        let mut state = self.state.lock();
        if !state.habits.contains(&habit_id) {
            return Err(DhaError::not_found(format!("Habit with ID {} not found", habit_id)));
        }
        if state.logs.iter().any(|log| log.habit_id == habit_id && log.date == date) {
            return Err(DhaError::Conflict(format!("log for habit {} on {} already exists", habit_id, date)));
        }
        state.next_id += 1;
        let log = HabitLog {
            id: state.next_id,
            habit_id,
            date,
            completed,
            note: note.map(str::to_string),
            created_at: Local::now().naive_local(),
        };
        state.logs.push(log.clone());
        Ok(log)
    }

    fn update_log(&self, id: i64, completed: bool, note: Option<&str>) -> Result<HabitLog> {
        let mut state = self.state.lock();
        let log = state
            .logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| DhaError::not_found(format!("Habit log with ID {} not found", id)))?;
        log.completed = completed;
        log.note = note.map(str::to_string);
        Ok(log.clone())
    }
}
