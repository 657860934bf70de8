//! Habit storage: create, look up, search, edit and delete habits.
//!
//! Deleting a habit removes its logs through the `ON DELETE CASCADE` foreign
//! key, which requires `PRAGMA foreign_keys` (set by [`Db`]).

use super::db::Db;
use crate::libs::error::{DhaError, Result};
use crate::libs::habit::{Habit, HabitDraft, HabitPatch};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT id, name, description, color, created_at, updated_at FROM habits";

const INSERT_HABIT: &str = "INSERT INTO habits (name, description, color, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)";

const UPDATE_HABIT: &str = "UPDATE habits SET
    name = COALESCE(?2, name),
    description = CASE WHEN ?3 THEN ?4 ELSE description END,
    color = COALESCE(?5, color),
    updated_at = ?6
    WHERE id = ?1";

const DELETE_HABIT: &str = "DELETE FROM habits WHERE id = ?1";

const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

pub struct Habits<'a> {
    conn: &'a Connection,
}

impl<'a> Habits<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn from_conn(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, draft: &HabitDraft) -> Result<Habit> {
        let draft = draft.validate()?;
        let now = Local::now().naive_local();
        self.conn.execute(INSERT_HABIT, params![draft.name, draft.description, draft.color, now])?;
        let id = self.conn.last_insert_rowid();
        self.fetch(id)
    }

    pub fn get(&self, id: i64) -> Result<Option<Habit>> {
        let habit = self
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_habit)
            .optional()?;
        Ok(habit)
    }

    /// Like [`Habits::get`], but a missing habit is an error.
    pub fn fetch(&self, id: i64) -> Result<Habit> {
        self.get(id)?.ok_or_else(|| DhaError::not_found(format!("Habit with ID {} not found", id)))
    }

    /// Resolves a command-line reference: a numeric id, or else an exact
    /// (case-insensitive) name. A number that is no habit's id is tried as a
    /// name too.
    pub fn resolve(&self, reference: &str) -> Result<Habit> {
        let reference = reference.trim();
        if let Ok(id) = reference.parse::<i64>() {
            if let Some(habit) = self.get(id)? {
                return Ok(habit);
            }
        }
        let needle = reference.to_lowercase();
        self.list(None)?
            .into_iter()
            .find(|habit| habit.name.to_lowercase() == needle)
            .ok_or_else(|| DhaError::not_found(format!("Habit '{}' not found", reference)))
    }

    /// All habits, newest first; a non-blank `search` keeps those whose name
    /// or description contains it, ignoring case.
    pub fn list(&self, search: Option<&str>) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!("{} {}", SELECT_COLUMNS, ORDER_NEWEST_FIRST))?;
        let habits = stmt.query_map([], map_habit)?.collect::<rusqlite::Result<Vec<_>>>()?;

        let term = search.map(str::trim).filter(|term| !term.is_empty());
        let Some(term) = term.map(str::to_lowercase) else {
            return Ok(habits);
        };
        // SQLite's LIKE and lower() only fold ASCII
        Ok(habits
            .into_iter()
            .filter(|habit| {
                habit.name.to_lowercase().contains(&term)
                    || habit.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&term))
            })
            .collect())
    }

    pub fn update(&self, id: i64, patch: &HabitPatch) -> Result<Habit> {
        let patch = patch.validate()?;
        let (clear_or_set, description) = match &patch.description {
            Some(description) => (true, description.clone()),
            None => (false, None),
        };
        let affected = self.conn.execute(
            UPDATE_HABIT,
            params![id, patch.name, clear_or_set, description, patch.color, Local::now().naive_local()],
        )?;
        if affected == 0 {
            return Err(DhaError::not_found(format!("Habit with ID {} not found", id)));
        }
        self.fetch(id)
    }

    /// Deletes the habit and, by cascade, all of its logs.
    pub fn delete(&self, id: i64) -> Result<Habit> {
        let habit = self.fetch(id)?;
        self.conn.execute(DELETE_HABIT, params![id])?;
        Ok(habit)
    }
}

fn map_habit(row: &Row) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
