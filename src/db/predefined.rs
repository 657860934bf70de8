//! Built-in habit templates, seeded by migration.

use super::db::Db;
use super::habits::Habits;
use crate::libs::error::{DhaError, Result};
use crate::libs::habit::{Habit, HabitDraft};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, color, display_order, created_at, updated_at FROM predefined_habits";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedHabit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub display_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub struct PredefinedHabits<'a> {
    conn: &'a Connection,
}

impl<'a> PredefinedHabits<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Templates by display order, then name.
    pub fn list(&self) -> Result<Vec<PredefinedHabit>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY display_order, name", SELECT_COLUMNS))?;
        let templates = stmt.query_map([], map_predefined)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(templates)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<PredefinedHabit>> {
        let template = self
            .conn
            .query_row(
                &format!("{} WHERE name = ?1 COLLATE NOCASE", SELECT_COLUMNS),
                params![name.trim()],
                map_predefined,
            )
            .optional()?;
        Ok(template)
    }

    /// Creates a habit with the template's name, description and color.
    pub fn adopt(&self, name: &str) -> Result<Habit> {
        let template = self
            .get_by_name(name)?
            .ok_or_else(|| DhaError::not_found(format!("Predefined habit '{}' not found", name.trim())))?;

        let draft = HabitDraft {
            name: template.name,
            description: template.description,
            color: Some(template.color),
        };
        Habits::from_conn(self.conn).create(&draft)
    }
}

fn map_predefined(row: &Row) -> rusqlite::Result<PredefinedHabit> {
    Ok(PredefinedHabit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color: row.get(3)?,
        display_order: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
