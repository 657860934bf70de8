//! Monday-to-Sunday completion grid.

use super::error::{DhaError, Result};
use super::habit::Habit;
use super::habit_log::{upsert_log, HabitLog, LogEntry, LogStore, UpsertOutcome};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

/// Monday of the week containing `date`; Sunday belongs to the week before.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The Monday `offset` weeks away from the week containing `date`. The
/// whole target week has to fit in the calendar.
pub fn shift_week(date: NaiveDate, offset: i64) -> Result<NaiveDate> {
    let start = Duration::try_weeks(offset)
        .and_then(|delta| week_start(date).checked_add_signed(delta))
        .ok_or_else(out_of_range)?;
    week_end(start)?;
    Ok(start)
}

/// Sunday of the week beginning at `start`.
pub fn week_end(start: NaiveDate) -> Result<NaiveDate> {
    start.checked_add_signed(Duration::days(6)).ok_or_else(out_of_range)
}

/// The week to show: an explicit `offset` from `today` wins; otherwise the
/// week of a just-toggled day, otherwise the current week.
pub fn shown_week(today: NaiveDate, offset: Option<i64>, toggled: Option<NaiveDate>) -> Result<NaiveDate> {
    match (offset, toggled) {
        (None, Some(date)) => shift_week(date, 0),
        (offset, _) => shift_week(today, offset.unwrap_or(0)),
    }
}

fn out_of_range() -> DhaError {
    DhaError::validation("offset: week is out of range")
}

pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Done,
    Missed,
    /// Nothing logged for the day.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    pub habit: Habit,
    pub marks: [DayMark; 7],
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    pub start: NaiveDate,
    pub days: [NaiveDate; 7],
    pub rows: Vec<WeekRow>,
}

impl WeekGrid {
    /// Lays `logs` out over the week beginning at `start`'s Monday. Logs of
    /// other weeks or unknown habits are ignored.
    pub fn build(start: NaiveDate, habits: &[Habit], logs: &[HabitLog]) -> Self {
        let start = week_start(start);
        let days = week_days(start);

        let by_key: HashMap<(i64, NaiveDate), bool> = logs.iter().map(|log| ((log.habit_id, log.date), log.completed)).collect();

        let rows = habits
            .iter()
            .map(|habit| WeekRow {
                habit: habit.clone(),
                marks: days.map(|day| match by_key.get(&(habit.id, day)) {
                    Some(true) => DayMark::Done,
                    Some(false) => DayMark::Missed,
                    None => DayMark::Empty,
                }),
            })
            .collect();

        Self { start, days, rows }
    }

    pub fn end(&self) -> NaiveDate {
        self.days[6]
    }

    pub fn mark(&self, habit_id: i64, date: NaiveDate) -> Option<DayMark> {
        let column = self.days.iter().position(|day| *day == date)?;
        self.rows.iter().find(|row| row.habit.id == habit_id).map(|row| row.marks[column])
    }

    pub fn previous(&self) -> Result<NaiveDate> {
        shift_week(self.start, -1)
    }

    pub fn next(&self) -> Result<NaiveDate> {
        shift_week(self.start, 1)
    }

    /// Completed days over all cells of the week.
    pub fn completed_count(&self) -> usize {
        self.rows.iter().flat_map(|row| row.marks.iter()).filter(|mark| **mark == DayMark::Done).count()
    }
}

/// Flips the day's completion: a done day becomes not done; a missed or
/// unlogged day becomes done. An existing note is kept.
pub fn toggle<S: LogStore + ?Sized>(store: &S, habit_id: i64, date: NaiveDate) -> Result<UpsertOutcome> {
    if !store.habit_exists(habit_id)? {
        return Err(DhaError::not_found(format!("Habit with ID {} not found", habit_id)));
    }
    let existing = store.find_log(habit_id, date)?;
    let completed = !existing.as_ref().is_some_and(|log| log.completed);
    let mut entry = LogEntry::new(habit_id, date, completed);
    entry.note = existing.and_then(|log| log.note);
    upsert_log(store, &entry)
}
