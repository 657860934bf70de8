//! Input checks applied before anything reaches the store.

use super::error::{DhaError, Result};
use chrono::{Local, NaiveDate};

pub const DEFAULT_COLOR: &str = "#3b82f6";
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_NOTE_LEN: usize = 2000;
pub const MAX_QUESTION_LEN: usize = 1000;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The user's current calendar day, from the local wall clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn habit_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DhaError::validation("name: Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DhaError::validation("name: Name must be less than 255 characters"));
    }
    Ok(name.to_string())
}

/// Trims the description; blank input becomes `None`.
pub fn description(description: Option<&str>) -> Result<Option<String>> {
    optional_text(description, MAX_DESCRIPTION_LEN, "description: Description must be less than 1000 characters")
}

pub fn note(note: Option<&str>) -> Result<Option<String>> {
    optional_text(note, MAX_NOTE_LEN, "notes: Notes must be less than 2000 characters")
}

fn optional_text(value: Option<&str>, max: usize, message: &str) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(DhaError::validation(message)),
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Accepts `#RRGGBB` in either case.
pub fn color(color: &str) -> Result<String> {
    let color = color.trim();
    let valid = color.len() == 7 && color.starts_with('#') && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(DhaError::validation("color: Color must be a valid hex color (e.g., #3b82f6)"));
    }
    Ok(color.to_string())
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let shaped = value.len() == 10
        && value
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !shaped {
        return Err(DhaError::validation("date: Date must be in YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DhaError::validation(format!("date: '{}' is not a calendar date", value)))
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(DhaError::validation("endDate: Start date must be before or equal to end date"));
    }
    Ok(())
}

pub fn question(question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(DhaError::validation("question: Question is required"));
    }
    if question.chars().count() > MAX_QUESTION_LEN {
        return Err(DhaError::validation("question: Question must be less than 1000 characters"));
    }
    Ok(question.to_string())
}
