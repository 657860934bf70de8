use super::error::{DhaError, Result};
use super::validation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recurring activity the user tracks day by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields for a new habit, validated by [`HabitDraft::validate`].
#[derive(Debug, Clone, Default)]
pub struct HabitDraft {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Trims the fields and fills in the default color.
    pub fn validate(&self) -> Result<HabitDraft> {
        Ok(HabitDraft {
            name: validation::habit_name(&self.name)?,
            description: validation::description(self.description.as_deref())?,
            color: Some(match &self.color {
                Some(color) => validation::color(color)?,
                None => validation::DEFAULT_COLOR.to_string(),
            }),
        })
    }
}

/// A partial update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.color.is_none()
    }

    pub fn validate(&self) -> Result<HabitPatch> {
        if self.is_empty() {
            return Err(DhaError::validation("At least one field must be provided for update"));
        }
        Ok(HabitPatch {
            name: self.name.as_deref().map(validation::habit_name).transpose()?,
            description: match &self.description {
                Some(description) => Some(validation::description(description.as_deref())?),
                None => None,
            },
            color: self.color.as_deref().map(validation::color).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_gets_default_color() {
        let draft = HabitDraft::new("  Read ").validate().unwrap();
        assert_eq!(draft.name, "Read");
        assert_eq!(draft.color.as_deref(), Some("#3b82f6"));
        assert_eq!(draft.description, None);
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert!(HabitPatch::default().validate().is_err());
    }

    #[test]
    fn patch_can_clear_description() {
        let patch = HabitPatch {
            description: Some(Some("  ".to_string())),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.description, Some(None));
    }
}
