use super::habit::Habit;
use super::habit_log::HabitLog;
use serde::Serialize;

/// Per-habit summary sent to the assistant as context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInsight {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub color: String,
    pub created_at: String,
    pub total_logs: usize,
    pub completed_logs: usize,
    pub completion_rate: String,
}

impl HabitInsight {
    pub fn collect(habits: &[Habit], logs: &[HabitLog]) -> Vec<HabitInsight> {
        habits
            .iter()
            .map(|habit| {
                let (total_logs, completed_logs) = logs
                    .iter()
                    .filter(|log| log.habit_id == habit.id)
                    .fold((0, 0), |(total, done), log| (total + 1, done + usize::from(log.completed)));

                HabitInsight {
                    id: habit.id,
                    name: habit.name.clone(),
                    description: habit
                        .description
                        .clone()
                        .filter(|description| !description.is_empty())
                        .unwrap_or_else(|| "No description".to_string()),
                    color: habit.color.clone(),
                    created_at: habit.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    total_logs,
                    completed_logs,
                    completion_rate: completion_rate(completed_logs, total_logs),
                }
            })
            .collect()
    }
}

/// One decimal and a percent sign; a habit without logs reads `0%`.
pub fn completion_rate(completed: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", completed as f64 / total as f64 * 100.0)
}
