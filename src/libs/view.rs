use super::habit::Habit;
use super::habit_log::HabitLog;
use super::week::{DayMark, WeekGrid};
use crate::db::predefined::PredefinedHabit;
use chrono::NaiveDate;
use prettytable::{row, Cell, Row, Table};
use std::collections::HashMap;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct View {}

impl View {
    pub fn habits(habits: &[Habit]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "DESCRIPTION", "COLOR", "CREATED"]);
        for habit in habits {
            table.add_row(row![
                habit.id,
                habit.name,
                habit.description.as_deref().unwrap_or(""),
                habit.color,
                habit.created_at.format(DATE_FORMAT)
            ]);
        }
        table.printstd();
    }

    pub fn habit(habit: &Habit, logs: &[HabitLog]) {
        let mut table = Table::new();
        let completed = logs.iter().filter(|log| log.completed).count();

        table.add_row(row!["ID", habit.id]);
        table.add_row(row!["NAME", habit.name]);
        table.add_row(row!["DESCRIPTION", habit.description.as_deref().unwrap_or("")]);
        table.add_row(row!["COLOR", habit.color]);
        table.add_row(row!["CREATED", habit.created_at.format("%Y-%m-%d %H:%M")]);
        table.add_row(row!["UPDATED", habit.updated_at.format("%Y-%m-%d %H:%M")]);
        table.add_row(row!["COMPLETED", format!("{}/{}", completed, logs.len())]);
        table.printstd();
    }

    pub fn logs(logs: &[HabitLog]) {
        let mut table = Table::new();

        table.add_row(row!["DATE", "DONE", "NOTE"]);
        for log in logs {
            table.add_row(row![log.date.format(DATE_FORMAT), done_cell(log.completed), log.note.as_deref().unwrap_or("")]);
        }
        table.printstd();
    }

    /// Every habit with its state for one day.
    pub fn day(habits: &[Habit], logs: &[HabitLog]) {
        let by_habit: HashMap<i64, &HabitLog> = logs.iter().map(|log| (log.habit_id, log)).collect();
        let mut table = Table::new();

        table.add_row(row!["ID", "HABIT", "DONE", "NOTE"]);
        for habit in habits {
            let log = by_habit.get(&habit.id);
            table.add_row(row![
                habit.id,
                habit.name,
                log.map(|log| done_cell(log.completed)).unwrap_or("-"),
                log.and_then(|log| log.note.as_deref()).unwrap_or("")
            ]);
        }
        table.printstd();
    }

    pub fn templates(templates: &[PredefinedHabit]) {
        let mut table = Table::new();

        table.add_row(row!["#", "NAME", "DESCRIPTION", "COLOR"]);
        for template in templates {
            table.add_row(row![
                template.display_order,
                template.name,
                template.description.as_deref().unwrap_or(""),
                template.color
            ]);
        }
        table.printstd();
    }

    /// Prints the week grid; `today`'s column header is starred.
    pub fn week(grid: &WeekGrid, today: NaiveDate) {
        let mut table = Table::new();

        let mut header = vec![Cell::new("ID"), Cell::new("HABIT")];
        for day in grid.days {
            let label = day.format("%a %d").to_string();
            header.push(Cell::new(&if day == today { format!("*{}", label) } else { label }));
        }
        table.add_row(Row::new(header));

        for week_row in &grid.rows {
            let mut cells = vec![Cell::new(&week_row.habit.id.to_string()), Cell::new(&week_row.habit.name)];
            cells.extend(week_row.marks.iter().map(|mark| Cell::new(mark_symbol(*mark))));
            table.add_row(Row::new(cells));
        }
        table.printstd();
    }
}

fn done_cell(completed: bool) -> &'static str {
    if completed {
        "yes"
    } else {
        "no"
    }
}

pub fn mark_symbol(mark: DayMark) -> &'static str {
    match mark {
        DayMark::Done => "✓",
        DayMark::Missed => "✗",
        DayMark::Empty => "·",
    }
}
