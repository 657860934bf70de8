use crate::{
    db::{db::Db, habit_logs::HabitLogs, habits::Habits},
    libs::{
        messages::Message,
        validation,
        view::View,
        week::{self, WeekGrid},
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WeekArgs {
    /// Weeks relative to the current one, e.g. -1 for last week
    #[arg(short, long, allow_hyphen_values = true)]
    offset: Option<i64>,

    /// Flip one day before showing the grid
    #[arg(long, num_args = 2, value_names = ["HABIT", "DATE"])]
    toggle: Option<Vec<String>>,
}

pub fn cmd(args: WeekArgs) -> Result<()> {
    let db = Db::new()?;
    let habits = Habits::new(&db);
    let logs = HabitLogs::new(&db);
    let today = validation::today();

    let mut toggled = None;
    if let Some([reference, date]) = args.toggle.as_deref() {
        let habit = habits.resolve(reference)?;
        let outcome = week::toggle(&logs, habit.id, validation::date(date)?)?;
        toggled = Some(outcome.record.date);
        msg_success!(Message::LogUpdated {
            habit: habit.name,
            date: outcome.record.date.to_string(),
            completed: outcome.record.completed,
        });
    }

    let start = week::shown_week(today, args.offset, toggled)?;
    let all_habits = habits.list(None)?;
    if all_habits.is_empty() {
        msg_info!(Message::NoHabitsFound);
        return Ok(());
    }

    let grid = WeekGrid::build(start, &all_habits, &logs.in_range(start, week::week_end(start)?)?);
    msg_print!(Message::WeekHeader(grid.start.to_string(), grid.end().to_string()), true);
    View::week(&grid, today);
    Ok(())
}
