use crate::{
    db::{db::Db, habit_logs::HabitLogs, habits::Habits},
    libs::{
        habit_log::{upsert_log, LogEntry},
        messages::Message,
        validation,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Habit ID or name
    habit: String,

    /// Day to log (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Mark the day as done (default)
    #[arg(long, conflicts_with = "undone")]
    done: bool,

    /// Mark the day as not done
    #[arg(long)]
    undone: bool,

    /// Free-text note; an existing note is replaced
    #[arg(short, long)]
    note: Option<String>,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Habit ID or name; all habits when omitted
    habit: Option<String>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<String>,
}

pub fn cmd(args: LogArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(date) => validation::date(date)?,
        None => validation::today(),
    };

    let db = Db::new()?;
    let habit = Habits::new(&db).resolve(&args.habit)?;

    let mut entry = LogEntry::new(habit.id, date, !args.undone);
    entry.note = args.note;
    let outcome = upsert_log(&HabitLogs::new(&db), &entry)?;

    let date = outcome.record.date.to_string();
    let completed = outcome.record.completed;
    if outcome.was_created {
        msg_success!(Message::LogCreated {
            habit: habit.name,
            date,
            completed
        });
    } else {
        msg_success!(Message::LogUpdated {
            habit: habit.name,
            date,
            completed
        });
    }
    Ok(())
}

pub fn logs(args: LogsArgs) -> Result<()> {
    let db = Db::new()?;
    let logs = HabitLogs::new(&db);

    match args.habit {
        Some(reference) => {
            let habit = Habits::new(&db).resolve(&reference)?;
            let mut entries = logs.for_habit(habit.id)?;
            if let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) {
                let (from, to) = (validation::date(from)?, validation::date(to)?);
                validation::date_range(from, to)?;
                entries.retain(|log| log.date >= from && log.date <= to);
            }

            if entries.is_empty() {
                msg_info!(Message::NoLogsForHabit(habit.name));
                return Ok(());
            }
            msg_print!(Message::LogsHeader(habit.name), true);
            View::logs(&entries);
        }
        None => {
            let from = args.from.as_deref().map(validation::date).transpose()?;
            let to = args.to.as_deref().map(validation::date).transpose()?;
            let entries = logs.all_between(from, to)?;
            let habits = Habits::new(&db).list(None)?;

            if entries.is_empty() {
                msg_info!(Message::NoLogsFound);
                return Ok(());
            }

            let mut dates: Vec<_> = entries.iter().map(|log| log.date).collect();
            dates.dedup();
            for date in dates {
                let day_logs: Vec<_> = entries.iter().filter(|log| log.date == date).cloned().collect();
                let day_habits: Vec<_> = habits
                    .iter()
                    .filter(|habit| day_logs.iter().any(|log| log.habit_id == habit.id))
                    .cloned()
                    .collect();
                msg_print!(Message::DayHeader(date.to_string()), true);
                View::day(&day_habits, &day_logs);
            }
        }
    }
    Ok(())
}

pub fn today() -> Result<()> {
    let db = Db::new()?;
    let today = validation::today();
    let habits = Habits::new(&db).list(None)?;

    if habits.is_empty() {
        msg_info!(Message::NoHabitsFound);
        return Ok(());
    }

    let logs = HabitLogs::new(&db).for_date(today)?;
    msg_print!(Message::TodayHeader(today.to_string()), true);
    View::day(&habits, &logs);
    Ok(())
}
