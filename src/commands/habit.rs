use crate::{
    db::{db::Db, habit_logs::HabitLogs, habits::Habits},
    libs::{
        habit::{Habit, HabitDraft, HabitPatch},
        messages::Message,
        validation::{self, DEFAULT_COLOR},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

#[derive(Debug, Args)]
pub struct HabitArgs {
    #[command(subcommand)]
    command: Option<HabitCommand>,
}

#[derive(Debug, Subcommand)]
enum HabitCommand {
    /// Create a habit
    Add {
        /// Habit name; prompted when omitted
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Hex color such as #10b981
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List habits, newest first
    List {
        /// Only habits whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one habit with its totals
    Show {
        /// Habit ID or name
        habit: String,
    },
    /// Edit a habit
    Edit {
        /// Habit ID or name; selected interactively when omitted
        habit: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a habit and all of its logs
    Delete {
        /// Habit ID or name; selected interactively when omitted
        habit: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: HabitArgs) -> Result<()> {
    let db = Db::new()?;
    match args.command {
        Some(HabitCommand::Add { name, description, color }) => handle_add(&db, name, description, color),
        Some(HabitCommand::List { search }) => handle_list(&db, search),
        None => handle_list(&db, None),
        Some(HabitCommand::Show { habit }) => handle_show(&db, &habit),
        Some(HabitCommand::Edit {
            habit,
            name,
            description,
            clear_description,
            color,
        }) => {
            let patch = HabitPatch {
                name,
                description: if clear_description { Some(None) } else { description.map(Some) },
                color,
            };
            handle_edit(&db, habit, patch)
        }
        Some(HabitCommand::Delete { habit, yes }) => handle_delete(&db, habit, yes),
    }
}

fn handle_add(db: &Db, name: Option<String>, description: Option<String>, color: Option<String>) -> Result<()> {
    let draft = match name {
        Some(name) => HabitDraft { name, description, color },
        None => HabitDraft {
            name: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptHabitName.to_string())
                .validate_with(|input: &String| validation::habit_name(input).map(|_| ()).map_err(|e| e.to_string()))
                .interact_text()?,
            description: Some(
                Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptHabitDescription.to_string())
                    .allow_empty(true)
                    .interact_text()?,
            ),
            color: Some(prompt_color(DEFAULT_COLOR)?),
        },
    };

    let habit = Habits::new(db).create(&draft)?;
    msg_success!(Message::HabitCreated(habit.name));
    Ok(())
}

fn handle_list(db: &Db, search: Option<String>) -> Result<()> {
    let habits = Habits::new(db).list(search.as_deref())?;

    if habits.is_empty() {
        match search.filter(|term| !term.trim().is_empty()) {
            Some(term) => msg_info!(Message::NoHabitsMatching(term)),
            None => msg_info!(Message::NoHabitsFound),
        }
        return Ok(());
    }

    msg_print!(Message::HabitsHeader, true);
    View::habits(&habits);
    Ok(())
}

fn handle_show(db: &Db, reference: &str) -> Result<()> {
    let habit = Habits::new(db).resolve(reference)?;
    let logs = HabitLogs::new(db).for_habit(habit.id)?;
    View::habit(&habit, &logs);
    Ok(())
}

fn handle_edit(db: &Db, reference: Option<String>, patch: HabitPatch) -> Result<()> {
    let habits = Habits::new(db);
    let habit = match reference {
        Some(reference) => habits.resolve(&reference)?,
        None => match select_habit(db)? {
            Some(habit) => habit,
            None => return Ok(()),
        },
    };

    let patch = if patch.is_empty() { prompt_patch(&habit)? } else { patch };
    let updated = habits.update(habit.id, &patch)?;
    msg_success!(Message::HabitUpdated(updated.name));
    Ok(())
}

fn handle_delete(db: &Db, reference: Option<String>, yes: bool) -> Result<()> {
    let habits = Habits::new(db);
    let habit = match reference {
        Some(reference) => habits.resolve(&reference)?,
        None => match select_habit(db)? {
            Some(habit) => habit,
            None => return Ok(()),
        },
    };

    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteHabit(habit.name.clone()).to_string())
            .default(false)
            .interact()?;

    if confirmed {
        let deleted = habits.delete(habit.id)?;
        msg_success!(Message::HabitDeleted(deleted.name));
    } else {
        msg_info!(Message::OperationCancelled);
    }
    Ok(())
}

/// Lets the user pick a habit; `None` when there are none.
pub(crate) fn select_habit(db: &Db) -> Result<Option<Habit>> {
    let mut habits = Habits::new(db).list(None)?;
    if habits.is_empty() {
        msg_info!(Message::NoHabitsFound);
        return Ok(None);
    }

    let names: Vec<String> = habits.iter().map(|habit| format!("{} (#{})", habit.name, habit.id)).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectHabit.to_string())
        .items(&names)
        .default(0)
        .interact()?;

    Ok(Some(habits.swap_remove(selection)))
}

fn prompt_patch(habit: &Habit) -> Result<HabitPatch> {
    msg_print!(Message::EditingHabit(habit.name.clone()), true);

    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptHabitName.to_string())
        .default(habit.name.clone())
        .validate_with(|input: &String| validation::habit_name(input).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptHabitDescription.to_string())
        .default(habit.description.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let color = prompt_color(&habit.color)?;

    Ok(HabitPatch {
        name: Some(name),
        description: Some(Some(description)),
        color: Some(color),
    })
}

fn prompt_color(default: &str) -> Result<String> {
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptHabitColor.to_string())
        .default(default.to_string())
        .validate_with(|input: &String| validation::color(input).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?)
}
