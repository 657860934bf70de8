//! Display implementation for dha application messages.
//!
//! All user-facing text lives here so that wording stays consistent between
//! the one-shot commands and the interactive shell.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

fn status_word(completed: bool) -> &'static str {
    if completed {
        "completed"
    } else {
        "not completed"
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === HABIT MESSAGES ===
            Message::HabitCreated(name) => format!("Habit '{}' created", name),
            Message::HabitUpdated(name) => format!("Habit '{}' updated", name),
            Message::HabitDeleted(name) => format!("Habit '{}' and its logs deleted", name),
            Message::HabitsHeader => "Your habits:".to_string(),
            Message::NoHabitsFound => "No habits yet. Add one with `dha habit add` or `dha templates adopt`.".to_string(),
            Message::NoHabitsMatching(query) => format!("No habits match '{}'", query),
            Message::ConfirmDeleteHabit(name) => format!("Are you sure you want to delete '{}' and all of its logs?", name),
            Message::SelectHabit => "Select a habit".to_string(),
            Message::PromptHabitName => "Habit name".to_string(),
            Message::PromptHabitDescription => "Description (optional)".to_string(),
            Message::PromptHabitColor => "Color (#RRGGBB)".to_string(),
            Message::EditingHabit(name) => format!("Editing habit '{}'", name),

            // === LOG MESSAGES ===
            Message::LogCreated { habit, date, completed } => format!("Logged '{}' as {} for {}", habit, status_word(*completed), date),
            Message::LogUpdated { habit, date, completed } => format!("Updated '{}' to {} for {}", habit, status_word(*completed), date),
            Message::LogsHeader(habit) => format!("History of '{}':", habit),
            Message::NoLogsForHabit(habit) => format!("'{}' has no logs yet", habit),
            Message::NoLogsFound => "Nothing logged yet".to_string(),
            Message::DayHeader(date) => format!("{}:", date),
            Message::TodayHeader(date) => format!("Today, {}:", date),

            // === WEEK MESSAGES ===
            Message::WeekHeader(start, end) => format!("Week of {} - {}", start, end),

            // === TEMPLATE MESSAGES ===
            Message::TemplatesHeader => "Predefined habits:".to_string(),
            Message::NoTemplatesFound => "No predefined habits available".to_string(),
            Message::TemplateAdopted(name) => format!("Habit '{}' created from template", name),
            Message::SelectTemplate => "Select a predefined habit".to_string(),

            // === SESSION MESSAGES ===
            Message::PromptUsername => "Username".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPhone => "Phone number".to_string(),
            Message::LoginSucceeded(user) => format!("Welcome {}", user),
            Message::LoginNotConfiguredHint => {
                "Please contact the administrator to set the login credentials (DHA_LOGIN_USERNAME, DHA_LOGIN_PASSWORD, DHA_LOGIN_PHONE or `dha init`) before signing in.".to_string()
            }
            Message::AlreadySignedIn(user) => format!("Already signed in as {}", user),
            Message::LoggedOut => "Signed out".to_string(),
            Message::NotSignedIn => "You are not signed in. Run `dha login` first.".to_string(),
            Message::SessionExpired => "Your session expired due to inactivity. Run `dha login` to sign in again.".to_string(),
            Message::SignedInAs { user, since } => format!("Signed in as {} since {}", user, since),

            // === SHELL MESSAGES ===
            Message::ShellWelcome(user) => format!("Welcome {}. Type `help` for commands, `exit` to leave the shell.", user),
            Message::ShellHelp => {
                "Any dha command works here without the `dha` prefix, e.g. `habit list` or `log 3 --undone`.\n\
                 `stay`   - stay signed in when the inactivity warning is shown\n\
                 `logout` - sign out now\n\
                 `exit`   - leave the shell and keep the session"
                    .to_string()
            }
            Message::ShellCommandUnavailable(name) => format!("`{}` is not available inside the shell", name),
            Message::SessionExpiring(remaining) => format!("Session expires in {} due to inactivity. Type `stay` to stay signed in or `logout` to sign out.", remaining),
            Message::StayedSignedIn => "You are still signed in".to_string(),
            Message::SessionTimedOut => "Signed out due to inactivity".to_string(),

            // === AI MESSAGES ===
            Message::AiThinking => "Asking the assistant...".to_string(),
            Message::AiAnswerHeader => "Assistant:".to_string(),
            Message::PromptOpenAiKey => "Enter your OpenAI API key".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::PromptSelectModules => "Select modules to configure (space to select, enter to confirm)".to_string(),
            Message::ConfigModuleLogin => "Login credentials".to_string(),
            Message::ConfigModuleSession => "Session timeout".to_string(),
            Message::ConfigModuleAi => "AI assistant".to_string(),
            Message::PromptWarningAfter => "Seconds of inactivity before the sign-out warning".to_string(),
            Message::PromptLogoutAfter => "Seconds of inactivity before automatic sign-out".to_string(),
            Message::PromptDebounce => "Activity debounce window (milliseconds)".to_string(),
            Message::PromptTick => "Countdown refresh interval (milliseconds)".to_string(),
            Message::PromptAiUrl => "API base URL".to_string(),
            Message::PromptAiModel => "Model".to_string(),
            Message::PromptAiTemperature => "Temperature".to_string(),
            Message::PromptAiMaxTokens => "Max tokens".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseNeedsUpdate => "Database needs migration; it is upgraded automatically on the next command".to_string(),
            Message::MigrationHistory => "Applied migrations:".to_string(),

            // === GENERIC MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };
        write!(f, "{}", text)
    }
}
