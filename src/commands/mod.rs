//! Command-line interface of dha.
//!
//! Every sub-command lives in its own module with a clap `Args` struct and a
//! `cmd` entry point. [`dispatch`] runs one parsed command; it is shared by
//! the process entry point and the interactive shell, which feeds it one line
//! at a time.
//!
//! All commands except `init`, `login`, `logout` and `migrations` need a live
//! session and refresh it when they run.

pub mod ask;
pub mod habit;
pub mod init;
pub mod log;
pub mod login;
pub mod logout;
pub mod migrations;
pub mod shell;
pub mod template;
pub mod week;

use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::DhaError;
use crate::libs::messages::Message;
use crate::libs::session::{Session, SessionContext};
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Configure login, session timeout and the AI assistant")]
    Init(init::InitArgs),
    #[command(about = "Sign in")]
    Login(login::LoginArgs),
    #[command(about = "Sign out")]
    Logout,
    #[command(about = "Show who is signed in")]
    Whoami,
    #[command(about = "Manage habits")]
    Habit(habit::HabitArgs),
    #[command(about = "Mark a habit as done (or not) for a day", arg_required_else_help = true)]
    Log(log::LogArgs),
    #[command(about = "Show logged days")]
    Logs(log::LogsArgs),
    #[command(about = "Show today's habits")]
    Today,
    #[command(about = "Show the weekly completion grid")]
    Week(week::WeekArgs),
    #[command(about = "Browse and adopt predefined habits")]
    Templates(template::TemplateArgs),
    #[command(about = "Ask the assistant about your habits", arg_required_else_help = true)]
    Ask(ask::AskArgs),
    #[command(about = "Interactive session with inactivity sign-out")]
    Shell,
    #[command(about = "Database schema status")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        dispatch(cli.command).await
    }
}

pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::cmd(args),
        Commands::Login(args) => login::cmd(args),
        Commands::Logout => logout::cmd(),
        Commands::Migrations(args) => migrations::cmd(args),
        Commands::Whoami => {
            let session = signed_in()?;
            msg_print!(Message::SignedInAs {
                user: session.user,
                since: session.started_at.format("%Y-%m-%d %H:%M").to_string(),
            });
            Ok(())
        }
        Commands::Habit(args) => {
            signed_in()?;
            habit::cmd(args)
        }
        Commands::Log(args) => {
            signed_in()?;
            log::cmd(args)
        }
        Commands::Logs(args) => {
            signed_in()?;
            log::logs(args)
        }
        Commands::Today => {
            signed_in()?;
            log::today()
        }
        Commands::Week(args) => {
            signed_in()?;
            week::cmd(args)
        }
        Commands::Templates(args) => {
            signed_in()?;
            template::cmd(args)
        }
        Commands::Ask(args) => {
            signed_in()?;
            ask::cmd(args).await
        }
        Commands::Shell => {
            let session = signed_in()?;
            shell::cmd(session).await
        }
    }
}

/// Loads the session, failing when nobody is signed in or the session went
/// idle for too long, and records this invocation as activity.
pub fn signed_in() -> Result<Session> {
    let config = Config::read()?;
    let mut context = SessionContext::load_now(&DataStorage::new(), config.session_settings().total_timeout())?;

    let session = match context.require() {
        Ok(session) => session.clone(),
        Err(DhaError::SessionExpired) => return Err(msg_error_anyhow!(Message::SessionExpired)),
        Err(DhaError::NotSignedIn) => return Err(msg_error_anyhow!(Message::NotSignedIn)),
        Err(e) => return Err(e.into()),
    };

    context.touch(Local::now().naive_local())?;
    Ok(session)
}
