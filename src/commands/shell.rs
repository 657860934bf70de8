//! Interactive signed-in session.
//!
//! Every entered line counts as activity for the idle monitor. Lines are run
//! as dha commands, except for a few shell words: `stay` answers the
//! inactivity warning, `logout` signs out, `exit` leaves while keeping the
//! session. When the monitor times out the session is cleared and the shell
//! ends.

use super::{dispatch, Cli, Commands};
use crate::{
    libs::{
        config::Config,
        data_storage::DataStorage,
        idle::IdleConfig,
        idle_session::IdleSession,
        messages::Message,
        session::{Session, SessionContext},
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

const PROMPT: &str = "dha> ";

enum LineOutcome {
    Continue,
    SignOut,
    Leave,
}

pub async fn cmd(session: Session) -> Result<()> {
    let settings = Config::read()?.session_settings();
    let storage = DataStorage::new();

    let logged_out = Arc::new(AtomicBool::new(false));
    let flag = logged_out.clone();
    let idle = IdleSession::spawn(IdleConfig::from(&settings), move || flag.store(true, Ordering::SeqCst));
    let mut view = idle.subscribe();

    #[cfg(feature = "input-hooks")]
    crate::libs::input_hooks::spawn(idle.activity_sender());

    msg_print!(Message::ShellWelcome(session.user.clone()), true);
    prompt();

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut signing_out = false;
    let mut warning_shown = false;

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                if current.logged_out {
                    break;
                }
                if current.warning_visible {
                    if !warning_shown {
                        println!();
                        warning_shown = true;
                    }
                    print!("\r⚠️ {}", Message::SessionExpiring(current.time_remaining));
                    flush();
                } else if warning_shown {
                    warning_shown = false;
                    println!();
                    prompt();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    idle.disable();
                    break;
                };
                idle.activity();
                touch(&storage, &settings)?;

                match run_line(line.trim()).await {
                    LineOutcome::Continue => {}
                    LineOutcome::SignOut => {
                        signing_out = true;
                        idle.sign_out();
                        continue;
                    }
                    LineOutcome::Leave => {
                        idle.disable();
                        break;
                    }
                }

                match line.trim() {
                    "stay" => {
                        warning_shown = false;
                        idle.stay_signed_in();
                        msg_success!(Message::StayedSignedIn);
                    }
                    "help" => msg_print!(Message::ShellHelp),
                    _ => {}
                }
                prompt();
            }
        }
    }

    if logged_out.load(Ordering::SeqCst) {
        SessionContext::load_now(&storage, settings.total_timeout())?.clear()?;
        if signing_out {
            msg_success!(Message::LoggedOut);
        } else {
            println!();
            msg_warning!(Message::SessionTimedOut);
        }
    }
    Ok(())
}

async fn run_line(line: &str) -> LineOutcome {
    match line {
        "" | "stay" | "help" => return LineOutcome::Continue,
        "exit" | "quit" => return LineOutcome::Leave,
        "logout" => return LineOutcome::SignOut,
        _ => {}
    }

    let words = match split_words(line) {
        Ok(words) => words,
        Err(e) => {
            msg_error!(e);
            return LineOutcome::Continue;
        }
    };

    let cli = match Cli::try_parse_from(std::iter::once("dha".to_string()).chain(words)) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return LineOutcome::Continue;
        }
    };

    match cli.command {
        Commands::Logout => LineOutcome::SignOut,
        Commands::Init(_) => unavailable("init"),
        Commands::Login(_) => unavailable("login"),
        Commands::Shell => unavailable("shell"),
        command => {
            debug!(?command, "running shell command");
            if let Err(e) = Box::pin(dispatch(command)).await {
                msg_error!(e);
            }
            LineOutcome::Continue
        }
    }
}

fn unavailable(name: &str) -> LineOutcome {
    msg_info!(Message::ShellCommandUnavailable(name.to_string()));
    LineOutcome::Continue
}

/// Keeps the stored session alive while the shell is in use.
fn touch(storage: &DataStorage, settings: &crate::libs::config::SessionConfig) -> Result<()> {
    let mut context = SessionContext::load_now(storage, settings.total_timeout())?;
    if context.current().is_some() {
        context.touch(Local::now().naive_local())?;
    }
    Ok(())
}

fn prompt() {
    print!("{}", PROMPT);
    flush();
}

fn flush() {
    let _ = std::io::stdout().flush();
}

/// Splits a command line into words, honouring single and double quotes.
pub fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
