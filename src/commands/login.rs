use crate::{
    libs::{
        config::Config,
        data_storage::DataStorage,
        error::DhaError,
        messages::Message,
        session::{verify_credentials, SessionContext},
    },
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username; prompted when omitted
    #[arg(short, long)]
    username: Option<String>,

    /// Phone number; prompted when omitted
    #[arg(short, long)]
    phone: Option<String>,
}

pub fn cmd(args: LoginArgs) -> Result<()> {
    let config = Config::read()?;
    let mut context = SessionContext::load_now(&DataStorage::new(), config.session_settings().total_timeout())?;

    if let Some(session) = context.current() {
        msg_info!(Message::AlreadySignedIn(session.user.clone()));
        return Ok(());
    }

    let login = config.login_credentials();
    if !login.is_configured() {
        msg_error!(Message::LoginNotConfiguredHint);
        return Ok(());
    }

    let username = match args.username {
        Some(username) => username,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptUsername.to_string())
            .interact_text()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;
    let phone = match args.phone {
        Some(phone) => phone,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPhone.to_string())
            .interact_text()?,
    };

    match verify_credentials(&login, &username, &password, &phone) {
        Ok(user) => {
            context.start(&user, Local::now().naive_local())?;
            msg_success!(Message::LoginSucceeded(user));
            Ok(())
        }
        Err(DhaError::Credentials(reason)) => {
            msg_error!(reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
