use crate::{
    api::openai::{AiClient, API_KEY_ENV, API_KEY_SECRET_FILE},
    db::{db::Db, habit_logs::HabitLogs, habits::Habits},
    libs::{config::Config, insight::HabitInsight, messages::Message, secret::Secret, validation},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;
use std::env;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question about your habits, e.g. "which habit do I skip most?"
    #[arg(required = true, num_args = 1..)]
    question: Vec<String>,

    /// Forget the stored API key and prompt for a new one
    #[arg(long)]
    reset_key: bool,
}

pub async fn cmd(args: AskArgs) -> Result<()> {
    let question = validation::question(&args.question.join(" "))?;
    let config = Config::read()?;

    let secret = Secret::new(API_KEY_SECRET_FILE, &Message::PromptOpenAiKey.to_string());
    if args.reset_key {
        secret.clear()?;
    }
    let api_key = match env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => secret.get_or_prompt()?,
    };

    let context = {
        let db = Db::new()?;
        let habits = Habits::new(&db).list(None)?;
        let logs = HabitLogs::new(&db).all()?;
        HabitInsight::collect(&habits, &logs)
    };

    msg_info!(Message::AiThinking);
    let answer = AiClient::new(config.ai_settings(), api_key).ask(&question, &context).await?;

    msg_print!(Message::AiAnswerHeader, true);
    msg_print!(answer);
    Ok(())
}
