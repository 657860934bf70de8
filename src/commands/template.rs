use crate::{
    db::{db::Db, predefined::PredefinedHabits},
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Select};

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    command: Option<TemplateCommand>,
}

#[derive(Debug, Subcommand)]
enum TemplateCommand {
    /// List predefined habits
    List,
    /// Create a habit from a predefined one
    Adopt {
        /// Predefined habit name; selected interactively when omitted
        name: Option<String>,
    },
}

pub fn cmd(args: TemplateArgs) -> Result<()> {
    let db = Db::new()?;
    match args.command {
        Some(TemplateCommand::List) | None => handle_list(&db),
        Some(TemplateCommand::Adopt { name }) => handle_adopt(&db, name),
    }
}

fn handle_list(db: &Db) -> Result<()> {
    let templates = PredefinedHabits::new(db).list()?;

    if templates.is_empty() {
        msg_info!(Message::NoTemplatesFound);
        return Ok(());
    }

    msg_print!(Message::TemplatesHeader, true);
    View::templates(&templates);
    Ok(())
}

fn handle_adopt(db: &Db, name: Option<String>) -> Result<()> {
    let predefined = PredefinedHabits::new(db);

    let name = match name {
        Some(name) => name,
        None => {
            let templates = predefined.list()?;
            if templates.is_empty() {
                msg_info!(Message::NoTemplatesFound);
                return Ok(());
            }

            let names: Vec<String> = templates.iter().map(|template| template.name.clone()).collect();
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::SelectTemplate.to_string())
                .items(&names)
                .default(0)
                .interact()?;
            names[selection].clone()
        }
    };

    let habit = predefined.adopt(&name)?;
    msg_success!(Message::TemplateAdopted(habit.name));
    Ok(())
}
