use crate::{
    db::{
        db::{Db, DB_FILE_NAME},
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{data_storage::DataStorage, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version and whether an upgrade is pending
    Status,
    /// List applied migrations
    History,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let db = Db::new_without_migrations(DataStorage::new().get_path(DB_FILE_NAME)?)?;

    match args.command {
        MigrationsCommand::Status => {
            msg_print!(Message::DatabaseVersion(get_db_version(&db.conn)?));
            if needs_migration(&db.conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&db.conn)?;
            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                msg_print!(format!("  v{}: {} (applied: {})", version, name, applied_at));
            }
        }
    }

    Ok(())
}
