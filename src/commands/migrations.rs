use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message},
    msg_info, msg_print, msg_success,
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
    /// Show current database version
    Status,
    /// Show migration history
    History,
    /// Apply pending migrations
    Run,
    /// Forget migrations above a version so they run again
    #[cfg(debug_assertions)]
    Rollback { version: u32 },
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let path = Config::read()?.database_path()?;

    match args.command {
        MigrationsCommand::Status => {
            let conn = Db::new_without_migrations(&path)?;
            let version = get_db_version(&conn)?;

            msg_print!(Message::DatabaseVersion(version));
            if needs_migration(&conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let conn = Db::new_without_migrations(&path)?;
            let history = MigrationManager::new().get_migration_history(&conn)?;

            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                msg_print!(Message::MigrationHistoryEntry(version, name, applied_at));
            }
        }
        MigrationsCommand::Run => {
            let db = Db::open(&path)?;
            msg_success!(Message::DatabaseVersion(get_db_version(&db.conn)?));
        }
        #[cfg(debug_assertions)]
        MigrationsCommand::Rollback { version } => {
            let mut conn = Db::new_without_migrations(&path)?;
            MigrationManager::new().rollback_to(&mut conn, version)?;
        }
    }

    Ok(())
}
