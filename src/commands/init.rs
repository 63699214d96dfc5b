//! First-run setup: the configuration wizard and database creation.

use crate::{
    db::db::{initialize_database, Db},
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the existing configuration instead of creating one
    #[arg(short, long)]
    delete: bool,

    /// Create the database from a connection string instead of running the wizard,
    /// e.g. "Data Source=fleet.db"
    #[arg(long, requires = "provider")]
    connection: Option<String>,

    /// Provider name for --connection; only SQLite providers are supported
    #[arg(long)]
    provider: Option<String>,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        if Config::delete()? {
            msg_success!(Message::ConfigDeleted);
        } else {
            msg_info!(Message::ConfigNotFound);
        }
        return Ok(());
    }

    if let (Some(connection), Some(provider)) = (init_args.connection, init_args.provider) {
        initialize_database(&connection, &provider)?;
        msg_success!(Message::DatabaseInitialized(connection));
        return Ok(());
    }

    let config = Config::init()?;
    config.save()?;
    msg_success!(Message::ConfigSaved);

    // Create the schema right away so the first real command starts clean.
    let path = config.database_path()?;
    Db::open(&path)?;
    msg_success!(Message::DatabaseInitialized(path.display().to_string()));
    Ok(())
}
