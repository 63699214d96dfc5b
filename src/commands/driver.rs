use crate::{
    commands::ensure_valid,
    db::{
        drivers::{Driver, Drivers, LICENSE_CDL, LICENSE_PASSENGER},
        error::DbError,
    },
    libs::{dates::parse_optional_date, details::FleetDetails, messages::Message, prompt, validation::validate_driver, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

const ENTITY: &str = "Driver";
const ENTITY_PLURAL: &str = "Drivers";

#[derive(Debug, Args)]
pub struct DriverArgs {
    #[command(subcommand)]
    command: DriverCommand,
}

#[derive(Debug, Subcommand)]
enum DriverCommand {
    /// List drivers
    List {
        /// Only active drivers
        #[arg(short, long)]
        active: bool,
    },
    /// Add a driver
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        /// CDL or Passenger
        #[arg(long)]
        license: Option<String>,
        /// CDL expiration date
        #[arg(long)]
        cdl_expires: Option<String>,
        /// Training completed
        #[arg(long)]
        trained: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a driver interactively
    Edit { id: i64 },
    /// Delete a driver
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a driver with time cards and routes driven
    Show { id: i64 },
}

pub fn cmd(args: DriverArgs) -> Result<()> {
    match args.command {
        DriverCommand::List { active } => handle_list(active),
        DriverCommand::Add {
            name,
            phone,
            email,
            address,
            city,
            state,
            zip,
            license,
            cdl_expires,
            trained,
            notes,
        } => {
            let driver = Driver {
                phone,
                email,
                address,
                city,
                state,
                zip,
                license_type: license,
                cdl_expiration: parse_optional_date(cdl_expires.as_deref().unwrap_or_default())?,
                training_complete: trained,
                notes,
                ..Driver::new(&name)
            };
            handle_add(driver)
        }
        DriverCommand::Edit { id } => handle_edit(id),
        DriverCommand::Delete { id, yes } => handle_delete(id, yes),
        DriverCommand::Show { id } => match FleetDetails::new()?.driver_details(id)? {
            Some(details) => View::driver_details(&details),
            None => Err(DbError::NotFound { entity: ENTITY, id }.into()),
        },
    }
}

fn handle_list(active: bool) -> Result<()> {
    let drivers_db = Drivers::new()?;
    let drivers = if active { drivers_db.list_active()? } else { drivers_db.list()? };

    if drivers.is_empty() {
        msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
        return Ok(());
    }

    msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
    View::drivers(&drivers)?;

    let today = Local::now().date_naive();
    for driver in drivers.iter().filter(|d| d.is_active && d.cdl_expired(today)) {
        msg_warning!(Message::CdlExpired(driver.name.clone()));
    }
    Ok(())
}

fn handle_add(driver: Driver) -> Result<()> {
    ensure_valid(&validate_driver(&driver))?;
    let id = Drivers::new()?.insert(&driver)?;
    msg_success!(Message::RecordCreated(ENTITY, id));
    Ok(())
}

fn handle_edit(id: i64) -> Result<()> {
    let mut drivers_db = Drivers::new()?;
    let current = drivers_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(current.name.clone()), true);
    let driver = Driver {
        name: prompt::text("Name", &current.name)?,
        phone: prompt::optional_text("Phone", &current.phone)?,
        email: prompt::optional_text("Email", &current.email)?,
        address: prompt::optional_text("Address", &current.address)?,
        city: prompt::optional_text("City", &current.city)?,
        state: prompt::optional_text("State", &current.state)?,
        zip: prompt::optional_text("Zip", &current.zip)?,
        license_type: Some(prompt::choice(
            "License type",
            &[LICENSE_CDL, LICENSE_PASSENGER],
            current.license_type.as_deref().unwrap_or(LICENSE_CDL),
        )?),
        cdl_expiration: prompt::optional_date("CDL expiration", current.cdl_expiration)?,
        training_complete: prompt::flag("Training complete?", current.training_complete)?,
        is_active: prompt::flag("Active?", current.is_active)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if driver == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&validate_driver(&driver))?;

    drivers_db.update(&driver)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let mut drivers_db = Drivers::new()?;
    let driver = drivers_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    if !prompt::confirm_delete(&driver.name, yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    drivers_db.delete(id)?;
    msg_success!(Message::RecordDeleted(ENTITY, id));
    Ok(())
}
