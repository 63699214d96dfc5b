use crate::{
    commands::ensure_valid,
    db::{
        error::DbError,
        maintenance::{Maintenance, MaintenanceRecords, CATEGORIES},
    },
    libs::{dates::parse_date, messages::Message, prompt, validation::Validator, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

const ENTITY: &str = "Maintenance record";
const ENTITY_PLURAL: &str = "Maintenance records";

#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    #[command(subcommand)]
    command: MaintenanceCommand,
}

#[derive(Debug, Subcommand)]
enum MaintenanceCommand {
    /// List maintenance work
    List {
        /// Work on this vehicle only
        #[arg(long)]
        vehicle: Option<i64>,
    },
    /// Log maintenance work
    Add {
        /// Vehicle id
        vehicle: i64,
        /// Oil Change, Brakes, Tires, Inspection, ...
        category: String,
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(long)]
        odometer: Option<f64>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a maintenance record interactively
    Edit { id: i64 },
    /// Delete a maintenance record
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one maintenance record
    Show { id: i64 },
}

pub fn cmd(args: MaintenanceArgs) -> Result<()> {
    match args.command {
        MaintenanceCommand::List { vehicle } => {
            let maintenance_db = MaintenanceRecords::new()?;
            let records = match vehicle {
                Some(vehicle_id) => maintenance_db.list_by_vehicle(vehicle_id)?,
                None => maintenance_db.list()?,
            };
            if records.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::maintenance(&records)
        }
        MaintenanceCommand::Add {
            vehicle,
            category,
            date,
            odometer,
            vendor,
            cost,
            notes,
        } => {
            let record = Maintenance {
                odometer,
                vendor,
                cost,
                notes,
                ..Maintenance::new(vehicle, parse_date(&date)?, &category)
            };
            ensure_valid(&Validator::new()?.maintenance(&record, Local::now().date_naive())?)?;
            let id = MaintenanceRecords::new()?.insert(&record)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        MaintenanceCommand::Edit { id } => handle_edit(id),
        MaintenanceCommand::Delete { id, yes } => {
            let mut maintenance_db = MaintenanceRecords::new()?;
            let record = maintenance_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("{} for vehicle {} on {}", record.category, record.vehicle_id, record.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            maintenance_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        MaintenanceCommand::Show { id } => {
            let record = MaintenanceRecords::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::maintenance(&[record])
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut maintenance_db = MaintenanceRecords::new()?;
    let current = maintenance_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("{} on {}", current.category, current.date)), true);
    let record = Maintenance {
        date: prompt::date("Date", current.date)?,
        vehicle_id: prompt::optional_number("Vehicle id", Some(current.vehicle_id))?.unwrap_or(current.vehicle_id),
        odometer: prompt::optional_number("Odometer", current.odometer)?,
        category: prompt::choice("Category", CATEGORIES, &current.category)?,
        vendor: prompt::optional_text("Vendor", &current.vendor)?,
        cost: prompt::optional_number("Cost", current.cost)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if record == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&Validator::new()?.maintenance(&record, Local::now().date_naive())?)?;

    maintenance_db.update(&record)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
