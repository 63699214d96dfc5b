use crate::{
    commands::{date_range, ensure_valid},
    db::{
        error::DbError,
        fuel::{Fuel, FuelRecords},
    },
    libs::{dates::parse_date, messages::Message, prompt, validation::Validator, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

const ENTITY: &str = "Fuel record";
const ENTITY_PLURAL: &str = "Fuel records";

#[derive(Debug, Args)]
pub struct FuelArgs {
    #[command(subcommand)]
    command: FuelCommand,
}

#[derive(Debug, Subcommand)]
enum FuelCommand {
    /// List fuel purchases
    List {
        /// Purchases for this vehicle, oldest first
        #[arg(long)]
        vehicle: Option<i64>,
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Log a fuel purchase
    Add {
        /// Vehicle id
        vehicle: i64,
        gallons: f64,
        /// Total cost of the fill
        cost: f64,
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(long)]
        odometer: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        fuel_type: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a fuel record interactively
    Edit { id: i64 },
    /// Delete a fuel record
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one fuel record
    Show { id: i64 },
}

pub fn cmd(args: FuelArgs) -> Result<()> {
    match args.command {
        FuelCommand::List { vehicle, from, to } => {
            let fuel_db = FuelRecords::new()?;
            let records = match (vehicle, date_range(from.as_deref(), to.as_deref())?) {
                (Some(vehicle_id), Some((from, to))) => fuel_db.list_for_vehicle_between(vehicle_id, from, to)?,
                (Some(vehicle_id), None) => fuel_db.list_by_vehicle(vehicle_id)?,
                (None, Some((from, to))) => fuel_db.list_between(from, to)?,
                (None, None) => fuel_db.list()?,
            };
            if records.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::fuel(&records)
        }
        FuelCommand::Add {
            vehicle,
            gallons,
            cost,
            date,
            odometer,
            location,
            fuel_type,
            notes,
        } => {
            let fuel = Fuel {
                odometer,
                location,
                fuel_type,
                notes,
                ..Fuel::new(vehicle, parse_date(&date)?, gallons, cost)
            };
            ensure_valid(&Validator::new()?.fuel(&fuel, Local::now().date_naive())?)?;
            let id = FuelRecords::new()?.insert(&fuel)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        FuelCommand::Edit { id } => handle_edit(id),
        FuelCommand::Delete { id, yes } => {
            let mut fuel_db = FuelRecords::new()?;
            let fuel = fuel_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("fuel for vehicle {} on {}", fuel.vehicle_id, fuel.fuel_date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            fuel_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        FuelCommand::Show { id } => {
            let fuel = FuelRecords::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::fuel(&[fuel])
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut fuel_db = FuelRecords::new()?;
    let current = fuel_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("fuel record #{}", id)), true);
    let fuel = Fuel {
        fuel_date: prompt::date("Date", current.fuel_date)?,
        location: prompt::optional_text("Location", &current.location)?,
        vehicle_id: prompt::optional_number("Vehicle id", Some(current.vehicle_id))?.unwrap_or(current.vehicle_id),
        odometer: prompt::optional_number("Odometer", current.odometer)?,
        fuel_type: prompt::optional_text("Fuel type", &current.fuel_type)?,
        gallons: prompt::optional_number("Gallons", current.gallons)?,
        cost: prompt::optional_number("Cost", current.cost)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if fuel == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&Validator::new()?.fuel(&fuel, Local::now().date_naive())?)?;

    fuel_db.update(&fuel)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
