use crate::{
    commands::ensure_valid,
    db::{
        error::DbError,
        vehicles::{Vehicle, Vehicles, STATUSES, STATUS_ACTIVE},
    },
    libs::{
        dates::parse_optional_date,
        details::FleetDetails,
        fleet::Fleet,
        messages::Message,
        prompt,
        validation::validate_vehicle,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Datelike, Local};
use clap::{Args, Subcommand};

const ENTITY: &str = "Vehicle";
const ENTITY_PLURAL: &str = "Vehicles";

#[derive(Debug, Args)]
pub struct VehicleArgs {
    #[command(subcommand)]
    command: VehicleCommand,
}

#[derive(Debug, Subcommand)]
enum VehicleCommand {
    /// List vehicles
    List {
        /// Only vehicles with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Add a vehicle
    Add {
        /// Bus number, 1-10 letters, digits or dashes
        number: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// Seating capacity
        #[arg(long)]
        capacity: Option<i32>,
        #[arg(long)]
        vin: Option<String>,
        /// License plate number
        #[arg(long)]
        license: Option<String>,
        /// Date of the last annual inspection
        #[arg(long)]
        inspected: Option<String>,
        #[arg(long, default_value = STATUS_ACTIVE)]
        status: String,
        #[arg(long)]
        fuel_type: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a vehicle interactively
    Edit { id: i64 },
    /// Change the service status of a vehicle
    Status {
        id: i64,
        /// Active, Maintenance, Inactive or Retired
        status: String,
    },
    /// Delete a vehicle
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a vehicle with its fuel and maintenance history
    Show { id: i64 },
}

pub fn cmd(args: VehicleArgs) -> Result<()> {
    match args.command {
        VehicleCommand::List { status } => handle_list(status),
        VehicleCommand::Add {
            number,
            year,
            make,
            model,
            capacity,
            vin,
            license,
            inspected,
            status,
            fuel_type,
            notes,
        } => {
            let vehicle = Vehicle {
                year,
                make,
                model,
                seating_capacity: capacity,
                vin,
                license_number: license,
                last_inspection: parse_optional_date(inspected.as_deref().unwrap_or_default())?,
                status,
                fuel_type,
                notes,
                ..Vehicle::new(&number)
            };
            handle_add(vehicle)
        }
        VehicleCommand::Edit { id } => handle_edit(id),
        VehicleCommand::Status { id, status } => {
            Fleet::new()?.set_status(id, &status)?;
            msg_success!(Message::VehicleStatusChanged(id, status));
            Ok(())
        }
        VehicleCommand::Delete { id, yes } => handle_delete(id, yes),
        VehicleCommand::Show { id } => match FleetDetails::new()?.vehicle_details(id)? {
            Some(details) => View::vehicle_details(&details),
            None => Err(DbError::NotFound { entity: ENTITY, id }.into()),
        },
    }
}

fn handle_list(status: Option<String>) -> Result<()> {
    let vehicles_db = Vehicles::new()?;
    let vehicles = match status {
        Some(status) => vehicles_db.list_by_status(&status)?,
        None => vehicles_db.list()?,
    };

    if vehicles.is_empty() {
        msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
        return Ok(());
    }

    msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
    View::vehicles(&vehicles)
}

fn handle_add(vehicle: Vehicle) -> Result<()> {
    match Fleet::new()?.add_vehicle(&vehicle, Local::now().year())? {
        Ok(id) => msg_success!(Message::RecordCreated(ENTITY, id)),
        Err(problems) => ensure_valid(&problems)?,
    }
    Ok(())
}

fn handle_edit(id: i64) -> Result<()> {
    let mut vehicles_db = Vehicles::new()?;
    let current = vehicles_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(current.label()), true);
    let vehicle = Vehicle {
        vehicle_number: prompt::text("Bus number", &current.vehicle_number)?,
        year: prompt::optional_number("Year", current.year)?,
        make: prompt::optional_text("Make", &current.make)?,
        model: prompt::optional_text("Model", &current.model)?,
        seating_capacity: prompt::optional_number("Seating capacity", current.seating_capacity)?,
        vin: prompt::optional_text("VIN", &current.vin)?,
        license_number: prompt::optional_text("License number", &current.license_number)?,
        last_inspection: prompt::optional_date("Last inspection", current.last_inspection)?,
        status: prompt::choice("Status", STATUSES, &current.status)?,
        fuel_type: prompt::optional_text("Fuel type", &current.fuel_type)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if vehicle == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&validate_vehicle(&vehicle, Local::now().year()))?;

    vehicles_db.update(&vehicle)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let mut vehicles_db = Vehicles::new()?;
    let vehicle = vehicles_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    if !prompt::confirm_delete(&vehicle.label(), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    vehicles_db.delete(id)?;
    msg_success!(Message::RecordDeleted(ENTITY, id));
    Ok(())
}
