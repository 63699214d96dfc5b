use crate::{
    commands::{date_range, ensure_valid},
    db::{
        activity_schedules::{ActivitySchedule, ActivitySchedules, TRIP_TYPES},
        error::DbError,
    },
    libs::{
        dates::{parse_date, parse_optional_time},
        messages::Message,
        prompt,
        validation::Validator,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

const ENTITY: &str = "Scheduled trip";
const ENTITY_PLURAL: &str = "Scheduled trips";

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    command: ScheduleCommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    /// List scheduled trips
    List {
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
        /// Trips assigned to this driver
        #[arg(long)]
        driver: Option<i64>,
    },
    /// Schedule a trip
    Add {
        destination: String,
        #[arg(short, long, default_value = "today")]
        date: String,
        /// Sports Trip, Activity Trip or Field Trip
        #[arg(long = "type")]
        trip_type: Option<String>,
        #[arg(long)]
        leave: Option<String>,
        #[arg(long)]
        event: Option<String>,
        #[arg(long = "return")]
        return_time: Option<String>,
        /// Expected number of riders
        #[arg(long)]
        riders: Option<i32>,
        #[arg(long)]
        vehicle: Option<i64>,
        #[arg(long)]
        driver: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a scheduled trip interactively
    Edit { id: i64 },
    /// Delete a scheduled trip
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one scheduled trip
    Show { id: i64 },
}

pub fn cmd(args: ScheduleArgs) -> Result<()> {
    match args.command {
        ScheduleCommand::List { from, to, driver } => {
            let schedules_db = ActivitySchedules::new()?;
            let schedules = match (driver, date_range(from.as_deref(), to.as_deref())?) {
                (Some(driver_id), Some((from, to))) => schedules_db.list_for_driver_between(driver_id, from, to)?,
                (Some(driver_id), None) => schedules_db.list_by_driver(driver_id)?,
                (None, Some((from, to))) => schedules_db.list_between(from, to)?,
                (None, None) => schedules_db.list()?,
            };
            if schedules.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::schedules(&schedules)
        }
        ScheduleCommand::Add {
            destination,
            date,
            trip_type,
            leave,
            event,
            return_time,
            riders,
            vehicle,
            driver,
            notes,
        } => {
            let schedule = ActivitySchedule {
                trip_type,
                leave_time: parse_optional_time(leave.as_deref().unwrap_or_default())?,
                event_time: parse_optional_time(event.as_deref().unwrap_or_default())?,
                return_time: parse_optional_time(return_time.as_deref().unwrap_or_default())?,
                riders,
                vehicle_id: vehicle,
                driver_id: driver,
                notes,
                ..ActivitySchedule::new(parse_date(&date)?, &destination)
            };
            ensure_valid(&Validator::new()?.schedule(&schedule)?)?;
            let id = ActivitySchedules::new()?.insert(&schedule)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        ScheduleCommand::Edit { id } => handle_edit(id),
        ScheduleCommand::Delete { id, yes } => {
            let mut schedules_db = ActivitySchedules::new()?;
            let schedule = schedules_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("{} on {}", schedule.destination, schedule.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            schedules_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        ScheduleCommand::Show { id } => {
            let schedule = ActivitySchedules::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::schedules(&[schedule])
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut schedules_db = ActivitySchedules::new()?;
    let current = schedules_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("{} on {}", current.destination, current.date)), true);
    let schedule = ActivitySchedule {
        date: prompt::date("Date", current.date)?,
        trip_type: prompt::optional_choice("Trip type", TRIP_TYPES, current.trip_type.as_deref())?,
        vehicle_id: prompt::optional_number("Vehicle id", current.vehicle_id)?,
        destination: prompt::text("Destination", &current.destination)?,
        leave_time: prompt::optional_time("Leave time", current.leave_time)?,
        event_time: prompt::optional_time("Event time", current.event_time)?,
        return_time: prompt::optional_time("Return time", current.return_time)?,
        riders: prompt::optional_number("Riders", current.riders)?,
        driver_id: prompt::optional_number("Driver id", current.driver_id)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if schedule == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&Validator::new()?.schedule(&schedule)?)?;

    schedules_db.update(&schedule)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
