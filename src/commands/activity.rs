use crate::{
    commands::{date_range, ensure_valid},
    db::{
        activities::{Activities, Activity},
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

const ENTITY: &str = "Activity";
const ENTITY_PLURAL: &str = "Activities";

#[derive(Debug, Args)]
pub struct ActivityArgs {
    #[command(subcommand)]
    command: ActivityCommand,
}

#[derive(Debug, Subcommand)]
enum ActivityCommand {
    /// List activity trips
    List {
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Add an activity trip
    Add {
        destination: String,
        #[arg(short, long, default_value = "today")]
        date: String,
        /// Kind of activity, e.g. "Sports Trip"
        #[arg(long = "type")]
        activity_type: Option<String>,
        /// Departure time
        #[arg(long)]
        leave: Option<String>,
        /// Event start time
        #[arg(long)]
        event: Option<String>,
        /// Return time
        #[arg(long = "return")]
        return_time: Option<String>,
        #[arg(long)]
        requested_by: Option<String>,
        #[arg(long)]
        vehicle: Option<i64>,
        #[arg(long)]
        driver: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit an activity trip interactively
    Edit { id: i64 },
    /// Delete an activity trip
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one activity trip
    Show { id: i64 },
}

pub fn cmd(args: ActivityArgs) -> Result<()> {
    match args.command {
        ActivityCommand::List { from, to } => {
            let activities_db = Activities::new()?;
            let activities = match date_range(from.as_deref(), to.as_deref())? {
                Some((from, to)) => activities_db.list_between(from, to)?,
                None => activities_db.list()?,
            };
            if activities.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::activities(&activities)
        }
        ActivityCommand::Add {
            destination,
            date,
            activity_type,
            leave,
            event,
            return_time,
            requested_by,
            vehicle,
            driver,
            notes,
        } => {
            let activity = Activity {
                activity_type,
                leave_time: parse_optional_time(leave.as_deref().unwrap_or_default())?,
                event_time: parse_optional_time(event.as_deref().unwrap_or_default())?,
                return_time: parse_optional_time(return_time.as_deref().unwrap_or_default())?,
                requested_by,
                vehicle_id: vehicle,
                driver_id: driver,
                notes,
                ..Activity::new(parse_date(&date)?, &destination)
            };
            ensure_valid(&Validator::new()?.activity(&activity)?)?;
            let id = Activities::new()?.insert(&activity)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        ActivityCommand::Edit { id } => handle_edit(id),
        ActivityCommand::Delete { id, yes } => {
            let mut activities_db = Activities::new()?;
            let activity = activities_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("{} on {}", activity.destination, activity.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            activities_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        ActivityCommand::Show { id } => {
            let activity = Activities::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::activities(&[activity])
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut activities_db = Activities::new()?;
    let current = activities_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("{} on {}", current.destination, current.date)), true);
    let activity = Activity {
        date: prompt::date("Date", current.date)?,
        activity_type: prompt::optional_text("Type", &current.activity_type)?,
        destination: prompt::text("Destination", &current.destination)?,
        leave_time: prompt::optional_time("Leave time", current.leave_time)?,
        event_time: prompt::optional_time("Event time", current.event_time)?,
        return_time: prompt::optional_time("Return time", current.return_time)?,
        requested_by: prompt::optional_text("Requested by", &current.requested_by)?,
        vehicle_id: prompt::optional_number("Vehicle id", current.vehicle_id)?,
        driver_id: prompt::optional_number("Driver id", current.driver_id)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if activity == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&Validator::new()?.activity(&activity)?)?;

    activities_db.update(&activity)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
