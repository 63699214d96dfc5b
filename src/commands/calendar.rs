use crate::{
    commands::{date_range, ensure_valid},
    db::{
        error::DbError,
        school_calendar::{SchoolCalendar, SchoolCalendars, CATEGORIES},
    },
    libs::{
        dates::{parse_date, parse_optional_date},
        messages::Message,
        prompt,
        validation::validate_calendar,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

const ENTITY: &str = "Calendar entry";
const ENTITY_PLURAL: &str = "Calendar entries";

#[derive(Debug, Args)]
pub struct CalendarArgs {
    #[command(subcommand)]
    command: CalendarCommand,
}

#[derive(Debug, Subcommand)]
enum CalendarCommand {
    /// List calendar entries
    List {
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Add a calendar entry
    Add {
        /// School Day, Holiday, Spring Break, ...
        category: String,
        /// First day
        #[arg(short, long, default_value = "today")]
        date: String,
        /// Last day of a multi-day entry
        #[arg(short, long)]
        end: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Regular routes run on these days
        #[arg(long)]
        routes: bool,
    },
    /// Edit a calendar entry interactively
    Edit { id: i64 },
    /// Delete a calendar entry
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one calendar entry
    Show { id: i64 },
    /// Tell whether routes run on a day
    Check {
        #[arg(default_value = "today")]
        date: String,
    },
}

pub fn cmd(args: CalendarArgs) -> Result<()> {
    match args.command {
        CalendarCommand::List { from, to } => {
            let calendar_db = SchoolCalendars::new()?;
            let entries = match date_range(from.as_deref(), to.as_deref())? {
                Some((from, to)) => calendar_db.list_between(from, to)?,
                None => calendar_db.list()?,
            };
            if entries.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::calendar(&entries)
        }
        CalendarCommand::Add {
            category,
            date,
            end,
            description,
            routes,
        } => {
            let entry = SchoolCalendar {
                end_date: parse_optional_date(end.as_deref().unwrap_or_default())?,
                description,
                ..SchoolCalendar::new(parse_date(&date)?, &category, routes)
            };
            ensure_valid(&validate_calendar(&entry))?;
            let id = SchoolCalendars::new()?.insert(&entry)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        CalendarCommand::Edit { id } => handle_edit(id),
        CalendarCommand::Delete { id, yes } => {
            let mut calendar_db = SchoolCalendars::new()?;
            let entry = calendar_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("{} on {}", entry.category, entry.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            calendar_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        CalendarCommand::Show { id } => {
            let entry = SchoolCalendars::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::calendar(&[entry])
        }
        CalendarCommand::Check { date } => {
            let day = parse_date(&date)?;
            if SchoolCalendars::new()?.is_route_day(day)? {
                msg_info!(Message::RouteDay(day.to_string()));
            } else {
                msg_info!(Message::NoRouteDay(day.to_string()));
            }
            Ok(())
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut calendar_db = SchoolCalendars::new()?;
    let current = calendar_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("{} on {}", current.category, current.date)), true);
    let entry = SchoolCalendar {
        date: prompt::date("First day", current.date)?,
        end_date: prompt::optional_date("Last day", current.end_date)?,
        category: prompt::choice("Category", CATEGORIES, &current.category)?,
        description: prompt::optional_text("Description", &current.description)?,
        route_needed: prompt::flag("Routes run?", current.route_needed)?,
        ..current.clone()
    };

    if entry == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&validate_calendar(&entry))?;

    calendar_db.update(&entry)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
