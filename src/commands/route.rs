use crate::{
    commands::{date_range, ensure_valid},
    db::{
        error::DbError,
        routes::{Route, RouteRun, Routes},
    },
    libs::{dates::parse_date, details::FleetDetails, messages::Message, prompt, validation::Validator, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

const ENTITY: &str = "Route";
const ENTITY_PLURAL: &str = "Routes";

#[derive(Debug, Args)]
pub struct RouteArgs {
    #[command(subcommand)]
    command: RouteCommand,
}

#[derive(Debug, Subcommand)]
enum RouteCommand {
    /// List route days
    List {
        /// First day (or the only day without --to)
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
        /// Runs driven by this vehicle
        #[arg(long)]
        vehicle: Option<i64>,
        /// Runs driven by this driver
        #[arg(long)]
        driver: Option<i64>,
    },
    /// Record a route day
    Add {
        /// Route name, e.g. "North"
        name: String,
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(long)]
        am_vehicle: Option<i64>,
        #[arg(long)]
        am_begin: Option<f64>,
        #[arg(long)]
        am_end: Option<f64>,
        #[arg(long)]
        am_riders: Option<i32>,
        #[arg(long)]
        am_driver: Option<i64>,
        #[arg(long)]
        pm_vehicle: Option<i64>,
        #[arg(long)]
        pm_begin: Option<f64>,
        #[arg(long)]
        pm_end: Option<f64>,
        #[arg(long)]
        pm_riders: Option<i32>,
        #[arg(long)]
        pm_driver: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a route day interactively
    Edit { id: i64 },
    /// Delete a route day
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a route day with vehicles, drivers and mileage
    Show { id: i64 },
}

pub fn cmd(args: RouteArgs) -> Result<()> {
    match args.command {
        RouteCommand::List { from, to, vehicle, driver } => {
            let routes_db = Routes::new()?;
            let routes = match (date_range(from.as_deref(), to.as_deref())?, vehicle, driver) {
                (None, None, None) => routes_db.list()?,
                (range, vehicle_id, driver_id) => routes_db.search(range, vehicle_id, driver_id)?,
            };
            if routes.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::routes(&routes)
        }
        RouteCommand::Add {
            name,
            date,
            am_vehicle,
            am_begin,
            am_end,
            am_riders,
            am_driver,
            pm_vehicle,
            pm_begin,
            pm_end,
            pm_riders,
            pm_driver,
            notes,
        } => {
            let route = Route {
                am: RouteRun {
                    vehicle_id: am_vehicle,
                    begin_miles: am_begin,
                    end_miles: am_end,
                    riders: am_riders,
                    driver_id: am_driver,
                },
                pm: RouteRun {
                    vehicle_id: pm_vehicle,
                    begin_miles: pm_begin,
                    end_miles: pm_end,
                    riders: pm_riders,
                    driver_id: pm_driver,
                },
                notes,
                ..Route::new(parse_date(&date)?, &name)
            };
            ensure_valid(&Validator::new()?.route(&route)?)?;
            let id = Routes::new()?.insert(&route)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            Ok(())
        }
        RouteCommand::Edit { id } => handle_edit(id),
        RouteCommand::Delete { id, yes } => {
            let mut routes_db = Routes::new()?;
            let route = routes_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("{} on {}", route.route_name, route.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            routes_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        RouteCommand::Show { id } => match FleetDetails::new()?.route_details(id)? {
            Some(details) => View::route_details(&details),
            None => Err(DbError::NotFound { entity: ENTITY, id }.into()),
        },
    }
}

fn edit_run(label: &str, run: &RouteRun) -> Result<RouteRun> {
    Ok(RouteRun {
        vehicle_id: prompt::optional_number(&format!("{} vehicle id", label), run.vehicle_id)?,
        begin_miles: prompt::optional_number(&format!("{} beginning miles", label), run.begin_miles)?,
        end_miles: prompt::optional_number(&format!("{} ending miles", label), run.end_miles)?,
        riders: prompt::optional_number(&format!("{} riders", label), run.riders)?,
        driver_id: prompt::optional_number(&format!("{} driver id", label), run.driver_id)?,
    })
}

fn handle_edit(id: i64) -> Result<()> {
    let mut routes_db = Routes::new()?;
    let current = routes_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("{} on {}", current.route_name, current.date)), true);
    let route = Route {
        date: prompt::date("Date", current.date)?,
        route_name: prompt::text("Route name", &current.route_name)?,
        am: edit_run("AM", &current.am)?,
        pm: edit_run("PM", &current.pm)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    if route == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&Validator::new()?.route(&route)?)?;

    routes_db.update(&route)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
