use crate::{
    commands::{date_range, ensure_valid},
    db::{
        error::DbError,
        time_cards::{TimeCard, TimeCards, DAY_TYPES},
    },
    libs::{
        config::Config,
        dates::{parse_date, parse_optional_time},
        messages::Message,
        prompt,
        time_entry::TimeEntryRules,
        validation::{ValidationResult, Validator},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

const ENTITY: &str = "Time card";
const ENTITY_PLURAL: &str = "Time cards";

#[derive(Debug, Args)]
pub struct TimecardArgs {
    #[command(subcommand)]
    command: TimecardCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Period {
    Week,
    Month,
}

#[derive(Debug, Subcommand)]
enum TimecardCommand {
    /// List time cards
    List {
        /// Cards for this driver
        #[arg(long)]
        driver: Option<i64>,
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Enter a time card; hours and overtime are computed from the clocks
    Add {
        /// Driver id
        driver: i64,
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(long)]
        day_type: Option<String>,
        /// Morning clock in
        #[arg(long = "in")]
        clock_in: Option<String>,
        #[arg(long)]
        lunch_out: Option<String>,
        #[arg(long)]
        lunch_in: Option<String>,
        /// Afternoon clock out
        #[arg(long = "out")]
        clock_out: Option<String>,
        #[arg(long)]
        am_route_out: Option<String>,
        #[arg(long)]
        am_route_in: Option<String>,
        #[arg(long)]
        pm_route_out: Option<String>,
        #[arg(long)]
        pm_route_in: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a time card interactively
    Edit { id: i64 },
    /// Delete a time card
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one time card
    Show { id: i64 },
    /// Weekly or monthly hours for a driver
    Totals {
        driver: i64,
        #[arg(short, long, value_enum, default_value = "week")]
        period: Period,
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
}

fn rules() -> Result<TimeEntryRules> {
    Ok(TimeEntryRules::new(Config::read()?.timecard.unwrap_or_default()))
}

fn check(rules: &TimeEntryRules, card: &TimeCard) -> Result<ValidationResult> {
    let mut result = rules.validate(card);
    Validator::new()?.check_driver(&mut result, Some(card.driver_id))?;
    Ok(result)
}

fn time(value: Option<String>) -> Result<Option<chrono::NaiveTime>> {
    parse_optional_time(value.as_deref().unwrap_or_default())
}

pub fn cmd(args: TimecardArgs) -> Result<()> {
    match args.command {
        TimecardCommand::List { driver, from, to } => {
            let cards_db = TimeCards::new()?;
            let cards = match (driver, date_range(from.as_deref(), to.as_deref())?) {
                (Some(driver_id), Some((from, to))) => cards_db.list_for_driver_between(driver_id, from, to)?,
                (Some(driver_id), None) => cards_db.list_by_driver(driver_id)?,
                (None, Some((from, to))) => cards_db.list_between(from, to)?,
                (None, None) => cards_db.list()?,
            };
            if cards.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            msg_print!(Message::ListHeader(ENTITY_PLURAL), true);
            View::time_cards(&cards)
        }
        TimecardCommand::Add {
            driver,
            date,
            day_type,
            clock_in,
            lunch_out,
            lunch_in,
            clock_out,
            am_route_out,
            am_route_in,
            pm_route_out,
            pm_route_in,
            notes,
        } => {
            let rules = rules()?;
            let mut card = TimeCard {
                day_type,
                am_clock_in: time(clock_in)?,
                lunch_clock_out: time(lunch_out)?,
                lunch_clock_in: time(lunch_in)?,
                pm_clock_out: time(clock_out)?,
                route_am_clock_out: time(am_route_out)?,
                route_am_clock_in: time(am_route_in)?,
                route_pm_clock_out: time(pm_route_out)?,
                route_pm_clock_in: time(pm_route_in)?,
                notes,
                ..TimeCard::new(driver, parse_date(&date)?)
            };
            ensure_valid(&check(&rules, &card)?)?;
            rules.apply_totals(&mut card);
            let id = TimeCards::new()?.insert(&card)?;
            msg_success!(Message::RecordCreated(ENTITY, id));
            if let Some(hours) = card.total_hours {
                msg_info!(Message::HoursRecorded(hours, card.overtime_hours.unwrap_or_default()));
            }
            Ok(())
        }
        TimecardCommand::Edit { id } => handle_edit(id),
        TimecardCommand::Delete { id, yes } => {
            let mut cards_db = TimeCards::new()?;
            let card = cards_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            if !prompt::confirm_delete(&format!("time card of driver {} on {}", card.driver_id, card.date), yes)? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            cards_db.delete(id)?;
            msg_success!(Message::RecordDeleted(ENTITY, id));
            Ok(())
        }
        TimecardCommand::Show { id } => {
            let card = TimeCards::new()?.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;
            View::time_cards(&[card])
        }
        TimecardCommand::Totals { driver, period, from, to } => {
            let cards_db = TimeCards::new()?;
            let cards = match date_range(from.as_deref(), to.as_deref())? {
                Some((from, to)) => cards_db.list_for_driver_between(driver, from, to)?,
                None => cards_db.list_by_driver(driver)?,
            };
            if cards.is_empty() {
                msg_info!(Message::NoRecordsFound(ENTITY_PLURAL));
                return Ok(());
            }
            let rules = rules()?;
            let totals = match period {
                Period::Week => rules.weekly_totals(&cards),
                Period::Month => rules.monthly_totals(&cards),
            };
            View::period_totals(&totals)
        }
    }
}

fn handle_edit(id: i64) -> Result<()> {
    let mut cards_db = TimeCards::new()?;
    let current = cards_db.get_by_id(id)?.ok_or(DbError::NotFound { entity: ENTITY, id })?;

    msg_print!(Message::EditingRecord(format!("time card of driver {} on {}", current.driver_id, current.date)), true);
    let mut card = TimeCard {
        date: prompt::date("Date", current.date)?,
        day_type: prompt::optional_choice("Day type", DAY_TYPES, current.day_type.as_deref())?,
        am_clock_in: prompt::optional_time("AM clock in", current.am_clock_in)?,
        lunch_clock_out: prompt::optional_time("Lunch clock out", current.lunch_clock_out)?,
        lunch_clock_in: prompt::optional_time("Lunch clock in", current.lunch_clock_in)?,
        pm_clock_out: prompt::optional_time("PM clock out", current.pm_clock_out)?,
        route_am_clock_out: prompt::optional_time("AM route out", current.route_am_clock_out)?,
        route_am_clock_in: prompt::optional_time("AM route in", current.route_am_clock_in)?,
        route_pm_clock_out: prompt::optional_time("PM route out", current.route_pm_clock_out)?,
        route_pm_clock_in: prompt::optional_time("PM route in", current.route_pm_clock_in)?,
        notes: prompt::optional_text("Notes", &current.notes)?,
        ..current.clone()
    };

    let rules = rules()?;
    rules.apply_totals(&mut card);
    if card == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    ensure_valid(&check(&rules, &card)?)?;

    cards_db.update(&card)?;
    msg_success!(Message::RecordUpdated(ENTITY, id));
    Ok(())
}
