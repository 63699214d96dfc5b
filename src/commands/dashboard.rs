use crate::{
    libs::{dates::parse_date, details::FleetDetails, messages::Message, view::View},
    msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[arg(short, long, default_value = "today")]
    date: String,
}

pub fn cmd(args: DashboardArgs) -> Result<()> {
    let day = parse_date(&args.date)?;
    let dashboard = FleetDetails::new()?.dashboard(day)?;

    msg_print!(Message::DashboardHeader, true);
    View::dashboard(&dashboard)?;

    if dashboard.route_day && dashboard.todays_routes == 0 {
        msg_warning!(Message::RoutesNotRecorded(day.to_string()));
    }
    Ok(())
}
