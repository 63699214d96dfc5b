use crate::{
    commands::date_range,
    db::{drivers::Drivers, fuel::FuelRecords, routes::Routes, vehicles::Vehicles},
    libs::{
        analytics::{driver_performance, summarize, summarize_by_name, vehicle_efficiency},
        messages::Message,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// First day of the period (all history when omitted)
    #[arg(short, long)]
    from: Option<String>,
    /// Last day of the period
    #[arg(short, long)]
    to: Option<String>,
}

pub fn cmd(args: AnalyticsArgs) -> Result<()> {
    let range = date_range(args.from.as_deref(), args.to.as_deref())?;
    let routes = match range {
        Some((from, to)) => Routes::new()?.list_between(from, to)?,
        None => Routes::new()?.list()?,
    };

    if routes.is_empty() {
        msg_info!(Message::NoRecordsFound("Routes"));
    } else {
        msg_print!(Message::RouteSummaryHeader, true);
        View::route_summaries(&summarize_by_name(&routes), &summarize(&routes))?;

        let names: BTreeMap<i64, String> = Drivers::new()?.list()?.into_iter().filter_map(|d| Some((d.id?, d.name))).collect();
        msg_print!(Message::DriverPerformanceHeader, true);
        View::driver_performance(&driver_performance(&routes), &names)?;
    }

    let fuel = match range {
        Some((from, to)) => FuelRecords::new()?.list_between(from, to)?,
        None => FuelRecords::new()?.list()?,
    };
    let efficiency: Vec<_> = Vehicles::new()?
        .list()?
        .into_iter()
        .filter_map(|vehicle| {
            let id = vehicle.id?;
            let stats = vehicle_efficiency(id, &fuel);
            (stats.fill_count > 0).then_some((vehicle, stats))
        })
        .collect();
    if !efficiency.is_empty() {
        msg_print!(Message::FuelEfficiencyHeader, true);
        View::efficiency(&efficiency)?;
    }
    Ok(())
}
