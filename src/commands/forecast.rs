use crate::{
    db::{fuel::FuelRecords, maintenance::MaintenanceRecords, vehicles::Vehicles},
    libs::{config::Config, forecast::MaintenanceForecaster, forecast::Priority, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Only this vehicle
    #[arg(long)]
    vehicle: Option<i64>,
    /// Hide low priority items
    #[arg(long)]
    urgent: bool,
}

pub fn cmd(args: ForecastArgs) -> Result<()> {
    let thresholds = Config::read()?.maintenance.unwrap_or_default();
    let forecaster = MaintenanceForecaster::new(thresholds);

    let vehicles: Vec<_> = Vehicles::new()?
        .list()?
        .into_iter()
        .filter(|v| args.vehicle.is_none() || v.id == args.vehicle)
        .collect();
    let maintenance = MaintenanceRecords::new()?.list()?;
    let fuel = FuelRecords::new()?.list()?;

    let mut predictions = forecaster.predict_fleet(&vehicles, &maintenance, &fuel, Local::now().date_naive());
    if args.urgent {
        predictions.retain(|p| p.priority > Priority::Low);
    }

    if predictions.is_empty() {
        msg_info!(Message::NoMaintenanceDue);
        return Ok(());
    }

    msg_print!(Message::ForecastHeader(predictions.len()), true);
    View::predictions(&predictions)
}
