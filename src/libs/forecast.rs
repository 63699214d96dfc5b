//! Predictive maintenance from static thresholds.
//!
//! For each vehicle the forecast looks at the highest known odometer reading
//! (from fuel and maintenance records), the last service of each kind, the last
//! inspection date and the model year, and raises a [`Prediction`] whenever a
//! configured threshold is reached or close. Costs are estimated from the
//! vehicle's own history for that kind of work when there is any.

use crate::db::fuel::Fuel;
use crate::db::maintenance::Maintenance;
use crate::db::vehicles::Vehicle;
use crate::libs::analytics::ratio;
use crate::libs::config::MaintenanceConfig;
use crate::libs::fleet::vehicle_age;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Share of an interval after which an upcoming service is reported.
const WARNING_RATIO: f64 = 0.9;
const OVERDUE_RATIO: f64 = 1.0;
const CRITICAL_RATIO: f64 = 1.25;
const MIN_FILLS_FOR_TREND: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionKind {
    OilChange,
    Brakes,
    Tires,
    Inspection,
    ReplacementReview,
    FuelEfficiency,
}

impl PredictionKind {
    /// Keyword matched against maintenance categories.
    fn keyword(&self) -> &'static str {
        match self {
            PredictionKind::OilChange => "oil",
            PredictionKind::Brakes => "brake",
            PredictionKind::Tires => "tire",
            PredictionKind::Inspection => "inspection",
            PredictionKind::ReplacementReview => "replacement",
            PredictionKind::FuelEfficiency => "engine",
        }
    }

    fn default_cost(&self) -> f64 {
        match self {
            PredictionKind::OilChange => 150.0,
            PredictionKind::Brakes => 900.0,
            PredictionKind::Tires => 2_400.0,
            PredictionKind::Inspection => 200.0,
            PredictionKind::ReplacementReview => 0.0,
            PredictionKind::FuelEfficiency => 350.0,
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PredictionKind::OilChange => "Oil change",
            PredictionKind::Brakes => "Brake service",
            PredictionKind::Tires => "Tire replacement",
            PredictionKind::Inspection => "Annual inspection",
            PredictionKind::ReplacementReview => "Replacement review",
            PredictionKind::FuelEfficiency => "Fuel efficiency check",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub vehicle_id: i64,
    pub vehicle_number: String,
    pub kind: PredictionKind,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub reason: String,
    pub estimated_cost: f64,
}

pub struct MaintenanceForecaster {
    thresholds: MaintenanceConfig,
}

impl MaintenanceForecaster {
    pub fn new(thresholds: MaintenanceConfig) -> Self {
        Self { thresholds }
    }

    /// Predictions for one vehicle, most urgent first.
    pub fn predict(&self, vehicle: &Vehicle, maintenance: &[Maintenance], fuel: &[Fuel], today: NaiveDate) -> Vec<Prediction> {
        let Some(vehicle_id) = vehicle.id else {
            return Vec::new();
        };
        let history: Vec<&Maintenance> = maintenance.iter().filter(|m| m.vehicle_id == vehicle_id).collect();
        let fills: Vec<&Fuel> = fuel.iter().filter(|f| f.vehicle_id == vehicle_id).collect();
        let odometer = current_odometer(&history, &fills);

        let mut predictions = Vec::new();
        let mileage_rules = [
            (PredictionKind::OilChange, self.thresholds.oil_change_miles),
            (PredictionKind::Brakes, self.thresholds.brake_miles),
            (PredictionKind::Tires, self.thresholds.tire_miles),
        ];
        if let Some(odometer) = odometer {
            for (kind, interval) in mileage_rules {
                if let Some(prediction) = self.mileage_prediction(vehicle, kind, interval, odometer, &history) {
                    predictions.push(prediction);
                }
            }
        }
        predictions.extend(self.inspection_prediction(vehicle, &history, today));
        predictions.extend(self.age_prediction(vehicle, today));
        predictions.extend(self.efficiency_prediction(vehicle, &history, &fills));

        predictions.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.due_date.cmp(&b.due_date)));
        predictions
    }

    /// Predictions for a whole fleet, most urgent first. Retired vehicles are skipped.
    pub fn predict_fleet(&self, vehicles: &[Vehicle], maintenance: &[Maintenance], fuel: &[Fuel], today: NaiveDate) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> = vehicles
            .iter()
            .filter(|v| !v.status.eq_ignore_ascii_case(crate::db::vehicles::STATUS_RETIRED))
            .flat_map(|v| self.predict(v, maintenance, fuel, today))
            .collect();
        predictions.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.vehicle_number.cmp(&b.vehicle_number)));
        predictions
    }

    fn mileage_prediction(&self, vehicle: &Vehicle, kind: PredictionKind, interval: f64, odometer: f64, history: &[&Maintenance]) -> Option<Prediction> {
        if interval <= 0.0 {
            return None;
        }
        let last_service = history
            .iter()
            .filter(|m| m.is_category(kind.keyword()))
            .filter_map(|m| m.odometer)
            .fold(None, |acc: Option<f64>, o| Some(acc.map_or(o, |a| a.max(o))));
        let since = odometer - last_service.unwrap_or(0.0);
        let used = since / interval;

        let priority = if used >= CRITICAL_RATIO {
            Priority::Critical
        } else if used >= OVERDUE_RATIO {
            Priority::High
        } else if used >= WARNING_RATIO {
            Priority::Medium
        } else {
            return None;
        };

        let remaining = interval - since;
        let reason = if remaining <= 0.0 {
            format!("{:.0} miles since last service, {:.0} miles overdue", since, -remaining)
        } else {
            format!("{:.0} miles since last service, due in {:.0} miles", since, remaining)
        };
        Some(self.prediction(vehicle, kind, priority, None, reason, history))
    }

    fn inspection_prediction(&self, vehicle: &Vehicle, history: &[&Maintenance], today: NaiveDate) -> Option<Prediction> {
        let kind = PredictionKind::Inspection;
        let recorded = history.iter().filter(|m| m.is_category(kind.keyword())).map(|m| m.date).max();
        let last = match (vehicle.last_inspection, recorded) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let Some(last) = last else {
            return Some(self.prediction(vehicle, kind, Priority::High, Some(today), "No inspection on record".to_string(), history));
        };

        let due = last + Duration::days(self.thresholds.inspection_days);
        let days_left = (due - today).num_days();
        let (priority, reason) = if days_left < -30 {
            (Priority::Critical, format!("Inspection overdue by {} days", -days_left))
        } else if days_left < 0 {
            (Priority::High, format!("Inspection overdue by {} days", -days_left))
        } else if days_left <= self.thresholds.inspection_warning_days {
            (Priority::Medium, format!("Inspection due in {} days", days_left))
        } else {
            return None;
        };
        Some(self.prediction(vehicle, kind, priority, Some(due), reason, history))
    }

    fn age_prediction(&self, vehicle: &Vehicle, today: NaiveDate) -> Option<Prediction> {
        let age = vehicle_age(vehicle, today.year())?;
        if age < self.thresholds.replacement_age_years {
            return None;
        }
        Some(self.prediction(
            vehicle,
            PredictionKind::ReplacementReview,
            Priority::Low,
            None,
            format!("Vehicle is {} years old", age),
            &[],
        ))
    }

    /// Compares fill-to-fill economy of the later half of the fills with the earlier half.
    fn efficiency_prediction(&self, vehicle: &Vehicle, history: &[&Maintenance], fills: &[&Fuel]) -> Option<Prediction> {
        let mut measured: Vec<(f64, f64)> = fills.iter().filter_map(|f| Some((f.odometer?, f.gallons?))).collect();
        if measured.len() < MIN_FILLS_FOR_TREND {
            return None;
        }
        measured.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let middle = measured.len() / 2;
        let earlier = segment_mpg(&measured[..=middle])?;
        let later = segment_mpg(&measured[middle..])?;
        // A stalled odometer gives no baseline to compare against
        if earlier <= 0.0 {
            return None;
        }
        let drop = (earlier - later) / earlier * 100.0;
        if !drop.is_finite() || drop < self.thresholds.efficiency_drop_percent {
            return None;
        }
        Some(self.prediction(
            vehicle,
            PredictionKind::FuelEfficiency,
            Priority::Medium,
            None,
            format!("Fuel economy fell {:.0}% ({:.1} to {:.1} mpg)", drop, earlier, later),
            history,
        ))
    }

    fn prediction(
        &self,
        vehicle: &Vehicle,
        kind: PredictionKind,
        priority: Priority,
        due_date: Option<NaiveDate>,
        reason: String,
        history: &[&Maintenance],
    ) -> Prediction {
        Prediction {
            vehicle_id: vehicle.id.unwrap_or_default(),
            vehicle_number: vehicle.vehicle_number.clone(),
            kind,
            priority,
            due_date,
            reason,
            estimated_cost: estimate_cost(kind, history),
        }
    }
}

/// Highest odometer reading seen in either history.
fn current_odometer(history: &[&Maintenance], fills: &[&Fuel]) -> Option<f64> {
    history
        .iter()
        .filter_map(|m| m.odometer)
        .chain(fills.iter().filter_map(|f| f.odometer))
        .fold(None, |acc: Option<f64>, o| Some(acc.map_or(o, |a| a.max(o))))
}

/// Fill-to-fill MPG over consecutive `(odometer, gallons)` readings.
fn segment_mpg(readings: &[(f64, f64)]) -> Option<f64> {
    let (first, last) = (readings.first()?, readings.last()?);
    let gallons: f64 = readings.iter().skip(1).map(|r| r.1).sum();
    ratio(last.0 - first.0, gallons)
}

fn estimate_cost(kind: PredictionKind, history: &[&Maintenance]) -> f64 {
    let costs: Vec<f64> = history.iter().filter(|m| m.is_category(kind.keyword())).filter_map(|m| m.cost).collect();
    ratio(costs.iter().sum(), costs.len() as f64).unwrap_or_else(|| kind.default_cost())
}
