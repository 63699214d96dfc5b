//! Time card rules: clock pairing, ordering, daily limits and overtime.

use crate::db::time_cards::TimeCard;
use crate::libs::config::TimeCardConfig;
use crate::libs::dates::hours_between;
use crate::libs::validation::ValidationResult;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for a week or a month of time cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub period_start: NaiveDate,
    pub days_worked: usize,
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
}

impl PeriodTotals {
    fn empty(period_start: NaiveDate) -> Self {
        Self {
            period_start,
            days_worked: 0,
            total_hours: 0.0,
            regular_hours: 0.0,
            overtime_hours: 0.0,
        }
    }

    fn add(&mut self, other: &PeriodTotals) {
        self.days_worked += other.days_worked;
        self.total_hours += other.total_hours;
        self.regular_hours += other.regular_hours;
        self.overtime_hours += other.overtime_hours;
    }
}

pub struct TimeEntryRules {
    limits: TimeCardConfig,
}

impl TimeEntryRules {
    pub fn new(limits: TimeCardConfig) -> Self {
        Self { limits }
    }

    pub fn validate(&self, card: &TimeCard) -> ValidationResult {
        let mut result = ValidationResult::new();

        let pairs = [
            ("AM clock in", card.am_clock_in, "PM clock out", card.pm_clock_out),
            ("Lunch clock out", card.lunch_clock_out, "Lunch clock in", card.lunch_clock_in),
            ("AM route out", card.route_am_clock_out, "AM route in", card.route_am_clock_in),
            ("PM route out", card.route_pm_clock_out, "PM route in", card.route_pm_clock_in),
        ];
        for (first_label, first, second_label, second) in pairs {
            match (first, second) {
                (Some(_), None) => result.add(format!("{} requires {}", first_label, second_label)),
                (None, Some(_)) => result.add(format!("{} requires {}", second_label, first_label)),
                _ => {}
            }
        }

        let day = [
            ("AM clock in", card.am_clock_in),
            ("Lunch clock out", card.lunch_clock_out),
            ("Lunch clock in", card.lunch_clock_in),
            ("PM clock out", card.pm_clock_out),
        ];
        let present: Vec<(&str, NaiveTime)> = day.iter().filter_map(|(label, time)| time.map(|t| (*label, t))).collect();
        for window in present.windows(2) {
            let ((earlier_label, earlier), (later_label, later)) = (window[0], window[1]);
            result.check(earlier <= later, format!("{} must not be after {}", earlier_label, later_label));
        }

        let routes = [
            ("AM route", card.route_am_clock_out, card.route_am_clock_in),
            ("PM route", card.route_pm_clock_out, card.route_pm_clock_in),
        ];
        for (label, out, back) in routes {
            let (Some(out), Some(back)) = (out, back) else {
                continue;
            };
            result.check(out <= back, format!("{} must return after it leaves", label));
            if let (Some(start), Some(end)) = (card.am_clock_in, card.pm_clock_out) {
                result.check(out >= start && back <= end, format!("{} must fall within the working day", label));
            }
        }

        if let Some(hours) = self.compute_hours(card) {
            result.check(hours >= 0.0, "Worked hours cannot be negative");
            result.check(
                hours <= self.limits.max_daily_hours,
                format!("Worked hours exceed the {:.0} hour daily limit", self.limits.max_daily_hours),
            );
        }

        result
    }

    /// Hours from AM clock in to PM clock out, less the lunch break.
    pub fn compute_hours(&self, card: &TimeCard) -> Option<f64> {
        let worked = hours_between(card.am_clock_in?, card.pm_clock_out?);
        let lunch = match (card.lunch_clock_out, card.lunch_clock_in) {
            (Some(out), Some(back)) => hours_between(out, back).max(0.0),
            _ => 0.0,
        };
        Some(round_hours(worked - lunch))
    }

    /// Fills `total_hours` and `overtime_hours` from the clock times.
    pub fn apply_totals(&self, card: &mut TimeCard) {
        match self.compute_hours(card) {
            Some(total) => {
                card.total_hours = Some(total);
                card.overtime_hours = Some(self.daily_overtime(total));
            }
            None => {
                card.total_hours = None;
                card.overtime_hours = None;
            }
        }
    }

    /// Totals per week (weeks start on Monday).
    pub fn weekly_totals(&self, cards: &[TimeCard]) -> Vec<PeriodTotals> {
        let mut weeks: BTreeMap<NaiveDate, Vec<&TimeCard>> = BTreeMap::new();
        for card in cards {
            weeks.entry(week_start(card.date)).or_default().push(card);
        }
        weeks.into_iter().map(|(start, cards)| self.week_total(start, &cards)).collect()
    }

    /// Totals per calendar month. A week belongs to the month it starts in, so
    /// weekly overtime is never split across two months.
    pub fn monthly_totals(&self, cards: &[TimeCard]) -> Vec<PeriodTotals> {
        let mut months: BTreeMap<NaiveDate, PeriodTotals> = BTreeMap::new();
        for week in self.weekly_totals(cards) {
            let Some(first) = week.period_start.with_day(1) else {
                continue;
            };
            months.entry(first).or_insert_with(|| PeriodTotals::empty(first)).add(&week);
        }
        months.into_values().collect()
    }

    fn hours_for(&self, card: &TimeCard) -> f64 {
        card.total_hours.or_else(|| self.compute_hours(card)).unwrap_or(0.0)
    }

    fn daily_overtime(&self, total: f64) -> f64 {
        round_hours((total - self.limits.regular_daily_hours).max(0.0))
    }

    /// Overtime for a week is the larger of the daily excess and the weekly excess.
    fn week_total(&self, start: NaiveDate, cards: &[&TimeCard]) -> PeriodTotals {
        let mut week = PeriodTotals::empty(start);
        let mut daily_overtime = 0.0;
        for card in cards {
            let hours = self.hours_for(card);
            if hours > 0.0 {
                week.days_worked += 1;
            }
            week.total_hours += hours;
            daily_overtime += self.daily_overtime(hours);
        }
        let weekly_overtime = (week.total_hours - self.limits.regular_weekly_hours).max(0.0);
        week.total_hours = round_hours(week.total_hours);
        week.overtime_hours = round_hours(daily_overtime.max(weekly_overtime));
        week.regular_hours = round_hours(week.total_hours - week.overtime_hours);
        week
    }
}

impl Default for TimeEntryRules {
    fn default() -> Self {
        Self::new(TimeCardConfig::default())
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn card(date: NaiveDate, start: u32, end: u32) -> TimeCard {
        let mut card = TimeCard::new(1, date);
        card.am_clock_in = time(start, 0);
        card.lunch_clock_out = time(12, 0);
        card.lunch_clock_in = time(12, 30);
        card.pm_clock_out = time(end, 0);
        card
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_hours_subtracts_lunch() {
        let rules = TimeEntryRules::default();
        assert_eq!(rules.compute_hours(&card(date(2024, 9, 2), 7, 16)), Some(8.5));

        let mut open = TimeCard::new(1, date(2024, 9, 2));
        open.am_clock_in = time(7, 0);
        assert_eq!(rules.compute_hours(&open), None);
    }

    #[test]
    fn test_apply_totals_sets_overtime() {
        let rules = TimeEntryRules::default();
        let mut long_day = card(date(2024, 9, 2), 6, 17);
        rules.apply_totals(&mut long_day);
        assert_eq!(long_day.total_hours, Some(10.5));
        assert_eq!(long_day.overtime_hours, Some(2.5));
    }

    #[test]
    fn test_validate_accepts_regular_day() {
        let rules = TimeEntryRules::default();
        let mut day = card(date(2024, 9, 2), 6, 16);
        day.route_am_clock_out = time(6, 15);
        day.route_am_clock_in = time(8, 0);
        assert!(rules.validate(&day).is_valid());
    }

    #[test]
    fn test_validate_rejects_unpaired_and_misordered_clocks() {
        let rules = TimeEntryRules::default();

        let mut unpaired = card(date(2024, 9, 2), 7, 15);
        unpaired.lunch_clock_in = None;
        assert!(!rules.validate(&unpaired).is_valid());

        let mut misordered = card(date(2024, 9, 2), 7, 15);
        misordered.lunch_clock_out = time(13, 0);
        assert!(!rules.validate(&misordered).is_valid());

        let mut route_outside_day = card(date(2024, 9, 2), 7, 15);
        route_outside_day.route_pm_clock_out = time(15, 0);
        route_outside_day.route_pm_clock_in = time(17, 0);
        assert!(!rules.validate(&route_outside_day).is_valid());
    }

    #[test]
    fn test_validate_rejects_day_over_limit() {
        let rules = TimeEntryRules::default();
        let mut marathon = TimeCard::new(1, date(2024, 9, 2));
        marathon.am_clock_in = time(4, 0);
        marathon.pm_clock_out = time(22, 0);
        let result = rules.validate(&marathon);
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_weekly_totals_split_regular_and_overtime() {
        let rules = TimeEntryRules::default();
        // Monday 2024-09-02 through Friday, 9.5 hours each day
        let cards: Vec<TimeCard> = (2..=6).map(|d| card(date(2024, 9, d), 6, 16)).collect();
        let weeks = rules.weekly_totals(&cards);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].period_start, date(2024, 9, 2));
        assert_eq!(weeks[0].days_worked, 5);
        assert_eq!(weeks[0].total_hours, 47.5);
        assert_eq!(weeks[0].overtime_hours, 7.5);
        assert_eq!(weeks[0].regular_hours, 40.0);
    }

    #[test]
    fn test_monthly_totals_group_by_month() {
        let rules = TimeEntryRules::default();
        let cards = vec![card(date(2024, 8, 30), 7, 15), card(date(2024, 9, 3), 7, 15), card(date(2024, 9, 4), 7, 15)];
        let months = rules.monthly_totals(&cards);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].period_start, date(2024, 8, 1));
        assert_eq!(months[0].total_hours, 7.5);
        assert_eq!(months[1].days_worked, 2);
        assert_eq!(months[1].total_hours, 15.0);
        assert_eq!(months[1].overtime_hours, 0.0);
    }

    #[test]
    fn test_week_spanning_months_keeps_weekly_overtime() {
        let rules = TimeEntryRules::default();
        // Monday 2024-09-30 through Saturday 2024-10-05, 8.5 hours each day
        let cards: Vec<TimeCard> = [(9, 30), (10, 1), (10, 2), (10, 3), (10, 4), (10, 5)]
            .iter()
            .map(|&(m, d)| card(date(2024, m, d), 7, 16))
            .collect();

        let weeks = rules.weekly_totals(&cards);
        let months = rules.monthly_totals(&cards);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].period_start, date(2024, 9, 1));
        assert_eq!(months[0].total_hours, 51.0);
        assert_eq!(months[0].overtime_hours, 11.0);
        assert_eq!(months[0].overtime_hours, weeks[0].overtime_hours);
    }
}
