//! Scheduling and reporting computations.
//!
//! Pure functions over already-fetched rows: period filtering, per-member
//! hour/cost aggregation, and bulk shift-day expansion. Nothing in here
//! touches the database.

pub mod calendar;

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Shift, ShiftStatus, TeamMember};

/// Reporting period anchored on "today".
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl StatsPeriod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "week" => Some(StatsPeriod::Week),
            "month" => Some(StatsPeriod::Month),
            "quarter" => Some(StatsPeriod::Quarter),
            "year" => Some(StatsPeriod::Year),
            _ => None,
        }
    }

    /// First day of the period containing `today`.
    ///
    /// Weeks start on Monday; quarters on Jan/Apr/Jul/Oct 1.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            StatsPeriod::Week => monday_of_week(today),
            StatsPeriod::Month => today.with_day(1).unwrap_or(today),
            StatsPeriod::Quarter => {
                let quarter_month = ((today.month() - 1) / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_month, 1).unwrap_or(today)
            }
            StatsPeriod::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }
}

/// Monday of the week containing `date`. A Sunday wraps back six days.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Parse a canonical ISO date string (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an HH:MM time into minutes since midnight.
pub fn parse_time_minutes(s: &str) -> Option<i64> {
    let (h, m) = s.split_once(':')?;
    let h: i64 = h.parse().ok()?;
    let m: i64 = m.parse().ok()?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some(h * 60 + m)
}

/// Naive same-day shift duration in fractional hours.
///
/// An overnight shift (end before start) yields a NEGATIVE duration. This
/// mirrors the longstanding behavior of the reporting screens; callers must
/// not assume the value is non-negative. Unparseable times count as zero.
pub fn shift_duration_hours(start_time: &str, end_time: &str) -> f64 {
    match (parse_time_minutes(start_time), parse_time_minutes(end_time)) {
        (Some(start), Some(end)) => (end - start) as f64 / 60.0,
        _ => 0.0,
    }
}

/// Per-member aggregation row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub email: String,
    pub name: String,
    pub shift_count: i64,
    pub total_hours: f64,
    pub total_cost: f64,
    pub completed_count: i64,
    pub completion_rate: f64,
}

/// Aggregate report over a period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStats {
    pub period_start: String,
    pub total_shifts: i64,
    pub total_hours: f64,
    pub total_cost: f64,
    pub completion_rate: f64,
    pub per_member: Vec<MemberStats>,
}

/// Compute per-period shift statistics.
///
/// Shifts dated before `period_start` are excluded. Shifts without an
/// assignee, or whose assignee has no member row, are silently skipped.
pub fn compute_shift_stats(
    shifts: &[Shift],
    members: &[TeamMember],
    period_start: NaiveDate,
) -> ShiftStats {
    let mut groups: BTreeMap<&str, Vec<&Shift>> = BTreeMap::new();

    for shift in shifts {
        let Some(date) = parse_date(&shift.date) else {
            continue;
        };
        if date < period_start {
            continue;
        }
        let Some(assignee) = shift.assigned_to.as_deref() else {
            continue;
        };
        groups.entry(assignee).or_default().push(shift);
    }

    let mut per_member = Vec::new();
    let mut total_shifts = 0i64;
    let mut total_hours = 0.0f64;
    let mut total_cost = 0.0f64;
    let mut total_completed = 0i64;

    for (email, member_shifts) in groups {
        let Some(member) = members.iter().find(|m| m.email == email) else {
            // Unknown assignee: the shift is ignored in the report.
            continue;
        };

        let shift_count = member_shifts.len() as i64;
        let hours: f64 = member_shifts
            .iter()
            .map(|s| shift_duration_hours(&s.start_time, &s.end_time))
            .sum();
        let cost = hours * member.hourly_rate;
        let completed = member_shifts
            .iter()
            .filter(|s| s.status == ShiftStatus::Completed)
            .count() as i64;
        let completion_rate = if shift_count > 0 {
            completed as f64 / shift_count as f64
        } else {
            0.0
        };

        total_shifts += shift_count;
        total_hours += hours;
        total_cost += cost;
        total_completed += completed;

        per_member.push(MemberStats {
            email: member.email.clone(),
            name: member.name.clone(),
            shift_count,
            total_hours: hours,
            total_cost: cost,
            completed_count: completed,
            completion_rate,
        });
    }

    let completion_rate = if total_shifts > 0 {
        total_completed as f64 / total_shifts as f64
    } else {
        0.0
    };

    ShiftStats {
        period_start: period_start.format("%Y-%m-%d").to_string(),
        total_shifts,
        total_hours,
        total_cost,
        completion_rate,
        per_member,
    }
}

/// Expand a bulk-generation request into the matching calendar days.
///
/// Iterates day by day from `start` through `end` inclusive, keeping days
/// whose weekday number (0 = Sunday .. 6 = Saturday) is selected.
pub fn expand_bulk_days(start: NaiveDate, end: NaiveDate, weekdays: &[u8]) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if weekdays.contains(&(day.weekday().num_days_from_sunday() as u8)) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}
