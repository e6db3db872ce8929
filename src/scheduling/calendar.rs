//! Week and month calendar grids.
//!
//! Maps flat date-stamped row lists onto Monday-start grids. Cell membership
//! is exact date-string equality, so rows must carry canonical YYYY-MM-DD
//! dates (enforced at the API boundary).

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::monday_of_week;
use crate::models::{Availability, CalendarEvent, Shift};

/// One day cell in a week or month grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: String,
    /// False for the padding days a month grid borrows from adjacent months.
    pub in_month: bool,
    pub shifts: Vec<Shift>,
    pub availability: Vec<Availability>,
    pub events: Vec<CalendarEvent>,
}

/// A rendered calendar grid: 7 cells for a week, 42 for a month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub anchor: String,
    pub cells: Vec<CalendarCell>,
}

/// The seven days of the week containing `anchor`, starting Monday.
pub fn week_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let monday = monday_of_week(anchor);
    (0..7).map(|i| monday + Duration::days(i)).collect()
}

/// The 42 days (6 rows of 7) of the month grid containing `anchor`.
///
/// The grid starts on the Monday of the week holding the 1st, padded with
/// leading and trailing days from the adjacent months.
pub fn month_grid_days(anchor: NaiveDate) -> Vec<(NaiveDate, bool)> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let grid_start = monday_of_week(first);
    (0..42)
        .map(|i| {
            let day = grid_start + Duration::days(i);
            let in_month = day.year() == anchor.year() && day.month() == anchor.month();
            (day, in_month)
        })
        .collect()
}

/// Assemble a grid from flat row lists by exact date equality per cell.
pub fn build_grid(
    anchor: NaiveDate,
    days: Vec<(NaiveDate, bool)>,
    shifts: &[Shift],
    availability: &[Availability],
    events: &[CalendarEvent],
) -> CalendarGrid {
    let cells = days
        .into_iter()
        .map(|(day, in_month)| {
            let date = day.format("%Y-%m-%d").to_string();
            CalendarCell {
                shifts: shifts.iter().filter(|s| s.date == date).cloned().collect(),
                availability: availability
                    .iter()
                    .filter(|a| a.date == date)
                    .cloned()
                    .collect(),
                events: events.iter().filter(|e| e.date == date).cloned().collect(),
                date,
                in_month,
            }
        })
        .collect();

    CalendarGrid {
        anchor: anchor.format("%Y-%m-%d").to_string(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftStatus;
    use crate::scheduling::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn shift_on(day: &str) -> Shift {
        Shift {
            id: uuid::Uuid::new_v4().to_string(),
            assigned_to: Some("a@example.com".to_string()),
            date: day.to_string(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            shift_type: "regular".to_string(),
            status: ShiftStatus::Scheduled,
            notes: None,
            created_by: "admin@example.com".to_string(),
            updated_at: "2024-06-01T00:00:00Z".to_string(),
            version: 1,
        }
    }

    #[test]
    fn week_days_start_monday() {
        let days = week_days(date("2024-06-06")); // Thursday
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date("2024-06-03"));
        assert_eq!(days[6], date("2024-06-09"));
    }

    #[test]
    fn week_days_from_sunday_anchor() {
        let days = week_days(date("2024-06-09")); // Sunday
        assert_eq!(days[0], date("2024-06-03"));
    }

    #[test]
    fn month_grid_is_42_cells_with_padding() {
        // June 2024: the 1st is a Saturday, so the grid starts Mon May 27
        let days = month_grid_days(date("2024-06-15"));
        assert_eq!(days.len(), 42);
        assert_eq!(days[0], (date("2024-05-27"), false));
        assert_eq!(days[5], (date("2024-06-01"), true));
        assert_eq!(days[41], (date("2024-07-07"), false));
        assert_eq!(days.iter().filter(|(_, in_month)| *in_month).count(), 30);
    }

    #[test]
    fn grid_cells_match_exact_date_only() {
        let shifts = vec![shift_on("2024-06-03"), shift_on("2024-06-03"), shift_on("2024-06-05")];
        let grid = build_grid(
            date("2024-06-03"),
            week_days(date("2024-06-03")).into_iter().map(|d| (d, true)).collect(),
            &shifts,
            &[],
            &[],
        );

        assert_eq!(grid.cells[0].shifts.len(), 2); // Monday
        assert_eq!(grid.cells[1].shifts.len(), 0); // Tuesday
        assert_eq!(grid.cells[2].shifts.len(), 1); // Wednesday
    }

    #[test]
    fn non_canonical_date_strings_do_not_match() {
        // "2024-6-3" is the same day but not the canonical string form
        let shifts = vec![shift_on("2024-6-3")];
        let grid = build_grid(
            date("2024-06-03"),
            vec![(date("2024-06-03"), true)],
            &shifts,
            &[],
            &[],
        );
        assert!(grid.cells[0].shifts.is_empty());
    }
}
