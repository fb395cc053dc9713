//! Calendar grid builder: month and week views over the appointment list.
//!
//! The month view is always 42 cells (6 rows × 7 days): leading days of the
//! previous month pad the first row, trailing days of the next month fill
//! whatever is left, even when the month fits in 5 rows. The week view is 7
//! cells starting at the configured first day of the week.
//!
//! Cells borrow the appointments they show; nothing is copied.
//!
//! Builders and navigation return `None` instead of stepping outside the
//! range `NaiveDate` can represent.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Appointment;

pub const MONTH_GRID_CELLS: usize = 42;
pub const WEEK_GRID_CELLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Month,
    Week,
}

/// One date in the grid with the appointments booked on it, in collection
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub in_reference_month: bool,
    pub appointments: Vec<&'a Appointment>,
}

/// A selected day: its appointments sorted by time of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetail<'a> {
    pub date: NaiveDate,
    pub appointments: Vec<&'a Appointment>,
}

impl<'a> DayCell<'a> {
    pub fn detail(&self) -> DayDetail<'a> {
        let mut appointments = self.appointments.clone();
        appointments.sort_by_key(|a| a.time);
        DayDetail {
            date: self.date,
            appointments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid<'a> {
    pub view: CalendarView,
    pub reference: NaiveDate,
    pub cells: Vec<DayCell<'a>>,
}

impl<'a> CalendarGrid<'a> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.cells.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cells.last().map(|c| c.date)
    }

    /// Rows of 7 cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell<'a>> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// Detail for a clicked cell; `None` when the date is not on the grid.
    pub fn select(&self, date: NaiveDate) -> Option<DayDetail<'a>> {
        self.cell(date).map(DayCell::detail)
    }

    /// "Today" button: select today if the grid shows it.
    pub fn today_detail(&self, today: NaiveDate) -> Option<DayDetail<'a>> {
        self.select(today)
    }

    pub fn appointment_count(&self) -> usize {
        self.cells.iter().map(|c| c.appointments.len()).sum()
    }
}

/// Month grid for the month containing `reference`.
pub fn month_grid<'a>(
    reference: NaiveDate,
    appointments: &'a [Appointment],
    week_start: Weekday,
) -> Option<CalendarGrid<'a>> {
    let start = start_of_week(first_of_month(reference), week_start)?;
    build_grid(
        CalendarView::Month,
        reference,
        start,
        MONTH_GRID_CELLS,
        appointments,
    )
}

/// Week grid for the week containing `reference`.
pub fn week_grid<'a>(
    reference: NaiveDate,
    appointments: &'a [Appointment],
    week_start: Weekday,
) -> Option<CalendarGrid<'a>> {
    let start = start_of_week(reference, week_start)?;
    build_grid(
        CalendarView::Week,
        reference,
        start,
        WEEK_GRID_CELLS,
        appointments,
    )
}

fn build_grid<'a>(
    view: CalendarView,
    reference: NaiveDate,
    start: NaiveDate,
    len: usize,
    appointments: &'a [Appointment],
) -> Option<CalendarGrid<'a>> {
    let end = start.checked_add_signed(Duration::days(len as i64 - 1))?;

    let mut by_date: HashMap<NaiveDate, Vec<&'a Appointment>> = HashMap::new();
    for appt in appointments.iter().filter(|a| a.date >= start && a.date <= end) {
        by_date.entry(appt.date).or_default().push(appt);
    }

    let cells = (0..len as i64)
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .map(|date| DayCell {
            date,
            in_reference_month: same_month(date, reference),
            appointments: by_date.remove(&date).unwrap_or_default(),
        })
        .collect();

    Some(CalendarGrid {
        view,
        reference,
        cells,
    })
}

fn days_from_week_start(day: Weekday, week_start: Weekday) -> i64 {
    i64::from((day.num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    (28..=31)
        .rev()
        .find_map(|day| date.with_day(day))
        .unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    last_of_month(date).day()
}

pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(days_from_week_start(
        date.weekday(),
        week_start,
    )))
}

/// First day of the month `months` away from `date`'s month.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(date.month0() as i32)?
        .checked_add(months)?;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

pub fn shift_weeks(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_weeks(weeks)?)
}
