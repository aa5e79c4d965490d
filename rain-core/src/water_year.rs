use crate::{
    date_range::DateRange,
    error::{RainError, Result},
    observation::ObservationSeries,
};
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every water year has this many slots once February 29 is folded away.
pub const DAYS_PER_WATER_YEAR: usize = 365;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Non-leap reference label whose window never contains February 29,
/// whatever the boundary.
const REFERENCE_LABEL: i32 = 2002;

/// The month/day on which every water year starts.
///
/// A water year labelled `Y` runs from the boundary in calendar year `Y - 1`
/// through the day before the boundary in calendar year `Y`. February 29 is
/// rejected so that a leap day can never open a water year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaterYearBoundary {
    month: u32,
    day: u32,
}

/// Rain seasons in Northern California start in the fall; August 1 keeps the
/// dry summer at both ends of the chart.
pub const WATER_YEAR_BOUNDARY: WaterYearBoundary = WaterYearBoundary { month: 8, day: 1 };

impl WaterYearBoundary {
    pub fn new(month: u32, day: u32) -> Result<WaterYearBoundary> {
        // 2001 is not a leap year, so this also rejects February 29
        match NaiveDate::from_ymd_opt(2001, month, day) {
            Some(_) => Ok(WaterYearBoundary { month, day }),
            None => Err(RainError::InvalidBoundary { month, day }),
        }
    }

    /// First day of the water year labelled `label`.
    pub fn start_of(&self, label: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(label - 1, self.month, self.day)
    }

    /// Every calendar day belonging to the water year labelled `label`.
    pub fn window(&self, label: i32) -> Option<DateRange> {
        let start = self.start_of(label)?;
        let end = self.start_of(label + 1)?.pred_opt()?;
        Some(DateRange(start, end))
    }

    /// The label increments when the date crosses the boundary.
    pub fn label_for(&self, date: &NaiveDate) -> i32 {
        if (date.month(), date.day()) >= (self.month, self.day) {
            date.year() + 1
        } else {
            date.year()
        }
    }

    /// Offset and abbreviation of each month start, beginning with the
    /// boundary month. Used for axis ticks.
    pub fn month_starts(&self) -> Vec<(usize, &'static str)> {
        let Some(window) = self.window(REFERENCE_LABEL) else {
            return Vec::new();
        };
        window
            .enumerate()
            .filter(|(offset, date)| date.day() == 1 || *offset == 0)
            .map(|(offset, date)| (offset, MONTH_ABBREVIATIONS[date.month0() as usize]))
            .collect()
    }
}

pub fn is_leap_day(date: &NaiveDate) -> bool {
    (date.month(), date.day()) == (2, 29)
}

/// Precipitation assigned to one slot of a water year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAmount {
    pub date: NaiveDate,
    pub amount_mm: f64,
}

/// One water year of contiguous daily amounts and their running total.
///
/// The cumulative series is derived when the series is built and cannot be
/// changed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterYearSeries {
    label: i32,
    days: Vec<DailyAmount>,
    cumulative: Vec<f64>,
}

impl WaterYearSeries {
    pub fn from_days(label: i32, days: Vec<DailyAmount>) -> WaterYearSeries {
        let cumulative = days
            .iter()
            .scan(0.0, |total, day| {
                *total += day.amount_mm;
                Some(*total)
            })
            .collect();
        WaterYearSeries {
            label,
            days,
            cumulative,
        }
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn days(&self) -> &[DailyAmount] {
        &self.days
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Offset of the last realized day.
    pub fn last_offset(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|day| day.date)
    }

    pub fn value_at(&self, offset: usize) -> Option<f64> {
        self.cumulative.get(offset).copied()
    }

    /// Final cumulative value, in millimeters.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// `(offset, date, cumulative_mm)` for each day.
    pub fn points(&self) -> impl Iterator<Item = (usize, NaiveDate, f64)> + '_ {
        self.days
            .iter()
            .zip(self.cumulative.iter())
            .enumerate()
            .map(|(offset, (day, total))| (offset, day.date, *total))
    }
}

/// Fold each February 29 into the slot before it.
pub fn fold_leap_days<I>(days: I) -> Vec<DailyAmount>
where
    I: IntoIterator<Item = DailyAmount>,
{
    days.into_iter()
        .fold(Vec::with_capacity(DAYS_PER_WATER_YEAR), |mut folded, day| {
            if is_leap_day(&day.date) {
                match folded.last_mut() {
                    Some(previous) => {
                        previous.amount_mm += day.amount_mm;
                        return folded;
                    }
                    None => warn!("{} has no preceding day to fold into", day.date),
                }
            }
            folded.push(day);
            folded
        })
}

/// Partition daily observations into water years.
///
/// Labels run from the water year of the earliest observation through the
/// water year of `as_of`. Days without an observation count as zero, days
/// after `as_of` are never produced, and a water year none of whose days
/// were observed is left out.
pub fn bucketize(
    observations: &ObservationSeries,
    boundary: WaterYearBoundary,
    as_of: NaiveDate,
) -> BTreeMap<i32, WaterYearSeries> {
    let first_date = match observations.first_date() {
        Some(date) if date <= as_of => date,
        _ => return BTreeMap::new(),
    };
    let first_label = boundary.label_for(&first_date);
    let last_label = boundary.label_for(&as_of);

    (first_label..=last_label)
        .filter_map(|label| {
            let window = boundary.window(label)?.truncated(as_of);
            let mut dates = window;
            if !dates.any(|date| observations.contains(&date)) {
                debug!("Water year {label} has no observations, skipping");
                return None;
            }
            let days = fold_leap_days(window.map(|date| DailyAmount {
                date,
                amount_mm: observations.get(&date).map_or(0.0, |amount| amount.as_mm()),
            }));
            if days.is_empty() {
                return None;
            }
            Some((label, WaterYearSeries::from_days(label, days)))
        })
        .collect()
}
