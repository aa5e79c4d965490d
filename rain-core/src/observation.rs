use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used for upstream query parameters and payload dates: "YYYY-MM-DD"
pub const YEAR_FORMAT: &str = "%Y-%m-%d";

/// A daily precipitation value as reported upstream.
/// - `Missing`: the source covered the day but gave no amount
/// - `Millimeters(f64)`: a non-negative, finite amount
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Precipitation {
    Missing,
    Millimeters(f64),
}

impl Precipitation {
    /// Anything negative or non-finite is not a usable amount.
    pub fn from_mm(value: f64) -> Precipitation {
        if value.is_finite() && value >= 0.0 {
            Precipitation::Millimeters(value)
        } else {
            Precipitation::Missing
        }
    }

    /// Parse a raw upstream field; blanks and garbage become `Missing`.
    pub fn parse(field: &str) -> Precipitation {
        match field.trim().parse::<f64>() {
            Ok(value) => Precipitation::from_mm(value),
            Err(_) => Precipitation::Missing,
        }
    }

    /// Amount used for cumulation; missing counts as zero.
    pub fn as_mm(&self) -> f64 {
        match self {
            Precipitation::Missing => 0.0,
            Precipitation::Millimeters(mm) => *mm,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Precipitation::Missing)
    }
}

impl From<Option<f64>> for Precipitation {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Precipitation::Missing, Precipitation::from_mm)
    }
}

/// A single day of precipitation at the observed site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub amount: Precipitation,
}

impl Observation {
    pub fn new(date: NaiveDate, amount: Precipitation) -> Observation {
        Observation { date, amount }
    }
}

/// Date-ordered daily observations, at most one per calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries(BTreeMap<NaiveDate, Precipitation>);

impl ObservationSeries {
    pub fn new() -> ObservationSeries {
        ObservationSeries(BTreeMap::new())
    }

    pub fn insert(&mut self, date: NaiveDate, amount: Precipitation) {
        self.0.insert(date, amount);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<Precipitation> {
        self.0.get(date).copied()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.0.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }

    /// Number of days the source covered without an amount.
    pub fn missing_count(&self) -> usize {
        self.0.values().filter(|amount| amount.is_missing()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Observation> + '_ {
        self.0
            .iter()
            .map(|(date, amount)| Observation::new(*date, *amount))
    }

    /// Keep only the days within `[start, end]`.
    pub fn retain_between(&mut self, start: NaiveDate, end: NaiveDate) {
        self.0.retain(|date, _| start <= *date && *date <= end);
    }

    /// Lay `recent` over this series. A recorded recent amount replaces
    /// whatever is stored for that day; a missing recent amount only fills
    /// days this series does not have.
    pub fn overlay(&mut self, recent: &ObservationSeries) {
        for (date, amount) in &recent.0 {
            match amount {
                Precipitation::Millimeters(_) => {
                    self.0.insert(*date, *amount);
                }
                Precipitation::Missing => {
                    self.0.entry(*date).or_insert(*amount);
                }
            }
        }
    }
}

impl FromIterator<Observation> for ObservationSeries {
    fn from_iter<T: IntoIterator<Item = Observation>>(iter: T) -> Self {
        ObservationSeries(
            iter.into_iter()
                .map(|observation| (observation.date, observation.amount))
                .collect(),
        )
    }
}

impl From<Vec<Observation>> for ObservationSeries {
    fn from(value: Vec<Observation>) -> Self {
        value.into_iter().collect()
    }
}

/// Short-window data from a recent/forecast source: daily totals reaching
/// into the future plus hourly amounts used to refine the current day.
/// Dates and hours are local to the site, `utc_offset` ahead of UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentObservations {
    pub utc_offset: FixedOffset,
    pub daily: ObservationSeries,
    /// Each amount is stamped with the end of the hour it fell in.
    pub hourly: Vec<(NaiveDateTime, Precipitation)>,
}

impl RecentObservations {
    /// Wall-clock time at the site.
    pub fn site_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.utc_offset).naive_local()
    }

    /// Realized days as of the site-local time `now`: daily totals before
    /// today, and today's completed hours summed. A daily total for today is
    /// a forecast of the whole day and is not used.
    pub fn realized(&self, now: NaiveDateTime) -> ObservationSeries {
        let today = now.date();
        let mut realized: ObservationSeries =
            self.daily.iter().filter(|obs| obs.date < today).collect();
        let elapsed_hours: Vec<Precipitation> = self
            .hourly
            .iter()
            .filter(|(end, _)| (*end - Duration::hours(1)).date() == today && *end <= now)
            .map(|(_, amount)| *amount)
            .collect();
        if !elapsed_hours.is_empty() {
            let today_amount = if elapsed_hours.iter().all(Precipitation::is_missing) {
                Precipitation::Missing
            } else {
                Precipitation::from_mm(elapsed_hours.iter().map(Precipitation::as_mm).sum())
            };
            realized.insert(today, today_amount);
        }
        realized
    }

    /// Daily totals strictly after `as_of`, in date order.
    pub fn predicted(&self, as_of: NaiveDate) -> Vec<Observation> {
        self.daily.iter().filter(|obs| obs.date > as_of).collect()
    }
}
