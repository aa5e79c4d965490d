//! Build-time configuration: the observed location and fixed constants.

use chrono::NaiveDate;

/// Millimeters per inch; upstream reports millimeters, charts show inches.
pub const MM_PER_INCH: f64 = 25.4;

/// First day requested from the historical source. It is the start of water year 1982.
pub const HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(1981, 8, 1) {
    Some(date) => date,
    None => panic!("invalid history start"),
};

/// A fixed observation point and the upstream identifiers used to query it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters
    pub elevation: f64,
    /// Meteostat station closest to the point
    pub station_id: &'static str,
    /// IANA zone used for daily aggregation of recent data
    pub timezone: &'static str,
}

pub const CASTRO_VALLEY: Site = Site {
    name: "Castro Valley, CA",
    latitude: 37.708923,
    longitude: -122.060333,
    elevation: 124.0,
    station_id: "72493",
    timezone: "America/Los_Angeles",
};

impl Site {
    pub fn chart_title(&self) -> String {
        format!("{}: Cumulative Rainfall by Water Year", self.name)
    }
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}
