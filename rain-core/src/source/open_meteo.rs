//! Open-Meteo forecast endpoint: the last week of daily totals, the
//! upcoming days, and hourly amounts for refining the current day.

use crate::{
    error::{RainError, Result},
    observation::{Observation, ObservationSeries, Precipitation, RecentObservations},
    site::Site,
};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Days of realized data requested before today.
pub const PAST_DAYS: u32 = 7;
/// Days of forecast requested, today included.
pub const FORECAST_DAYS: u32 = 16;

const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    /// Offset of the requested time zone; every timestamp is local to it.
    utc_offset_seconds: i32,
    daily: DailyBlock,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    precipitation: Vec<Option<f64>>,
}

pub fn query(site: &Site) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", site.latitude.to_string()),
        ("longitude", site.longitude.to_string()),
        ("elevation", site.elevation.to_string()),
        ("daily", "precipitation_sum".to_string()),
        ("hourly", "precipitation".to_string()),
        ("precipitation_unit", "mm".to_string()),
        ("timezone", site.timezone.to_string()),
        ("past_days", PAST_DAYS.to_string()),
        ("forecast_days", FORECAST_DAYS.to_string()),
    ]
}

/// Parse a forecast response body. Null amounts are kept as missing.
pub fn parse_forecast(body: &[u8]) -> Result<RecentObservations> {
    let response: ForecastResponse = serde_json::from_slice(body)?;
    let utc_offset = FixedOffset::east_opt(response.utc_offset_seconds)
        .ok_or(RainError::InvalidUtcOffset(response.utc_offset_seconds))?;
    let daily: ObservationSeries = response
        .daily
        .time
        .iter()
        .zip(response.daily.precipitation_sum.iter())
        .map(|(date, amount)| Observation::new(*date, (*amount).into()))
        .collect();
    let hourly = response
        .hourly
        .time
        .iter()
        .zip(response.hourly.precipitation.iter())
        .map(|(time, amount)| {
            let hour = NaiveDateTime::parse_from_str(time, HOUR_FORMAT)
                .map_err(|e| RainError::DateParse(format!("{time}: {e}")))?;
            Ok((hour, Precipitation::from(*amount)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RecentObservations {
        utc_offset,
        daily,
        hourly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::CASTRO_VALLEY;

    const STR_RESULT: &str = r#"{
  "latitude": 37.71,
  "longitude": -122.06,
  "timezone": "America/Los_Angeles",
  "utc_offset_seconds": -28800,
  "daily_units": {"time": "iso8601", "precipitation_sum": "mm"},
  "daily": {
    "time": ["2024-01-09", "2024-01-10", "2024-01-11"],
    "precipitation_sum": [0.4, 12.0, null]
  },
  "hourly_units": {"time": "iso8601", "precipitation": "mm"},
  "hourly": {
    "time": ["2024-01-10T00:00", "2024-01-10T01:00", "2024-01-10T02:00"],
    "precipitation": [1.2, null, 0.8]
  }
}"#;

    #[test]
    fn test_parse_forecast() {
        let recent = parse_forecast(STR_RESULT.as_bytes()).unwrap();
        let jan_10 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let jan_11 = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        assert_eq!(recent.daily.len(), 3);
        assert_eq!(recent.daily.get(&jan_10), Some(Precipitation::Millimeters(12.0)));
        assert_eq!(recent.daily.get(&jan_11), Some(Precipitation::Missing));
        assert_eq!(recent.hourly.len(), 3);
        assert_eq!(recent.hourly[1].1, Precipitation::Missing);
        assert_eq!(recent.hourly[2].0, jan_10.and_hms_opt(2, 0, 0).unwrap());
        assert_eq!(recent.utc_offset.local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn test_parse_forecast_rejects_bad_offset() {
        let body = r#"{"utc_offset_seconds": 90000,
            "daily": {"time": [], "precipitation_sum": []},
            "hourly": {"time": [], "precipitation": []}}"#;
        assert!(matches!(
            parse_forecast(body.as_bytes()),
            Err(RainError::InvalidUtcOffset(90000))
        ));
    }

    #[test]
    fn test_parse_forecast_rejects_bad_hours() {
        let body = r#"{"utc_offset_seconds": 0,
            "daily": {"time": [], "precipitation_sum": []},
            "hourly": {"time": ["yesterday"], "precipitation": [1.0]}}"#;
        assert!(matches!(
            parse_forecast(body.as_bytes()),
            Err(RainError::DateParse(_))
        ));
    }

    #[test]
    fn test_query_uses_site() {
        let params = query(&CASTRO_VALLEY);
        assert!(params.contains(&("timezone", "America/Los_Angeles".to_string())));
        assert!(params.contains(&("past_days", "7".to_string())));
    }
}
