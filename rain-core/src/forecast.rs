//! Display-only continuation of the current water year from predicted amounts.
//!
//! Nothing produced here is ever handed to the percentile ranker.

use crate::{
    observation::Observation,
    water_year::{is_leap_day, DAYS_PER_WATER_YEAR},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One projected day past the last realized day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub offset: usize,
    pub date: NaiveDate,
    pub cumulative_mm: f64,
}

/// Continue a realized total with predicted daily amounts.
///
/// Offsets start at `last_offset + 1` and the projection stops before an
/// offset would reach the end of the water year. A predicted February 29
/// is folded into the day before it, like the realized series.
pub fn extend_forecast(
    last_offset: usize,
    total_mm: f64,
    predicted: &[Observation],
) -> Vec<ForecastPoint> {
    let mut running = total_mm;
    let mut points: Vec<ForecastPoint> = Vec::with_capacity(predicted.len());
    for observation in predicted {
        running += observation.amount.as_mm();
        if is_leap_day(&observation.date) {
            if let Some(previous) = points.last_mut() {
                previous.cumulative_mm = running;
            }
            continue;
        }
        let offset = last_offset + 1 + points.len();
        if offset >= DAYS_PER_WATER_YEAR {
            break;
        }
        points.push(ForecastPoint {
            offset,
            date: observation.date,
            cumulative_mm: running,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::DateRange;
    use crate::observation::Precipitation;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_projection_accumulates_from_realized_total() {
        let predicted = vec![
            Observation::new(day(2024, 1, 11), Precipitation::Millimeters(2.0)),
            Observation::new(day(2024, 1, 12), Precipitation::Missing),
            Observation::new(day(2024, 1, 13), Precipitation::Millimeters(0.5)),
        ];
        let points = extend_forecast(162, 100.0, &predicted);
        assert_eq!(
            points,
            vec![
                ForecastPoint { offset: 163, date: day(2024, 1, 11), cumulative_mm: 102.0 },
                ForecastPoint { offset: 164, date: day(2024, 1, 12), cumulative_mm: 102.0 },
                ForecastPoint { offset: 165, date: day(2024, 1, 13), cumulative_mm: 102.5 },
            ]
        );
    }

    #[test]
    fn test_projection_never_reaches_end_of_water_year() {
        let predicted: Vec<Observation> = DateRange(day(2024, 7, 20), day(2024, 9, 30))
            .map(|date| Observation::new(date, Precipitation::Millimeters(1.0)))
            .collect();
        let points = extend_forecast(352, 10.0, &predicted);
        assert_eq!(points.len(), 12);
        assert!(points.iter().all(|point| point.offset < DAYS_PER_WATER_YEAR));
        assert_eq!(points.last().unwrap().offset, 364);

        assert!(extend_forecast(364, 10.0, &predicted).is_empty());
    }

    #[test]
    fn test_projected_leap_day_folds_into_previous_point() {
        let predicted = vec![
            Observation::new(day(2024, 2, 28), Precipitation::Millimeters(1.0)),
            Observation::new(day(2024, 2, 29), Precipitation::Millimeters(2.0)),
            Observation::new(day(2024, 3, 1), Precipitation::Millimeters(4.0)),
        ];
        let points = extend_forecast(210, 0.0, &predicted);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].offset, 211);
        assert_eq!(points[0].cumulative_mm, 3.0);
        assert_eq!(points[1].offset, 212);
        assert_eq!(points[1].cumulative_mm, 7.0);
    }

    #[test]
    fn test_empty_prediction() {
        assert!(extend_forecast(5, 1.0, &[]).is_empty());
    }
}
