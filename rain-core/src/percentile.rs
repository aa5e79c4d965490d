//! Rank the current water year against the years before it.

use crate::water_year::WaterYearSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the current (latest) water year stands. Ranks are fractions in
/// `[0, 1]`; `None` means there was nothing to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileStatistics {
    pub current_label: i32,
    /// Zero-based offset of the last realized day
    pub current_day: usize,
    pub current_total_mm: f64,
    /// Share of earlier years that had less on the same day
    pub current_date_rank: Option<f64>,
    /// Share of earlier years whose final total is below today's total
    pub end_of_year_rank: Option<f64>,
}

/// Compare the latest water year with every strictly earlier one.
///
/// Years too short to have reached the current day are left out of the
/// current-date rank entirely. Ties never count as "below".
pub fn rank(series: &BTreeMap<i32, WaterYearSeries>) -> Option<PercentileStatistics> {
    let (current_label, current) = series.iter().next_back()?;
    let current_day = current.last_offset()?;
    let current_total_mm = current.total();
    let earlier = || series.range(..*current_label).map(|(_, year)| year);

    let current_date_rank = fraction_below(
        earlier().filter_map(|year| year.value_at(current_day)),
        current_total_mm,
    );
    let end_of_year_rank = fraction_below(earlier().map(|year| year.total()), current_total_mm);

    Some(PercentileStatistics {
        current_label: *current_label,
        current_day,
        current_total_mm,
        current_date_rank,
        end_of_year_rank,
    })
}

/// Percentile of each year's total among the completed years (every year
/// but the latest), counting totals at or below it.
pub fn total_percentiles(series: &BTreeMap<i32, WaterYearSeries>) -> BTreeMap<i32, Option<f64>> {
    let mut completed: Vec<f64> = series
        .values()
        .rev()
        .skip(1)
        .map(|year| year.total())
        .collect();
    completed.sort_by(f64::total_cmp);
    series
        .iter()
        .map(|(label, year)| {
            let total = year.total();
            let at_or_below = completed.partition_point(|value| *value <= total);
            let percentile =
                (!completed.is_empty()).then(|| at_or_below as f64 / completed.len() as f64);
            (*label, percentile)
        })
        .collect()
}

fn fraction_below<I>(values: I, threshold: f64) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    let (below, count) = values.fold((0usize, 0usize), |(below, count), value| {
        (below + usize::from(value < threshold), count + 1)
    });
    (count > 0).then(|| below as f64 / count as f64)
}

/// Whole-percent text for a rank; an undefined rank renders blank.
pub fn format_percent(rank: Option<f64>) -> String {
    match rank {
        Some(fraction) if fraction.is_finite() => format!("{:.0}%", fraction * 100.0),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water_year::DailyAmount;
    use chrono::NaiveDate;

    /// A series whose cumulative values are exactly `totals`.
    fn series_from_cumulative(label: i32, totals: &[f64]) -> WaterYearSeries {
        let start = NaiveDate::from_ymd_opt(label - 1, 8, 1).unwrap();
        let mut previous = 0.0;
        let days = totals
            .iter()
            .enumerate()
            .map(|(offset, total)| {
                let amount = DailyAmount {
                    date: start + chrono::Duration::days(offset as i64),
                    amount_mm: total - previous,
                };
                previous = *total;
                amount
            })
            .collect();
        WaterYearSeries::from_days(label, days)
    }

    #[test]
    fn test_end_of_year_rank_against_earlier_totals() {
        let series: BTreeMap<i32, WaterYearSeries> = [
            (2001, series_from_cumulative(2001, &[5.0, 10.0])),
            (2002, series_from_cumulative(2002, &[10.0, 20.0])),
            (2003, series_from_cumulative(2003, &[15.0, 30.0])),
        ]
        .into_iter()
        .collect();
        let stats = rank(&series).unwrap();
        assert_eq!(stats.current_label, 2003);
        assert_eq!(stats.current_total_mm, 30.0);
        assert_eq!(stats.end_of_year_rank, Some(1.0));
    }

    #[test]
    fn test_current_date_rank_is_strict() {
        let series: BTreeMap<i32, WaterYearSeries> = [
            (2001, series_from_cumulative(2001, &[0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 40.0])),
            (2002, series_from_cumulative(2002, &[0.0, 0.0, 0.0, 0.0, 0.0, 20.0, 20.0])),
            (2003, series_from_cumulative(2003, &[0.0, 0.0, 0.0, 0.0, 5.0, 15.0])),
        ]
        .into_iter()
        .collect();
        let stats = rank(&series).unwrap();
        assert_eq!(stats.current_day, 5);
        assert_eq!(stats.current_date_rank, Some(0.5));
        assert_eq!(stats.end_of_year_rank, Some(0.0));
    }

    #[test]
    fn test_ties_do_not_count() {
        let series: BTreeMap<i32, WaterYearSeries> = [
            (2001, series_from_cumulative(2001, &[7.0])),
            (2002, series_from_cumulative(2002, &[7.0])),
        ]
        .into_iter()
        .collect();
        let stats = rank(&series).unwrap();
        assert_eq!(stats.current_date_rank, Some(0.0));
        assert_eq!(stats.end_of_year_rank, Some(0.0));
    }

    #[test]
    fn test_short_years_are_excluded_from_current_date_rank() {
        let series: BTreeMap<i32, WaterYearSeries> = [
            (2001, series_from_cumulative(2001, &[1.0, 2.0])),
            (2002, series_from_cumulative(2002, &[1.0, 2.0, 3.0, 4.0])),
            (2003, series_from_cumulative(2003, &[1.0, 2.0, 3.0, 9.0])),
        ]
        .into_iter()
        .collect();
        let stats = rank(&series).unwrap();
        // only 2002 reached offset 3
        assert_eq!(stats.current_date_rank, Some(1.0));
        assert_eq!(stats.end_of_year_rank, Some(1.0));
    }

    #[test]
    fn test_first_year_has_undefined_ranks() {
        let series: BTreeMap<i32, WaterYearSeries> =
            [(1982, series_from_cumulative(1982, &[1.0]))].into_iter().collect();
        let stats = rank(&series).unwrap();
        assert_eq!(stats.current_date_rank, None);
        assert_eq!(stats.end_of_year_rank, None);
        assert_eq!(format_percent(stats.current_date_rank), "");
        assert!(rank(&BTreeMap::new()).is_none());
    }

    #[test]
    fn test_total_percentiles_exclude_current_year_from_reference() {
        let series: BTreeMap<i32, WaterYearSeries> = [
            (2001, series_from_cumulative(2001, &[10.0])),
            (2002, series_from_cumulative(2002, &[30.0])),
            (2003, series_from_cumulative(2003, &[20.0])),
            (2004, series_from_cumulative(2004, &[25.0])),
        ]
        .into_iter()
        .collect();
        let percentiles = total_percentiles(&series);
        assert_eq!(percentiles[&2001], Some(1.0 / 3.0));
        assert_eq!(percentiles[&2002], Some(1.0));
        assert_eq!(percentiles[&2003], Some(2.0 / 3.0));
        assert_eq!(percentiles[&2004], Some(2.0 / 3.0));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(0.5)), "50%");
        assert_eq!(format_percent(Some(1.0)), "100%");
        assert_eq!(format_percent(Some(0.126)), "13%");
        assert_eq!(format_percent(Some(f64::NAN)), "");
    }
}
