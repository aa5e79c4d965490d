use rain_core::{
    error::{RainError, Result},
    forecast::ForecastPoint,
    percentile::{format_percent, rank, total_percentiles, PercentileStatistics},
    water_year::{WaterYearBoundary, WaterYearSeries},
};
use std::collections::BTreeMap;

/// Everything the chart and the payload show, computed once.
#[derive(Debug, Clone)]
pub struct RainReport {
    pub title: String,
    pub boundary: WaterYearBoundary,
    pub series: BTreeMap<i32, WaterYearSeries>,
    pub stats: PercentileStatistics,
    pub total_percentiles: BTreeMap<i32, Option<f64>>,
    pub forecast: Vec<ForecastPoint>,
}

impl RainReport {
    pub fn new(
        title: String,
        boundary: WaterYearBoundary,
        series: BTreeMap<i32, WaterYearSeries>,
        forecast: Vec<ForecastPoint>,
    ) -> Result<RainReport> {
        let stats = rank(&series).ok_or(RainError::NoWaterYears)?;
        let total_percentiles = total_percentiles(&series);
        Ok(RainReport {
            title,
            boundary,
            series,
            stats,
            total_percentiles,
            forecast,
        })
    }

    pub fn is_current(&self, label: i32) -> bool {
        label == self.stats.current_label
    }

    pub fn stats_line(&self) -> String {
        format!(
            "Current Date Percentile: {}   End of Year Percentile: {}",
            format_percent(self.stats.current_date_rank),
            format_percent(self.stats.end_of_year_rank)
        )
    }

    /// Largest cumulative value shown, forecast included, in millimeters.
    pub fn max_cumulative_mm(&self) -> f64 {
        self.series
            .values()
            .map(|year| year.total())
            .chain(self.forecast.iter().map(|point| point.cumulative_mm))
            .fold(0.0, f64::max)
    }
}
