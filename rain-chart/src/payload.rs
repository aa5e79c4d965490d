//! JSON document consumed by the interactive chart.

use crate::{
    palette::{get_colors, to_hex},
    report::RainReport,
};
use anyhow::Context;
use chrono::NaiveDate;
use rain_core::site::mm_to_inches;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RainPayload {
    pub title: String,
    pub stats: StatsPayload,
    pub years: Vec<YearPayload>,
}

/// Percentiles are fractions; `null` when there was nothing to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    pub current_date_percentile: Option<f64>,
    pub end_of_year_percentile: Option<f64>,
    /// Inches
    pub current_total: f64,
    pub current_day: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPayload {
    pub year: i32,
    pub is_current_year: bool,
    pub color: String,
    /// Inches
    pub total: f64,
    pub total_percentile: Option<f64>,
    pub data: Vec<DayPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<DayPayload>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayPayload {
    pub day: usize,
    pub date: NaiveDate,
    /// Inches
    pub cumulative: f64,
}

fn inches(mm: f64) -> f64 {
    (mm_to_inches(mm) * 1000.0).round() / 1000.0
}

impl From<&RainReport> for RainPayload {
    fn from(report: &RainReport) -> Self {
        let colors = get_colors(report.series.len());
        let years = report
            .series
            .iter()
            .zip(colors.iter())
            .map(|((label, year), color)| {
                let is_current_year = report.is_current(*label);
                let forecast = is_current_year.then(|| {
                    report
                        .forecast
                        .iter()
                        .map(|point| DayPayload {
                            day: point.offset,
                            date: point.date,
                            cumulative: inches(point.cumulative_mm),
                        })
                        .collect()
                });
                YearPayload {
                    year: *label,
                    is_current_year,
                    color: to_hex(color),
                    total: inches(year.total()),
                    total_percentile: report.total_percentiles.get(label).copied().flatten(),
                    data: year
                        .points()
                        .map(|(day, date, total)| DayPayload {
                            day,
                            date,
                            cumulative: inches(total),
                        })
                        .collect(),
                    forecast,
                }
            })
            .collect();
        RainPayload {
            title: report.title.clone(),
            stats: StatsPayload {
                current_date_percentile: report.stats.current_date_rank,
                end_of_year_percentile: report.stats.end_of_year_rank,
                current_total: inches(report.stats.current_total_mm),
                current_day: report.stats.current_day,
            },
            years,
        }
    }
}

impl RainPayload {
    /// Compact JSON bytes, ready to be written out.
    pub fn to_json(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec(self).context("failed to serialize payload")
    }
}
