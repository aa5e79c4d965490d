//! Raster chart: one cumulative line per water year, current year emphasized.

use crate::{palette::get_colors, report::RainReport};
use anyhow::Context;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use rain_core::{site::mm_to_inches, water_year::DAYS_PER_WATER_YEAR};
use std::path::Path;

/// 10 x 8 inches at 200 dpi.
pub const CHART_SIZE: (u32, u32) = (2000, 1600);

pub const CURRENT_YEAR_STROKE: u32 = 4;
pub const PAST_YEAR_STROKE: u32 = 1;

const FONT: &str = "sans-serif";

/// Render `report` to a PNG file at `path`.
pub fn render_png(report: &RainReport, path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw(&root, report)?;
    root.present()
        .with_context(|| format!("failed to write chart {}", path.display()))?;
    info!("Chart written to {}", path.display());
    Ok(())
}

/// Upper bound of the y axis in inches, with some headroom.
pub fn y_axis_max(report: &RainReport) -> f64 {
    (mm_to_inches(report.max_cumulative_mm()) * 1.05).max(1.0)
}

/// Month ticks on the day-of-water-year axis.
pub fn month_ticks(report: &RainReport) -> Vec<(i32, &'static str)> {
    report
        .boundary
        .month_starts()
        .into_iter()
        .map(|(offset, label)| (offset as i32, label))
        .collect()
}

pub fn stroke_width(report: &RainReport, label: i32) -> u32 {
    if report.is_current(label) {
        CURRENT_YEAR_STROKE
    } else {
        PAST_YEAR_STROKE
    }
}

/// Filled legend swatch; a hairline path loses its color to anti-aliasing.
pub fn legend_style(color: &RGBColor) -> ShapeStyle {
    color.filled()
}

pub fn draw<DB>(root: &DrawingArea<DB, Shift>, report: &RainReport) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let plot_area = root
        .titled(&report.title, (FONT, 44))?
        .titled(&report.stats_line(), (FONT, 32))?;

    let ticks = month_ticks(report);
    let tick_offsets: Vec<i32> = ticks.iter().map(|(offset, _)| *offset).collect();
    let tick_label = |offset: &i32| {
        ticks
            .iter()
            .find(|(tick, _)| tick == offset)
            .map_or_else(String::new, |(_, label)| label.to_string())
    };

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (0i32..DAYS_PER_WATER_YEAR as i32).with_key_points(tick_offsets),
            0f64..y_axis_max(report),
        )?;
    chart
        .configure_mesh()
        .x_labels(ticks.len())
        .x_label_formatter(&tick_label)
        .y_desc("cumulative inches")
        .label_style((FONT, 24))
        .axis_desc_style((FONT, 28))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let colors = get_colors(report.series.len());
    for ((label, year), color) in report.series.iter().zip(colors.iter()) {
        let style = color.stroke_width(stroke_width(report, *label));
        let swatch = legend_style(color);
        chart
            .draw_series(LineSeries::new(
                year.points()
                    .map(|(offset, _, total)| (offset as i32, mm_to_inches(total))),
                style,
            ))?
            .label(year.label().to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], swatch));

        if report.is_current(*label) && !report.forecast.is_empty() {
            let start = year
                .last_offset()
                .map(|offset| (offset as i32, mm_to_inches(year.total())));
            let projection = start.into_iter().chain(
                report
                    .forecast
                    .iter()
                    .map(|point| (point.offset as i32, mm_to_inches(point.cumulative_mm))),
            );
            chart.draw_series(LineSeries::new(
                projection,
                color.mix(0.4).stroke_width(CURRENT_YEAR_STROKE),
            ))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 14))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_y_axis_covers_every_year() {
        let report = sample_report();
        let max = y_axis_max(&report);
        assert!(max >= mm_to_inches(365.0 * 3.0));
        assert!(max < mm_to_inches(365.0 * 3.0) * 1.1);
    }

    #[test]
    fn test_month_ticks_start_at_boundary() {
        let ticks = month_ticks(&sample_report());
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0], (0, "Aug"));
        assert_eq!(ticks[1], (31, "Sep"));
    }

    #[test]
    fn test_current_year_is_thicker() {
        let report = sample_report();
        assert_eq!(stroke_width(&report, 1984), CURRENT_YEAR_STROKE);
        assert_eq!(stroke_width(&report, 1981), PAST_YEAR_STROKE);
    }

    #[test]
    fn test_legend_swatch_keeps_year_color() {
        let color = RGBColor(128, 0, 255);
        let swatch = legend_style(&color);
        assert!(swatch.filled);
        assert_eq!(swatch.color, RGBAColor(128, 0, 255, 1.0));
    }
}
