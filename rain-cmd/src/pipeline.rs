use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rain_chart::{chart::render_png, payload::RainPayload, report::RainReport};
use rain_core::{
    forecast::extend_forecast,
    percentile::format_percent,
    site::{Site, HISTORY_START},
    source::ObservationSource,
    water_year::{bucketize, WATER_YEAR_BOUNDARY},
};
use std::{fs, path::Path};

pub const RAIN_PNG: &str = "rain.png";
pub const RAIN_JSON: &str = "rain.json";

const RAIN_PNG_PARTIAL: &str = ".rain.partial.png";
const RAIN_JSON_PARTIAL: &str = ".rain.partial.json";

/// Fetch everything for `site` as of `now` and compute the report.
/// Nothing is written here.
///
/// Days and hours are counted in the site's time zone, as reported by the
/// recent source, so the recent data is fetched first.
pub async fn build_report<S: ObservationSource>(
    source: &S,
    site: &Site,
    now: DateTime<Utc>,
) -> anyhow::Result<RainReport> {
    let recent = source
        .fetch_recent(site)
        .await
        .context("recent fetch failed")?;
    let now = recent.site_time(now);
    let as_of = now.date();
    info!("Site time is {}", now);
    let mut observations = source
        .fetch_history(site, HISTORY_START, as_of)
        .await
        .context("historical fetch failed")?;
    observations.overlay(&recent.realized(now));
    info!(
        "{} days of observations through {}",
        observations.len(),
        as_of
    );

    let series = bucketize(&observations, WATER_YEAR_BOUNDARY, as_of);
    info!("{} water years", series.len());

    let forecast = series
        .values()
        .next_back()
        .and_then(|current| {
            let last_offset = current.last_offset()?;
            Some(extend_forecast(last_offset, current.total(), &recent.predicted(as_of)))
        })
        .unwrap_or_default();

    let report = RainReport::new(site.chart_title(), WATER_YEAR_BOUNDARY, series, forecast)?;
    info!(
        "Water year {} day {}: current date percentile {}, end of year percentile {}",
        report.stats.current_label,
        report.stats.current_day,
        format_percent(report.stats.current_date_rank),
        format_percent(report.stats.end_of_year_rank)
    );
    Ok(report)
}

/// Build the report, then write `rain.png` and `rain.json` into `out_dir`.
pub async fn run_pipeline<S: ObservationSource>(
    source: &S,
    site: &Site,
    now: DateTime<Utc>,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let report = build_report(source, site, now).await?;
    write_outputs(&report, out_dir, render_png)
}

/// Stage the payload and the chart next to their destinations and move
/// them into place only once both exist. On failure neither output is left
/// behind.
pub fn write_outputs<R>(report: &RainReport, out_dir: &Path, render: R) -> anyhow::Result<()>
where
    R: FnOnce(&RainReport, &Path) -> anyhow::Result<()>,
{
    let json = RainPayload::from(report).to_json()?;
    let png_path = out_dir.join(RAIN_PNG);
    let json_path = out_dir.join(RAIN_JSON);
    let png_partial = out_dir.join(RAIN_PNG_PARTIAL);
    let json_partial = out_dir.join(RAIN_JSON_PARTIAL);

    let result = fs::write(&json_partial, &json)
        .with_context(|| format!("failed to write {}", json_partial.display()))
        .and_then(|()| render(report, &png_partial))
        .and_then(|()| rename(&json_partial, &json_path))
        .and_then(|()| match rename(&png_partial, &png_path) {
            Ok(()) => Ok(()),
            Err(e) => {
                discard(&json_path);
                Err(e)
            }
        });
    if result.is_err() {
        discard(&json_partial);
        discard(&png_partial);
    }
    result?;
    info!("Wrote {} and {}", png_path.display(), json_path.display());
    Ok(())
}

fn rename(from: &Path, to: &Path) -> anyhow::Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("failed to move {} to {}", from.display(), to.display()))
}

fn discard(path: &Path) {
    if path.is_file() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
