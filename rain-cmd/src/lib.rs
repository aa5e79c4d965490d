//! Command implementation for the rain CLI.
//!
//! Fetches history and recent data for the configured site, ranks the
//! current water year and writes the chart and its JSON payload to the
//! working directory.

pub mod pipeline;

use chrono::Utc;
use rain_core::{site::CASTRO_VALLEY, source::HttpSource};
use std::path::Path;

pub async fn run() -> anyhow::Result<()> {
    let source = HttpSource::new()?;
    pipeline::run_pipeline(&source, &CASTRO_VALLEY, Utc::now(), Path::new(".")).await
}
