//! Meteostat bulk daily files.
//!
//! Each station has one gzipped CSV without headers holding its whole
//! record, one row per day:
//! `date,tavg,tmin,tmax,prcp,snow,wdir,wspd,wpgt,pres,tsun`.
//! Blank fields are missing values.

use crate::{
    error::{RainError, Result},
    observation::{ObservationSeries, Precipitation, YEAR_FORMAT},
};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::io::Read;

pub const BULK_DAILY_URL: &str = "https://bulk.meteostat.net/v2/daily";

const DATE_COLUMN: usize = 0;
const PRECIPITATION_COLUMN: usize = 4;

pub fn station_url(base_url: &str, station_id: &str) -> String {
    format!("{}/{}.csv.gz", base_url, station_id)
}

/// Parse a gzipped bulk file.
pub fn parse_daily_gz(body: &[u8]) -> Result<ObservationSeries> {
    parse_daily_csv(GzDecoder::new(body))
}

/// Parse an uncompressed bulk file.
pub fn parse_daily_csv<R: Read>(reader: R) -> Result<ObservationSeries> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut observations = ObservationSeries::new();
    for result in rdr.records() {
        let record = result?;
        let Some(date_field) = record.get(DATE_COLUMN) else {
            continue;
        };
        let date = NaiveDate::parse_from_str(date_field.trim(), YEAR_FORMAT)
            .map_err(|e| RainError::DateParse(format!("{date_field}: {e}")))?;
        let amount = record
            .get(PRECIPITATION_COLUMN)
            .map_or(Precipitation::Missing, Precipitation::parse);
        observations.insert(date, amount);
    }
    Ok(observations)
}
