pub mod date_range;
pub mod error;
pub mod forecast;
pub mod observation;
pub mod percentile;
pub mod site;
#[cfg(feature = "api")]
pub mod source;
pub mod water_year;
