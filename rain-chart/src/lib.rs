//! Presentation of bucketed water years: a PNG chart and a JSON document
//! for client-side rendering. Both read a [`report::RainReport`] and never
//! compute statistics of their own.

pub mod chart;
pub mod palette;
pub mod payload;
pub mod report;
