//! Harvest output: CSV artifact writing and viewer hand-off.

pub mod csv_sink;
pub mod viewer;
