//! Data core for the notice-board dashboard: load the city, year and
//! coordinate datasets once, then derive per-city, per-year and map-marker
//! views for whichever category is currently selected.

pub mod config;
pub mod error;
pub mod select;
pub mod series;
pub mod store;
