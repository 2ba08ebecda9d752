use serde::Serialize;

use super::{aggregate::YearPoint, join::Marker, project::CategoryPoint};

/// Everything the presentation layer needs for one selection, published as
/// a unit so the three views can never disagree about the category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardUpdate {
    pub category: String,
    /// Per-city proportions (pie view).
    pub cities: Vec<CategoryPoint>,
    /// Per-year trend (line view).
    pub years: Vec<YearPoint>,
    /// Map annotations for every placeable city in `cities`.
    pub markers: Vec<Marker>,
}
