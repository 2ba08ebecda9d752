use serde::Serialize;
use std::collections::HashMap;

use super::project::CategoryPoint;
use crate::store::CityGeoTable;

/// A single map annotation: one city's coordinate and current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub city: String,
    pub lon: f64,
    pub lat: f64,
    pub value: f64,
}

/// Attach coordinates to the projected series by exact city-name match.
///
/// The join is driven by the series: cities the geo table cannot place are
/// silently dropped (geocoding gaps are expected), and geo cities absent
/// from the series never emit a marker. Output order follows the series.
pub fn join(series: &[CategoryPoint], geo: &CityGeoTable) -> Vec<Marker> {
    let coords: HashMap<&str, (f64, f64)> = geo
        .entries()
        .iter()
        .map(|g| (g.city.as_str(), (g.lon, g.lat)))
        .collect();

    series
        .iter()
        .filter_map(|point| {
            let (lon, lat) = coords.get(point.city.as_str()).copied()?;
            Some(Marker {
                city: point.city.clone(),
                lon,
                lat,
                value: point.value,
            })
        })
        .collect()
}
