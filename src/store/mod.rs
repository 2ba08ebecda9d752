//! One-shot, fail-fast loading of the source datasets. After `load` the
//! store is immutable for the life of the process and shared by `Arc`;
//! every selection cycle reads from it, nothing writes to it.

mod geo;
mod table;

pub use geo::{CityGeoTable, CountryBoundary, GeoCity};
pub use table::{CityCategoryTable, RawTable, YearCategoryTable};

use std::sync::Arc;
use tracing::info;

use crate::{config::Config, error::DataLoadError};

/// The four immutable artifacts behind the dashboard: the wide per-city
/// category table, the per-year table, the coordinate table and the
/// country outline.
#[derive(Debug)]
pub struct DatasetStore {
    cities: CityCategoryTable,
    years: YearCategoryTable,
    geo: CityGeoTable,
    boundary: CountryBoundary,
}

impl DatasetStore {
    /// Load all four artifacts or fail with the first problem found. There
    /// is no degraded mode; callers treat an error here as fatal.
    pub fn load(config: &Config) -> Result<Arc<Self>, DataLoadError> {
        let cities = CityCategoryTable::from_csv(&config.city_table, &config.city_column)?;
        let years = YearCategoryTable::from_csv(&config.year_table, &config.year_column)?;
        let geo = CityGeoTable::from_csv(
            &config.geo_table,
            &config.geo_city_column,
            &config.lon_column,
            &config.lat_column,
        )?;
        let boundary = CountryBoundary::from_world_geojson(
            &config.world_geojson,
            &config.country_property,
            &config.country,
        )?;

        info!(
            cities = cities.len(),
            categories = cities.categories().len(),
            year_rows = years.len(),
            geo = geo.len(),
            country = boundary.name(),
            "datasets loaded"
        );

        Ok(Arc::new(Self {
            cities,
            years,
            geo,
            boundary,
        }))
    }

    pub fn cities(&self) -> &CityCategoryTable {
        &self.cities
    }

    pub fn years(&self) -> &YearCategoryTable {
        &self.years
    }

    pub fn geo(&self) -> &CityGeoTable {
        &self.geo
    }

    pub fn boundary(&self) -> &CountryBoundary {
        &self.boundary
    }

    /// Ordered category list offered to the UI.
    pub fn categories(&self) -> &[String] {
        self.cities.categories()
    }

    /// The selection shown before the user picks anything.
    pub fn default_category(&self) -> Option<&str> {
        self.categories().first().map(String::as_str)
    }
}
