use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DataLoadError;

/// Where the source files live and which columns key them.
///
/// The defaults mirror the original deployment: a wide per-city export
/// (`result.csv`), per-year totals (`lin_graph.csv`), city coordinates
/// (`czech.csv`) and a world outline filtered down to one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wide per-city table: city name plus one column per category.
    pub city_table: PathBuf,
    /// Per-year table: year column plus one column per category.
    pub year_table: PathBuf,
    /// Per-city coordinate table.
    pub geo_table: PathBuf,
    /// World boundary collection filtered to `country`.
    pub world_geojson: PathBuf,

    pub country: String,
    /// Feature property compared against `country` (exact match).
    pub country_property: String,

    pub city_column: String,
    pub year_column: String,
    pub geo_city_column: String,
    pub lon_column: String,
    pub lat_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city_table: PathBuf::from("result.csv"),
            year_table: PathBuf::from("lin_graph.csv"),
            geo_table: PathBuf::from("czech.csv"),
            world_geojson: PathBuf::from("world.geojson"),
            country: "Czechia".to_string(),
            country_property: "name".to_string(),
            city_column: "City".to_string(),
            year_column: "rok".to_string(),
            geo_city_column: "mesto".to_string(),
            lon_column: "vyska".to_string(),
            lat_column: "sirka".to_string(),
        }
    }
}

impl Config {
    /// Read a YAML config file; keys left out fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| DataLoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
