use geojson::{Feature, GeoJson, Geometry, Value};
use std::{collections::HashSet, fs, path::Path};
use tracing::{debug, warn};

use super::table::RawTable;
use crate::error::DataLoadError;

/// One geocoded city.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCity {
    pub city: String,
    pub lon: f64,
    pub lat: f64,
}

/// Per-city coordinates, keyed by city name. Both coordinates are required;
/// a row that cannot be placed is a load error, not a skipped row.
#[derive(Debug)]
pub struct CityGeoTable {
    entries: Vec<GeoCity>,
}

impl CityGeoTable {
    pub fn from_csv(
        path: &Path,
        city_column: &str,
        lon_column: &str,
        lat_column: &str,
    ) -> Result<Self, DataLoadError> {
        let table = RawTable::from_csv(path)?;
        Self::from_raw(path, table, city_column, lon_column, lat_column)
    }

    fn from_raw(
        path: &Path,
        table: RawTable,
        city_column: &str,
        lon_column: &str,
        lat_column: &str,
    ) -> Result<Self, DataLoadError> {
        let missing = |column: &str| DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        };
        let city_idx = table.column_index(city_column).ok_or_else(|| missing(city_column))?;
        let lon_idx = table.column_index(lon_column).ok_or_else(|| missing(lon_column))?;
        let lat_idx = table.column_index(lat_column).ok_or_else(|| missing(lat_column))?;

        let mut entries = Vec::with_capacity(table.len());
        let mut seen: HashSet<String> = HashSet::new();

        for (i, row) in table.rows().iter().enumerate() {
            // 1-based data row, counting the header line
            let row_no = i + 2;

            let coordinate = |idx: usize, column: &str| -> Result<f64, DataLoadError> {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                cell.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataLoadError::BadCoordinate {
                        path: path.to_path_buf(),
                        row: row_no,
                        column: column.to_string(),
                        cell: cell.to_string(),
                    })
            };

            let lon = coordinate(lon_idx, lon_column)?;
            let lat = coordinate(lat_idx, lat_column)?;

            let city = row.get(city_idx).map(String::as_str).unwrap_or("");
            if city.is_empty() {
                warn!(row = row_no, path = %path.display(), "geo row without a city name, skipping");
                continue;
            }
            if !seen.insert(city.to_string()) {
                debug!(city, row = row_no, "duplicate city in geo table, keeping first");
                continue;
            }

            entries.push(GeoCity {
                city: city.to_string(),
                lon,
                lat,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[GeoCity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The display-only country outline: exactly one feature picked out of a
/// world collection by exact property match. Nothing downstream transforms
/// it; the map layer renders it as-is.
#[derive(Debug, Clone)]
pub struct CountryBoundary {
    name: String,
    geometry: Geometry,
}

impl CountryBoundary {
    pub fn from_world_geojson(
        path: &Path,
        property: &str,
        name: &str,
    ) -> Result<Self, DataLoadError> {
        let text = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let geojson: GeoJson = text.parse().map_err(|source| DataLoadError::GeoJson {
            path: path.to_path_buf(),
            source,
        })?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => Vec::new(),
        };

        let feature = features
            .into_iter()
            .find(|f| {
                f.properties
                    .as_ref()
                    .and_then(|p| p.get(property))
                    .and_then(|v| v.as_str())
                    .map_or(false, |v| v == name)
            })
            .ok_or_else(|| DataLoadError::BoundaryNotFound {
                path: path.to_path_buf(),
                property: property.to_string(),
                name: name.to_string(),
            })?;

        let not_polygonal = || DataLoadError::BoundaryNotPolygonal {
            path: path.to_path_buf(),
            name: name.to_string(),
        };
        let geometry = feature.geometry.ok_or_else(not_polygonal)?;
        match geometry.value {
            Value::Polygon(_) | Value::MultiPolygon(_) => {}
            _ => return Err(not_polygonal()),
        }

        Ok(Self {
            name: name.to_string(),
            geometry,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// GeoJSON feature for the map layer, carrying the country name.
    pub fn to_feature(&self) -> Feature {
        let mut properties = geojson::JsonObject::new();
        properties.insert(
            "name".to_string(),
            serde_json::Value::String(self.name.clone()),
        );
        Feature {
            bbox: None,
            geometry: Some(self.geometry.clone()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Germany" },
                "geometry": { "type": "Polygon", "coordinates": [[[6.0, 47.0], [15.0, 47.0], [15.0, 55.0], [6.0, 47.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Czechia" },
                "geometry": { "type": "Polygon", "coordinates": [[[12.0, 48.5], [18.9, 48.5], [18.9, 51.1], [12.0, 48.5]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Pointland" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }
        ]
    }"#;

    fn geo_from(csv: &str) -> Result<CityGeoTable, DataLoadError> {
        let raw = RawTable::from_reader(Path::new("geo.csv"), Cursor::new(csv.to_string()))?;
        CityGeoTable::from_raw(Path::new("geo.csv"), raw, "mesto", "vyska", "sirka")
    }

    #[test]
    fn parses_coordinates() {
        let geo = geo_from("mesto,vyska,sirka\nPrague,14.42,50.09\nBrno,16.61,49.19\n").unwrap();
        assert_eq!(geo.len(), 2);
        assert_eq!(
            geo.entries()[0],
            GeoCity {
                city: "Prague".to_string(),
                lon: 14.42,
                lat: 50.09
            }
        );
    }

    #[test]
    fn bad_coordinate_fails_load_with_row_number() {
        let err = geo_from("mesto,vyska,sirka\nPrague,14.42,50.09\nBrno,east,49.19\n").unwrap_err();
        match err {
            DataLoadError::BadCoordinate { row, column, cell, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "vyska");
                assert_eq!(cell, "east");
            }
            other => panic!("expected BadCoordinate, got {other:?}"),
        }
    }

    #[test]
    fn missing_coordinate_column_fails_load() {
        let raw = RawTable::from_reader(
            Path::new("geo.csv"),
            Cursor::new("mesto,vyska\nPrague,14.42\n"),
        )
        .unwrap();
        let err =
            CityGeoTable::from_raw(Path::new("geo.csv"), raw, "mesto", "vyska", "sirka")
                .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { column, .. } if column == "sirka"
        ));
    }

    #[test]
    fn duplicate_city_keeps_first_row() {
        let geo =
            geo_from("mesto,vyska,sirka\nPrague,14.42,50.09\nPrague,0.0,0.0\n").unwrap();
        assert_eq!(geo.len(), 1);
        assert_eq!(geo.entries()[0].lon, 14.42);
    }

    #[test]
    fn boundary_is_selected_by_exact_name() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("world.geojson");
        std::fs::write(&path, WORLD)?;

        let boundary = CountryBoundary::from_world_geojson(&path, "name", "Czechia")?;
        assert_eq!(boundary.name(), "Czechia");
        assert!(matches!(boundary.geometry().value, Value::Polygon(_)));

        let feature = boundary.to_feature();
        assert_eq!(
            feature.properties.unwrap().get("name").unwrap(),
            "Czechia"
        );
        Ok(())
    }

    #[test]
    fn unmatched_country_fails_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("world.geojson");
        std::fs::write(&path, WORLD)?;

        let err = CountryBoundary::from_world_geojson(&path, "name", "Atlantis").unwrap_err();
        assert!(matches!(err, DataLoadError::BoundaryNotFound { name, .. } if name == "Atlantis"));
        Ok(())
    }

    #[test]
    fn non_polygonal_match_fails_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("world.geojson");
        std::fs::write(&path, WORLD)?;

        let err = CountryBoundary::from_world_geojson(&path, "name", "Pointland").unwrap_err();
        assert!(matches!(err, DataLoadError::BoundaryNotPolygonal { .. }));
        Ok(())
    }
}
