use csv::ReaderBuilder;
use std::{fs, io, path::Path};

use crate::error::{DataLoadError, UnknownCategoryError};

/// A CSV file held verbatim: header names plus one `Vec<String>` per row.
/// Cells stay strings; typing happens when a view is derived, not at load.
#[derive(Debug)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_csv(path: &Path) -> Result<Self, DataLoadError> {
        let file = fs::File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(path, file)
    }

    /// `path` is only used to label errors; the bytes come from `reader`.
    pub fn from_reader<R: io::Read>(path: &Path, reader: R) -> Result<Self, DataLoadError> {
        let csv_err = |source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Wide per-city table: one row per city, one column per category.
///
/// Dataframe exports keep their index as a nameless first column; anything
/// without a header name is not a category, and neither is the city key.
#[derive(Debug)]
pub struct CityCategoryTable {
    table: RawTable,
    city_idx: usize,
    categories: Vec<String>,
}

impl CityCategoryTable {
    pub fn from_csv(path: &Path, city_column: &str) -> Result<Self, DataLoadError> {
        let table = RawTable::from_csv(path)?;
        Self::from_raw(path, table, city_column)
    }

    fn from_raw(path: &Path, table: RawTable, city_column: &str) -> Result<Self, DataLoadError> {
        let city_idx =
            table
                .column_index(city_column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: city_column.to_string(),
                })?;
        let categories = table
            .headers()
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != city_idx && !h.is_empty())
            .map(|(_, h)| h.clone())
            .collect();
        Ok(Self {
            table,
            city_idx,
            categories,
        })
    }

    /// Category names in column order; the dropdown source. The first entry
    /// is the process-wide default selection.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn city_index(&self) -> usize {
        self.city_idx
    }

    /// Column index for `category`, or an error if it is not one of the
    /// category columns (the city key and nameless columns never are).
    pub fn category_index(&self, category: &str) -> Result<usize, UnknownCategoryError> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(UnknownCategoryError(category.to_string()));
        }
        self.table
            .column_index(category)
            .ok_or_else(|| UnknownCategoryError(category.to_string()))
    }
}

/// Per-year table: year key column plus one column per category. Years are
/// not unique at load time; the aggregator collapses duplicates.
#[derive(Debug)]
pub struct YearCategoryTable {
    table: RawTable,
    year_idx: usize,
    categories: Vec<String>,
}

impl YearCategoryTable {
    pub fn from_csv(path: &Path, year_column: &str) -> Result<Self, DataLoadError> {
        let table = RawTable::from_csv(path)?;
        Self::from_raw(path, table, year_column)
    }

    fn from_raw(path: &Path, table: RawTable, year_column: &str) -> Result<Self, DataLoadError> {
        let year_idx =
            table
                .column_index(year_column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: year_column.to_string(),
                })?;
        let categories = table
            .headers()
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != year_idx && !h.is_empty())
            .map(|(_, h)| h.clone())
            .collect();
        Ok(Self {
            table,
            year_idx,
            categories,
        })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn year_index(&self) -> usize {
        self.year_idx
    }

    pub fn category_index(&self, category: &str) -> Result<usize, UnknownCategoryError> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(UnknownCategoryError(category.to_string()));
        }
        self.table
            .column_index(category)
            .ok_or_else(|| UnknownCategoryError(category.to_string()))
    }
}
