use std::path::PathBuf;
use thiserror::Error;

/// Startup failure: one of the source artifacts could not be produced.
/// Loading is all-or-nothing, so any variant aborts startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("parsing {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("parsing {path}: {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path} row {row}: `{column}` is not a coordinate: `{cell}`")]
    BadCoordinate {
        path: PathBuf,
        row: usize,
        column: String,
        cell: String,
    },

    #[error("no feature with {property} = `{name}` in {path}")]
    BoundaryNotFound {
        path: PathBuf,
        property: String,
        name: String,
    },

    #[error("feature `{name}` in {path} carries no polygon geometry")]
    BoundaryNotPolygonal { path: PathBuf, name: String },
}

/// A selection named a column the source table does not have. Recoverable:
/// the caller keeps whatever it last rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategoryError(pub String);

/// Why a selection cycle produced nothing to publish.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    #[error("selection compute task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
