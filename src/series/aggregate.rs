use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::{clean_cell, coerce_numeric};
use crate::{error::UnknownCategoryError, store::YearCategoryTable};

/// One year's total for the selected category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// Collapse the per-year column into exactly one entry per distinct year,
/// summed over duplicate rows, sorted ascending.
///
/// Cells that fail coercion count as 0 here, unlike the projector: the
/// yearly totals keep every year the source mentions. Rows whose year key
/// does not parse as an integer are skipped.
pub fn aggregate(
    table: &YearCategoryTable,
    category: &str,
) -> Result<Vec<YearPoint>, UnknownCategoryError> {
    let col = table.category_index(category)?;
    let year_col = table.year_index();

    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        let year_cell = row.get(year_col).map(String::as_str).unwrap_or("");
        let year: i32 = match clean_cell(year_cell).parse() {
            Ok(y) => y,
            Err(_) => {
                warn!(row = i + 2, cell = year_cell, "skipping row with unparseable year");
                continue;
            }
        };
        let value = coerce_numeric(row.get(col).map(String::as_str).unwrap_or("")).unwrap_or(0.0);
        *totals.entry(year).or_insert(0.0) += value;
    }

    Ok(totals
        .into_iter()
        .map(|(year, value)| YearPoint { year, value })
        .collect())
}
