use rayon::prelude::*;
use serde::Serialize;

use super::coerce_numeric;
use crate::{error::UnknownCategoryError, store::CityCategoryTable};

/// One city's contribution to the selected category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub city: String,
    pub value: f64,
}

/// Project one category column into a clean per-city series.
///
/// Rows whose cell is missing, non-numeric, zero or negative are dropped;
/// survivors keep the table's row order. Pure: same table and category,
/// same output.
pub fn project(
    table: &CityCategoryTable,
    category: &str,
) -> Result<Vec<CategoryPoint>, UnknownCategoryError> {
    let col = table.category_index(category)?;
    let city_col = table.city_index();

    // Parallel collect keeps the original row order.
    let points = table
        .rows()
        .par_iter()
        .filter_map(|row| {
            let raw = row.get(col).map(String::as_str).unwrap_or("");
            let value = coerce_numeric(raw)?;
            if value <= 0.0 {
                return None;
            }
            let city = row.get(city_col)?;
            Some(CategoryPoint {
                city: city.clone(),
                value,
            })
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn table(csv: &str) -> CityCategoryTable {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(csv.as_bytes()).unwrap();
        f.flush().unwrap();
        CityCategoryTable::from_csv(&path, "City").unwrap()
    }

    fn fixture() -> CityCategoryTable {
        table(
            "\
,City,Litter,Noise
0,Prague,42,7
1,Brno,0,abc
2,Ostrava,-3,12
3,Plzen,abc,1
4,Olomouc,5,
",
        )
    }

    #[test]
    fn drops_invalid_zero_and_negative_rows() {
        let series = project(&fixture(), "Litter").unwrap();
        assert_eq!(
            series,
            vec![
                CategoryPoint {
                    city: "Prague".to_string(),
                    value: 42.0
                },
                CategoryPoint {
                    city: "Olomouc".to_string(),
                    value: 5.0
                },
            ]
        );
    }

    #[test]
    fn every_projected_value_is_positive() {
        let t = fixture();
        for category in t.categories().to_vec() {
            for point in project(&t, &category).unwrap() {
                assert!(point.value > 0.0, "{category}/{}", point.city);
            }
        }
    }

    #[test]
    fn preserves_table_row_order() {
        let series = project(&fixture(), "Noise").unwrap();
        let cities: Vec<&str> = series.iter().map(|p| p.city.as_str()).collect();
        assert_eq!(cities, vec!["Prague", "Ostrava", "Plzen"]);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = project(&fixture(), "NotARealCategory").unwrap_err();
        assert_eq!(err, UnknownCategoryError("NotARealCategory".to_string()));
    }

    #[test]
    fn projection_is_idempotent() {
        let t = fixture();
        assert_eq!(project(&t, "Litter").unwrap(), project(&t, "Litter").unwrap());
    }
}
