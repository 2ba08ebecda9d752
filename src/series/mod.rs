//! The derived views: every selection regenerates these wholesale from the
//! immutable store; nothing here is ever updated in place.

mod aggregate;
mod join;
mod project;
mod update;

pub use aggregate::{aggregate, YearPoint};
pub use join::{join, Marker};
pub use project::{project, CategoryPoint};
pub use update::DashboardUpdate;

/// Trim whitespace and strip one layer of wrapping quotes.
fn clean_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Numeric coercion shared by the projector and the aggregator: empty,
/// non-numeric and non-finite cells coerce to `None`. The projector drops
/// `None` rows; the aggregator counts them as zero.
fn coerce_numeric(raw: &str) -> Option<f64> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_plain_and_quoted_numbers() {
        assert_eq!(coerce_numeric("42"), Some(42.0));
        assert_eq!(coerce_numeric(" 7.5 "), Some(7.5));
        assert_eq!(coerce_numeric("\"3\""), Some(3.0));
        assert_eq!(coerce_numeric("-2"), Some(-2.0));
        assert_eq!(coerce_numeric("0"), Some(0.0));
    }

    #[test]
    fn rejects_empty_and_non_numeric_cells() {
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("   "), None);
        assert_eq!(coerce_numeric("abc"), None);
        assert_eq!(coerce_numeric("12x"), None);
    }

    #[test]
    fn rejects_non_finite_parses() {
        assert_eq!(coerce_numeric("NaN"), None);
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric("-inf"), None);
    }
}
