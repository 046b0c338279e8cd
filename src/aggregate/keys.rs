//! Group key functions: canonicalize a grouping cell before bucketing

use chrono::Datelike;

use crate::model::CellValue;

/// Use the cell as-is
pub fn identity(value: &CellValue) -> CellValue {
    value.clone()
}

/// `"<year>-<month>"` with an unpadded month, e.g. `"2009-9"`
///
/// Non-date values pass through unchanged.
pub fn year_month(value: &CellValue) -> CellValue {
    match value {
        CellValue::Date(d) => format!("{}-{}", d.year(), d.month()).into(),
        CellValue::DateTime(dt) => format!("{}-{}", dt.year(), dt.month()).into(),
        other => other.clone(),
    }
}

/// Calendar year of a date or datetime
pub fn year(value: &CellValue) -> CellValue {
    match value {
        CellValue::Date(d) => CellValue::Int(i64::from(d.year())),
        CellValue::DateTime(dt) => CellValue::Int(i64::from(dt.year())),
        other => other.clone(),
    }
}

/// Case-insensitive grouping of strings
pub fn lowercase(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) => CellValue::String(s.to_lowercase()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_year_month_is_unpadded() {
        let october = CellValue::Date(NaiveDate::from_ymd_opt(2009, 10, 4).unwrap());
        let september = CellValue::Date(NaiveDate::from_ymd_opt(2009, 9, 4).unwrap());

        assert_eq!(year_month(&october), CellValue::from("2009-10"));
        assert_eq!(year_month(&september), CellValue::from("2009-9"));
        assert_eq!(year(&september), CellValue::Int(2009));
    }

    #[test]
    fn test_non_dates_pass_through() {
        assert_eq!(year_month(&CellValue::from("x")), CellValue::from("x"));
        assert_eq!(lowercase(&CellValue::from("AbC")), CellValue::from("abc"));
        assert_eq!(lowercase(&CellValue::Int(1)), CellValue::Int(1));
    }
}
