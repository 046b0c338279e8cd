//! Reduction functions applied to a group of rows

use std::cmp::Ordering;

use crate::error::{Result, TableError};
use crate::model::{CellValue, Row};

/// Aggregation operation over one column of a row group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    /// Sum of all numeric values
    Sum,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Count of all rows
    Count,
    /// Average of numeric values
    Avg,
}

impl Aggregator {
    /// Reduce the `key` cells of `rows` to one value
    ///
    /// Every operation except `Count` fails on an empty group and on rows
    /// where the cell was never set.
    pub fn apply(&self, key: &str, rows: &[&Row]) -> Result<CellValue> {
        if rows.is_empty() && *self != Aggregator::Count {
            return Err(TableError::EmptyGroup(key.to_string()));
        }

        match self {
            Aggregator::Count => Ok(CellValue::Int(rows.len() as i64)),
            Aggregator::Sum => sum(key, rows),
            Aggregator::Avg => {
                let total = sum(key, rows)?.as_f64().unwrap_or_default();
                Ok(CellValue::Float(total / rows.len() as f64))
            }
            Aggregator::Min => extreme(key, rows, Ordering::Less),
            Aggregator::Max => extreme(key, rows, Ordering::Greater),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Min => "min",
            Aggregator::Max => "max",
            Aggregator::Count => "count",
            Aggregator::Avg => "avg",
        }
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Aggregator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Aggregator::Sum),
            "min" => Ok(Aggregator::Min),
            "max" => Ok(Aggregator::Max),
            "count" => Ok(Aggregator::Count),
            "avg" | "mean" => Ok(Aggregator::Avg),
            _ => Err(format!("Unknown aggregator: {}", s)),
        }
    }
}

fn cell<'r>(key: &str, rows: &[&'r Row], index: usize) -> Result<&'r CellValue> {
    rows[index].get(key).ok_or_else(|| TableError::MissingCell {
        column: key.to_string(),
        row: index,
    })
}

/// Integer sum while every cell is an `Int` and nothing overflows, float otherwise
fn sum(key: &str, rows: &[&Row]) -> Result<CellValue> {
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;

    for index in 0..rows.len() {
        let value = cell(key, rows, index)?;
        let number = value.as_f64().ok_or_else(|| TableError::NotNumeric {
            column: key.to_string(),
            value: value.to_string(),
        })?;
        float_total += number;
        int_total = match (int_total, value) {
            (Some(total), CellValue::Int(i)) => total.checked_add(*i),
            _ => None,
        };
    }

    Ok(match int_total {
        Some(total) => CellValue::Int(total),
        None => CellValue::Float(float_total),
    })
}

/// First cell that no other cell beats in the `wanted` direction
fn extreme(key: &str, rows: &[&Row], wanted: Ordering) -> Result<CellValue> {
    let mut best = cell(key, rows, 0)?;

    for index in 1..rows.len() {
        let candidate = cell(key, rows, index)?;
        let ordering = candidate
            .compare(best)
            .ok_or_else(|| TableError::Incomparable {
                column: key.to_string(),
                left: format!("{} ({})", candidate, candidate.kind()),
                right: format!("{} ({})", best, best.kind()),
            })?;
        if ordering == wanted {
            best = candidate;
        }
    }

    Ok(best.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn amounts(values: &[CellValue]) -> Table<()> {
        let mut table = Table::new();
        table.add_column("amount", "Amount").unwrap();
        for value in values {
            table.push_row().set("amount", value.clone()).unwrap();
        }
        table
    }

    fn apply(op: Aggregator, table: &Table<()>) -> Result<CellValue> {
        let rows: Vec<&Row> = table.rows().iter().collect();
        op.apply("amount", &rows)
    }

    #[test]
    fn test_sum_min_max_count() {
        let table = amounts(&[10.into(), 5.into(), (-3).into()]);

        assert_eq!(apply(Aggregator::Sum, &table).unwrap(), CellValue::Int(12));
        assert_eq!(apply(Aggregator::Min, &table).unwrap(), CellValue::Int(-3));
        assert_eq!(apply(Aggregator::Max, &table).unwrap(), CellValue::Int(10));
        assert_eq!(apply(Aggregator::Count, &table).unwrap(), CellValue::Int(3));
        assert_eq!(apply(Aggregator::Avg, &table).unwrap(), CellValue::Float(4.0));
    }

    #[test]
    fn test_sum_mixed_numbers_is_float() {
        let table = amounts(&[1000.0.into(), 200.into()]);
        assert_eq!(apply(Aggregator::Sum, &table).unwrap(), CellValue::Float(1200.0));
    }

    #[test]
    fn test_min_max_on_strings() {
        let table = amounts(&["pear".into(), "apple".into(), "zucchini".into()]);
        assert_eq!(apply(Aggregator::Min, &table).unwrap(), CellValue::from("apple"));
        assert_eq!(apply(Aggregator::Max, &table).unwrap(), CellValue::from("zucchini"));
    }

    #[test]
    fn test_empty_group_fails_except_count() {
        let table = amounts(&[]);

        assert!(matches!(apply(Aggregator::Sum, &table), Err(TableError::EmptyGroup(_))));
        assert!(matches!(apply(Aggregator::Min, &table), Err(TableError::EmptyGroup(_))));
        assert!(matches!(apply(Aggregator::Max, &table), Err(TableError::EmptyGroup(_))));
        assert_eq!(apply(Aggregator::Count, &table).unwrap(), CellValue::Int(0));
    }

    #[test]
    fn test_unset_and_non_numeric_cells_fail() {
        let mut table = amounts(&[1.into()]);
        table.push_row();
        assert!(matches!(
            apply(Aggregator::Sum, &table),
            Err(TableError::MissingCell { row: 1, .. })
        ));

        let table = amounts(&[1.into(), "two".into()]);
        assert!(matches!(apply(Aggregator::Sum, &table), Err(TableError::NotNumeric { .. })));
        assert!(matches!(apply(Aggregator::Max, &table), Err(TableError::Incomparable { .. })));
    }

    #[test]
    fn test_parse_aggregator() {
        assert_eq!("SUM".parse::<Aggregator>().unwrap(), Aggregator::Sum);
        assert_eq!("mean".parse::<Aggregator>().unwrap(), Aggregator::Avg);
        assert!("median".parse::<Aggregator>().is_err());
    }
}
