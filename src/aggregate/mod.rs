//! Grouping and aggregation of table rows

mod aggregator;
pub mod keys;

use indexmap::IndexMap;
use log::{debug, trace};
use rustc_hash::FxBuildHasher;

use crate::error::Result;
use crate::model::{require_column, CellValue, Row, Table};

pub use aggregator::Aggregator;

/// Maps a raw grouping cell to the identifier rows are bucketed by
pub type GroupKeyFn = Box<dyn Fn(&CellValue) -> CellValue>;

/// A group-by query: grouping column, key function and per-column aggregators
pub struct GroupBy {
    key: String,
    key_fn: GroupKeyFn,
    aggregators: IndexMap<String, Aggregator>,
}

impl GroupBy {
    /// Group by the raw values of column `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_fn: Box::new(keys::identity),
            aggregators: IndexMap::new(),
        }
    }

    /// Canonicalize grouping values before bucketing
    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&CellValue) -> CellValue + 'static,
    {
        self.key_fn = Box::new(key_fn);
        self
    }

    /// Aggregate column `key` with `op`; a later call for the same key replaces it
    pub fn aggregate(mut self, key: impl Into<String>, op: Aggregator) -> Self {
        self.aggregators.insert(key.into(), op);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aggregators(&self) -> impl Iterator<Item = (&str, Aggregator)> {
        self.aggregators.iter().map(|(k, op)| (k.as_str(), *op))
    }

    /// Build the summary table: one row per distinct group, in first-seen order
    ///
    /// The result has the grouping column followed by one column per aggregator,
    /// with headers copied from `table`. An unset grouping cell groups as `Null`.
    pub fn apply<T>(&self, table: &Table<T>) -> Result<Table<T>> {
        let mut result = Table::new();
        result.add_column(self.key.as_str(), require_column(table, &self.key)?.header())?;
        for key in self.aggregators.keys() {
            result.add_column(key.as_str(), require_column(table, key)?.header())?;
        }

        let groups = self.partition(table);
        debug!(
            "grouped {} rows by {} into {} groups",
            table.row_count(),
            self.key,
            groups.len()
        );

        for (id, rows) in groups {
            trace!("group {} has {} rows", id, rows.len());
            let first = &rows[0][self.key.as_str()];

            let mut row = result.push_row();
            row.set(&self.key, (self.key_fn)(first))?;
            for (key, op) in &self.aggregators {
                row.set(key, op.apply(key, &rows)?)?;
            }
        }

        Ok(result)
    }

    fn partition<'t, T>(
        &self,
        table: &'t Table<T>,
    ) -> IndexMap<CellValue, Vec<&'t Row>, FxBuildHasher> {
        let mut groups: IndexMap<CellValue, Vec<&Row>, FxBuildHasher> = IndexMap::default();
        for row in table.rows() {
            let id = (self.key_fn)(&row[self.key.as_str()]);
            groups.entry(id).or_default().push(row);
        }
        groups
    }
}

impl std::fmt::Debug for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupBy")
            .field("key", &self.key)
            .field("aggregators", &self.aggregators)
            .finish_non_exhaustive()
    }
}

impl<T> Table<T> {
    /// Group rows by column `key` and aggregate the listed columns
    pub fn group_by(&self, key: &str, aggregators: &[(&str, Aggregator)]) -> Result<Table<T>> {
        self.group_by_with(key, aggregators, keys::identity)
    }

    /// Group rows by `key_fn` applied to column `key`, then aggregate
    pub fn group_by_with<F>(
        &self,
        key: &str,
        aggregators: &[(&str, Aggregator)],
        key_fn: F,
    ) -> Result<Table<T>>
    where
        F: Fn(&CellValue) -> CellValue + 'static,
    {
        aggregators
            .iter()
            .fold(GroupBy::new(key).with_key_fn(key_fn), |query, (col, op)| {
                query.aggregate(*col, *op)
            })
            .apply(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    fn monthly() -> Table<()> {
        let mut table = Table::new();
        table.add_column("month", "Month").unwrap();
        table.add_column("amount", "Amount").unwrap();
        for (month, amount) in [("2009-10", 1000), ("2009-9", 100), ("2009-10", 200)] {
            let mut row = table.push_row();
            row.set("month", month).unwrap();
            row.set("amount", amount).unwrap();
        }
        table
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let grouped = monthly()
            .group_by("month", &[("amount", Aggregator::Sum)])
            .unwrap();

        assert_eq!(grouped.column_keys(), ["month", "amount"]);
        assert_eq!(grouped.column("amount").unwrap().header(), "Amount");
        assert_eq!(grouped.row_count(), 2);
        assert_eq!(grouped.rows()[0]["month"], CellValue::from("2009-10"));
        assert_eq!(grouped.rows()[0]["amount"], CellValue::Int(1200));
        assert_eq!(grouped.rows()[1]["month"], CellValue::from("2009-9"));
        assert_eq!(grouped.rows()[1]["amount"], CellValue::Int(100));
    }

    #[test]
    fn test_key_fn_merges_groups() {
        let grouped = monthly()
            .group_by_with(
                "month",
                &[("amount", Aggregator::Count)],
                |v| CellValue::from(v.display().split('-').next().unwrap_or_default()),
            )
            .unwrap();

        assert_eq!(grouped.row_count(), 1);
        assert_eq!(grouped.rows()[0]["month"], CellValue::from("2009"));
        assert_eq!(grouped.rows()[0]["amount"], CellValue::Int(3));
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let table = monthly();
        let query = GroupBy::new("month").aggregate("amount", Aggregator::Max);

        let first = query.apply(&table).unwrap();
        let second = query.apply(&table).unwrap();
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_unknown_columns_fail_fast() {
        let table = monthly();

        assert!(matches!(
            table.group_by("week", &[("amount", Aggregator::Sum)]),
            Err(TableError::ColumnNotFound(ref k)) if k == "week"
        ));
        assert!(matches!(
            table.group_by("month", &[("price", Aggregator::Sum)]),
            Err(TableError::ColumnNotFound(ref k)) if k == "price"
        ));
        assert!(matches!(
            table.group_by("month", &[("month", Aggregator::Count)]),
            Err(TableError::ColumnAlreadyExists(_))
        ));
    }

    #[test]
    fn test_large_ints_do_not_merge_with_nearby_floats() {
        let mut table: Table<()> = Table::new();
        table.add_column("k", "K").unwrap();
        table.add_column("n", "N").unwrap();
        for key in [
            CellValue::Int(9_007_199_254_740_993),
            CellValue::Float(9_007_199_254_740_992.0),
            CellValue::Int(9_007_199_254_740_992),
        ] {
            let mut row = table.push_row();
            row.set("k", key).unwrap();
            row.set("n", 1).unwrap();
        }

        let grouped = table.group_by("k", &[("n", Aggregator::Count)]).unwrap();
        assert_eq!(grouped.row_count(), 2);
        assert_eq!(grouped.rows()[0]["n"], CellValue::Int(1));
        assert_eq!(grouped.rows()[1]["n"], CellValue::Int(2));
    }

    #[test]
    fn test_empty_table_groups_to_empty_table() {
        let mut table: Table<()> = Table::new();
        table.add_column("month", "Month").unwrap();
        table.add_column("amount", "Amount").unwrap();

        let grouped = table.group_by("month", &[("amount", Aggregator::Sum)]).unwrap();
        assert_eq!(grouped.column_count(), 2);
        assert!(grouped.is_empty());
    }
}
