//! Table: column registry, rows, and row building from source items

use log::debug;

use crate::error::{Result, TableError};

use super::column::{Column, ColumnOptions, ColumnRegistry};
use super::record::Record;
use super::row::{Row, RowMut};
use super::value::CellValue;

/// A table containing columns and rows built from source items of type `T`
#[derive(Debug)]
pub struct Table<T> {
    columns: ColumnRegistry<T>,
    rows: Vec<Row>,
    source: Option<Vec<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            columns: ColumnRegistry::new(),
            rows: Vec::new(),
            source: None,
        }
    }

    /// Create an empty table that keeps the collection its rows come from
    pub fn with_source(source: Vec<T>) -> Self {
        Self {
            source: Some(source),
            ..Self::new()
        }
    }

    /// Original collection, if the table was created with one
    pub fn source(&self) -> Option<&[T]> {
        self.source.as_deref()
    }

    /// Register a column that reads the source attribute named `key`
    pub fn add_column(&mut self, key: impl Into<String>, header: impl Into<String>) -> Result<()> {
        self.insert_column(Column::new(key, header))
    }

    /// Register a column computed from each source item
    pub fn add_computed_column<F>(
        &mut self,
        key: impl Into<String>,
        header: impl Into<String>,
        transformer: F,
    ) -> Result<()>
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        self.insert_column(Column::new(key, header).with_transformer(transformer))
    }

    /// Register a column with metadata options
    pub fn add_column_with_options(
        &mut self,
        key: impl Into<String>,
        header: impl Into<String>,
        options: ColumnOptions,
    ) -> Result<()> {
        self.insert_column(Column::new(key, header).with_options(options))
    }

    /// Register a fully configured column
    pub fn insert_column(&mut self, column: Column<T>) -> Result<()> {
        debug!(
            "registering column {} ({}){}",
            column.key(),
            column.header(),
            if column.transformer().is_some() { " with transformer" } else { "" }
        );
        self.columns.add(column)
    }

    /// Get column by key
    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.get(key)
    }

    /// Columns in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter()
    }

    /// Column keys in insertion order
    pub fn column_keys(&self) -> &[String] {
        self.columns.keys()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Write access to an existing row
    pub fn row_mut(&mut self, index: usize) -> Option<RowMut<'_, T>> {
        let row = self.rows.get_mut(index)?;
        Some(RowMut::new(&self.columns, row))
    }

    /// Append an empty row and return write access to it
    pub fn push_row(&mut self) -> RowMut<'_, T> {
        let index = self.rows.len();
        self.rows.push(Row::default());
        RowMut::new(&self.columns, &mut self.rows[index])
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Record> Table<T> {
    /// Append one row per item, in item order
    ///
    /// Each registered column is filled from its transformer when it has one,
    /// otherwise from the item's attribute of the same name; items without
    /// that attribute leave the cell unset.
    pub fn build_rows<'i, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'i T>,
        T: 'i,
    {
        self.build_rows_with(items, |_, _| Ok(()))
    }

    /// Like [`Table::build_rows`], then hands every row to `refine` for manual cells
    ///
    /// An error from `refine` stops row building; rows built before it stay.
    pub fn build_rows_with<'i, I, F>(&mut self, items: I, mut refine: F) -> Result<()>
    where
        I: IntoIterator<Item = &'i T>,
        T: 'i,
        F: FnMut(&mut RowMut<'_, T>, &T) -> Result<()>,
    {
        let before = self.rows.len();
        for item in items {
            let mut row = Row::default();
            for column in self.columns.iter() {
                let value = match column.transformer() {
                    Some(transform) => Some(transform(item)),
                    None => item.field(column.key()),
                };
                if let Some(value) = value {
                    row.insert(column.key(), value);
                }
            }

            refine(&mut RowMut::new(&self.columns, &mut row), item)?;
            self.rows.push(row);
        }
        debug!(
            "built {} rows over {} columns",
            self.rows.len() - before,
            self.columns.len()
        );
        Ok(())
    }

    /// Build rows from the collection given to [`Table::with_source`]
    pub fn build_rows_from_source<F>(&mut self, refine: F) -> Result<()>
    where
        F: FnMut(&mut RowMut<'_, T>, &T) -> Result<()>,
    {
        let Some(source) = self.source.take() else {
            return Ok(());
        };
        let result = self.build_rows_with(source.iter(), refine);
        self.source = Some(source);
        result
    }
}

/// Ensure a column exists, for callers that need its header
pub(crate) fn require_column<'t, T>(table: &'t Table<T>, key: &str) -> Result<&'t Column<T>> {
    table
        .column(key)
        .ok_or_else(|| TableError::ColumnNotFound(key.to_string()))
}
