//! Rows and validated row writes

use rustc_hash::FxHashMap;

use crate::error::{Result, TableError};

use super::column::ColumnRegistry;
use super::value::CellValue;

/// A row in the table
///
/// Cells are keyed by column key. A cell that was never written is unset,
/// which is different from holding `CellValue::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: FxHashMap<String, CellValue>,
}

impl Row {
    /// Get a cell value by column key
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    /// Check whether a cell has been written
    pub fn is_set(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Number of cells that have been written
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn insert(&mut self, key: &str, value: CellValue) {
        self.cells.insert(key.to_string(), value);
    }
}

static UNSET: CellValue = CellValue::Null;

impl std::ops::Index<&str> for Row {
    type Output = CellValue;

    /// Unset cells read as `Null`
    fn index(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&UNSET)
    }
}

/// Write access to a row, checked against the owning table's columns
pub struct RowMut<'a, T> {
    columns: &'a ColumnRegistry<T>,
    row: &'a mut Row,
}

impl<'a, T> RowMut<'a, T> {
    pub(crate) fn new(columns: &'a ColumnRegistry<T>, row: &'a mut Row) -> Self {
        Self { columns, row }
    }

    /// Set a cell; the key must name a registered column
    pub fn set(&mut self, key: &str, value: impl Into<CellValue>) -> Result<()> {
        if !self.columns.contains(key) {
            return Err(TableError::ColumnNotFound(key.to_string()));
        }
        self.row.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.row.get(key)
    }

    pub fn row(&self) -> &Row {
        &*self.row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn registry() -> ColumnRegistry<()> {
        let mut columns = ColumnRegistry::new();
        columns.add(Column::new("amount", "Amount")).unwrap();
        columns
    }

    #[test]
    fn test_write_registered_key() {
        let columns = registry();
        let mut row = Row::default();

        RowMut::new(&columns, &mut row).set("amount", 12.5).unwrap();
        assert_eq!(row.get("amount"), Some(&CellValue::Float(12.5)));
        assert_eq!(row["amount"], CellValue::Float(12.5));
    }

    #[test]
    fn test_write_unknown_key_fails() {
        let columns = registry();
        let mut row = Row::default();

        let err = RowMut::new(&columns, &mut row).set("price", 1).unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(ref k) if k == "price"));
        assert!(row.is_empty());
    }

    #[test]
    fn test_unset_cell_reads_as_null() {
        let row = Row::default();
        assert!(!row.is_set("amount"));
        assert_eq!(row["amount"], CellValue::Null);
    }
}
