//! Column definitions and the ordered column registry

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TableError};

use super::value::CellValue;

/// Computes a cell value from a source item
pub type Transformer<T> = Box<dyn Fn(&T) -> CellValue>;

/// Free-form column metadata (uniqueness, semantic type hints, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnOptions(IndexMap<String, Value>);

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the column values as unique
    pub fn unique(self) -> Self {
        self.with("unique", true)
    }

    /// Attach a semantic type hint such as `"currency"` or `"date"`
    pub fn semantic_type(self, kind: impl Into<String>) -> Self {
        let kind: String = kind.into();
        self.with("type", kind)
    }

    /// Set an arbitrary metadata entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Column metadata
pub struct Column<T> {
    key: String,
    header: String,
    transformer: Option<Transformer<T>>,
    options: ColumnOptions,
}

impl<T> Column<T> {
    /// Create a column that reads the source attribute named like its key
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            transformer: None,
            options: ColumnOptions::default(),
        }
    }

    /// Compute the cell from the source item instead of reading an attribute
    pub fn with_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        self.transformer = Some(Box::new(transformer));
        self
    }

    pub fn with_options(mut self, options: ColumnOptions) -> Self {
        self.options = options;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn transformer(&self) -> Option<&Transformer<T>> {
        self.transformer.as_ref()
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("transformer", &self.transformer.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Columns keyed for lookup, with insertion order kept separately
pub struct ColumnRegistry<T> {
    by_key: FxHashMap<String, Column<T>>,
    order: Vec<String>,
}

impl<T> Default for ColumnRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ColumnRegistry<T> {
    pub fn new() -> Self {
        Self {
            by_key: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Register a column; its key must not be taken yet
    pub fn add(&mut self, column: Column<T>) -> Result<()> {
        if self.by_key.contains_key(column.key()) {
            return Err(TableError::ColumnAlreadyExists(column.key.clone()));
        }
        self.order.push(column.key.clone());
        self.by_key.insert(column.key.clone(), column);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Column<T>> {
        self.by_key.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Column keys in insertion order
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Column<T>> {
        self.order.iter().filter_map(|key| self.by_key.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T> fmt::Debug for ColumnRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
