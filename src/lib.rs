//! datatable - In-memory tabular views over arbitrary collections
//!
//! Define columns by attribute name or by computation, build rows from any
//! collection of source items, group and aggregate rows into summary tables,
//! and export the result as CSV, JSON or a text table.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod output;
pub mod parser;

pub use aggregate::{Aggregator, GroupBy};
pub use config::{CsvOptions, ExportFormat, JsonOptions, TypeInference};
pub use error::{Result, TableError};
pub use model::{CellValue, Column, ColumnOptions, Record, Row, RowMut, Table};
