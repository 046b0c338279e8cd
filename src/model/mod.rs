//! Data model for tabular data representation

mod column;
mod record;
mod row;
mod table;
mod value;

pub use column::{Column, ColumnOptions, ColumnRegistry, Transformer};
pub use record::{json_to_cell, Record};
pub use row::{Row, RowMut};
pub use table::Table;
pub(crate) use table::require_column;
pub use value::CellValue;
