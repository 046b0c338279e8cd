//! Named-attribute access for source items

use indexmap::IndexMap;
use serde_json::Value;

use super::value::CellValue;

/// A source item that exposes attributes by name
///
/// Row building falls back to this lookup for every column registered
/// without a transformer. Returning `None` leaves the cell unset.
pub trait Record {
    fn field(&self, key: &str) -> Option<CellValue>;
}

impl Record for IndexMap<String, CellValue> {
    fn field(&self, key: &str) -> Option<CellValue> {
        self.get(key).cloned()
    }
}

impl Record for Value {
    fn field(&self, key: &str) -> Option<CellValue> {
        self.as_object()?.get(key).map(json_to_cell)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, key: &str) -> Option<CellValue> {
        (**self).field(key)
    }
}

/// Convert a JSON value into a cell, keeping nested structures as JSON text
pub fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        Value::String(s) => CellValue::String(s.clone()),
        Value::Array(_) | Value::Object(_) => CellValue::String(value.to_string()),
    }
}
