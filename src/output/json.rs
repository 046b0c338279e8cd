//! JSON export formats

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::{JsonOptions, TypeInference};
use crate::error::Result;
use crate::model::{CellValue, ColumnOptions, Row, Table};

use super::Exporter;

/// Exporter for `{"properties": {..}, "items": [..]}` with raw cell values
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    options: JsonOptions,
}

impl JsonExporter {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }
}

/// Exporter for the typed collection shape: inferred column types and
/// items keyed by 1-based row number
#[derive(Debug, Clone, Default)]
pub struct JsonCollectionExporter {
    options: JsonOptions,
}

impl JsonCollectionExporter {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }
}

/// Declared JSON type of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
}

type Item<'a> = IndexMap<&'a str, Value>;

#[derive(Serialize)]
struct JsonProperty<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    properties: IndexMap<&'a str, JsonProperty<'a>>,
    items: Vec<Item<'a>>,
}

#[derive(Serialize)]
struct TypedProperty<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    column_type: ColumnType,
    unique: bool,
    meta: &'a ColumnOptions,
}

#[derive(Serialize)]
struct CollectionDocument<'a> {
    properties: IndexMap<&'a str, TypedProperty<'a>>,
    items: IndexMap<String, Item<'a>>,
}

fn cell_value_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => Value::String(s.clone()),
        CellValue::Date(d) => Value::String(d.to_string()),
        CellValue::DateTime(dt) => Value::String(dt.to_string()),
    }
}

/// Set cells of a row in column order; unset cells are left out
fn item<'a, T>(table: &'a Table<T>, row: &Row) -> Item<'a> {
    table
        .column_keys()
        .iter()
        .filter_map(|key| Some((key.as_str(), cell_value_to_json(row.get(key)?))))
        .collect()
}

fn write_document<S: Serialize>(document: &S, pretty: bool, writer: &mut dyn Write) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, document)?;
    } else {
        serde_json::to_writer(&mut *writer, document)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Classify a single value: numbers, and strings that read back as the same
/// number text, are `number`; everything else (including no value) is `string`
pub fn infer_type(value: Option<&CellValue>) -> ColumnType {
    match value {
        Some(CellValue::Int(_) | CellValue::Float(_)) => ColumnType::Number,
        Some(CellValue::String(s)) if is_number_text(s) => ColumnType::Number,
        _ => ColumnType::String,
    }
}

fn is_number_text(s: &str) -> bool {
    if let Ok(i) = s.parse::<i64>() {
        return i.to_string() == s;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => f.to_string() == s || format!("{:?}", f) == s,
        _ => false,
    }
}

fn column_type<T>(table: &Table<T>, key: &str, inference: TypeInference) -> ColumnType {
    match inference {
        TypeInference::FirstRow => infer_type(table.rows().first().and_then(|row| row.get(key))),
        TypeInference::WholeColumn => {
            let mut cells = table.rows().iter().filter_map(|row| row.get(key)).peekable();
            let any = cells.peek().is_some();
            if any && cells.all(|cell| infer_type(Some(cell)) == ColumnType::Number) {
                ColumnType::Number
            } else {
                ColumnType::String
            }
        }
    }
}

impl<T> Exporter<T> for JsonExporter {
    fn export(&self, table: &Table<T>, writer: &mut dyn Write) -> Result<()> {
        let document = JsonDocument {
            properties: table
                .columns()
                .map(|column| (column.key(), JsonProperty { name: column.header() }))
                .collect(),
            items: table.rows().iter().map(|row| item(table, row)).collect(),
        };
        write_document(&document, self.options.pretty, writer)
    }
}

impl<T> Exporter<T> for JsonCollectionExporter {
    fn export(&self, table: &Table<T>, writer: &mut dyn Write) -> Result<()> {
        let document = CollectionDocument {
            properties: table
                .columns()
                .map(|column| {
                    let property = TypedProperty {
                        name: column.header(),
                        column_type: column_type(table, column.key(), self.options.inference),
                        unique: true,
                        meta: column.options(),
                    };
                    (column.key(), property)
                })
                .collect(),
            items: table
                .rows()
                .iter()
                .enumerate()
                .map(|(index, row)| ((index + 1).to_string(), item(table, row)))
                .collect(),
        };
        write_document(&document, self.options.pretty, writer)
    }
}
