//! JSON array source reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use serde_json::Value;

use crate::model::{json_to_cell, CellValue};

use super::{Parser, SourceRecord};

/// Parser for JSON files holding an array of objects (or a single object)
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path) -> Result<Vec<SourceRecord>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let value: Value =
            serde_json::from_reader(reader).context("Failed to parse JSON file")?;

        // Handle both arrays and single objects
        let array = match value {
            Value::Array(arr) => arr,
            Value::Object(_) => vec![value],
            _ => bail!("JSON must be an array or object"),
        };

        let mut records: Vec<SourceRecord> = Vec::with_capacity(array.len());
        for (index, item) in array.iter().enumerate() {
            let Value::Object(obj) = item else {
                bail!("JSON item {} is not an object", index + 1);
            };
            records.push(
                obj.iter()
                    .map(|(key, value)| (key.clone(), json_value_to_cell(value)))
                    .collect(),
            );
        }

        debug!("read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

/// Like [`json_to_cell`], but strings holding ISO dates become dates
fn json_value_to_cell(value: &Value) -> CellValue {
    if let Value::String(s) = value {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return CellValue::Date(date);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return CellValue::DateTime(dt);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return CellValue::DateTime(dt);
        }
    }
    json_to_cell(value)
}
