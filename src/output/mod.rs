//! Table exporters

mod csv;
mod json;
mod text;

use std::io::Write;

use crate::config::{CsvOptions, ExportFormat, JsonOptions};
use crate::error::Result;
use crate::format::number_to_currency;
use crate::model::{CellValue, Table};

pub use self::csv::CsvExporter;
pub use self::json::{infer_type, ColumnType, JsonCollectionExporter, JsonExporter};
pub use self::text::TextExporter;

/// Trait for table exporters
pub trait Exporter<T> {
    /// Write the table to a writer
    fn export(&self, table: &Table<T>, writer: &mut dyn Write) -> Result<()>;

    /// Export to an in-memory string
    fn export_to_string(&self, table: &Table<T>) -> Result<String> {
        let mut buffer = Vec::new();
        self.export(table, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Create an exporter based on format type
    pub fn create<'a, T>(
        format: ExportFormat,
        csv: &CsvOptions,
        json: &JsonOptions,
    ) -> Box<dyn Exporter<T> + 'a> {
        match format {
            ExportFormat::Csv => Box::new(CsvExporter::new(csv.clone())),
            ExportFormat::Json => Box::new(JsonExporter::new(*json)),
            ExportFormat::JsonCollection => Box::new(JsonCollectionExporter::new(*json)),
            ExportFormat::Text => Box::new(TextExporter::new(csv.clone())),
        }
    }
}

/// Render a table as CSV text
pub fn to_csv<T>(table: &Table<T>, options: &CsvOptions) -> Result<String> {
    CsvExporter::new(options.clone()).export_to_string(table)
}

/// Render a table as `properties` + flat `items` JSON
pub fn to_json<T>(table: &Table<T>) -> Result<String> {
    JsonExporter::default().export_to_string(table)
}

/// Render a table as typed `properties` + numbered `items` JSON
pub fn to_json_collection<T>(table: &Table<T>) -> Result<String> {
    JsonCollectionExporter::default().export_to_string(table)
}

/// Render a table as a box-drawn text table
pub fn to_text<T>(table: &Table<T>, options: &CsvOptions) -> Result<String> {
    TextExporter::new(options.clone()).export_to_string(table)
}

/// Export a table to stdout
pub fn export_to_stdout<T>(
    table: &Table<T>,
    format: ExportFormat,
    csv: &CsvOptions,
    json: &JsonOptions,
) -> Result<()> {
    let exporter = ExporterFactory::create(format, csv, json);
    let mut stdout = std::io::stdout().lock();
    exporter.export(table, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Header texts in column order
fn headers<T>(table: &Table<T>) -> Vec<String> {
    table.columns().map(|c| c.header().to_string()).collect()
}

/// Cell texts of every row in column order; numbers get currency formatting
fn formatted_rows<T>(table: &Table<T>, options: &CsvOptions) -> Vec<Vec<String>> {
    let currency = options.currency();
    table
        .rows()
        .iter()
        .map(|row| {
            table
                .column_keys()
                .iter()
                .map(|key| match row.get(key) {
                    Some(value @ (CellValue::Int(_) | CellValue::Float(_))) => {
                        number_to_currency(value, &currency).into_string()
                    }
                    Some(value) => value.display().into_owned(),
                    None => String::new(),
                })
                .collect()
        })
        .collect()
}
