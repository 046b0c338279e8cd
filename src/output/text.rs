//! Box-drawn text table for terminals

use std::io::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::config::CsvOptions;
use crate::error::Result;
use crate::model::Table;

use super::{formatted_rows, headers, Exporter};

/// Text table output; numeric cells are formatted like CSV export
#[derive(Debug, Clone, Default)]
pub struct TextExporter {
    options: CsvOptions,
}

impl TextExporter {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }
}

impl<T> Exporter<T> for TextExporter {
    fn export(&self, table: &Table<T>, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(headers(table));
        for record in formatted_rows(table, &self.options) {
            builder.push_record(record);
        }

        let mut display = builder.build();
        display.with(Style::modern());
        writeln!(writer, "{}", display)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_headers_and_formatted_numbers() {
        let mut table: Table<()> = Table::new();
        table.add_column("name", "Name").unwrap();
        table.add_column("amount", "Amount").unwrap();
        let mut row = table.push_row();
        row.set("name", "R2DX").unwrap();
        row.set("amount", 110.0).unwrap();

        let text = TextExporter::default().export_to_string(&table).unwrap();

        assert!(text.starts_with('┌'));
        assert!(text.contains("Name"));
        assert!(text.contains("110.00"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_table_without_columns_renders_nothing() {
        let table: Table<()> = Table::new();
        assert_eq!(TextExporter::default().export_to_string(&table).unwrap(), "");
    }
}
