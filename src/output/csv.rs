//! CSV export

use std::io::Write;

use crate::config::CsvOptions;
use crate::error::Result;
use crate::model::Table;

use super::{formatted_rows, headers, Exporter};

/// CSV exporter: header row, then one record per row, LF line endings
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    options: CsvOptions,
}

impl CsvExporter {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }
}

impl<T> Exporter<T> for CsvExporter {
    fn export(&self, table: &Table<T>, writer: &mut dyn Write) -> Result<()> {
        // csv writes an empty record as `""`
        if table.column_count() == 0 {
            return Ok(());
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.options.column_separator)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(headers(table))?;
        for record in formatted_rows(table, &self.options) {
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;

        Ok(())
    }
}
