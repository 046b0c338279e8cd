//! Source readers: load CSV or JSON files as records for row building

mod csv;
mod json;

use std::path::Path;

use anyhow::{bail, Result};
use indexmap::IndexMap;

use crate::model::CellValue;

pub use self::csv::CsvParser;
pub use self::json::JsonParser;

/// One source item read from a file, attributes in file order
pub type SourceRecord = IndexMap<String, CellValue>;

/// Trait for reading source files
pub trait Parser: Send + Sync {
    /// Parse a file into records
    fn parse(&self, path: &Path) -> Result<Vec<SourceRecord>>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self::with_csv_delimiter(b',')
    }

    /// Like [`ParserFactory::new`], reading CSV fields separated by `delimiter`
    pub fn with_csv_delimiter(delimiter: u8) -> Self {
        Self {
            parsers: vec![Box::new(CsvParser::new(delimiter)), Box::new(JsonParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<Vec<SourceRecord>> {
        let parser = self.get_parser(path)?;
        parser.parse(path)
    }
}
