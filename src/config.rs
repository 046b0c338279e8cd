//! Export configuration

use crate::format::CurrencyOptions;

/// Output format for exported tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    /// `properties` plus a flat list of items
    Json,
    /// `properties` with inferred types plus items keyed by row number
    JsonCollection,
    /// Box-drawn table for terminals
    Text,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "json-collection" | "collection" => Ok(ExportFormat::JsonCollection),
            "text" | "table" => Ok(ExportFormat::Text),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Options for CSV (and text) export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator byte
    pub column_separator: u8,
    /// Thousands delimiter inserted into numeric cells
    pub number_delimiter: String,
    /// Decimal separator for numeric cells
    pub number_separator: String,
    /// Fractional digits for numeric cells
    pub precision: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column_separator: b',',
            number_delimiter: String::new(),
            number_separator: ".".to_string(),
            precision: 2,
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field separator
    pub fn with_column_separator(mut self, separator: u8) -> Self {
        self.column_separator = separator;
        self
    }

    /// Set the thousands delimiter for numbers
    pub fn with_number_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.number_delimiter = delimiter.into();
        self
    }

    /// Set the decimal separator for numbers
    pub fn with_number_separator(mut self, separator: impl Into<String>) -> Self {
        self.number_separator = separator.into();
        self
    }

    /// Set the number of fractional digits for numbers
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Currency formatting applied to numeric cells
    pub fn currency(&self) -> CurrencyOptions {
        CurrencyOptions::new()
            .with_precision(self.precision)
            .with_delimiter(self.number_delimiter.as_str())
            .with_separator(self.number_separator.as_str())
    }
}

/// How the typed JSON export decides a column's type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeInference {
    /// Look at the first row only
    #[default]
    FirstRow,
    /// `number` only when every set cell is numeric
    WholeColumn,
}

/// Options for JSON export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
    pub inference: TypeInference,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            inference: TypeInference::default(),
        }
    }
}

impl JsonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn with_inference(mut self, inference: TypeInference) -> Self {
        self.inference = inference;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "json-collection".parse::<ExportFormat>().unwrap(),
            ExportFormat::JsonCollection
        );
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_currency_options() {
        let options = CsvOptions::new()
            .with_precision(1)
            .with_number_delimiter(".")
            .with_number_separator(",");
        let currency = options.currency();

        assert_eq!(currency.precision, 1);
        assert_eq!(currency.delimiter, ".");
        assert_eq!(currency.separator.as_deref(), Some(","));
        assert_eq!(currency.unit, "");
    }
}
