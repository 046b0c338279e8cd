//! datatable - build, group and export tables from CSV or JSON sources

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use datatable::aggregate::keys;
use datatable::config::{CsvOptions, ExportFormat, JsonOptions, TypeInference};
use datatable::output::export_to_stdout;
use datatable::parser::{ParserFactory, SourceRecord};
use datatable::{Aggregator, CellValue, GroupBy, Record, Table};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Csv,
    Json,
    JsonCollection,
    Text,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(f: CliExportFormat) -> Self {
        match f {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Json => ExportFormat::Json,
            CliExportFormat::JsonCollection => ExportFormat::JsonCollection,
            CliExportFormat::Text => ExportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliGroupKey {
    Identity,
    YearMonth,
    Year,
    Lowercase,
}

impl CliGroupKey {
    fn key_fn(self) -> fn(&CellValue) -> CellValue {
        match self {
            CliGroupKey::Identity => keys::identity,
            CliGroupKey::YearMonth => keys::year_month,
            CliGroupKey::Year => keys::year,
            CliGroupKey::Lowercase => keys::lowercase,
        }
    }
}

/// Build a table from a CSV or JSON file, optionally group it, and export it
#[derive(Parser, Debug)]
#[command(name = "datatable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file (CSV with header row, or JSON array of objects)
    input: PathBuf,

    /// Column read from the attribute KEY, as KEY or KEY=Header (repeatable)
    #[arg(short, long = "column", value_name = "KEY[=HEADER]")]
    columns: Vec<String>,

    /// Computed column holding the product of two attributes, as KEY=A*B
    #[arg(long = "product", value_name = "KEY=A*B")]
    products: Vec<String>,

    /// Column to group rows by
    #[arg(short, long)]
    group_by: Option<String>,

    /// Canonicalization applied to grouping values
    #[arg(long, value_enum, default_value = "identity")]
    group_key: CliGroupKey,

    /// Aggregated column when grouping, as KEY=sum|min|max|count|avg (repeatable)
    #[arg(short, long = "aggregate", value_name = "KEY=OP")]
    aggregates: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: CliExportFormat,

    /// Field separator of CSV output
    #[arg(long, default_value = ",")]
    col_sep: char,

    /// Field separator of CSV input
    #[arg(long, default_value = ",")]
    input_sep: char,

    /// Fractional digits for numeric cells
    #[arg(long, default_value_t = 2)]
    precision: usize,

    /// Thousands delimiter for numeric cells
    #[arg(long, default_value = "")]
    delimiter: String,

    /// Decimal separator for numeric cells
    #[arg(long, default_value = ".")]
    separator: String,

    /// Infer JSON column types from every row instead of the first
    #[arg(long)]
    whole_column_types: bool,

    /// Compact JSON output
    #[arg(long)]
    compact: bool,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let input_sep = ascii_byte(cli.input_sep).context("--input-sep must be a single ASCII character")?;
    let col_sep = ascii_byte(cli.col_sep).context("--col-sep must be a single ASCII character")?;

    let records = ParserFactory::with_csv_delimiter(input_sep)
        .parse(&cli.input)
        .with_context(|| format!("Failed to read source file: {}", cli.input.display()))?;
    info!("loaded {} records from {}", records.len(), cli.input.display());

    let mut table = Table::with_source(records);
    define_columns(&mut table, &cli)?;
    table.build_rows_from_source(|_, _| Ok(()))?;

    let table = match &cli.group_by {
        Some(key) => group(&table, key, &cli)?,
        None => {
            if !cli.aggregates.is_empty() {
                bail!("--aggregate requires --group-by");
            }
            table
        }
    };

    let csv = CsvOptions::new()
        .with_column_separator(col_sep)
        .with_precision(cli.precision)
        .with_number_delimiter(cli.delimiter.as_str())
        .with_number_separator(cli.separator.as_str());
    let mut json = if cli.compact { JsonOptions::compact() } else { JsonOptions::new() };
    if cli.whole_column_types {
        json = json.with_inference(TypeInference::WholeColumn);
    }

    export_to_stdout(&table, cli.format.into(), &csv, &json)?;
    Ok(())
}

/// Register `--column` and `--product` columns; without any, use every
/// attribute of the first record
fn define_columns(table: &mut Table<SourceRecord>, cli: &Cli) -> Result<()> {
    if cli.columns.is_empty() && cli.products.is_empty() {
        let keys: Vec<String> = table
            .source()
            .and_then(|records| records.first())
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();
        for key in keys {
            table.add_column(key.as_str(), key.as_str())?;
        }
        return Ok(());
    }

    for spec in &cli.columns {
        let (key, header) = spec.split_once('=').unwrap_or((spec.as_str(), spec.as_str()));
        table.add_column(key, header)?;
    }

    for spec in &cli.products {
        let Some((key, factors)) = spec.split_once('=') else {
            bail!("invalid --product {:?}, expected KEY=A*B", spec);
        };
        let Some((left, right)) = factors.split_once('*') else {
            bail!("invalid --product {:?}, expected KEY=A*B", spec);
        };
        let (left, right) = (left.trim().to_string(), right.trim().to_string());
        table.add_computed_column(key, key, move |item: &SourceRecord| {
            let factor = |name: &str| item.field(name).and_then(|v| v.as_number());
            match (factor(left.as_str()), factor(right.as_str())) {
                (Some(a), Some(b)) => CellValue::Float(a * b),
                _ => CellValue::Null,
            }
        })?;
    }

    Ok(())
}

fn group(table: &Table<SourceRecord>, key: &str, cli: &Cli) -> Result<Table<SourceRecord>> {
    let mut query = GroupBy::new(key).with_key_fn(cli.group_key.key_fn());
    for spec in &cli.aggregates {
        let Some((column, op)) = spec.split_once('=') else {
            bail!("invalid --aggregate {:?}, expected KEY=OP", spec);
        };
        let op: Aggregator = op.parse().map_err(anyhow::Error::msg)?;
        query = query.aggregate(column, op);
    }

    query
        .apply(table)
        .with_context(|| format!("Failed to group rows by {}", key))
}

fn ascii_byte(c: char) -> Option<u8> {
    c.is_ascii().then_some(c as u8)
}

/// Writes log records to stderr
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Off,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
