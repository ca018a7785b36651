//! File parsing functionality for labelled flow captures
//!
//! This module handles loading the CSV export (optionally zstd compressed) into a
//! column-oriented [`FlowTable`].

use crate::config::AnalysisConfig;
use bytesize::ByteSize;
use csv::{ReaderBuilder, StringRecord, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use zstd::Decoder;

/// How often the progress spinner is refreshed, in rows
const PROGRESS_INTERVAL: usize = 10_000;

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' not found in input header")]
    MissingColumn(String),

    #[error("Row {row}: value '{value}' in column '{column}' is not numeric")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {0}: label is empty")]
    EmptyLabel(usize),

    #[error("Input contains no flows")]
    Empty,

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },
}

type Result<T> = core::result::Result<T, ParsingError>;

/// One flow per row, stored column by column.
///
/// Missing and non-finite cells are stored as [`f64::NAN`].
#[derive(Debug, Clone)]
pub struct FlowTable {
    feature_names: Vec<String>,
    columns: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl FlowTable {
    /// Creates a table from already parsed columns.
    pub fn new(
        feature_names: Vec<String>,
        columns: Vec<Vec<f64>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if feature_names.len() != columns.len() {
            return Err(ParsingError::ColumnLength {
                column: "<features>".to_string(),
                expected: feature_names.len(),
                actual: columns.len(),
            });
        }

        for (name, column) in feature_names.iter().zip(&columns) {
            if column.len() != labels.len() {
                return Err(ParsingError::ColumnLength {
                    column: name.clone(),
                    expected: labels.len(),
                    actual: column.len(),
                });
            }
        }

        Ok(Self {
            feature_names,
            columns,
            labels,
        })
    }

    /// Number of flows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Returns the values of a feature, including missing ones
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let index = self.feature_names.iter().position(|n| n == name)?;
        Some(&self.columns[index])
    }

    /// Number of missing cells per feature, in feature order
    pub fn missing_counts(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|column| column.iter().filter(|value| value.is_nan()).count())
            .collect()
    }
}

/// Parse the flow capture and load the configured features for analysis
///
/// This function:
/// - Opens the file, wrapping it in a ZStandard decoder when it ends in `.zst`
/// - Trims whitespace-padded headers
/// - Reads the label column and each configured feature
///
/// # Arguments
/// * `file_path` - Path to the CSV (or `.csv.zst`) file
/// * `config` - Provides the label column and feature list
///
/// # Returns
/// * `Ok(FlowTable)` - Successfully parsed flows
/// * `Err(ParsingError)` - If reading, decompression or parsing failed
pub fn load_flow_table(file_path: &Path, config: &AnalysisConfig) -> Result<FlowTable> {
    let file = File::open(file_path)?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    println!(
        "📂 Loading flows from {} ({})",
        file_path.display(),
        ByteSize::b(size)
    );

    let is_compressed = file_path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zst"));

    if is_compressed {
        let decoder = Decoder::new(file)
            .map_err(|e| ParsingError::Decompression(format!("Failed to create decoder: {}", e)))?;
        read_flow_table(decoder, config)
    } else {
        read_flow_table(file, config)
    }
}

/// Reads flows from any CSV source.
pub fn read_flow_table<R: Read>(reader: R, config: &AnalysisConfig) -> Result<FlowTable> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = header_names(csv_reader.headers()?);
    let label_index = find_column(&headers, &config.label_column)?;
    let feature_indices = config
        .features
        .iter()
        .map(|feature| find_column(&headers, feature))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        columns = headers.len(),
        features = feature_indices.len(),
        "Resolved input header"
    );

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); feature_indices.len()];
    let mut labels = Vec::new();
    let mut missing = 0usize;
    let mut record = StringRecord::new();

    while csv_reader.read_record(&mut record)? {
        // Header is line 1
        let row = labels.len() + 2;

        let label = record.get(label_index).unwrap_or_default();
        if label.is_empty() {
            return Err(ParsingError::EmptyLabel(row));
        }
        labels.push(label.to_string());

        for ((column, &index), feature) in columns
            .iter_mut()
            .zip(&feature_indices)
            .zip(&config.features)
        {
            let cell = record.get(index).unwrap_or_default();
            let value = parse_cell(cell).ok_or_else(|| ParsingError::InvalidNumber {
                row,
                column: feature.clone(),
                value: cell.to_string(),
            })?;

            if value.is_nan() {
                missing += 1;
            }
            column.push(value);
        }

        if labels.len() % PROGRESS_INTERVAL == 0 {
            progress.set_message(format!("{} flows read", labels.len()));
            progress.tick();
        }
    }
    progress.finish_and_clear();

    if labels.is_empty() {
        return Err(ParsingError::Empty);
    }

    if missing > 0 {
        warn!(cells = missing, "Empty or non-finite values treated as missing");
    }

    FlowTable::new(config.features.clone(), columns, labels)
}

/// Trims the header names and renames repeated ones to `<name>.1`, `<name>.2`, ...
///
/// CIC exports repeat `Fwd Header Length`; the second occurrence is addressed as
/// `Fwd Header Length.1`.
fn header_names(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .map(|header| {
            let header = header.trim();
            let occurrence = seen.entry(header).or_insert(0);
            let name = match *occurrence {
                0 => header.to_string(),
                k => format!("{}.{}", header, k),
            };
            *occurrence += 1;
            name
        })
        .collect()
}

/// Locates a column by its header name
fn find_column(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| ParsingError::MissingColumn(name.to_string()))
}

/// Parses a trimmed cell. Empty and non-finite cells become NaN.
fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }

    let value: f64 = cell.parse().ok()?;
    Some(if value.is_finite() { value } else { f64::NAN })
}
