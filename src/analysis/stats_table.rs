//! Fixed-width text rendering of the per-class statistics table
//!
//! The table is written as an ASCII grid using the [`tabled`] crate, one row per class.
//! [`parse_stats_table`] reads such a rendering back, which makes `out.txt` usable as input
//! for later steps.

use super::class_stats::ClassStatistics;
use std::fs;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use thiserror::Error;

/// Header of the first column, holding the class label
pub const LABEL_HEADER: &str = "label";

/// Significant digits kept when formatting statistics
const SIGNIFICANT_DIGITS: i32 = 6;

/// Errors that can occur while writing or reading a statistics table
#[derive(Error, Debug)]
pub enum StatsTableError {
    #[error("Failed to write statistics table: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Statistics table has no header row")]
    MissingHeader,

    #[error("Line {line}: expected {expected} cells, found {actual}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Line {line}: '{value}' is not a number")]
    InvalidNumber { line: usize, value: String },
}

type Result<T> = core::result::Result<T, StatsTableError>;

/// Formats a statistic with six significant digits.
///
/// Values of moderate magnitude use plain decimal notation, very small and very large
/// values use scientific notation.
pub fn format_statistic(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let magnitude = value.abs().log10().floor() as i32;
    if !(-4..15).contains(&magnitude) {
        return format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    }

    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Renders the statistics table as a fixed-width ASCII grid
///
/// # Arguments
/// * `stats` - The per-class statistics to render
///
/// # Returns
/// The table as a [`String`], label column first, numbers right-aligned
pub fn render_stats_table(stats: &ClassStatistics) -> String {
    let mut builder = Builder::default();

    let header: Vec<String> = std::iter::once(LABEL_HEADER.to_string())
        .chain(stats.columns().iter().cloned())
        .collect();
    builder.push_record(header);

    for (label, row) in stats.labels().iter().zip(stats.rows()) {
        let record: Vec<String> = std::iter::once(label.clone())
            .chain(row.iter().map(|&value| format_statistic(value)))
            .collect();
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::ascii())
        .modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Writes the rendered statistics table to `path`
pub fn write_stats_table(stats: &ClassStatistics, path: &Path) -> Result<()> {
    let mut text = render_stats_table(stats);
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Parses a rendering produced by [`render_stats_table`]
///
/// Border lines are skipped; the first row is the header and the remaining rows are classes.
pub fn parse_stats_table(text: &str) -> Result<ClassStatistics> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| line.starts_with('|'))
        .map(|(line_number, line)| (line_number, split_cells(line)));

    let (_, header) = rows.next().ok_or(StatsTableError::MissingHeader)?;
    if header.first().map(String::as_str) != Some(LABEL_HEADER) {
        return Err(StatsTableError::MissingHeader);
    }
    let columns: Vec<String> = header[1..].to_vec();

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (line, cells) in rows {
        if cells.len() != header.len() {
            return Err(StatsTableError::RaggedRow {
                line,
                expected: header.len(),
                actual: cells.len(),
            });
        }

        let row = cells[1..]
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| StatsTableError::InvalidNumber {
                    line,
                    value: cell.clone(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        labels.push(cells[0].clone());
        values.push(row);
    }

    // Shape was checked row by row above
    ClassStatistics::from_rows(labels, columns, values).ok_or(StatsTableError::MissingHeader)
}

/// Reads and parses a statistics table file
pub fn read_stats_table(path: &Path) -> Result<ClassStatistics> {
    parse_stats_table(&fs::read_to_string(path)?)
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}
