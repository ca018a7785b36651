//! Class count types and ASCII table formatting
//!
//! This module provides:
//! - [`ClassCountEntry`] representing the number of flows of one traffic class
//! - ASCII table formatting using the [`tabled`] crate

use tabled::{Table, Tabled};

/// Represents a traffic class with its code, flow count and share of all flows
#[derive(Debug, Clone, Tabled)]
pub struct ClassCountEntry {
    /// Integer code assigned by the label encoding
    #[tabled(rename = "Code")]
    pub code: usize,
    /// Ground-truth label (e.g. "benign", "ddos_dns")
    #[tabled(rename = "Label")]
    pub label: String,
    /// Number of flows carrying this label
    #[tabled(rename = "Flows")]
    pub count: usize,
    /// Percentage of all flows carrying this label
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl ClassCountEntry {
    /// Creates a new entry with formatted percentage
    pub fn new(code: usize, label: String, count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (count as f64 / total as f64) * 100.0)
        };

        Self {
            code,
            label,
            count,
            percentage,
        }
    }
}

/// Formats class count entries as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `entries` - A slice of [`ClassCountEntry`] to format
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_class_table(entries: &[ClassCountEntry], title: Option<&str>) -> String {
    if entries.is_empty() {
        return "No flows available".to_string();
    }

    let table = Table::new(entries).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}
