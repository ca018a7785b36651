//! Per-class aggregate statistics
//!
//! Groups the flows by ground-truth label and summarises every numeric feature with its
//! minimum, maximum, mean and sample standard deviation. The resulting table has one row
//! per class and four columns per feature.

use crate::parsing::FlowTable;
use std::collections::BTreeMap;

/// Statistics computed for every feature, in column order
pub const STATISTICS: [&str; 4] = ["min", "max", "mean", "std"];

/// Per-class statistics table
///
/// Rows are classes in lexicographic label order. Columns are named `<feature>_<statistic>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    labels: Vec<String>,
    columns: Vec<String>,
    /// Row-major, `rows[class][column]`
    rows: Vec<Vec<f64>>,
}

impl ClassStatistics {
    /// Creates a table from already computed values.
    ///
    /// Returns `None` if the shape of `rows` does not match `labels` and `columns`.
    pub fn from_rows(labels: Vec<String>, columns: Vec<String>, rows: Vec<Vec<f64>>) -> Option<Self> {
        if rows.len() != labels.len() || rows.iter().any(|row| row.len() != columns.len()) {
            return None;
        }

        Some(Self {
            labels,
            columns,
            rows,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn class_count(&self) -> usize {
        self.labels.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Values of one column across all classes
    pub fn column_values(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }

    /// All columns, each as a vector of per-class values
    pub fn column_vectors(&self) -> Vec<Vec<f64>> {
        (0..self.column_count())
            .map(|index| self.column_values(index))
            .collect()
    }

    /// Removes every column that is zero for all classes.
    ///
    /// Returns the number of removed columns.
    pub fn drop_zero_columns(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.column_count())
            .map(|index| self.rows.iter().any(|row| row[index] != 0.0))
            .collect();

        let removed = keep.iter().filter(|&&k| !k).count();
        if removed == 0 {
            return 0;
        }

        self.columns = retain_by_mask(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }

        removed
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

/// Summary of one feature within one class
#[derive(Debug, Clone, Copy, PartialEq)]
struct FeatureSummary {
    min: f64,
    max: f64,
    mean: f64,
    std: f64,
}

impl FeatureSummary {
    /// Summarises the finite values; undefined statistics are reported as zero
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                std: 0.0,
            };
        }

        let count = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count;
        let std = if values.len() < 2 {
            0.0
        } else {
            let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1.0)).sqrt()
        };

        Self {
            min,
            max,
            mean,
            std,
        }
    }

    fn values(&self) -> [f64; 4] {
        [self.min, self.max, self.mean, self.std]
    }
}

/// Computes the per-class statistics of every feature in the table
///
/// Missing values are ignored. Statistics that are undefined for a class (no values, or the
/// standard deviation of a single value) are reported as `0`.
pub fn compute_class_statistics(table: &FlowTable) -> ClassStatistics {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, label) in table.labels().iter().enumerate() {
        groups.entry(label.as_str()).or_default().push(row);
    }

    let labels: Vec<String> = groups.keys().map(|label| label.to_string()).collect();
    let columns: Vec<String> = table
        .feature_names()
        .iter()
        .flat_map(|feature| STATISTICS.iter().map(move |stat| format!("{}_{}", feature, stat)))
        .collect();

    let rows: Vec<Vec<f64>> = groups
        .values()
        .map(|indices| {
            table
                .columns()
                .flat_map(|(_, values)| {
                    FeatureSummary::of(indices.iter().map(|&row| values[row])).values()
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    ClassStatistics {
        labels,
        columns,
        rows,
    }
}
