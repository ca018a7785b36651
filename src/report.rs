//! Machine readable run summary
//!
//! Everything the analysis derived that is not a chart or the statistics table is collected
//! into one [`AnalysisSummary`] and saved as `summary.json` next to the other outputs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the summary file inside the output directory
pub const SUMMARY_FILE: &str = "summary.json";

/// Errors that can occur while saving or loading the run summary
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to access summary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, ReportError>;

/// Encoded traffic class and its number of flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub code: usize,
    pub label: String,
    pub flows: usize,
}

/// Result of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub input: PathBuf,
    pub total_flows: usize,
    pub classes: Vec<ClassSummary>,
    pub feature_count: usize,
    /// Statistics columns before all-zero columns were removed (`4 × feature_count`)
    pub statistics_columns: usize,
    /// Statistics columns written to the statistics table
    pub retained_statistics_columns: usize,
    pub explained_variance_ratio: Vec<f64>,
    pub cumulative_explained_variance: Vec<f64>,
    pub retained_components: usize,
    /// Largest absolute correlation between two distinct retained components
    pub max_component_correlation: Option<f64>,
    pub files: Vec<PathBuf>,
}

impl AnalysisSummary {
    /// Saves the summary as pretty printed JSON
    ///
    /// # Arguments
    /// * `output_dir` - Directory where `summary.json` should be saved
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(ReportError)` - If serialization or file operations failed
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Loads a previously written summary
    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_summary() {
        let temp_dir = tempfile::tempdir().unwrap();
        let summary = AnalysisSummary {
            input: PathBuf::from("ddos.csv"),
            total_flows: 3,
            classes: vec![
                ClassSummary {
                    code: 0,
                    label: "ddos_dns".to_string(),
                    flows: 2,
                },
                ClassSummary {
                    code: 1,
                    label: "benign".to_string(),
                    flows: 1,
                },
            ],
            feature_count: 2,
            statistics_columns: 8,
            retained_statistics_columns: 6,
            explained_variance_ratio: vec![1.0],
            cumulative_explained_variance: vec![1.0],
            retained_components: 1,
            max_component_correlation: None,
            files: vec![PathBuf::from("out.txt")],
        };

        let path = summary.write(temp_dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), SUMMARY_FILE);
        assert_eq!(AnalysisSummary::read(&path).unwrap(), summary);
    }

    #[test]
    fn test_read_rejects_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(SUMMARY_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AnalysisSummary::read(&path), Err(ReportError::Json(_))));
    }
}
