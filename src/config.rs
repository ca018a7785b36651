//! Analysis configuration
//!
//! Every setting defaults to the values used for the reference DDoS capture. The binary
//! overrides them from command line arguments, tests construct smaller configurations directly.

use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Default input file, read from the working directory.
pub const DEFAULT_INPUT_FILE: &str = "ddos.csv";

/// Default name of the ground-truth column.
pub const DEFAULT_LABEL_COLUMN: &str = "label";

/// Name of the per-class statistics table written to the output directory.
pub const STATS_TABLE_FILE: &str = "out.txt";

/// Feature shown per class in the box plot.
pub const DEFAULT_BOXPLOT_FEATURE: &str = "Flow Duration";

/// Feature shown in the histogram.
pub const DEFAULT_HISTOGRAM_FEATURE: &str = "Flow Duration";

/// Number of equal-width bins in the histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Feature shown in the per-class ECDF plot.
pub const DEFAULT_ECDF_FEATURE: &str = "Total Length of Fwd Packets";

/// Number of principal components kept for the correlation heatmap.
///
/// Elbow point of the cumulative explained variance curve on the reference capture.
pub const DEFAULT_RETAINED_COMPONENTS: usize = 9;

/// Numeric flow features aggregated per class, in output column order.
pub const FLOW_FEATURES: [&str; 77] = [
    "Flow Duration",
    "Total Fwd Packets",
    "Total Backward Packets",
    "Total Length of Fwd Packets",
    "Total Length of Bwd Packets",
    "Fwd Packet Length Max",
    "Fwd Packet Length Min",
    "Fwd Packet Length Mean",
    "Fwd Packet Length Std",
    "Bwd Packet Length Max",
    "Bwd Packet Length Min",
    "Bwd Packet Length Mean",
    "Bwd Packet Length Std",
    "Flow Bytes/s",
    "Flow Packets/s",
    "Flow IAT Mean",
    "Flow IAT Std",
    "Flow IAT Max",
    "Flow IAT Min",
    "Fwd IAT Total",
    "Fwd IAT Mean",
    "Fwd IAT Std",
    "Fwd IAT Max",
    "Fwd IAT Min",
    "Bwd IAT Total",
    "Bwd IAT Mean",
    "Bwd IAT Std",
    "Bwd IAT Max",
    "Bwd IAT Min",
    "Fwd PSH Flags",
    "Bwd PSH Flags",
    "Fwd URG Flags",
    "Bwd URG Flags",
    "Fwd Header Length",
    "Bwd Header Length",
    "Fwd Packets/s",
    "Bwd Packets/s",
    "Min Packet Length",
    "Max Packet Length",
    "Packet Length Mean",
    "Packet Length Std",
    "Packet Length Variance",
    "FIN Flag Count",
    "SYN Flag Count",
    "RST Flag Count",
    "PSH Flag Count",
    "ACK Flag Count",
    "URG Flag Count",
    "CWE Flag Count",
    "ECE Flag Count",
    "Down/Up Ratio",
    "Average Packet Size",
    "Avg Fwd Segment Size",
    "Avg Bwd Segment Size",
    "Fwd Header Length.1",
    "Fwd Avg Bytes/Bulk",
    "Fwd Avg Packets/Bulk",
    "Fwd Avg Bulk Rate",
    "Bwd Avg Bytes/Bulk",
    "Bwd Avg Packets/Bulk",
    "Bwd Avg Bulk Rate",
    "Subflow Fwd Packets",
    "Subflow Fwd Bytes",
    "Subflow Bwd Packets",
    "Subflow Bwd Bytes",
    "Init_Win_bytes_forward",
    "Init_Win_bytes_backward",
    "act_data_pkt_fwd",
    "min_seg_size_forward",
    "Active Mean",
    "Active Std",
    "Active Max",
    "Active Min",
    "Idle Mean",
    "Idle Std",
    "Idle Max",
    "Idle Min",
];

/// Errors raised when validating an [`AnalysisConfig`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one numeric feature must be configured")]
    NoFeatures,

    #[error("Feature '{0}' is listed more than once")]
    DuplicateFeature(String),

    #[error("Label column '{0}' cannot also be a numeric feature")]
    LabelIsFeature(String),

    #[error("{plot} feature '{feature}' is not one of the configured numeric features")]
    UnknownPlotFeature { plot: &'static str, feature: String },

    #[error("Histogram bin count must be greater than zero")]
    ZeroBins,

    #[error("Number of retained principal components must be greater than zero")]
    ZeroComponents,
}

/// Settings for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// CSV file with one flow per row; `.zst` files are decompressed on the fly
    pub input: PathBuf,
    /// Directory receiving `out.txt`, the plots and the run summary
    pub output_dir: PathBuf,
    /// Name of the ground-truth column (after header trimming)
    pub label_column: String,
    /// Numeric features to load and aggregate
    pub features: Vec<String>,
    pub boxplot_feature: String,
    pub histogram_feature: String,
    pub histogram_bins: usize,
    pub ecdf_feature: String,
    /// Number of leading principal components kept for the correlation heatmap
    pub retained_components: usize,
    /// Render PNG plots. When false only the text and JSON outputs are produced.
    pub plots: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output_dir: PathBuf::from("."),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            features: FLOW_FEATURES.iter().map(|name| name.to_string()).collect(),
            boxplot_feature: DEFAULT_BOXPLOT_FEATURE.to_string(),
            histogram_feature: DEFAULT_HISTOGRAM_FEATURE.to_string(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            ecdf_feature: DEFAULT_ECDF_FEATURE.to_string(),
            retained_components: DEFAULT_RETAINED_COMPONENTS,
            plots: true,
        }
    }
}

impl AnalysisConfig {
    /// Checks the configuration for settings that would make the analysis meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::NoFeatures);
        }

        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            if !seen.insert(feature.as_str()) {
                return Err(ConfigError::DuplicateFeature(feature.clone()));
            }
        }

        if seen.contains(self.label_column.as_str()) {
            return Err(ConfigError::LabelIsFeature(self.label_column.clone()));
        }

        for (plot, feature) in [
            ("Box plot", &self.boxplot_feature),
            ("Histogram", &self.histogram_feature),
            ("ECDF", &self.ecdf_feature),
        ] {
            if !seen.contains(feature.as_str()) {
                return Err(ConfigError::UnknownPlotFeature {
                    plot,
                    feature: feature.clone(),
                });
            }
        }

        if self.histogram_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }

        if self.retained_components == 0 {
            return Err(ConfigError::ZeroComponents);
        }

        Ok(())
    }

    /// Path of the per-class statistics table
    pub fn stats_table_path(&self) -> PathBuf {
        self.output_dir.join(STATS_TABLE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            features: vec!["Flow Duration".to_string(), "Total Length of Fwd Packets".to_string()],
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(AnalysisConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_feature_list_has_no_duplicates() {
        let unique: HashSet<&str> = FLOW_FEATURES.iter().copied().collect();
        assert_eq!(unique.len(), FLOW_FEATURES.len());
    }

    #[test]
    fn test_small_config_is_valid() {
        assert_eq!(small_config().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_feature_list() {
        let config = AnalysisConfig {
            features: Vec::new(),
            ..small_config()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoFeatures));
    }

    #[test]
    fn test_rejects_duplicate_feature() {
        let mut config = small_config();
        config.features.push("Flow Duration".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateFeature("Flow Duration".to_string()))
        );
    }

    #[test]
    fn test_rejects_label_as_feature() {
        let mut config = small_config();
        config.features.push("label".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::LabelIsFeature("label".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_plot_feature() {
        let config = AnalysisConfig {
            ecdf_feature: "Idle Max".to_string(),
            ..small_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownPlotFeature { plot: "ECDF", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_bins_and_components() {
        let config = AnalysisConfig {
            histogram_bins: 0,
            ..small_config()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBins));

        let config = AnalysisConfig {
            retained_components: 0,
            ..small_config()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroComponents));
    }

    #[test]
    fn test_stats_table_lands_in_output_dir() {
        let config = AnalysisConfig {
            output_dir: PathBuf::from("results"),
            ..small_config()
        };
        assert_eq!(config.stats_table_path(), PathBuf::from("results").join("out.txt"));
    }
}
