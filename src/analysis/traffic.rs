//! Traffic level analysis functionality
//!
//! This module characterises the raw flows before any aggregation: how many flows each
//! class has, and how a single feature is distributed overall and per class.

use crate::common::labels::LabelEncoding;
use crate::common::plots::{
    create_box_plot, create_count_plot, create_ecdf_plot, create_histogram_plot, EcdfSeries,
};
use crate::common::tables::{format_class_table, ClassCountEntry};
use crate::common::PlotError;
use crate::config::AnalysisConfig;
use crate::parsing::FlowTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the class distribution report written to the output directory
pub const CLASS_DISTRIBUTION_FILE: &str = "class-distribution.txt";

/// Multiple of the interquartile range beyond which box plot points are outliers
const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Errors that can occur during traffic analysis
#[derive(Debug)]
pub enum TrafficError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
    UnknownFeature(String),
}

impl std::fmt::Display for TrafficError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            TrafficError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
            TrafficError::UnknownFeature(name) => write!(f, "Feature '{}' was not loaded", name),
        }
    }
}

impl std::error::Error for TrafficError {}

impl From<std::io::Error> for TrafficError {
    fn from(err: std::io::Error) -> Self {
        TrafficError::FileWrite(err)
    }
}

impl From<PlotError> for TrafficError {
    fn from(err: PlotError) -> Self {
        TrafficError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, TrafficError>;

/// Five-number summary of a box plot, with the points drawn individually
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// A single equal-width histogram bin, `[start, end)` except for the last one
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Counts flows per class, in label code order
pub fn class_counts(table: &FlowTable, encoding: &LabelEncoding) -> Vec<usize> {
    let mut counts = vec![0usize; encoding.len()];
    for code in encoding.transform(table.labels()) {
        counts[code] += 1;
    }
    counts
}

/// Splits the finite values of a feature by class, in label code order
pub fn values_by_class(values: &[f64], labels: &[String], encoding: &LabelEncoding) -> Vec<Vec<f64>> {
    let mut groups = vec![Vec::new(); encoding.len()];
    for (value, label) in values.iter().zip(labels) {
        if !value.is_finite() {
            continue;
        }
        if let Some(code) = encoding.encode(label) {
            groups[code].push(*value);
        }
    }
    groups
}

/// Returns the finite values sorted in ascending order
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Quantile of sorted data using linear interpolation between closest ranks
///
/// # Arguments
/// * `sorted` - Slice sorted in ascending order
/// * `q` - Quantile in `0.0..=1.0`
///
/// # Returns
/// The interpolated value, or `None` for an empty slice
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Computes the box plot summary of the finite values, or `None` if there are none
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted_finite(values);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let reach = WHISKER_IQR_FACTOR * (q3 - q1);
    let low_fence = q1 - reach;
    let high_fence = q3 + reach;

    let lower_whisker = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= high_fence).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxSummary {
        count: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Bins the finite values into `bins` equal-width bins spanning their range
///
/// A constant input is centred in a range of width 1.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut min, mut max) = (sorted[0], sorted[sorted.len() - 1]);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|index| HistogramBin {
            start: min + width * index as f64,
            end: if index + 1 == bins {
                max
            } else {
                min + width * (index + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in sorted {
        let index = (((value - min) / width) as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

/// Generates empirical cumulative distribution data from raw values
///
/// Returns `(value, cumulative_percentage)` pairs over the sorted finite values, where
/// cumulative_percentage is the percentage of data points at or below the value.
pub fn ecdf(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_finite(values);
    let total = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(index, &value)| (value, ((index + 1) as f64 / total) * 100.0))
        .collect()
}

/// Generate the traffic level analysis
///
/// Writes the class distribution table to `class-distribution.txt` and, when plotting is
/// enabled, the class count, box plot, histogram and ECDF charts.
///
/// # Arguments
/// * `table` - Loaded flows
/// * `encoding` - Label encoding of the flows
/// * `config` - Plot features, bin count and output directory
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths of every file written
/// * `Err(TrafficError)` - If a feature is missing or file operations failed
pub fn generate_traffic_analysis(
    table: &FlowTable,
    encoding: &LabelEncoding,
    config: &AnalysisConfig,
) -> Result<Vec<PathBuf>> {
    let output_dir = config.output_dir.as_path();
    let counts = class_counts(table, encoding);
    let mut written = vec![write_class_distribution(encoding, &counts, table.len(), output_dir)?];

    if !config.plots {
        return Ok(written);
    }

    let labels = encoding.labels();

    let path = output_dir.join("class_counts.png");
    create_count_plot(labels, &counts, "Flows per Traffic Class", "Traffic Class", &path)?;
    written.push(path);

    let boxplot_values = feature(table, &config.boxplot_feature)?;
    let summaries: Vec<Option<BoxSummary>> =
        values_by_class(boxplot_values, table.labels(), encoding)
            .iter()
            .map(|values| box_summary(values))
            .collect();
    let path = output_dir.join(format!("{}_boxplot.png", file_stem(&config.boxplot_feature)));
    create_box_plot(
        labels,
        &summaries,
        &format!("{} by Traffic Class", config.boxplot_feature),
        &config.boxplot_feature,
        &path,
    )?;
    written.push(path);

    let bins = histogram(feature(table, &config.histogram_feature)?, config.histogram_bins);
    let path = output_dir.join(format!("{}_histogram.png", file_stem(&config.histogram_feature)));
    create_histogram_plot(
        &bins,
        &format!("{} Distribution", config.histogram_feature),
        &config.histogram_feature,
        &path,
    )?;
    written.push(path);

    let ecdf_values = feature(table, &config.ecdf_feature)?;
    let series: Vec<EcdfSeries> = values_by_class(ecdf_values, table.labels(), encoding)
        .iter()
        .zip(labels)
        .map(|(values, label)| EcdfSeries {
            label: label.clone(),
            points: ecdf(values),
        })
        .collect();
    let path = output_dir.join(format!("{}_ecdf.png", file_stem(&config.ecdf_feature)));
    create_ecdf_plot(
        &series,
        &format!("ECDF of {} per Traffic Class", config.ecdf_feature),
        &config.ecdf_feature,
        &path,
    )?;
    written.push(path);

    Ok(written)
}

fn write_class_distribution(
    encoding: &LabelEncoding,
    counts: &[usize],
    total: usize,
    output_dir: &Path,
) -> Result<PathBuf> {
    let entries: Vec<ClassCountEntry> = encoding
        .iter()
        .zip(counts)
        .map(|((code, label), &count)| ClassCountEntry::new(code, label.to_string(), count, total))
        .collect();

    let table = format_class_table(&entries, Some("Flows per Traffic Class"));
    let summary = format!(
        "Summary\n{}\nTotal flows analyzed: {}\nDistinct classes: {}",
        "=".repeat(7),
        total,
        encoding.len()
    );

    let output_file = output_dir.join(CLASS_DISTRIBUTION_FILE);
    fs::write(&output_file, format!("{}\n\n{}\n", table, summary))?;
    Ok(output_file)
}

fn feature<'a>(table: &'a FlowTable, name: &str) -> Result<&'a [f64]> {
    table
        .column(name)
        .ok_or_else(|| TrafficError::UnknownFeature(name.to_string()))
}

/// Turns a feature name such as `Flow Bytes/s` into `flow_bytes_s`
pub fn file_stem(feature: &str) -> String {
    let mut stem = String::with_capacity(feature.len());
    for c in feature.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    stem.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> FlowTable {
        FlowTable::new(
            vec!["Flow Duration".to_string()],
            vec![vec![1.0, 100.0, 2.0, f64::NAN, 3.0]],
            ["ddos_dns", "benign", "ddos_dns", "benign", "ddos_dns"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_counts_flows_per_class() {
        let table = table();
        let encoding = LabelEncoding::fit(table.labels());
        assert_eq!(class_counts(&table, &encoding), vec![3, 2]);
    }

    #[test]
    fn test_groups_finite_values_by_class() {
        let table = table();
        let encoding = LabelEncoding::fit(table.labels());
        let groups = values_by_class(
            table.column("Flow Duration").unwrap(),
            table.labels(),
            &encoding,
        );
        assert_eq!(groups, vec![vec![1.0, 2.0, 3.0], vec![100.0]]);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.25, 1.75)]
    #[case(0.5, 2.5)]
    #[case(1.0, 4.0)]
    fn test_interpolates_quantiles(#[case] q: f64, #[case] expected: f64) {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, q).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_of_empty_slice_is_none() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[4.0], 0.75), Some(4.0));
    }

    #[test]
    fn test_box_summary_separates_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0, f64::NAN];
        let summary = box_summary(&values).unwrap();

        assert_eq!(summary.count, 6);
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_summary_of_nothing_is_none() {
        assert!(box_summary(&[]).is_none());
        assert!(box_summary(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_histogram_covers_all_values() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, 50);

        assert_eq!(bins.len(), 50);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[49].end, 100.0);
        // Maximum lands in the closed last bin
        assert_eq!(bins[49].count, 3);
    }

    #[test]
    fn test_histogram_of_constant_values_is_centred() {
        let bins = histogram(&[7.0, 7.0, 7.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 6.5);
        assert_eq!(bins[3].end, 7.5);
        assert_eq!(bins[2].count, 3);
    }

    #[test]
    fn test_histogram_of_nothing_is_empty() {
        assert!(histogram(&[f64::NAN], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_ecdf_ends_at_hundred_percent() {
        let points = ecdf(&[5.0, 1.0, f64::NAN, 3.0, 2.0]);
        assert_eq!(
            points,
            vec![(1.0, 25.0), (2.0, 50.0), (3.0, 75.0), (5.0, 100.0)]
        );
        assert!(ecdf(&[]).is_empty());
    }

    #[rstest]
    #[case("Flow Duration", "flow_duration")]
    #[case("Flow Bytes/s", "flow_bytes_s")]
    #[case("Total Length of Fwd Packets", "total_length_of_fwd_packets")]
    #[case(" Init_Win_bytes_forward", "init_win_bytes_forward")]
    fn test_makes_file_stems(#[case] feature: &str, #[case] expected: &str) {
        assert_eq!(file_stem(feature), expected);
    }

    #[test]
    fn test_writes_class_distribution_without_plots() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let encoding = LabelEncoding::fit(table.labels());
        let config = AnalysisConfig {
            output_dir: dir.path().to_path_buf(),
            features: vec!["Flow Duration".to_string()],
            ecdf_feature: "Flow Duration".to_string(),
            plots: false,
            ..AnalysisConfig::default()
        };

        let written = generate_traffic_analysis(&table, &encoding, &config).unwrap();
        assert_eq!(written, vec![dir.path().join(CLASS_DISTRIBUTION_FILE)]);

        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("ddos_dns"));
        assert!(text.contains("60.00%"));
        assert!(text.contains("Total flows analyzed: 5"));
    }
}
