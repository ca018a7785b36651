//! End-to-end analysis run
//!
//! Executes every analysis step in order against one loaded [`FlowTable`](crate::parsing::FlowTable).

use crate::analysis::pca::{component_names, Pca};
use crate::analysis::traffic::class_counts;
use crate::analysis::{
    compute_class_statistics, correlation_matrix, generate_traffic_analysis, matrix_from_columns,
    write_stats_table, StandardScaler,
};
use crate::common::plots::{
    create_cumulative_variance_plot, create_heatmap, DEFAULT_SIZE, LARGE_HEATMAP_SIZE,
};
use crate::common::LabelEncoding;
use crate::config::AnalysisConfig;
use crate::parsing::load_flow_table;
use crate::report::{AnalysisSummary, ClassSummary, SUMMARY_FILE};
use crate::Result;
use std::fs;
use tracing::{debug, info, warn};

/// Runs the complete analysis described by `config`
///
/// # Steps
/// 1. Load the flows and encode the labels
/// 2. Class distribution table and traffic charts
/// 3. Per-class statistics, all-zero columns removed, written to `out.txt`
/// 4. Standardization, PCA, cumulative variance chart and correlation of the retained components
/// 5. Correlation heatmap of the per-class statistics
/// 6. `summary.json`
///
/// Charts are skipped when [`AnalysisConfig::plots`] is false.
///
/// # Returns
/// * `Ok(AnalysisSummary)` - Summary of the run, as written to `summary.json`
/// * `Err(AnalysisError)` - If any step failed; later steps are not executed
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisSummary> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)?;
    let output_dir = config.output_dir.as_path();

    // Load and encode
    let table = load_flow_table(&config.input, config)?;
    let encoding = LabelEncoding::fit(table.labels());
    println!(
        "✅ Loaded {} flows, {} features, {} classes",
        table.len(),
        table.feature_names().len(),
        encoding.len()
    );
    for (code, label) in encoding.iter() {
        debug!(code, label, "Encoded label");
    }

    // Traffic distributions
    println!("📊 Analyzing traffic distribution...");
    let mut files = generate_traffic_analysis(&table, &encoding, config)?;
    let counts = class_counts(&table, &encoding);

    // Per-class statistics
    println!("🧮 Computing per-class statistics...");
    let mut stats = compute_class_statistics(&table);
    let statistics_columns = stats.column_count();
    let removed = stats.drop_zero_columns();
    info!(
        columns = statistics_columns,
        removed, "Removed all-zero statistics columns"
    );
    let stats_path = config.stats_table_path();
    write_stats_table(&stats, &stats_path)?;
    files.push(stats_path);

    // Standardization and PCA
    println!("🔬 Running principal component analysis...");
    let stat_columns = stats.column_vectors();
    let (_, scaled) = StandardScaler::fit_transform(&matrix_from_columns(&stat_columns));
    let pca = Pca::fit(&scaled)?;
    let cumulative = pca.cumulative_explained_variance();
    let retained = pca.retain(config.retained_components);
    if retained.len() < config.retained_components {
        warn!(
            requested = config.retained_components,
            retained = retained.len(),
            "Fewer informative principal components than requested"
        );
    }
    let component_correlation = correlation_matrix(&retained, &component_names(retained.len()));
    info!(
        components = pca.component_count(),
        retained = retained.len(),
        max_correlation = ?component_correlation.max_off_diagonal(),
        "Fitted PCA"
    );

    if config.plots {
        let path = output_dir.join("pca_cumulative_variance.png");
        create_cumulative_variance_plot(&cumulative, Some(retained.len()), &path)?;
        files.push(path);

        if component_correlation.size() > 0 {
            let path = output_dir.join("pca_correlation_heatmap.png");
            create_heatmap(
                &component_correlation,
                "Correlation of Retained Principal Components",
                true,
                DEFAULT_SIZE,
                &path,
            )?;
            files.push(path);
        }
    }

    // Correlation of the per-class statistics
    if config.plots {
        println!("🔥 Drawing feature correlation heatmap...");
        let feature_correlation = correlation_matrix(&stat_columns, stats.columns());
        let path = output_dir.join("feature_correlation_heatmap.png");
        create_heatmap(
            &feature_correlation,
            "Correlation of Per-Class Statistics",
            false,
            LARGE_HEATMAP_SIZE,
            &path,
        )?;
        files.push(path);
    }

    let mut summary = AnalysisSummary {
        input: config.input.clone(),
        total_flows: table.len(),
        classes: encoding
            .iter()
            .zip(&counts)
            .map(|((code, label), &flows)| ClassSummary {
                code,
                label: label.to_string(),
                flows,
            })
            .collect(),
        feature_count: table.feature_names().len(),
        statistics_columns,
        retained_statistics_columns: stats.column_count(),
        explained_variance_ratio: pca.explained_variance_ratio().to_vec(),
        cumulative_explained_variance: cumulative,
        retained_components: retained.len(),
        max_component_correlation: component_correlation.max_off_diagonal(),
        files,
    };
    summary.files.push(output_dir.join(SUMMARY_FILE));
    summary.write(output_dir)?;

    println!("✅ Analysis complete, results in {}", output_dir.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats_table::read_stats_table;
    use crate::analysis::traffic::CLASS_DISTRIBUTION_FILE;
    use crate::config::STATS_TABLE_FILE;
    use crate::AnalysisError;
    use std::path::Path;

    const FEATURES: [&str; 3] = ["Flow Duration", "Total Length of Fwd Packets", "URG Flag Count"];

    fn write_capture(dir: &Path) -> std::path::PathBuf {
        let csv = "\
 Flow Duration, Total Length of Fwd Packets, URG Flag Count, label
120, 40, 0, ddos_dns
150, 44, 0, ddos_dns
90, 38, 0, ddos_dns
5000, 900, 0, benign
7000, 1200, 0, benign
6100, 300, 0, benign
10, 0, 0, ddos_syn
12, 0, 0, ddos_syn
30, 0, 0, ddos_syn
";
        let path = dir.join("ddos.csv");
        fs::write(&path, csv).unwrap();
        path
    }

    fn config(dir: &Path) -> AnalysisConfig {
        AnalysisConfig {
            input: write_capture(dir),
            output_dir: dir.join("out"),
            features: FEATURES.iter().map(|f| f.to_string()).collect(),
            plots: false,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_runs_all_numeric_steps() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config(temp_dir.path());

        let summary = run_analysis(&config).unwrap();

        assert_eq!(summary.total_flows, 9);
        assert_eq!(summary.feature_count, 3);
        let labels: Vec<&str> = summary.classes.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["ddos_dns", "benign", "ddos_syn"]);
        assert!(summary.classes.iter().all(|c| c.flows == 3));

        // URG Flag Count is zero everywhere, as are min/max/mean/std of it
        assert_eq!(summary.statistics_columns, 12);
        assert_eq!(summary.retained_statistics_columns, 8);

        // Three classes give at most two informative components
        assert_eq!(summary.retained_components, 2);
        let cumulative = &summary.cumulative_explained_variance;
        assert!(cumulative.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(cumulative.iter().all(|&value| value <= 1.0));
        assert!(summary.max_component_correlation.unwrap() < 1e-8);

        let out = config.output_dir;
        for file in [STATS_TABLE_FILE, CLASS_DISTRIBUTION_FILE, SUMMARY_FILE] {
            assert!(out.join(file).exists(), "{} was not written", file);
        }
        assert!(!out.join("class_counts.png").exists());

        let stats = read_stats_table(&out.join(STATS_TABLE_FILE)).unwrap();
        assert_eq!(stats.labels(), ["benign", "ddos_dns", "ddos_syn"]);
        assert_eq!(stats.column_count(), 8);

        let written = AnalysisSummary::read(&out.join(SUMMARY_FILE)).unwrap();
        assert_eq!(written.classes, summary.classes);
        assert_eq!(written.files, summary.files);
        assert_eq!(written.retained_components, 2);
    }

    #[test]
    fn test_invalid_config_fails_before_loading() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            histogram_bins: 0,
            ..config(temp_dir.path())
        };

        assert!(matches!(run_analysis(&config), Err(AnalysisError::Config(_))));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_single_class_cannot_be_decomposed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("single.csv");
        fs::write(
            &input,
            "Flow Duration,Total Length of Fwd Packets,URG Flag Count,label\n1,2,0,benign\n3,4,0,benign\n",
        )
        .unwrap();
        let config = AnalysisConfig {
            input,
            ..config(temp_dir.path())
        };

        assert!(matches!(run_analysis(&config), Err(AnalysisError::Pca(_))));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            input: temp_dir.path().join("absent.csv"),
            ..config(temp_dir.path())
        };

        assert!(matches!(run_analysis(&config), Err(AnalysisError::Parsing(_))));
    }
}
