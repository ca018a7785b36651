use argh::FromArgs;
use ddos_flow_stats::config::{
    AnalysisConfig, DEFAULT_BOXPLOT_FEATURE, DEFAULT_ECDF_FEATURE, DEFAULT_HISTOGRAM_BINS,
    DEFAULT_HISTOGRAM_FEATURE, DEFAULT_INPUT_FILE, DEFAULT_LABEL_COLUMN,
    DEFAULT_RETAINED_COMPONENTS,
};
use ddos_flow_stats::pipeline::run_analysis;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exploratory analysis of labelled DDoS network-flow captures
#[derive(FromArgs, Debug)]
struct Args {
    /// input CSV file, optionally zstd compressed (default: ddos.csv)
    #[argh(option, short = 'i', default = "PathBuf::from(DEFAULT_INPUT_FILE)")]
    input: PathBuf,

    /// directory receiving the statistics table, plots and summary (default: .)
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// name of the ground-truth label column (default: label)
    #[argh(option, default = "DEFAULT_LABEL_COLUMN.to_string()")]
    label_column: String,

    /// feature shown in the per-class box plot (default: Flow Duration)
    #[argh(option, default = "DEFAULT_BOXPLOT_FEATURE.to_string()")]
    boxplot_feature: String,

    /// feature shown in the histogram (default: Flow Duration)
    #[argh(option, default = "DEFAULT_HISTOGRAM_FEATURE.to_string()")]
    histogram_feature: String,

    /// number of histogram bins (default: 50)
    #[argh(option, default = "DEFAULT_HISTOGRAM_BINS")]
    bins: usize,

    /// feature shown in the per-class ECDF (default: Total Length of Fwd Packets)
    #[argh(option, default = "DEFAULT_ECDF_FEATURE.to_string()")]
    ecdf_feature: String,

    /// number of principal components to retain (default: 9)
    #[argh(option, short = 'c', default = "DEFAULT_RETAINED_COMPONENTS")]
    components: usize,

    /// only write text and JSON outputs
    #[argh(switch)]
    no_plots: bool,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl From<Args> for AnalysisConfig {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output_dir: args.output_dir,
            label_column: args.label_column,
            boxplot_feature: args.boxplot_feature,
            histogram_feature: args.histogram_feature,
            histogram_bins: args.bins,
            ecdf_feature: args.ecdf_feature,
            retained_components: args.components,
            plots: !args.no_plots,
            ..AnalysisConfig::default()
        }
    }
}

fn main() {
    let args: Args = argh::from_env();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = AnalysisConfig::from(args);
    if !config.input.exists() {
        eprintln!("Error: Input file does not exist: {}", config.input.display());
        std::process::exit(1);
    }

    if let Err(e) = run_analysis(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
