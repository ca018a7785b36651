//! # ddos-flow-stats
//!
//! Exploratory analysis of labelled network-flow captures (CIC-style DDoS CSV exports).
//!
//! The analysis runs as a fixed sequence of steps over one in-memory [`parsing::FlowTable`]:
//!
//! 1. Load the CSV and encode the traffic labels.
//! 2. Plot traffic-level distributions (flows per class, box plot, histogram, ECDF).
//! 3. Aggregate per-class statistics (min, max, mean, std) and write them to `out.txt`.
//! 4. Standardize the statistics, run PCA and inspect the retained components.
//! 5. Inspect correlations between the aggregated statistics.
//!
//! See [`pipeline::run_analysis`] for the entry point.

pub mod analysis;
pub mod common;
pub mod config;
pub mod parsing;
pub mod pipeline;
pub mod report;

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Traffic analysis error: {0}")]
    Traffic(#[from] analysis::traffic::TrafficError),

    #[error("Statistics table error: {0}")]
    StatsTable(#[from] analysis::stats_table::StatsTableError),

    #[error("PCA error: {0}")]
    Pca(#[from] analysis::pca::PcaError),

    #[error("Plot error: {0}")]
    Plot(#[from] common::PlotError),

    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
