//! Analysis steps over a loaded flow table
//!
//! - [`traffic`]: class distribution and feature distribution charts
//! - [`class_stats`] / [`stats_table`]: per-class aggregate statistics and their text table
//! - [`scaling`] / [`pca`]: standardization and principal component analysis
//! - [`correlation`]: Pearson correlation matrices

pub mod class_stats;
pub mod constants;
pub mod correlation;
pub mod pca;
pub mod scaling;
pub mod stats_table;
pub mod traffic;

// Re-export the analysis entry points
pub use class_stats::{compute_class_statistics, ClassStatistics};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use pca::{component_names, Pca};
pub use scaling::{matrix_from_columns, StandardScaler};
pub use stats_table::write_stats_table;
pub use traffic::generate_traffic_analysis;
