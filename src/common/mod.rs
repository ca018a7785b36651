//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Label encoding of the ground-truth column
//! - Class count types and ASCII table formatting
//! - Plotting bar, box, histogram, ECDF, line and heatmap charts

pub mod labels;
pub mod plots;
pub mod tables;

// Re-export commonly used items
pub use labels::LabelEncoding;
pub use plots::PlotError;
