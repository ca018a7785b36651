//! Plotting infrastructure for the analysis charts
//!
//! This module renders every chart of the analysis using the [`plotters`] crate. Charts are
//! saved as PNG files; most use a fixed 1200x800 resolution.
//!
//! # Headless Compatibility
//! All charts use plotters' bitmap backend, so they render in environments without a display
//! (Docker/CI). Input is validated before a backend is created, which keeps validation
//! testable without fonts.

use crate::analysis::constants::{GIGA, KILO, MEGA, TERA};
use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::traffic::{BoxSummary, HistogramBin};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

/// Default chart resolution
pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);

/// Resolution of heatmaps with many variables
pub const LARGE_HEATMAP_SIZE: (u32, u32) = (4000, 2000);

/// Above this many categories axis labels are omitted, as they would overlap
const MAX_CATEGORY_LABELS: usize = 40;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// One line of an ECDF chart
#[derive(Debug, Clone)]
pub struct EcdfSeries {
    pub label: String,
    /// `(value, cumulative_percentage)` pairs sorted by value
    pub points: Vec<(f64, f64)>,
}

/// Formats large values with base-1000 suffixes for chart labels
///
/// # Arguments
/// * `value` - The value to format
///
/// # Returns
/// A short string such as `250`, `1.5k`, `12M`
pub fn format_compact(value: f64) -> String {
    let abs_value = value.abs();

    let (scaled, suffix) = if abs_value >= TERA {
        (value / TERA, "T")
    } else if abs_value >= GIGA {
        (value / GIGA, "G")
    } else if abs_value >= MEGA {
        (value / MEGA, "M")
    } else if abs_value >= KILO {
        (value / KILO, "k")
    } else if abs_value >= 1.0 || abs_value == 0.0 {
        (value, "")
    } else {
        return format!("{:.2}", value);
    };

    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}

/// Maps a correlation coefficient in `-1..=1` onto a blue-white-red colour scale
///
/// `NaN` (undefined correlation) is drawn grey.
pub fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if value.is_nan() {
        return RGBColor(150, 150, 150);
    }

    let value = value.clamp(-1.0, 1.0);
    let (from, to, t) = if value < 0.0 {
        (NEUTRAL, COLD, -value)
    } else {
        (NEUTRAL, WARM, value)
    };

    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Returns the category name for an axis position, or an empty label between categories
fn category_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Pads a value range so that data does not touch the chart border
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if min >= max {
        return (min - 1.0, max + 1.0);
    }
    let padding = (max - min) * 0.05;
    (min - padding, max + padding)
}

/// Creates a bar chart with one bar per class and saves it as a PNG file
///
/// # Arguments
/// * `labels` - Class names, in display order
/// * `counts` - Number of flows per class
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis
/// * `output_path` - Path where the PNG file should be saved
pub fn create_count_plot(
    labels: &[String],
    counts: &[usize],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    if labels.is_empty() {
        return Err(PlotError::InvalidData("Labels cannot be empty".to_string()));
    }
    if labels.len() != counts.len() {
        return Err(PlotError::InvalidData(format!(
            "{} labels but {} counts",
            labels.len(),
            counts.len()
        )));
    }

    let root = BitMapBackend::new(output_path, DEFAULT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let max_count = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let categories = labels.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(-0.5..categories - 0.5, 0.0..max_count * 1.05)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_formatter = |x: &f64| category_label(labels, *x);
    let y_formatter = |y: &f64| format_compact(*y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_label)
        .y_desc("Number of Flows")
        .x_labels(labels.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 30))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(index, &count)| {
            let center = index as f64;
            let color = Palette99::pick(index).to_rgba();
            Rectangle::new([(center - 0.4, 0.0), (center + 0.4, count as f64)], color.filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a box plot with one box per class and saves it as a PNG file
///
/// Classes without values are left empty. Outliers are drawn as individual points.
pub fn create_box_plot(
    labels: &[String],
    summaries: &[Option<BoxSummary>],
    title: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    if labels.len() != summaries.len() {
        return Err(PlotError::InvalidData(format!(
            "{} labels but {} box summaries",
            labels.len(),
            summaries.len()
        )));
    }

    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for summary in summaries.iter().flatten() {
        min = summary
            .outliers
            .iter()
            .copied()
            .fold(min.min(summary.lower_whisker), f64::min);
        max = summary
            .outliers
            .iter()
            .copied()
            .fold(max.max(summary.upper_whisker), f64::max);
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(PlotError::InvalidData(
            "No class has values to plot".to_string(),
        ));
    }
    let (y_min, y_max) = padded_range(min, max);

    let root = BitMapBackend::new(output_path, DEFAULT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(-0.5..labels.len() as f64 - 0.5, y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_formatter = |x: &f64| category_label(labels, *x);
    let y_formatter = |y: &f64| format_compact(*y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Traffic Class")
        .y_desc(y_label)
        .x_labels(labels.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 30))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, summary) in summaries.iter().enumerate() {
        let Some(summary) = summary else {
            continue;
        };

        let center = index as f64;
        let color = Palette99::pick(index).to_rgba();
        let (left, right) = (center - 0.3, center + 0.3);
        let (cap_left, cap_right) = (center - 0.15, center + 0.15);

        chart
            .draw_series([
                Rectangle::new([(left, summary.q1), (right, summary.q3)], color.mix(0.6).filled()),
                Rectangle::new([(left, summary.q1), (right, summary.q3)], BLACK.stroke_width(1)),
            ])
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        chart
            .draw_series([
                PathElement::new(vec![(left, summary.median), (right, summary.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(center, summary.lower_whisker), (center, summary.q1)], BLACK.stroke_width(1)),
                PathElement::new(vec![(center, summary.q3), (center, summary.upper_whisker)], BLACK.stroke_width(1)),
                PathElement::new(
                    vec![(cap_left, summary.lower_whisker), (cap_right, summary.lower_whisker)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![(cap_left, summary.upper_whisker), (cap_right, summary.upper_whisker)],
                    BLACK.stroke_width(1),
                ),
            ])
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        chart
            .draw_series(
                summary
                    .outliers
                    .iter()
                    .map(|&value| Circle::new((center, value), 2, BLACK.stroke_width(1))),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a histogram from precomputed bins and saves it as a PNG file
pub fn create_histogram_plot(
    bins: &[HistogramBin],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(PlotError::InvalidData("Bins cannot be empty".to_string()));
    };

    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(0).max(1) as f64;

    let root = BitMapBackend::new(output_path, DEFAULT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(first.start..last.end, 0.0..max_count * 1.05)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let formatter = |v: &f64| format_compact(*v);
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .x_label_formatter(&formatter)
        .y_label_formatter(&formatter)
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 30))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLUE.mix(0.7).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a multi-series empirical cumulative distribution chart and saves it as a PNG file
///
/// # Arguments
/// * `series` - One line per class; empty series are skipped
/// * `title` - Chart title displayed at the top of the plot
/// * `x_label` - Label for the X-axis
/// * `output_path` - Path where the PNG file should be saved
///
/// # Chart Properties
/// * Y-axis: 0-100% (cumulative percentage)
/// * X-axis: linear, shared by all classes
/// * Legend with one entry per class
pub fn create_ecdf_plot(
    series: &[EcdfSeries],
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()> {
    let points = || series.iter().flat_map(|s| s.points.iter());
    if points().next().is_none() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }

    // Validate that cumulative percentages are in valid range
    for (_, percentage) in points() {
        if *percentage < 0.0 || *percentage > 100.0 {
            return Err(PlotError::InvalidData(format!(
                "Cumulative percentage {:.2} is outside valid range 0-100",
                percentage
            )));
        }
    }

    let x_min = points().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = points().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = padded_range(x_min, x_max);

    let root = BitMapBackend::new(output_path, DEFAULT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0.0..100.0)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_formatter = |x: &f64| format_compact(*x);
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Cumulative Percentage (%)")
        .x_label_formatter(&x_formatter)
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 30))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, line) in series.iter().enumerate() {
        if line.points.is_empty() {
            continue;
        }

        let color = Palette99::pick(index).to_rgba();
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates the cumulative explained variance chart of a PCA and saves it as a PNG file
///
/// # Arguments
/// * `cumulative` - Cumulative explained variance ratio per component, in `0..=1`
/// * `retained` - Number of retained components, marked with a vertical line
/// * `output_path` - Path where the PNG file should be saved
pub fn create_cumulative_variance_plot(
    cumulative: &[f64],
    retained: Option<usize>,
    output_path: &Path,
) -> Result<()> {
    if cumulative.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }
    if let Some(ratio) = cumulative.iter().find(|r| !(0.0..=1.0 + 1e-9).contains(*r)) {
        return Err(PlotError::InvalidData(format!(
            "Cumulative variance ratio {:.4} is outside valid range 0-1",
            ratio
        )));
    }

    let points: Vec<(f64, f64)> = cumulative
        .iter()
        .enumerate()
        .map(|(index, &ratio)| ((index + 1) as f64, ratio))
        .collect();

    let root = BitMapBackend::new(output_path, DEFAULT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative Explained Variance (PCA)", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(0.5..cumulative.len() as f64 + 0.5, 0.0..1.05)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_formatter = |x: &f64| format!("{:.0}", x);
    chart
        .configure_mesh()
        .x_desc("Number of Principal Components")
        .y_desc("Cumulative Explained Variance")
        .x_labels(cumulative.len().min(MAX_CATEGORY_LABELS))
        .x_label_formatter(&x_formatter)
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 30))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(retained) = retained {
        let x = retained as f64;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, 0.0), (x, 1.05)],
                RED.stroke_width(1),
            )))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    chart
        .draw_series(points.iter().map(|&point| Circle::new(point, 4, BLUE.filled())))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a correlation heatmap and saves it as a PNG file
///
/// # Arguments
/// * `matrix` - Correlation matrix to draw; row 0 is at the top
/// * `title` - Chart title displayed at the top of the plot
/// * `annotate` - Write the coefficient into every cell
/// * `size` - Image resolution in pixels
/// * `output_path` - Path where the PNG file should be saved
pub fn create_heatmap(
    matrix: &CorrelationMatrix,
    title: &str,
    annotate: bool,
    size: (u32, u32),
    output_path: &Path,
) -> Result<()> {
    let n = matrix.size();
    if n == 0 {
        return Err(PlotError::InvalidData("Matrix cannot be empty".to_string()));
    }

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let extent = n as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(200)
        .build_cartesian_2d(-0.5..extent, -0.5..extent)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // Row 0 is drawn at the top, so the y axis counts downwards
    let names = matrix.names();
    let row_at = |y: f64| n as f64 - 1.0 - y;
    let x_formatter = |x: &f64| category_label(names, *x);
    let y_formatter = |y: &f64| category_label(names, row_at(*y));
    let label_count = if n <= MAX_CATEGORY_LABELS { n } else { 0 };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(label_count)
        .y_labels(label_count)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |column| (row, column)));
    chart
        .draw_series(cells.clone().map(|(row, column)| {
            let (x, y) = (column as f64, row_at(row as f64));
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                coolwarm(matrix.get(row, column)).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if annotate {
        let style = TextStyle::from(("sans-serif", 18).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(cells.map(|(row, column)| {
                let value = matrix.get(row, column);
                let text = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", value)
                };
                Text::new(text, (column as f64, row_at(row as f64)), style.clone())
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::correlation::correlation_matrix;
    use rstest::rstest;
    use std::fs;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(10.0, "10")]
    #[case(512.4, "512.4")]
    #[case(1000.0, "1k")]
    #[case(1500.0, "1.5k")]
    #[case(-2_500_000.0, "-2.5M")]
    #[case(120_000_000.0, "120M")]
    #[case(3.0e9, "3G")]
    #[case(1.0e12, "1T")]
    #[case(0.25, "0.25")]
    fn test_format_compact(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_compact(value), expected);
    }

    #[test]
    fn test_coolwarm_scale() {
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
        assert_eq!(coolwarm(f64::NAN), RGBColor(150, 150, 150));
    }

    #[test]
    fn test_category_label() {
        let names = labels(&["benign", "ddos_dns"]);
        assert_eq!(category_label(&names, 0.0), "benign");
        assert_eq!(category_label(&names, 1.0000000001), "ddos_dns");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, -1.0), "");
        assert_eq!(category_label(&names, 2.0), "");
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(0.0, 100.0), (-5.0, 105.0));
        assert_eq!(padded_range(3.0, 3.0), (2.0, 4.0));
    }

    #[test]
    fn test_plot_validation() {
        let output_path = std::env::temp_dir().join("test_plot.png");

        // Test mismatched counts
        let result = create_count_plot(&labels(&["a"]), &[1, 2], "Test", "X-axis", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test box plot without any values
        let result = create_box_plot(&labels(&["a"]), &[None], "Test", "Y-axis", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test empty histogram
        let result = create_histogram_plot(&[], "Test", "X-axis", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test empty ECDF
        let series = vec![EcdfSeries {
            label: "a".to_string(),
            points: vec![],
        }];
        let result = create_ecdf_plot(&series, "Test", "X-axis", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test invalid percentage (>100)
        let series = vec![EcdfSeries {
            label: "a".to_string(),
            points: vec![(1.0, 150.0)],
        }];
        let result = create_ecdf_plot(&series, "Test", "X-axis", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test invalid variance ratio
        let result = create_cumulative_variance_plot(&[0.5, 1.5], None, &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test empty heatmap
        let matrix = correlation_matrix(&[], &[]);
        let result = create_heatmap(&matrix, "Test", true, DEFAULT_SIZE, &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_render_all_charts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let names = labels(&["benign", "ddos_dns", "ddos_syn"]);

        create_count_plot(&names, &[10, 40, 25], "Counts", "Class", &dir.join("counts.png"))
            .unwrap();

        let summary = crate::analysis::traffic::box_summary(&[1.0, 2.0, 3.0, 4.0, 50.0]);
        create_box_plot(
            &names,
            &[summary.clone(), None, summary],
            "Box",
            "Flow Duration",
            &dir.join("box.png"),
        )
        .unwrap();

        let bins = crate::analysis::traffic::histogram(&[1.0, 2.0, 2.0, 3.0, 9.0], 5);
        create_histogram_plot(&bins, "Histogram", "Flow Duration", &dir.join("hist.png"))
            .unwrap();

        let series = vec![EcdfSeries {
            label: "benign".to_string(),
            points: vec![(1.0, 50.0), (2.0, 100.0)],
        }];
        create_ecdf_plot(&series, "ECDF", "Length", &dir.join("ecdf.png")).unwrap();

        create_cumulative_variance_plot(&[0.6, 0.9, 1.0], Some(2), &dir.join("variance.png"))
            .unwrap();

        let matrix = correlation_matrix(
            &[vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]],
            &labels(&["PC1", "PC2"]),
        );
        create_heatmap(&matrix, "Heatmap", true, DEFAULT_SIZE, &dir.join("heatmap.png")).unwrap();

        for file in ["counts.png", "box.png", "hist.png", "ecdf.png", "variance.png", "heatmap.png"] {
            assert!(fs::metadata(dir.join(file)).unwrap().len() > 0);
        }
    }
}
