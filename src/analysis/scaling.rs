//! Feature standardization
//!
//! The aggregated statistics span many orders of magnitude (byte counts, rates, flag
//! counts), so they are standardized before PCA.

use nalgebra::DMatrix;

/// Removes the column mean and scales to unit variance.
///
/// Uses the population standard deviation. Constant columns keep a scale of 1, so they
/// become all-zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learns the per-column mean and standard deviation of `data` (rows are samples)
    pub fn fit(data: &DMatrix<f64>) -> Self {
        let samples = data.nrows().max(1) as f64;
        let mut means = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());

        for column in data.column_iter() {
            let mean = column.sum() / samples;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples;

            means.push(mean);
            scales.push(if is_constant(variance, mean, samples) {
                1.0
            } else {
                variance.sqrt()
            });
        }

        Self { means, scales }
    }

    /// Standardizes `data` with the learned parameters
    ///
    /// # Panics
    /// If `data` does not have the number of columns the scaler was fitted on.
    pub fn transform(&self, data: &DMatrix<f64>) -> DMatrix<f64> {
        assert_eq!(data.ncols(), self.means.len(), "column count mismatch");
        DMatrix::from_fn(data.nrows(), data.ncols(), |row, column| {
            (data[(row, column)] - self.means[column]) / self.scales[column]
        })
    }

    pub fn fit_transform(data: &DMatrix<f64>) -> (Self, DMatrix<f64>) {
        let scaler = Self::fit(data);
        let scaled = scaler.transform(data);
        (scaler, scaled)
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

/// True when `variance` is within floating-point rounding of zero for values around `mean`
///
/// Means of the same value over groups of different sizes differ in the last bits, so the
/// bound grows with the magnitude of the mean.
fn is_constant(variance: f64, mean: f64, samples: f64) -> bool {
    let rounding = samples * mean.abs() * f64::EPSILON;
    variance <= rounding * rounding + samples * f64::EPSILON * variance
}

/// Builds a samples × features matrix from column vectors
pub fn matrix_from_columns(columns: &[Vec<f64>]) -> DMatrix<f64> {
    let rows = columns.first().map_or(0, Vec::len);
    DMatrix::from_fn(rows, columns.len(), |row, column| columns[column][row])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn data() -> DMatrix<f64> {
        matrix_from_columns(&[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1e6, 5e6, 2e6, 9e6],
            vec![7.0, 7.0, 7.0, 7.0],
        ])
    }

    #[test]
    fn test_standardized_columns_have_zero_mean_and_unit_variance() {
        let (_, scaled) = StandardScaler::fit_transform(&data());
        let samples = scaled.nrows() as f64;

        for column in scaled.column_iter().take(2) {
            let mean = column.sum() / samples;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples;
            assert!(mean.abs() < TOLERANCE);
            assert!((variance - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_constant_column_becomes_zero() {
        let (scaler, scaled) = StandardScaler::fit_transform(&data());
        assert_eq!(scaler.scales()[2], 1.0);
        assert!(scaled.column(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rounding_noise_column_is_constant() {
        // The same mean over classes of different sizes only differs by rounding
        let noisy: Vec<f64> = [3usize, 7, 11, 13, 17, 29]
            .iter()
            .map(|&n| (0..n).map(|_| 123456.7).sum::<f64>() / n as f64)
            .collect();
        let data = matrix_from_columns(&[noisy, vec![1.0, 4.0, 2.0, 8.0, 5.0, 7.0]]);

        let (scaler, scaled) = StandardScaler::fit_transform(&data);
        assert_eq!(scaler.scales()[0], 1.0);
        assert!(scaled.column(0).iter().all(|v| v.abs() < 1e-6));

        let pca = crate::analysis::pca::Pca::fit(&scaled).unwrap();
        assert_eq!(pca.informative_component_count(), 1);
        assert!(pca.explained_variance_ratio()[0] > 1.0 - 1e-12);
    }

    #[test]
    fn test_learns_population_statistics() {
        let scaler = StandardScaler::fit(&data());
        assert_eq!(scaler.means()[0], 2.5);
        assert!((scaler.scales()[0] - 1.25f64.sqrt()).abs() < TOLERANCE);
    }

    #[test]
    fn test_builds_matrix_from_columns() {
        let matrix = matrix_from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 3);
        assert_eq!(matrix[(1, 2)], 6.0);
        assert_eq!(matrix_from_columns(&[]).len(), 0);
    }
}
