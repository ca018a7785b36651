//! Principal component analysis
//!
//! PCA is computed from the thin singular value decomposition of the column-centred data
//! matrix, so it works directly on wide matrices (few classes, hundreds of statistics)
//! without forming the covariance matrix.

use nalgebra::DMatrix;
use thiserror::Error;

/// Explained variance ratio below which a component is considered degenerate
const DEGENERATE_RATIO: f64 = 1e-12;

/// Errors that can occur while fitting a PCA
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PcaError {
    #[error("PCA needs at least two samples, got {0}")]
    NotEnoughSamples(usize),

    #[error("PCA needs at least one feature")]
    NoFeatures,

    #[error("Input contains non-finite values")]
    NonFinite,

    #[error("Singular value decomposition did not produce right singular vectors")]
    Decomposition,
}

type Result<T> = core::result::Result<T, PcaError>;

/// Fitted principal component analysis
#[derive(Debug, Clone)]
pub struct Pca {
    /// `components × features`, one unit-length loading vector per row
    components: DMatrix<f64>,
    explained_variance: Vec<f64>,
    explained_variance_ratio: Vec<f64>,
    /// `samples × components`, the data projected onto the components
    scores: DMatrix<f64>,
}

impl Pca {
    /// Fits the PCA on `data` (rows are samples) and projects the data onto all components
    ///
    /// Components are ordered by decreasing explained variance. Each component is oriented so
    /// that its largest absolute loading is positive.
    pub fn fit(data: &DMatrix<f64>) -> Result<Self> {
        let samples = data.nrows();
        if samples < 2 {
            return Err(PcaError::NotEnoughSamples(samples));
        }
        if data.ncols() == 0 {
            return Err(PcaError::NoFeatures);
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PcaError::NonFinite);
        }

        let means: Vec<f64> = data
            .column_iter()
            .map(|column| column.sum() / samples as f64)
            .collect();
        let centred = DMatrix::from_fn(samples, data.ncols(), |row, column| {
            data[(row, column)] - means[column]
        });

        let svd = centred.clone().svd(false, true);
        let v_t = svd.v_t.ok_or(PcaError::Decomposition)?;
        let singular_values = svd.singular_values;

        let mut order: Vec<usize> = (0..singular_values.len()).collect();
        order.sort_by(|&a, &b| singular_values[b].total_cmp(&singular_values[a]));

        let signs: Vec<f64> = order
            .iter()
            .map(|&index| {
                let row = v_t.row(index);
                let largest = row
                    .iter()
                    .copied()
                    .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                    .unwrap_or(0.0);
                if largest < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            })
            .collect();

        let components = DMatrix::from_fn(order.len(), data.ncols(), |component, feature| {
            signs[component] * v_t[(order[component], feature)]
        });
        let scores = &centred * components.transpose();

        let squared: Vec<f64> = order.iter().map(|&i| singular_values[i].powi(2)).collect();
        let total: f64 = squared.iter().sum();
        let explained_variance = squared
            .iter()
            .map(|s| s / (samples - 1) as f64)
            .collect();
        let explained_variance_ratio = squared
            .iter()
            .map(|s| if total > 0.0 { s / total } else { 0.0 })
            .collect();

        Ok(Self {
            components,
            explained_variance,
            explained_variance_ratio,
            scores,
        })
    }

    /// Number of fitted components, `min(samples, features)`
    pub fn component_count(&self) -> usize {
        self.components.nrows()
    }

    /// Number of components carrying non-zero variance
    pub fn informative_component_count(&self) -> usize {
        self.explained_variance_ratio
            .iter()
            .take_while(|&&ratio| ratio > DEGENERATE_RATIO)
            .count()
    }

    pub fn components(&self) -> &DMatrix<f64> {
        &self.components
    }

    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }

    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }

    /// Running sum of the explained variance ratio, capped at 1.0
    pub fn cumulative_explained_variance(&self) -> Vec<f64> {
        self.explained_variance_ratio
            .iter()
            .scan(0.0, |sum, ratio| {
                *sum += ratio;
                Some(f64::min(*sum, 1.0))
            })
            .collect()
    }

    pub fn scores(&self) -> &DMatrix<f64> {
        &self.scores
    }

    /// Returns the scores of the first `count` components as column vectors
    ///
    /// Components without variance are never retained, so fewer columns may be returned.
    pub fn retain(&self, count: usize) -> Vec<Vec<f64>> {
        let count = count.min(self.informative_component_count());
        (0..count)
            .map(|component| self.scores.column(component).iter().copied().collect())
            .collect()
    }
}

/// Column names `PC1`, `PC2`, ... for `count` retained components
pub fn component_names(count: usize) -> Vec<String> {
    (1..=count).map(|index| format!("PC{}", index)).collect()
}
