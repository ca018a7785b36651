//! Pearson correlation analysis

use nalgebra::DMatrix;

/// Square matrix of pairwise Pearson correlation coefficients
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of variables (rows and columns)
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Coefficient between variables `i` and `j`; `NaN` when either is constant
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Largest absolute coefficient between two distinct variables, ignoring `NaN`
    pub fn max_off_diagonal(&self) -> Option<f64> {
        let mut largest: Option<f64> = None;
        for i in 0..self.size() {
            for j in 0..self.size() {
                let value = self.values[(i, j)].abs();
                if i != j && !value.is_nan() {
                    largest = Some(largest.map_or(value, |l| l.max(value)));
                }
            }
        }
        largest
    }
}

/// Computes the Pearson correlation matrix of `columns`
///
/// All columns must have the same length. Pairs involving a zero-variance column are `NaN`.
pub fn correlation_matrix(columns: &[Vec<f64>], names: &[String]) -> CorrelationMatrix {
    let size = columns.len();

    let centred: Vec<Vec<f64>> = columns
        .iter()
        .map(|column| {
            let mean = column.iter().sum::<f64>() / column.len().max(1) as f64;
            column.iter().map(|v| v - mean).collect()
        })
        .collect();
    let norms: Vec<f64> = centred
        .iter()
        .map(|column| column.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    let mut values = DMatrix::from_element(size, size, f64::NAN);
    for i in 0..size {
        for j in i..size {
            if norms[i] <= f64::EPSILON || norms[j] <= f64::EPSILON {
                continue;
            }

            let dot: f64 = centred[i].iter().zip(&centred[j]).map(|(a, b)| a * b).sum();
            let coefficient = if i == j {
                1.0
            } else {
                (dot / (norms[i] * norms[j])).clamp(-1.0, 1.0)
            };
            values[(i, j)] = coefficient;
            values[(j, i)] = coefficient;
        }
    }

    CorrelationMatrix {
        names: names.to_vec(),
        values,
    }
}
