//! Ground-truth label encoding
//!
//! Maps each distinct traffic label to an integer code, in order of first appearance.
//! For the reference capture this yields e.g. `ddos_dns -> 0, benign -> 1, ddos_ldap -> 2, ...`.

use std::collections::HashMap;

/// Bijection between observed labels and `0..len()`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoding {
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoding {
    /// Builds the encoding from the label column
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut encoding = Self::default();
        for label in labels {
            let label = label.as_ref();
            if !encoding.codes.contains_key(label) {
                encoding.codes.insert(label.to_string(), encoding.labels.len());
                encoding.labels.push(label.to_string());
            }
        }

        encoding
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Labels in code order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Encodes a whole label column.
    ///
    /// Labels not seen by [`LabelEncoding::fit`] are skipped.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Vec<usize> {
        labels
            .iter()
            .filter_map(|label| self.encode(label.as_ref()))
            .collect()
    }

    /// `(code, label)` pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }
}
