//! Nearest-centroid classifier (prediction only, no probabilities)

use super::{check_batch, Classifier, ModelError};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct NearestCentroid {
    classes: Vec<usize>,
    centroids: Vec<Vec<f64>>,
    n_features: usize,
}

impl NearestCentroid {
    pub fn new(classes: Vec<usize>, centroids: Vec<Vec<f64>>) -> Result<Self> {
        if classes.is_empty() || classes.len() != centroids.len() {
            return Err(Error::Model(format!(
                "{} centroids for {} classes",
                centroids.len(),
                classes.len()
            )));
        }
        let n_features = centroids[0].len();
        if n_features == 0 || centroids.iter().any(|c| c.len() != n_features) {
            return Err(Error::Model(
                "centroids must be non-empty and equally sized".to_string(),
            ));
        }
        Ok(Self {
            classes,
            centroids,
            n_features,
        })
    }

    fn nearest(&self, row: &[f64]) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (column, centroid) in self.centroids.iter().enumerate() {
            let distance: f64 = centroid
                .iter()
                .zip(row)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if distance < best_distance {
                best = column;
                best_distance = distance;
            }
        }
        self.classes[best]
    }
}

impl Classifier for NearestCentroid {
    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, batch: &[Vec<f64>]) -> std::result::Result<Vec<usize>, ModelError> {
        check_batch(batch, self.n_features)?;
        Ok(batch.iter().map(|row| self.nearest(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicts_nearest() {
        let model = NearestCentroid::new(
            vec![0, 1, 2],
            vec![
                vec![5.0, 3.4, 1.5, 0.2],
                vec![5.9, 2.8, 4.3, 1.3],
                vec![6.6, 3.0, 5.6, 2.0],
            ],
        )
        .unwrap();
        let batch = vec![vec![5.1, 3.5, 1.4, 0.2], vec![6.9, 3.1, 6.0, 2.3]];
        assert_eq!(model.predict(&batch).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_empty_batch() {
        let model = NearestCentroid::new(vec![0], vec![vec![1.0]]).unwrap();
        assert_eq!(model.predict(&[]).unwrap_err(), ModelError::EmptyBatch);
    }
}
