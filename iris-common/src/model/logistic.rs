//! Linear logistic regression
//!
//! Multinomial models carry one coefficient row per class and score with a
//! softmax. A two-class model with a single coefficient row uses the binary
//! form: the row scores the second class, `p1 = sigmoid(w.x + b)`.

use super::{argmax, check_batch, Classifier, ModelError, ProbabilisticClassifier};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<usize>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
}

impl LogisticRegression {
    pub fn new(
        classes: Vec<usize>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self> {
        if classes.len() < 2 {
            return Err(Error::Model(
                "logistic regression needs at least two classes".to_string(),
            ));
        }
        let binary = classes.len() == 2 && coefficients.len() == 1;
        if !binary && coefficients.len() != classes.len() {
            return Err(Error::Model(format!(
                "{} coefficient rows for {} classes",
                coefficients.len(),
                classes.len()
            )));
        }
        if intercepts.len() != coefficients.len() {
            return Err(Error::Model(format!(
                "{} intercepts for {} coefficient rows",
                intercepts.len(),
                coefficients.len()
            )));
        }
        let n_features = coefficients[0].len();
        if n_features == 0 || coefficients.iter().any(|row| row.len() != n_features) {
            return Err(Error::Model(
                "coefficient rows must be non-empty and equally sized".to_string(),
            ));
        }

        Ok(Self {
            classes,
            coefficients,
            intercepts,
            n_features,
        })
    }

    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1
    }

    fn decision(&self, row: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, bias)| {
                weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect()
    }

    fn probabilities(&self, row: &[f64]) -> Vec<f64> {
        let scores = self.decision(row);
        if self.is_binary() {
            let p1 = sigmoid(scores[0]);
            return vec![1.0 - p1, p1];
        }
        softmax(&scores)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Classifier for LogisticRegression {
    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, batch: &[Vec<f64>]) -> std::result::Result<Vec<usize>, ModelError> {
        self.predict_probability(batch)?
            .iter()
            .map(|probs| {
                argmax(probs)
                    .map(|column| self.classes[column])
                    .ok_or_else(|| ModelError::Malformed("no class scores".to_string()))
            })
            .collect()
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_probability(
        &self,
        batch: &[Vec<f64>],
    ) -> std::result::Result<Vec<Vec<f64>>, ModelError> {
        check_batch(batch, self.n_features)?;
        Ok(batch.iter().map(|row| self.probabilities(row)).collect())
    }
}
