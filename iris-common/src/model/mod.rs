//! Model provider
//!
//! A trained classifier is loaded once from a JSON artifact and exposed
//! through two capability levels:
//! - [`Classifier`]: `predict` only
//! - [`ProbabilisticClassifier`]: additionally `predict_probability`
//!
//! Which level a model has is fixed when the artifact is loaded and recorded
//! in the [`ModelProvider`] variant, so request handling never inspects the
//! model to find out.

pub mod centroid;
pub mod logistic;
pub mod tree;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{Error, Result};

pub use centroid::NearestCentroid;
pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, TreeNode};

/// Inference-time failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature vector has {actual} values but the model expects {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("empty input batch")]
    EmptyBatch,

    #[error("malformed model output: {0}")]
    Malformed(String),
}

/// Base capability: classify rows of features
pub trait Classifier: Send + Sync {
    /// Class indices the model can emit, in output-column order
    fn classes(&self) -> &[usize];

    /// Width of each input row
    fn n_features(&self) -> usize;

    /// Predict one class index per row
    fn predict(&self, batch: &[Vec<f64>]) -> std::result::Result<Vec<usize>, ModelError>;
}

/// Extended capability: per-class probabilities
pub trait ProbabilisticClassifier: Classifier {
    /// One probability row per input row, aligned with `classes()`
    fn predict_probability(
        &self,
        batch: &[Vec<f64>],
    ) -> std::result::Result<Vec<Vec<f64>>, ModelError>;
}

/// Check every row against the expected width
pub(crate) fn check_batch(
    batch: &[Vec<f64>],
    n_features: usize,
) -> std::result::Result<(), ModelError> {
    if batch.is_empty() {
        return Err(ModelError::EmptyBatch);
    }
    for row in batch {
        if row.len() != n_features {
            return Err(ModelError::FeatureMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }
    }
    Ok(())
}

/// Index of the largest value (first one wins on ties)
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Serialized model artifact, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        classes: Vec<usize>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    DecisionTree {
        classes: Vec<usize>,
        nodes: Vec<TreeNode>,
        /// Input width; defaults to the highest split feature + 1
        #[serde(default)]
        n_features: Option<usize>,
    },
    NearestCentroid {
        classes: Vec<usize>,
        centroids: Vec<Vec<f64>>,
    },
}

/// Loaded model with its capability level
#[derive(Clone)]
pub enum ModelProvider {
    Basic(Arc<dyn Classifier>),
    Probabilistic(Arc<dyn ProbabilisticClassifier>),
}

impl std::fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelProvider")
            .field("probability", &self.supports_probability())
            .field("classes", &self.classes())
            .field("n_features", &self.n_features())
            .finish()
    }
}

impl ModelProvider {
    /// Build a provider from a parsed artifact
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let provider = match artifact {
            ModelArtifact::LogisticRegression {
                classes,
                coefficients,
                intercepts,
            } => Self::Probabilistic(Arc::new(LogisticRegression::new(
                classes,
                coefficients,
                intercepts,
            )?)),
            ModelArtifact::DecisionTree {
                classes,
                nodes,
                n_features,
            } => {
                let mut tree = DecisionTree::new(classes, nodes)?;
                if let Some(n_features) = n_features {
                    tree = tree.with_n_features(n_features)?;
                }
                Self::Probabilistic(Arc::new(tree))
            }
            ModelArtifact::NearestCentroid { classes, centroids } => {
                Self::Basic(Arc::new(NearestCentroid::new(classes, centroids)?))
            }
        };
        Ok(provider)
    }

    /// Parse an artifact from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(text)
            .map_err(|e| Error::Model(format!("invalid model artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    /// Load the artifact file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Model(format!("failed to read {}: {}", path.display(), e))
        })?;
        let provider = Self::from_json(&text)?;
        info!(
            "Loaded model from {} ({} classes, {} features, probabilities: {})",
            path.display(),
            provider.classes().len(),
            provider.n_features(),
            provider.supports_probability()
        );
        Ok(provider)
    }

    pub fn classes(&self) -> &[usize] {
        match self {
            Self::Basic(model) => model.classes(),
            Self::Probabilistic(model) => model.classes(),
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Self::Basic(model) => model.n_features(),
            Self::Probabilistic(model) => model.n_features(),
        }
    }

    pub fn supports_probability(&self) -> bool {
        matches!(self, Self::Probabilistic(_))
    }

    pub fn predict(&self, batch: &[Vec<f64>]) -> std::result::Result<Vec<usize>, ModelError> {
        match self {
            Self::Basic(model) => model.predict(batch),
            Self::Probabilistic(model) => model.predict(batch),
        }
    }

    /// `None` when the model has no probability capability
    pub fn predict_probability(
        &self,
        batch: &[Vec<f64>],
    ) -> Option<std::result::Result<Vec<Vec<f64>>, ModelError>> {
        match self {
            Self::Basic(_) => None,
            Self::Probabilistic(model) => Some(model.predict_probability(batch)),
        }
    }
}
