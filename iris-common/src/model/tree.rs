//! Decision tree classifier
//!
//! Nodes are stored flat; node 0 is the root. A split sends a row left when
//! `row[feature] <= threshold`. Leaves hold per-class weights (sample counts
//! or fractions) aligned with `classes`.

use serde::Deserialize;

use super::{argmax, check_batch, Classifier, ModelError, ProbabilisticClassifier};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    classes: Vec<usize>,
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(classes: Vec<usize>, nodes: Vec<TreeNode>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::Model("decision tree has no classes".to_string()));
        }
        if nodes.is_empty() {
            return Err(Error::Model("decision tree has no nodes".to_string()));
        }

        let mut n_features = 0;
        for (index, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    // Children must come after their parent, which also rules out cycles
                    let in_order = *left > index && *right > index;
                    if !in_order || *left >= nodes.len() || *right >= nodes.len() {
                        return Err(Error::Model(format!(
                            "node {} has invalid children ({}, {})",
                            index, left, right
                        )));
                    }
                    n_features = n_features.max(feature + 1);
                }
                TreeNode::Leaf { value } => {
                    if value.len() != classes.len() {
                        return Err(Error::Model(format!(
                            "leaf {} has {} weights for {} classes",
                            index,
                            value.len(),
                            classes.len()
                        )));
                    }
                    if value.iter().any(|w| *w < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(Error::Model(format!(
                            "leaf {} weights must be non-negative with a positive total",
                            index
                        )));
                    }
                }
            }
        }

        Ok(Self {
            classes,
            nodes,
            n_features,
        })
    }

    /// Override the input width (defaults to the highest split feature + 1)
    pub fn with_n_features(mut self, n_features: usize) -> Result<Self> {
        if n_features < self.n_features {
            return Err(Error::Model(format!(
                "tree splits on feature {} but only {} features declared",
                self.n_features - 1,
                n_features
            )));
        }
        self.n_features = n_features;
        Ok(self)
    }

    fn leaf(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, batch: &[Vec<f64>]) -> std::result::Result<Vec<usize>, ModelError> {
        check_batch(batch, self.n_features)?;
        batch
            .iter()
            .map(|row| {
                argmax(self.leaf(row))
                    .map(|column| self.classes[column])
                    .ok_or_else(|| ModelError::Malformed("empty leaf".to_string()))
            })
            .collect()
    }
}

impl ProbabilisticClassifier for DecisionTree {
    fn predict_probability(
        &self,
        batch: &[Vec<f64>],
    ) -> std::result::Result<Vec<Vec<f64>>, ModelError> {
        check_batch(batch, self.n_features)?;
        Ok(batch
            .iter()
            .map(|row| {
                let weights = self.leaf(row);
                let total: f64 = weights.iter().sum();
                weights.iter().map(|w| w / total).collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris_tree() -> DecisionTree {
        let nodes = vec![
            TreeNode::Split {
                feature: 2,
                threshold: 2.45,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf {
                value: vec![50.0, 0.0, 0.0],
            },
            TreeNode::Split {
                feature: 3,
                threshold: 1.75,
                left: 3,
                right: 4,
            },
            TreeNode::Leaf {
                value: vec![0.0, 49.0, 5.0],
            },
            TreeNode::Leaf {
                value: vec![0.0, 1.0, 45.0],
            },
        ];
        DecisionTree::new(vec![0, 1, 2], nodes)
            .unwrap()
            .with_n_features(4)
            .unwrap()
    }

    #[test]
    fn test_predict_follows_splits() {
        let tree = iris_tree();
        let batch = vec![
            vec![5.1, 3.5, 1.4, 0.2],
            vec![6.0, 2.9, 4.5, 1.5],
            vec![6.9, 3.1, 6.0, 2.3],
        ];
        assert_eq!(tree.predict(&batch).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_threshold_goes_left() {
        let tree = iris_tree();
        assert_eq!(tree.predict(&[vec![0.0, 0.0, 2.45, 0.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_probabilities_are_normalized_leaf_weights() {
        let tree = iris_tree();
        let probs = tree.predict_probability(&[vec![6.0, 2.9, 4.5, 1.5]]).unwrap();
        assert!((probs[0][1] - 49.0 / 54.0).abs() < 1e-12);
        assert!((probs[0].iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserializes_untagged_nodes() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature": 0, "threshold": 1.0, "left": 1, "right": 2},
                {"value": [1, 0]}, {"value": [0, 1]}]"#,
        )
        .unwrap();
        let tree = DecisionTree::new(vec![0, 1], nodes).unwrap();
        assert_eq!(tree.n_features(), 1);
        assert_eq!(tree.predict(&[vec![2.0]]).unwrap(), vec![1]);
    }

    #[test]
    fn test_rejects_backward_child_reference() {
        let nodes = vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: vec![1.0] },
        ];
        assert!(DecisionTree::new(vec![0], nodes).is_err());
    }

    #[test]
    fn test_rejects_narrow_width_override() {
        assert!(iris_tree().with_n_features(3).is_err());
    }
}
