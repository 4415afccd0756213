//! Validated-prediction pipeline
//!
//! measurements -> feature vector -> model inference -> labelled result
//!
//! The [`Predictor`] bundles the feature schema, model, and species catalog
//! loaded at startup. It holds no mutable state and is shared by reference
//! across all requests.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::SpeciesCatalog;
use crate::measurement::{Field, MeasurementSet};
use crate::model::{ModelError, ModelProvider};
use crate::schema::FeatureSchema;

/// Inference failed; carries the underlying model message
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("{0}")]
    PredictionFailure(String),
}

impl From<ModelError> for PredictionError {
    fn from(err: ModelError) -> Self {
        PredictionError::PredictionFailure(err.to_string())
    }
}

impl PredictionError {
    /// Message shown to the user when prediction fails
    pub fn user_message(&self) -> String {
        format!("An error occurred: {}", self)
    }
}

/// Model input row, sized to the feature schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Measurements fill positions 0-3 in field order; the rest stay zero
    pub fn build(schema: &FeatureSchema, measurements: &MeasurementSet) -> Self {
        let mut values = vec![0.0; schema.len()];
        for (field, value) in measurements.iter() {
            values[field.position()] = value;
        }
        debug_assert!(values.len() >= Field::ALL.len());
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Probability for one model class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub class_index: usize,
    pub label: String,
    pub probability: f64,
    /// Two-decimal percentage, e.g. "97.50%"
    pub percentage: String,
}

/// Outcome of one successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class_index: usize,
    pub label: String,
    pub description: String,
    pub measurements: MeasurementSet,
    /// Present only when the model supports probabilities; model class order
    pub probabilities: Option<Vec<ClassProbability>>,
}

/// Format a probability in [0, 1] as a percentage with two decimals
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Startup-loaded resources needed to answer predictions
#[derive(Debug, Clone)]
pub struct Predictor {
    schema: Arc<FeatureSchema>,
    model: ModelProvider,
    catalog: Arc<SpeciesCatalog>,
}

impl Predictor {
    pub fn new(schema: FeatureSchema, model: ModelProvider, catalog: SpeciesCatalog) -> Self {
        Self {
            schema: Arc::new(schema),
            model,
            catalog: Arc::new(catalog),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &ModelProvider {
        &self.model
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Run inference for one validated measurement set
    pub fn predict(
        &self,
        measurements: &MeasurementSet,
    ) -> Result<PredictionResult, PredictionError> {
        let features = FeatureVector::build(&self.schema, measurements);
        debug!("Feature vector: {:?}", features.as_slice());
        let batch = vec![features.into_inner()];

        let class_index = self
            .model
            .predict(&batch)?
            .first()
            .copied()
            .ok_or_else(|| {
                PredictionError::PredictionFailure("model returned no prediction".to_string())
            })?;
        let species = self.catalog.resolve(class_index);

        let probabilities = match self.model.predict_probability(&batch) {
            Some(result) => Some(self.label_probabilities(result?)?),
            None => None,
        };

        info!(
            "Predicted class {} ({}) for {:?}",
            class_index,
            species.name,
            measurements.as_array()
        );

        Ok(PredictionResult {
            class_index,
            label: species.name.clone(),
            description: species.description.clone(),
            measurements: *measurements,
            probabilities,
        })
    }

    fn label_probabilities(
        &self,
        rows: Vec<Vec<f64>>,
    ) -> Result<Vec<ClassProbability>, PredictionError> {
        let row = rows.into_iter().next().ok_or_else(|| {
            PredictionError::PredictionFailure("model returned no probabilities".to_string())
        })?;
        let classes = self.model.classes();
        if row.len() != classes.len() {
            return Err(PredictionError::PredictionFailure(format!(
                "model returned {} probabilities for {} classes",
                row.len(),
                classes.len()
            )));
        }

        Ok(classes
            .iter()
            .zip(row)
            .map(|(&class_index, probability)| ClassProbability {
                class_index,
                label: self.catalog.resolve(class_index).name.clone(),
                probability,
                percentage: format_percentage(probability),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.975), "97.50%");
        assert_eq!(format_percentage(1.0), "100.00%");
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(0.123456), "12.35%");
    }

    #[test]
    fn test_model_error_becomes_prediction_failure() {
        let err: PredictionError = ModelError::EmptyBatch.into();
        assert_eq!(err, PredictionError::PredictionFailure("empty input batch".to_string()));
        assert_eq!(err.user_message(), "An error occurred: empty input batch");
    }
}
