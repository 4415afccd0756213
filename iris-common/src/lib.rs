//! # Iris Common Library
//!
//! Shared code for the iris classification service including:
//! - Configuration loading
//! - Feature schema and species catalog assets
//! - Form validation for the four flower measurements
//! - Model provider (classifier artifacts and their capabilities)
//! - The validated-prediction pipeline

pub mod catalog;
pub mod config;
pub mod error;
pub mod measurement;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod validation;

pub use catalog::{SpeciesCatalog, SpeciesInfo};
pub use error::{Error, Result};
pub use measurement::{Field, MeasurementSet};
pub use model::{ModelError, ModelProvider};
pub use pipeline::{ClassProbability, FeatureVector, PredictionError, PredictionResult, Predictor};
pub use schema::FeatureSchema;
pub use validation::{validate, FormInput, ValidationError};
