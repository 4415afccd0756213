//! Feature schema asset
//!
//! The schema is a JSON document with an ordered `columns` list naming the
//! inputs the model was trained on. Its length fixes the feature vector
//! width for the lifetime of the process.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::measurement::Field;
use crate::{Error, Result};

/// On-disk asset; extra keys are ignored
#[derive(Debug, Deserialize)]
struct SchemaAsset {
    columns: Vec<String>,
}

/// Ordered feature column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from column names
    ///
    /// Fails when there are fewer columns than measured fields, since the
    /// measurements always occupy the leading positions.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.len() < Field::ALL.len() {
            return Err(Error::Schema(format!(
                "expected at least {} columns, found {}",
                Field::ALL.len(),
                columns.len()
            )));
        }
        Ok(Self { columns })
    }

    /// Parse a schema from its JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let asset: SchemaAsset = serde_json::from_str(text)?;
        Self::new(asset.columns)
    }

    /// Load the schema asset from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Schema(format!("failed to read {}: {}", path.display(), e))
        })?;
        let schema = Self::from_json(&text)?;
        debug!(
            "Loaded feature schema from {} ({} columns)",
            path.display(),
            schema.len()
        );
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Feature vector width
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
