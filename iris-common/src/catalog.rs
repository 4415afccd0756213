//! Species catalog: class index to display label and description
//!
//! The catalog is read once at startup and shared read-only afterwards.
//! Its size comes from the catalog file rather than being fixed at three,
//! so a model trained on a different class set can ship its own catalog.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Label used when a class index has no catalog entry
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Display information for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub name: String,
    pub description: String,
}

impl SpeciesInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Sentinel entry for unrecognized class indices
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LABEL, "")
    }
}

/// On-disk catalog entry (`[[species]]` table)
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    index: usize,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    species: Vec<CatalogEntry>,
}

/// Read-only class index lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCatalog {
    entries: BTreeMap<usize, SpeciesInfo>,
    unknown: SpeciesInfo,
}

impl SpeciesCatalog {
    pub fn new(entries: BTreeMap<usize, SpeciesInfo>) -> Self {
        Self {
            entries,
            unknown: SpeciesInfo::unknown(),
        }
    }

    /// Built-in catalog for the three iris species
    pub fn iris() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            0,
            SpeciesInfo::new(
                "SETOSA",
                "Characterized by small flowers with wide sepals and narrow petals.",
            ),
        );
        entries.insert(
            1,
            SpeciesInfo::new(
                "VERSICOLOR",
                "Medium-sized flowers with moderate sepal and petal dimensions.",
            ),
        );
        entries.insert(
            2,
            SpeciesInfo::new(
                "VIRGINICA",
                "Distinguished by larger flowers with longer petals.",
            ),
        );
        Self::new(entries)
    }

    /// Parse a TOML catalog:
    ///
    /// ```toml
    /// [[species]]
    /// index = 0
    /// name = "SETOSA"
    /// description = "..."
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        if file.species.is_empty() {
            return Err(Error::Catalog("catalog defines no species".to_string()));
        }

        let mut entries = BTreeMap::new();
        for entry in file.species {
            if entry.name.trim().is_empty() {
                return Err(Error::Catalog(format!(
                    "species with index {} has an empty name",
                    entry.index
                )));
            }
            let index = entry.index;
            if entries
                .insert(index, SpeciesInfo::new(entry.name, entry.description))
                .is_some()
            {
                return Err(Error::Catalog(format!("duplicate species index {}", index)));
            }
        }
        Ok(Self::new(entries))
    }

    /// Load a TOML catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml(&text)?;
        debug!(
            "Loaded species catalog from {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Exact lookup
    pub fn get(&self, index: usize) -> Option<&SpeciesInfo> {
        self.entries.get(&index)
    }

    /// Lookup that falls back to the `UNKNOWN` sentinel
    pub fn resolve(&self, index: usize) -> &SpeciesInfo {
        self.entries.get(&index).unwrap_or(&self.unknown)
    }

    /// Class indices in `classes` that have no entry
    pub fn missing(&self, classes: &[usize]) -> Vec<usize> {
        classes
            .iter()
            .copied()
            .filter(|index| !self.entries.contains_key(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
