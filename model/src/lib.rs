//! Structure Model for the Structura XML/RDF codec generators.
//!
//! The `structura-model` crate holds the resolved, language-agnostic tree of
//! classes and properties that the schema, query, lifting and lowering
//! generators consume, together with the artifact manifests of sibling
//! specifications used for cross-specification imports.
//!
//! # Entry Point
//!
//! ```
//! let json = r#"{
//!   "psmIri": "https://example.org/psm/schema",
//!   "owningSpecification": "spec-a",
//!   "roots": [["https://example.org/psm/Person"]],
//!   "classes": [{
//!     "psmIri": "https://example.org/psm/Person",
//!     "technicalLabel": "Person",
//!     "properties": []
//!   }]
//! }"#;
//! let model = structura_model::StructureModel::from_json_str(json).unwrap();
//! assert_eq!(model.class_count(), 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod manifest;
pub mod model;

use std::path::{Path, PathBuf};

pub use manifest::{ArtifactDescriptor, GeneratorKind, SpecificationManifest};
pub use model::{
    iris, Class, DataType, LanguageString, MaxCardinality, Property, RootGroup, StructureModel,
};

/// Failure to load a model or manifest.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON of the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn read(path: &Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl StructureModel {
    /// Parses a Structure Model from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] if the document does not match the model shape.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a Structure Model from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        Self::from_json_str(&read(path)?)
    }

    /// Serializes the model back to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SpecificationManifest {
    /// Parses a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] if the document does not match the manifest shape.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        Self::from_json_str(&read(path)?)
    }
}
