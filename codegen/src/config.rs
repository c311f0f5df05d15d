//! Generator configuration, read from TOML.
//!
//! ```toml
//! [extraction.root]
//! type = true
//!
//! [extraction.other]
//! group = true
//!
//! [sparql]
//! form = "select"
//!
//! [bindings]
//! subject = "subject"
//!
//! [output]
//! base-address = "https://example.org/spec-a/"
//! ```
//!
//! Every key is optional; a missing file means [`GeneratorConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use structura_model::GeneratorKind;

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML of the expected shape.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// All generator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema extraction toggles.
    pub extraction: Extraction,
    /// Extraction query settings.
    pub sparql: SparqlConfig,
    /// Names of the subject/predicate/object bindings shared by the query and lowering.
    pub bindings: BindingNames,
    /// Artifact file names and public addresses.
    pub output: OutputConfig,
}

/// Group/type extraction toggles for root classes and for all other classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Extraction {
    /// Toggles applied to root candidates.
    pub root: ExtractionToggle,
    /// Toggles applied to every other class.
    pub other: ExtractionToggle,
}

/// Whether a class content model is extracted into a named group or type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionToggle {
    /// Emit the members as a named `xs:group`.
    pub group: bool,
    /// Emit the content model as a named `xs:complexType`. Wins over `group`.
    #[serde(rename = "type")]
    pub named_type: bool,
}

/// Query settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparqlConfig {
    /// Query form.
    pub form: QueryForm,
}

/// The form of the extraction query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryForm {
    /// `CONSTRUCT { … } WHERE { … }`.
    #[default]
    Construct,
    /// `SELECT DISTINCT ?s ?p ?o WHERE { … }`.
    Select,
}

/// Names of the three result bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingNames {
    /// Subject binding, default `s`.
    pub subject: String,
    /// Predicate binding, default `p`.
    pub predicate: String,
    /// Object binding, default `o`.
    pub object: String,
}

impl Default for BindingNames {
    fn default() -> Self {
        Self {
            subject: "s".to_string(),
            predicate: "p".to_string(),
            object: "o".to_string(),
        }
    }
}

/// Output naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Public address prefix of this specification's artifacts.
    pub base_address: String,
    /// XML Schema file name.
    pub schema_file: String,
    /// Extraction query file name.
    pub query_file: String,
    /// Lifting stylesheet file name.
    pub lifting_file: String,
    /// Lowering stylesheet file name.
    pub lowering_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_address: String::new(),
            schema_file: "schema.xsd".to_string(),
            query_file: "query.sparql".to_string(),
            lifting_file: "lifting.xslt".to_string(),
            lowering_file: "lowering.xslt".to_string(),
        }
    }
}

impl OutputConfig {
    /// Returns the file name of an artifact.
    #[must_use]
    pub fn file_name(&self, kind: GeneratorKind) -> &str {
        match kind {
            GeneratorKind::XmlSchema => &self.schema_file,
            GeneratorKind::Sparql => &self.query_file,
            GeneratorKind::XsltLifting => &self.lifting_file,
            GeneratorKind::XsltLowering => &self.lowering_file,
        }
    }

    /// Returns the public address an artifact will be published at.
    #[must_use]
    pub fn public_address(&self, kind: GeneratorKind) -> String {
        format!("{}{}", self.base_address, self.file_name(kind))
    }
}

impl GeneratorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on syntax errors or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
