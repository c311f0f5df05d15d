//! Artifact manifests of sibling specifications.
//!
//! The Import Resolver consults these to find a compatible artifact when a
//! class belongs to another specification.

use serde::{Deserialize, Serialize};

/// The generator family that produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// XML Schema.
    XmlSchema,
    /// SPARQL extraction query.
    Sparql,
    /// XSLT lifting (XML → RDF).
    XsltLifting,
    /// XSLT lowering (SPARQL results → XML).
    XsltLowering,
}

impl GeneratorKind {
    /// All generator kinds in orchestration order.
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::XmlSchema,
        GeneratorKind::Sparql,
        GeneratorKind::XsltLifting,
        GeneratorKind::XsltLowering,
    ];

    /// Returns the identifier used in manifests and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::XmlSchema => "xml-schema",
            GeneratorKind::Sparql => "sparql",
            GeneratorKind::XsltLifting => "xslt-lifting",
            GeneratorKind::XsltLowering => "xslt-lowering",
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published artifact of a specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    /// Generator that produced the artifact.
    pub generator: GeneratorKind,
    /// `psmIri` of the Structure Model the artifact was generated from.
    pub source_model: String,
    /// Public address (absolute URL or site-relative path).
    pub public_address: String,
    /// Target namespace of the artifact, if it has one.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Prefix conventionally bound to [`ArtifactDescriptor::namespace`].
    #[serde(default)]
    pub namespace_prefix: Option<String>,
}

/// The artifact list of one specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationManifest {
    /// Specification identifier, matched against `owningSpecification`.
    pub id: String,
    /// Published artifacts.
    #[serde(default)]
    pub artifacts: Vec<ArtifactDescriptor>,
}

impl SpecificationManifest {
    /// Finds the artifact of `generator` kind generated from `source_model`.
    #[must_use]
    pub fn find_artifact(
        &self,
        generator: GeneratorKind,
        source_model: &str,
    ) -> Option<&ArtifactDescriptor> {
        self.artifacts
            .iter()
            .find(|a| a.generator == generator && a.source_model == source_model)
    }
}
