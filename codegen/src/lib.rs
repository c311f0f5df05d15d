//! Structura artifact generator.
//!
//! Reads a [`StructureModel`] and produces the four artifacts of a data
//! specification schema: an XML Schema, a SPARQL extraction query, and the
//! lifting and lowering XSLT stylesheets. Classes owned by another
//! specification are imported from the artifacts listed in that
//! specification's manifest.
//!
//! ```no_run
//! use std::path::Path;
//! use structura_codegen::{config::GeneratorConfig, generate, GenerationInput};
//! use structura_model::{GeneratorKind, StructureModel};
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = StructureModel::from_path(Path::new("person.json"))?;
//! let config = GeneratorConfig::default();
//! let input = GenerationInput::new(&model, &[], &config);
//! let report = generate(&input, Path::new("out"), &GeneratorKind::ALL)?;
//! println!("{} files", report.files.len());
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod imports;
pub mod lifting;
pub mod lowering;
pub mod mapping;
pub mod namespaces;
pub mod sparql;
pub mod types;
pub mod xsd;

use std::path::Path;

use anyhow::Context;
use structura_model::{GeneratorKind, SpecificationManifest, StructureModel};

use config::GeneratorConfig;
use emit::OutputSink;
use imports::ImportResolver;

pub use error::{ErrorKind, GenerationError, Result};

/// Everything a generator reads.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    /// The model to generate from.
    pub model: &'a StructureModel,
    /// Manifests of sibling specifications, used to resolve foreign classes.
    pub manifests: &'a [SpecificationManifest],
    /// Generator options.
    pub config: &'a GeneratorConfig,
}

impl<'a> GenerationInput<'a> {
    /// Bundles the generator inputs.
    #[must_use]
    pub fn new(
        model: &'a StructureModel,
        manifests: &'a [SpecificationManifest],
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            model,
            manifests,
            config,
        }
    }

    /// Import resolver for the artifact of `kind`, published at the address
    /// the output configuration gives it.
    pub(crate) fn import_resolver(&self, kind: GeneratorKind) -> ImportResolver<'a> {
        ImportResolver::new(
            self.model,
            self.manifests,
            kind,
            self.config.output.public_address(kind),
        )
    }
}

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of classes in the model.
    pub class_count: usize,
    /// Number of properties in the model.
    pub property_count: usize,
    /// Number of artifacts generated.
    pub artifact_count: usize,
    /// Files written, relative to the output directory.
    pub files: Vec<String>,
}

/// Generates one artifact as text.
///
/// # Errors
///
/// Returns the [`GenerationError`] of the generator of `kind`.
pub fn generate_artifact(kind: GeneratorKind, input: &GenerationInput<'_>) -> Result<String> {
    match kind {
        GeneratorKind::XmlSchema => xsd::generate(input),
        GeneratorKind::Sparql => sparql::generate(input),
        GeneratorKind::XsltLifting => lifting::generate(input),
        GeneratorKind::XsltLowering => lowering::generate(input),
    }
}

/// Generates one artifact into a sink. Nothing is written if generation
/// fails.
///
/// # Errors
///
/// Returns the generator's error, or [`GenerationError::Io`] if the sink
/// fails.
pub fn write_artifact(
    kind: GeneratorKind,
    input: &GenerationInput<'_>,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    let text = generate_artifact(kind, input)?;
    sink.write_chunk(&text)?;
    sink.close()?;
    Ok(())
}

/// Generates the artifacts of `kinds` into `out_dir`, named by the output
/// configuration.
///
/// Every artifact is generated before any file is written, so a model error
/// leaves `out_dir` untouched.
///
/// # Errors
///
/// Returns an error if any generator fails or a file cannot be written.
pub fn generate(
    input: &GenerationInput<'_>,
    out_dir: &Path,
    kinds: &[GeneratorKind],
) -> anyhow::Result<GenerationReport> {
    let mut report = GenerationReport {
        class_count: input.model.class_count(),
        property_count: input.model.property_count(),
        ..GenerationReport::default()
    };

    let mut rendered = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let text = generate_artifact(kind, input)
            .inspect_err(|e| {
                if let Some(element) = e.element() {
                    log::error!("{kind}: {:?} error at {element}", e.kind());
                }
            })
            .with_context(|| format!("Failed to generate {}", kind.as_str()))?;
        rendered.push((kind, text));
    }

    for (kind, text) in rendered {
        let file = input.config.output.file_name(kind).to_string();
        emit::write_file(&out_dir.join(&file), &text)?;
        log::info!("wrote {} ({} bytes)", file, text.len());
        report.files.push(file);
        report.artifact_count += 1;
    }
    Ok(report)
}
