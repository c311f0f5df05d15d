//! Structura conformance suite.
//!
//! Validates the artifacts generated from one Structure Model against the
//! standards they target and against each other.
//!
//! # Conformance Scope
//!
//! | Artifact | Checks |
//! |----------|--------|
//! | XML Schema | XML 1.0 well-formedness, QName reference closure, one global element per root |
//! | SPARQL query | prefix closure, CONSTRUCT template ↔ WHERE agreement, SELECT projection |
//! | Lifting / lowering | XML 1.0 well-formedness, XSLT 2.0 document element, template calls |
//! | All | lifting roots ↔ schema roots, lifting ↔ lowering templates, binding names |
//!
//! # Entry Point
//!
//! ```no_run
//! use structura_conformance::{run_all, ArtifactPaths};
//! use std::path::PathBuf;
//!
//! let paths = ArtifactPaths {
//!     model: PathBuf::from("model.json"),
//!     artifacts: PathBuf::from("out"),
//!     config: None,
//! };
//! let report = run_all(&paths).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod tests;
pub mod validators;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use structura_codegen::config::GeneratorConfig;
use structura_codegen::{generate_artifact, ErrorKind, GenerationInput};
use structura_model::{GeneratorKind, StructureModel};

pub use report::{ConformanceReport, Severity, TestResult};

/// Paths required by the conformance runner.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Structure Model JSON the artifacts were generated from.
    pub model: PathBuf,
    /// Directory holding the generated artifacts.
    pub artifacts: PathBuf,
    /// Generator configuration used; defaults apply when `None`.
    pub config: Option<PathBuf>,
}

/// The artifacts of one model, each possibly absent.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    schema: Option<String>,
    query: Option<String>,
    lifting: Option<String>,
    lowering: Option<String>,
}

impl ArtifactSet {
    fn slot(&mut self, kind: GeneratorKind) -> &mut Option<String> {
        match kind {
            GeneratorKind::XmlSchema => &mut self.schema,
            GeneratorKind::Sparql => &mut self.query,
            GeneratorKind::XsltLifting => &mut self.lifting,
            GeneratorKind::XsltLowering => &mut self.lowering,
        }
    }

    /// Returns the text of an artifact.
    pub fn get(&self, kind: GeneratorKind) -> Option<&str> {
        match kind {
            GeneratorKind::XmlSchema => self.schema.as_deref(),
            GeneratorKind::Sparql => self.query.as_deref(),
            GeneratorKind::XsltLifting => self.lifting.as_deref(),
            GeneratorKind::XsltLowering => self.lowering.as_deref(),
        }
    }

    /// Sets the text of an artifact.
    pub fn insert(&mut self, kind: GeneratorKind, text: String) {
        *self.slot(kind) = Some(text);
    }

    /// Reads the artifacts from `dir`, named by the output configuration.
    /// Missing files are left absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read.
    pub fn load(dir: &Path, config: &GeneratorConfig) -> Result<Self> {
        let mut set = Self::default();
        for kind in GeneratorKind::ALL {
            let path = dir.join(config.output.file_name(kind));
            if !path.exists() {
                log::warn!("{} not found", path.display());
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            set.insert(kind, text);
        }
        Ok(set)
    }
}

/// Runs every validator over an artifact set.
///
/// # Errors
///
/// Returns an error only if a validator pattern fails to compile.
pub fn validate_set(
    model: &StructureModel,
    config: &GeneratorConfig,
    artifacts: &ArtifactSet,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    report.extend(validators::xml::validate(artifacts));
    if let Some(schema) = artifacts.get(GeneratorKind::XmlSchema) {
        report.extend(validators::schema::validate(schema, model));
    }
    if let Some(query) = artifacts.get(GeneratorKind::Sparql) {
        report.extend(validators::sparql::validate(query, &config.bindings)?);
    }
    report.extend(validators::consistency::validate(artifacts, &config.bindings));
    Ok(report)
}

/// Runs all conformance validators over a generated output directory.
///
/// A missing artifact is a failure.
///
/// # Errors
///
/// Returns an error if the model, the configuration or an artifact cannot be
/// read.
pub fn run_all(paths: &ArtifactPaths) -> Result<ConformanceReport> {
    let model = StructureModel::from_path(&paths.model)
        .with_context(|| format!("Failed to load model {}", paths.model.display()))?;
    let config = match &paths.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let artifacts = ArtifactSet::load(&paths.artifacts, &config)?;

    let mut report = ConformanceReport::new();
    for kind in GeneratorKind::ALL {
        if artifacts.get(kind).is_none() {
            report.push(TestResult::fail(
                format!("artifacts/{}", kind.as_str()),
                format!("{} not found", config.output.file_name(kind)),
            ));
        }
    }
    report.extend(validate_set(&model, &config, &artifacts)?);
    Ok(report)
}

/// Generates every artifact of each built-in fixture in memory and validates
/// the results. Artifacts a fixture lists as refused must fail to generate.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn run_fixtures() -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let config = GeneratorConfig::default();
    for fixture in tests::fixtures::ALL {
        let model = StructureModel::from_json_str(fixture.json)
            .with_context(|| format!("Failed to parse fixture {}", fixture.name))?;
        let input = GenerationInput::new(&model, &[], &config);
        let mut artifacts = ArtifactSet::default();
        for kind in GeneratorKind::ALL {
            let validator = format!("fixtures/{}/{}", fixture.name, kind.as_str());
            let refused = fixture.refused.contains(&kind);
            match (generate_artifact(kind, &input), refused) {
                (Ok(text), false) => artifacts.insert(kind, text),
                (Err(e), true) if e.kind() == ErrorKind::UnsupportedCombination => {
                    report.push(TestResult::pass(validator, format!("refused: {e}")));
                }
                (Err(e), true) => {
                    report.push(TestResult::fail(
                        validator,
                        format!(
                            "refused with a {:?} error, expected an unsupported combination: {e}",
                            e.kind()
                        ),
                    ));
                }
                (Ok(_), true) => {
                    report.push(TestResult::fail(validator, "generated, expected a refusal"));
                }
                (Err(e), false) => {
                    report.push(TestResult::fail(validator, format!("generation failed: {e}")));
                }
            }
        }
        for mut result in validate_set(&model, &config, &artifacts)?.results {
            result.validator = format!("fixtures/{}/{}", fixture.name, result.validator);
            report.push(result);
        }
    }
    Ok(report)
}
