//! `structura-generate`: generates the XML Schema, SPARQL extraction query
//! and XSLT lifting/lowering stylesheets of one Structure Model.
//!
//! **Outputs** (names configurable in `[output]`):
//! - `<out>/schema.xsd`
//! - `<out>/query.sparql`
//! - `<out>/lifting.xslt`
//! - `<out>/lowering.xslt`
//!
//! **Usage:**
//! ```
//! structura-generate --model <json> [--manifests <dir>] [--config <toml>]
//!                    [--out <dir>] [--only <artifact>]...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use structura_clients::{parse_kind, LoggingArgs};
use structura_codegen::config::GeneratorConfig;
use structura_codegen::{generate, GenerationInput};
use structura_model::{GeneratorKind, SpecificationManifest, StructureModel};
use walkdir::WalkDir;

/// Generate the artifacts of a Structure Model.
#[derive(Parser)]
#[command(
    name = "structura-generate",
    version,
    about = "Generate XML Schema, SPARQL and XSLT artifacts from a Structure Model"
)]
struct Args {
    /// Structure Model JSON file.
    #[arg(long, value_name = "FILE")]
    model: PathBuf,

    /// Directory searched recursively for `*.manifest.json` sibling manifests.
    #[arg(long, value_name = "DIR")]
    manifests: Option<PathBuf>,

    /// Generator configuration (TOML). Defaults apply if absent.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Generate only this artifact (repeatable).
    #[arg(long = "only", value_name = "ARTIFACT", value_parser = parse_kind)]
    only: Vec<GeneratorKind>,

    #[command(flatten)]
    logging: LoggingArgs,
}

const MANIFEST_SUFFIX: &str = ".manifest.json";

/// Loads every manifest under `dir`. Unreadable manifests are skipped.
fn load_manifests(dir: &Path) -> Vec<SpecificationManifest> {
    let mut manifests = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        let is_manifest = entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(MANIFEST_SUFFIX));
        if !is_manifest {
            continue;
        }
        match SpecificationManifest::from_path(entry.path()) {
            Ok(manifest) => {
                log::debug!(
                    "manifest {} ({} artifacts) from {}",
                    manifest.id,
                    manifest.artifacts.len(),
                    entry.path().display()
                );
                manifests.push(manifest);
            }
            Err(e) => log::warn!("skipping manifest {}: {e}", entry.path().display()),
        }
    }
    manifests
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.logging.init();

    let model = StructureModel::from_path(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let config = match &args.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let manifests = args
        .manifests
        .as_deref()
        .map(load_manifests)
        .unwrap_or_default();
    let kinds: &[GeneratorKind] = if args.only.is_empty() {
        &GeneratorKind::ALL
    } else {
        &args.only
    };

    println!(
        "Structure Model {}: {} classes, {} properties, {} sibling manifests",
        model.psm_iri,
        model.class_count(),
        model.property_count(),
        manifests.len()
    );

    let input = GenerationInput::new(&model, &manifests, &config);
    let report = generate(&input, &args.out, kinds)?;
    for file in &report.files {
        println!("  Written: {}", args.out.join(file).display());
    }
    println!("Generated {} artifacts.", report.artifact_count);
    Ok(())
}
