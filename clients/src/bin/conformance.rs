//! `structura-conformance`: validates generated artifacts against the
//! standards they target and against each other.
//!
//! Runs the conformance suite across:
//! - XML Schema (well-formedness, reference closure, root elements)
//! - SPARQL query (prefix closure, template/pattern agreement)
//! - Lifting and lowering stylesheets (XSLT 2.0, template calls)
//! - Cross-artifact agreement (roots, templates, binding names)
//!
//! **Usage:**
//! ```
//! structura-conformance --model <json> [--artifacts <dir>] [--config <toml>]
//! structura-conformance --fixtures
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Result};
use clap::Parser;
use structura_clients::LoggingArgs;
use structura_conformance::{run_all, run_fixtures, ArtifactPaths};

/// Run the Structura conformance suite.
#[derive(Parser)]
#[command(
    name = "structura-conformance",
    version,
    about = "Validate generated Structura artifacts"
)]
struct Args {
    /// Structure Model JSON the artifacts were generated from.
    #[arg(long, value_name = "FILE", required_unless_present = "fixtures")]
    model: Option<PathBuf>,

    /// Directory holding the generated artifacts.
    #[arg(long, default_value = "out")]
    artifacts: PathBuf,

    /// Generator configuration (TOML) the artifacts were generated with.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the built-in fixtures instead of an output directory.
    #[arg(long, conflicts_with = "model")]
    fixtures: bool,

    #[command(flatten)]
    logging: LoggingArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.logging.init();

    let report = if args.fixtures {
        run_fixtures()?
    } else {
        let Some(model) = args.model else {
            bail!("--model is required");
        };
        run_all(&ArtifactPaths {
            model,
            artifacts: args.artifacts,
            config: args.config,
        })?
    };

    println!("Structura Conformance Report");
    println!("============================");
    println!();
    for result in &report.results {
        println!("{result}");
    }

    let failed = report.failure_count();
    let warned = report.warning_count();
    let passed = report.results.len() - failed - warned;
    println!();
    println!("Summary: {passed} passed, {warned} warnings, {failed} failed");

    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
