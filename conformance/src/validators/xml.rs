//! XML well-formedness validator.
//!
//! Every XML artifact must parse. Stylesheets must have an XSLT 2.0
//! `xsl:stylesheet` document element.

use structura_model::iris::XSLT_NS;
use structura_model::GeneratorKind;

use crate::report::{ConformanceReport, TestResult};
use crate::ArtifactSet;

const VALIDATOR: &str = "xml";

/// Parses every XML artifact present in the set.
pub fn validate(artifacts: &ArtifactSet) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for kind in [
        GeneratorKind::XmlSchema,
        GeneratorKind::XsltLifting,
        GeneratorKind::XsltLowering,
    ] {
        if let Some(text) = artifacts.get(kind) {
            report.push(check(kind, text));
        }
    }
    report
}

fn check(kind: GeneratorKind, text: &str) -> TestResult {
    let validator = format!("{VALIDATOR}/{}", kind.as_str());
    let doc = match roxmltree::Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => return TestResult::fail(validator, format!("not well-formed: {e}")),
    };
    let root = doc.root_element();
    if kind == GeneratorKind::XmlSchema {
        return TestResult::pass(
            validator,
            format!("well-formed ({} elements)", doc.descendants().filter(|n| n.is_element()).count()),
        );
    }
    if !root.has_tag_name((XSLT_NS, "stylesheet")) {
        return TestResult::fail(
            validator,
            format!("document element is {:?}, not xsl:stylesheet", root.tag_name().name()),
        );
    }
    match root.attribute("version") {
        Some("2.0") => TestResult::pass(validator, "well-formed XSLT 2.0 stylesheet"),
        other => TestResult::fail(validator, format!("stylesheet version is {other:?}, not 2.0")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_markup_fails() {
        let mut set = ArtifactSet::default();
        set.insert(GeneratorKind::XmlSchema, "<xs:schema>".to_string());
        let report = validate(&set);
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn stylesheets_need_version_two() {
        let mut set = ArtifactSet::default();
        set.insert(
            GeneratorKind::XsltLifting,
            format!(r#"<xsl:stylesheet version="1.0" xmlns:xsl="{XSLT_NS}"/>"#),
        );
        set.insert(
            GeneratorKind::XsltLowering,
            format!(r#"<xsl:stylesheet version="2.0" xmlns:xsl="{XSLT_NS}"/>"#),
        );
        let report = validate(&set);
        assert_eq!(report.failure_count(), 1);
        assert!(report.results[0].message.contains("1.0"));
    }
}
