//! Cross-artifact agreement.
//!
//! The four artifacts of one model are used together, so they must agree:
//! - lifting root rules match exactly the schema's global elements
//! - lifting and lowering define templates for the same classes
//! - every called template is defined, or the stylesheet imports others
//! - the lowering parameters default to the configured binding names

use std::collections::BTreeSet;

use roxmltree::{Document, Node};
use structura_codegen::config::BindingNames;
use structura_model::iris::{XSLT_NS, XS_NS};
use structura_model::GeneratorKind;

use crate::report::{ConformanceReport, TestResult};
use crate::ArtifactSet;

/// Checks the artifacts present in the set against each other.
pub fn validate(artifacts: &ArtifactSet, bindings: &BindingNames) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let parse = |kind| artifacts.get(kind).and_then(|t| Document::parse(t).ok());
    let schema = parse(GeneratorKind::XmlSchema);
    let lifting = parse(GeneratorKind::XsltLifting);
    let lowering = parse(GeneratorKind::XsltLowering);

    if let (Some(schema), Some(lifting)) = (&schema, &lifting) {
        report.push(root_rules(schema, lifting));
    }
    if let (Some(lifting), Some(lowering)) = (&lifting, &lowering) {
        report.push(template_sets(lifting, lowering));
    }
    for (kind, doc) in [
        (GeneratorKind::XsltLifting, &lifting),
        (GeneratorKind::XsltLowering, &lowering),
    ] {
        if let Some(doc) = doc {
            report.push(calls(kind, doc));
        }
    }
    if let Some(lowering) = &lowering {
        report.push(parameters(lowering, bindings));
    }
    report
}

fn top_level<'a, 'i>(doc: &'a Document<'i>, ns: &'a str, name: &'a str) -> impl Iterator<Item = Node<'a, 'i>> {
    doc.root_element()
        .children()
        .filter(move |n| n.has_tag_name((ns, name)))
}

fn root_rules(schema: &Document<'_>, lifting: &Document<'_>) -> TestResult {
    let elements: BTreeSet<&str> = top_level(schema, XS_NS, "element")
        .filter_map(|n| n.attribute("name"))
        .collect();
    let rules: BTreeSet<&str> = top_level(lifting, XSLT_NS, "template")
        .filter_map(|n| n.attribute("match"))
        .filter_map(|m| m.strip_prefix('/'))
        .filter(|m| !m.is_empty())
        .map(|m| m.rsplit(':').next().unwrap_or(m))
        .collect();
    if elements == rules {
        TestResult::pass(
            "consistency/roots",
            format!("{} root elements have lifting rules", elements.len()),
        )
    } else {
        let mut details: Vec<String> = elements
            .difference(&rules)
            .map(|e| format!("{e}: no lifting rule"))
            .collect();
        details.extend(rules.difference(&elements).map(|r| format!("{r}: no schema element")));
        TestResult::fail("consistency/roots", "lifting rules and schema roots differ")
            .with_details(details)
    }
}

/// Names of the class templates, which all start with `_`.
fn class_templates<'a>(doc: &'a Document<'_>) -> BTreeSet<&'a str> {
    top_level(doc, XSLT_NS, "template")
        .filter_map(|n| n.attribute("name"))
        .filter(|name| name.starts_with('_'))
        .collect()
}

fn template_sets(lifting: &Document<'_>, lowering: &Document<'_>) -> TestResult {
    let lifted = class_templates(lifting);
    let lowered = class_templates(lowering);
    if lifted == lowered {
        TestResult::pass(
            "consistency/templates",
            format!("{} class templates in both stylesheets", lifted.len()),
        )
    } else {
        let mut details: Vec<String> = lifted
            .difference(&lowered)
            .map(|t| format!("{t}: lifting only"))
            .collect();
        details.extend(lowered.difference(&lifted).map(|t| format!("{t}: lowering only")));
        TestResult::fail(
            "consistency/templates",
            "lifting and lowering cover different classes",
        )
        .with_details(details)
    }
}

fn calls(kind: GeneratorKind, doc: &Document<'_>) -> TestResult {
    let validator = format!("consistency/calls/{}", kind.as_str());
    let defined: BTreeSet<&str> = top_level(doc, XSLT_NS, "template")
        .filter_map(|n| n.attribute("name"))
        .collect();
    let imports = top_level(doc, XSLT_NS, "import").count();
    let missing: BTreeSet<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((XSLT_NS, "call-template")))
        .filter_map(|n| n.attribute("name"))
        .filter(|name| !defined.contains(name))
        .collect();
    let details: Vec<String> = missing.iter().map(|m| (*m).to_string()).collect();
    if missing.is_empty() {
        TestResult::pass(validator, format!("{} templates, all calls resolve", defined.len()))
    } else if imports > 0 {
        TestResult::warn(
            validator,
            format!("{} calls resolve only through {imports} imported stylesheets", missing.len()),
        )
        .with_details(details)
    } else {
        TestResult::fail(validator, "calls to undefined templates").with_details(details)
    }
}

fn parameters(lowering: &Document<'_>, bindings: &BindingNames) -> TestResult {
    let mut problems = Vec::new();
    for (name, expected) in [
        ("subj", &bindings.subject),
        ("pred", &bindings.predicate),
        ("obj", &bindings.object),
    ] {
        let default = top_level(lowering, XSLT_NS, "param")
            .find(|n| n.attribute("name") == Some(name))
            .and_then(|n| n.attribute("select"));
        let quoted = format!("'{expected}'");
        match default {
            Some(select) if select == quoted => {}
            Some(select) => problems.push(format!("{name}: defaults to {select}, expected {quoted}")),
            None => problems.push(format!("{name}: not declared")),
        }
    }
    if problems.is_empty() {
        TestResult::pass("consistency/bindings", "lowering parameters match the bindings")
    } else {
        TestResult::fail("consistency/bindings", "lowering parameters differ from the bindings")
            .with_details(problems)
    }
}
