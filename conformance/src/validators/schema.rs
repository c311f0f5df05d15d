//! XML Schema validator.
//!
//! Checks the generated schema against itself and the model:
//! - every QName in `type`, `ref`, `base` and `memberTypes` resolves to a
//!   built-in, an imported namespace, or a top-level declaration
//! - every root candidate has exactly one global element
//! - there are no other global elements

use std::collections::HashSet;

use roxmltree::{Document, Node};
use structura_codegen::mapping::to_ncname;
use structura_model::iris::{XML_NS, XS_NS};
use structura_model::StructureModel;

use crate::report::{ConformanceReport, TestResult};

/// Validates a generated schema.
pub fn validate(xsd: &str, model: &StructureModel) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let doc = match Document::parse(xsd) {
        Ok(doc) => doc,
        Err(e) => {
            report.push(TestResult::fail(
                "schema/structure",
                format!("schema does not parse: {e}"),
            ));
            return report;
        }
    };
    let root = doc.root_element();
    if !root.has_tag_name((XS_NS, "schema")) {
        report.push(TestResult::fail(
            "schema/structure",
            "document element is not xs:schema",
        ));
        return report;
    }
    let declarations = Declarations::collect(root);
    report.push(references(&doc, &declarations));
    report.push(root_elements(&declarations, model));
    report
}

/// Top-level declarations and imports of a schema.
struct Declarations<'a> {
    target: Option<&'a str>,
    imported: HashSet<&'a str>,
    has_include: bool,
    types: HashSet<&'a str>,
    groups: HashSet<&'a str>,
    elements: Vec<&'a str>,
}

impl<'a> Declarations<'a> {
    fn collect(root: Node<'a, '_>) -> Self {
        let mut found = Self {
            target: root.attribute("targetNamespace"),
            imported: HashSet::new(),
            has_include: false,
            types: HashSet::new(),
            groups: HashSet::new(),
            elements: Vec::new(),
        };
        for child in root.children().filter(Node::is_element) {
            let name = child.attribute("name");
            match (child.tag_name().name(), name) {
                ("import", _) => {
                    if let Some(ns) = child.attribute("namespace") {
                        found.imported.insert(ns);
                    }
                }
                ("include", _) => found.has_include = true,
                ("complexType" | "simpleType", Some(name)) => {
                    found.types.insert(name);
                }
                ("group", Some(name)) => {
                    found.groups.insert(name);
                }
                ("element", Some(name)) => found.elements.push(name),
                _ => {}
            }
        }
        found
    }
}

#[derive(Clone, Copy)]
enum Space {
    Type,
    Group,
    Element,
    Attribute,
}

fn references(doc: &Document<'_>, declarations: &Declarations<'_>) -> TestResult {
    let mut checked = 0;
    let mut unresolved = Vec::new();
    let mut unchecked = Vec::new();
    for node in doc.descendants().filter(Node::is_element) {
        if node.tag_name().namespace() != Some(XS_NS) {
            continue;
        }
        let owner = node.tag_name().name();
        let mut refs: Vec<(&str, Space)> = Vec::new();
        if let Some(qname) = node.attribute("type") {
            refs.push((qname, Space::Type));
        }
        if let Some(qname) = node.attribute("base") {
            refs.push((qname, Space::Type));
        }
        if let Some(list) = node.attribute("memberTypes") {
            refs.extend(list.split_whitespace().map(|q| (q, Space::Type)));
        }
        if let Some(qname) = node.attribute("ref") {
            let space = match owner {
                "group" => Space::Group,
                "attribute" => Space::Attribute,
                _ => Space::Element,
            };
            refs.push((qname, space));
        }
        for (qname, space) in refs {
            checked += 1;
            let (prefix, local) = match qname.split_once(':') {
                Some((p, l)) => (Some(p), l),
                None => (None, qname),
            };
            let Some(namespace) = resolve_prefix(node, prefix) else {
                unresolved.push(format!("{qname}: undeclared prefix"));
                continue;
            };
            if namespace == Some(XS_NS) || namespace == Some(XML_NS) {
                continue;
            }
            if namespace.is_some_and(|ns| declarations.imported.contains(ns)) {
                continue;
            }
            if namespace == declarations.target {
                let declared = match space {
                    Space::Type => declarations.types.contains(local),
                    Space::Group => declarations.groups.contains(local),
                    Space::Element => declarations.elements.contains(&local),
                    Space::Attribute => false,
                };
                if declared {
                    continue;
                }
            }
            if namespace.is_none() && declarations.has_include {
                unchecked.push(qname.to_string());
            } else {
                unresolved.push(qname.to_string());
            }
        }
    }
    if !unresolved.is_empty() {
        TestResult::fail(
            "schema/references",
            format!("{} of {checked} references do not resolve", unresolved.len()),
        )
        .with_details(unresolved)
    } else if !unchecked.is_empty() {
        TestResult::warn(
            "schema/references",
            format!("{} references may come from included schemas", unchecked.len()),
        )
        .with_details(unchecked)
    } else {
        TestResult::pass(
            "schema/references",
            format!("all {checked} references resolve"),
        )
    }
}

/// Resolves a prefix in scope at `node`. The outer `None` means the prefix is
/// undeclared; the inner `None` means no namespace.
fn resolve_prefix<'a>(node: Node<'a, '_>, prefix: Option<&str>) -> Option<Option<&'a str>> {
    match prefix {
        Some("xml") => Some(Some(XML_NS)),
        Some(p) => node.lookup_namespace_uri(Some(p)).map(Some),
        None => Some(node.lookup_namespace_uri(None)),
    }
}

fn root_elements(declarations: &Declarations<'_>, model: &StructureModel) -> TestResult {
    let mut expected: Vec<String> = Vec::new();
    let mut problems = Vec::new();
    for candidate in model.root_candidates() {
        let Some(class) = model.find_class(candidate) else {
            problems.push(format!("{candidate}: root candidate is not a class of the model"));
            continue;
        };
        let name = to_ncname(&class.technical_label);
        if !expected.contains(&name) {
            expected.push(name);
        }
    }
    for name in &expected {
        match declarations.elements.iter().filter(|e| **e == name.as_str()).count() {
            1 => {}
            0 => problems.push(format!("{name}: no global element")),
            n => problems.push(format!("{name}: {n} global elements")),
        }
    }
    for element in &declarations.elements {
        if !expected.iter().any(|name| name == element) {
            problems.push(format!("{element}: global element is not a root"));
        }
    }
    if problems.is_empty() {
        TestResult::pass(
            "schema/roots",
            format!("{} root elements declared once each", expected.len()),
        )
    } else {
        TestResult::fail("schema/roots", "global elements do not match the roots")
            .with_details(problems)
    }
}
