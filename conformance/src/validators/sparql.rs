//! SPARQL extraction query validator.
//!
//! - every prefixed name uses a declared prefix
//! - in the CONSTRUCT form, the template and the WHERE pattern contain the
//!   same triples, with `a` read as `rdf:type`
//! - in the SELECT form, the projection uses the configured binding names

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use regex::Regex;
use structura_codegen::config::BindingNames;
use structura_model::iris::RDF_TYPE;

use crate::report::{ConformanceReport, TestResult};

/// Validates a generated query.
///
/// # Errors
///
/// Returns an error only if a pattern fails to compile.
pub fn validate(query: &str, bindings: &BindingNames) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let prefixes = declared_prefixes(query)?;
    report.push(prefix_closure(query, &prefixes)?);
    if query.contains("CONSTRUCT {") {
        report.push(construct_agreement(query, &prefixes)?);
    } else if query.contains("SELECT") {
        report.push(select_projection(query, bindings));
    } else {
        report.push(TestResult::fail(
            "sparql/form",
            "query is neither CONSTRUCT nor SELECT",
        ));
    }
    Ok(report)
}

fn declared_prefixes(query: &str) -> Result<HashMap<String, String>> {
    let re = Regex::new(r"(?m)^PREFIX\s+([A-Za-z][\w-]*)?:\s*<([^>]*)>")?;
    Ok(re
        .captures_iter(query)
        .map(|c| {
            let prefix = c.get(1).map_or("", |m| m.as_str());
            (prefix.to_string(), c[2].to_string())
        })
        .collect())
}

fn prefix_closure(query: &str, prefixes: &HashMap<String, String>) -> Result<TestResult> {
    let iri = Regex::new(r"<[^<>\s]*>")?;
    let body = iri.replace_all(query, "<>");
    let used = Regex::new(r"(?m)(?:^|[\s({,;])([A-Za-z][\w-]*)?:[A-Za-z_]")?;
    let mut undeclared = BTreeSet::new();
    let mut count = 0;
    for line in body.lines().filter(|l| !l.starts_with("PREFIX")) {
        for caps in used.captures_iter(line) {
            count += 1;
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            if !prefixes.contains_key(prefix) {
                undeclared.insert(format!("{prefix}:"));
            }
        }
    }
    Ok(if undeclared.is_empty() {
        TestResult::pass(
            "sparql/prefixes",
            format!("{count} prefixed names over {} prefixes", prefixes.len()),
        )
    } else {
        TestResult::fail("sparql/prefixes", "undeclared prefixes")
            .with_details(undeclared.into_iter().collect())
    })
}

/// Expands a term to a comparable form: full IRIs for names, `?v` as is.
fn expand(term: &str, prefixes: &HashMap<String, String>) -> String {
    if term == "a" {
        return RDF_TYPE.to_string();
    }
    if let Some(iri) = term.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return iri.to_string();
    }
    if let Some((prefix, local)) = term.split_once(':') {
        if let Some(ns) = prefixes.get(prefix) {
            return format!("{ns}{local}");
        }
    }
    term.to_string()
}

fn triples(
    block: &str,
    line: &Regex,
    prefixes: &HashMap<String, String>,
) -> BTreeSet<(String, String, String)> {
    block
        .lines()
        .filter_map(|l| line.captures(l))
        .map(|c| {
            (
                expand(&c[1], prefixes),
                expand(&c[2], prefixes),
                expand(&c[3], prefixes),
            )
        })
        .collect()
}

fn construct_agreement(query: &str, prefixes: &HashMap<String, String>) -> Result<TestResult> {
    let (Some(start), Some(where_at)) = (query.find("CONSTRUCT {"), query.find("\nWHERE {")) else {
        return Ok(TestResult::fail(
            "sparql/construct",
            "missing CONSTRUCT template or WHERE pattern",
        ));
    };
    let line = Regex::new(r"^\s*(\S+) (\S+) (\S+) \.$")?;
    let template = triples(&query[start..where_at], &line, prefixes);
    let pattern = triples(&query[where_at..], &line, prefixes);
    if template == pattern {
        return Ok(TestResult::pass(
            "sparql/construct",
            format!("template and pattern agree on {} triples", template.len()),
        ));
    }
    let mut details: Vec<String> = template
        .difference(&pattern)
        .map(|(s, p, o)| format!("template only: {s} <{p}> {o}"))
        .collect();
    details.extend(
        pattern
            .difference(&template)
            .map(|(s, p, o)| format!("pattern only: {s} <{p}> {o}")),
    );
    Ok(TestResult::fail("sparql/construct", "template and pattern differ").with_details(details))
}

fn select_projection(query: &str, bindings: &BindingNames) -> TestResult {
    let projection = format!(
        "SELECT DISTINCT ?{} ?{} ?{}",
        bindings.subject, bindings.predicate, bindings.object
    );
    if query.contains(&projection) {
        TestResult::pass("sparql/select", format!("projection is `{projection}`"))
    } else {
        TestResult::fail(
            "sparql/select",
            format!("projection does not match `{projection}`"),
        )
    }
}
