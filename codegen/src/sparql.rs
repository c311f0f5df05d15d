//! SPARQL extraction query generator.
//!
//! The query is first built as a small pattern tree ([`ExtractionQuery`])
//! and then rendered in the configured [`QueryForm`]. Variables are numbered
//! `v0, v1, …` in generation order and IRIs are shortened with a prefix table
//! allocated in first-seen order.

use std::fmt::Write as FmtWrite;

use structura_model::iris::RDF_TYPE;
use structura_model::Class;

use crate::config::{BindingNames, QueryForm};
use crate::error::{GenerationError, Result};
use crate::graph;
use crate::namespaces::PrefixTable;
use crate::types::{ResolvedShape, TypeResolver};
use crate::GenerationInput;

/// Name of the row selector variable of the `SELECT` form.
const TRIPLE_SELECTOR: &str = "triple";

/// Generates the extraction query of a model in the configured form.
///
/// # Errors
///
/// Returns [`GenerationError::RecursiveModel`] if the class graph has a
/// cycle, or any resolution error of the model.
pub fn generate(input: &GenerationInput<'_>) -> Result<String> {
    let query = build(input)?;
    Ok(query.render(input.config.sparql.form, &input.config.bindings))
}

/// Builds the pattern tree of the extraction query.
///
/// # Errors
///
/// Fails like [`generate`].
pub fn build(input: &GenerationInput<'_>) -> Result<ExtractionQuery> {
    let resolver = TypeResolver::new(input.model);
    graph::check_acyclic(&resolver)?;
    let mut builder = QueryBuilder {
        resolver,
        prefixes: PrefixTable::new("ns"),
        next_variable: 0,
        template: Vec::new(),
    };
    let pattern = builder.roots()?;
    log::debug!(
        "query: {} variables, {} template triples",
        builder.next_variable,
        builder.template.len()
    );
    Ok(ExtractionQuery {
        prefixes: builder
            .prefixes
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string()))
            .collect(),
        template: builder.template,
        pattern,
        variable_count: builder.next_variable,
    })
}

/// A term of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `?vN`.
    Variable(usize),
    /// A rendered IRI, prefixed (`ns0:name`) or full (`<…>`).
    Iri(String),
    /// `rdf:type`, rendered `a` in a `CONSTRUCT` template.
    Type(String),
}

impl Term {
    fn render(&self, in_template: bool) -> String {
        match self {
            Term::Variable(n) => format!("?v{n}"),
            Term::Iri(iri) => iri.clone(),
            Term::Type(_) if in_template => "a".to_string(),
            Term::Type(iri) => iri.clone(),
        }
    }
}

/// One triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Subject.
    pub subject: Term,
    /// Predicate.
    pub predicate: Term,
    /// Object.
    pub object: Term,
}

impl Triple {
    fn render(&self, in_template: bool) -> String {
        format!(
            "{} {} {} .",
            self.subject.render(in_template),
            self.predicate.render(in_template),
            self.object.render(in_template)
        )
    }
}

/// A node of the `WHERE` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A required triple.
    Triple(Triple),
    /// `OPTIONAL { … }`.
    Optional(Vec<Pattern>),
    /// `{ … } UNION { … }`.
    Union(Vec<Vec<Pattern>>),
}

/// The extraction query before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionQuery {
    /// `(prefix, namespace)` pairs in allocation order.
    pub prefixes: Vec<(String, String)>,
    /// Every triple of the pattern tree, flattened in pattern order.
    pub template: Vec<Triple>,
    /// The `WHERE` tree.
    pub pattern: Vec<Pattern>,
    /// Number of allocated variables.
    pub variable_count: usize,
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_patterns(out: &mut String, patterns: &[Pattern], depth: usize) {
    for pattern in patterns {
        match pattern {
            Pattern::Triple(triple) => {
                indent(out, depth);
                out.push_str(&triple.render(false));
                out.push('\n');
            }
            Pattern::Optional(inner) => {
                indent(out, depth);
                out.push_str("OPTIONAL {\n");
                render_patterns(out, inner, depth + 1);
                indent(out, depth);
                out.push_str("}\n");
            }
            Pattern::Union(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        indent(out, depth);
                        out.push_str("UNION\n");
                    }
                    indent(out, depth);
                    out.push_str("{\n");
                    render_patterns(out, branch, depth + 1);
                    indent(out, depth);
                    out.push_str("}\n");
                }
            }
        }
    }
}

impl ExtractionQuery {
    /// Renders the query.
    #[must_use]
    pub fn render(&self, form: QueryForm, bindings: &BindingNames) -> String {
        let mut out = String::new();
        for (prefix, namespace) in &self.prefixes {
            let _ = writeln!(out, "PREFIX {prefix}: <{namespace}>");
        }
        if !self.prefixes.is_empty() {
            out.push('\n');
        }
        match form {
            QueryForm::Construct => {
                out.push_str("CONSTRUCT {\n");
                for triple in &self.template {
                    indent(&mut out, 1);
                    out.push_str(&triple.render(true));
                    out.push('\n');
                }
                out.push_str("}\nWHERE {\n");
                render_patterns(&mut out, &self.pattern, 1);
                out.push_str("}\n");
            }
            QueryForm::Select => {
                let _ = writeln!(
                    out,
                    "SELECT DISTINCT ?{} ?{} ?{}",
                    bindings.subject, bindings.predicate, bindings.object
                );
                out.push_str("WHERE {\n");
                render_patterns(&mut out, &self.pattern, 1);
                self.render_projection(&mut out, bindings);
                out.push_str("}\n");
            }
        }
        out
    }

    /// Binds the n-th template triple to the subject/predicate/object
    /// variables for `?triple = n`.
    fn render_projection(&self, out: &mut String, bindings: &BindingNames) {
        if self.template.is_empty() {
            return;
        }
        indent(out, 1);
        let indices: Vec<String> = (0..self.template.len()).map(|i| i.to_string()).collect();
        let _ = writeln!(out, "VALUES ?{TRIPLE_SELECTOR} {{ {} }}", indices.join(" "));
        let positions: [(&str, fn(&Triple) -> &Term); 3] = [
            (bindings.subject.as_str(), |t| &t.subject),
            (bindings.predicate.as_str(), |t| &t.predicate),
            (bindings.object.as_str(), |t| &t.object),
        ];
        for (name, select) in positions {
            let mut terms = self.template.iter().map(|t| select(t).render(false)).rev();
            let mut expr = terms.next().unwrap_or_default();
            for (i, term) in terms.enumerate() {
                let index = self.template.len() - 2 - i;
                expr = format!("IF(?{TRIPLE_SELECTOR} = {index}, {term}, {expr})");
            }
            indent(out, 1);
            let _ = writeln!(out, "BIND({expr} AS ?{name})");
        }
        indent(out, 1);
        let _ = writeln!(
            out,
            "FILTER(BOUND(?{}) && BOUND(?{}))",
            bindings.subject, bindings.object
        );
    }
}

struct QueryBuilder<'a> {
    resolver: TypeResolver<'a>,
    prefixes: PrefixTable,
    next_variable: usize,
    template: Vec<Triple>,
}

impl<'a> QueryBuilder<'a> {
    fn variable(&mut self) -> Term {
        let n = self.next_variable;
        self.next_variable += 1;
        Term::Variable(n)
    }

    fn iri(&mut self, iri: &str) -> String {
        self.prefixes
            .qualify(iri)
            .unwrap_or_else(|| format!("<{iri}>"))
    }

    fn triple(&mut self, subject: Term, predicate: Term, object: Term) -> Pattern {
        let triple = Triple {
            subject,
            predicate,
            object,
        };
        self.template.push(triple.clone());
        Pattern::Triple(triple)
    }

    fn roots(&mut self) -> Result<Vec<Pattern>> {
        let model = self.resolver.model();
        let mut branches = Vec::new();
        for group in &model.roots {
            let subject = self.variable();
            let candidates = group
                .classes
                .iter()
                .map(|c| self.resolver.class(c, &model.psm_iri))
                .collect::<Result<Vec<_>>>()?;
            let optional_type = candidates.len() > 1;
            let mut patterns = Vec::new();
            if let [class] = *candidates.as_slice() {
                self.class_patterns(&subject, class, optional_type, &mut patterns)?;
            } else {
                let mut union = Vec::new();
                for class in candidates {
                    let mut branch = Vec::new();
                    self.class_patterns(&subject, class, optional_type, &mut branch)?;
                    union.push(branch);
                }
                patterns.push(Pattern::Union(union));
            }
            branches.push(patterns);
        }
        Ok(match branches.len() {
            1 => branches.pop().unwrap_or_default(),
            _ => vec![Pattern::Union(branches)],
        })
    }

    fn class_patterns(
        &mut self,
        subject: &Term,
        class: &'a Class,
        optional_type: bool,
        out: &mut Vec<Pattern>,
    ) -> Result<()> {
        if let Some(cim) = &class.cim_iri {
            let predicate = Term::Type(self.iri(RDF_TYPE));
            let object = Term::Iri(self.iri(cim));
            let triple = self.triple(subject.clone(), predicate, object);
            out.push(if optional_type {
                Pattern::Optional(vec![triple])
            } else {
                triple
            });
        }
        for property in self.resolver.effective_properties(class)? {
            let shape = self.resolver.resolve(property)?;
            if property.is_reverse && matches!(shape, ResolvedShape::Primitive(_)) {
                return Err(GenerationError::ReversePrimitive {
                    property: property.psm_iri.clone(),
                });
            }
            let value = self.variable();
            let predicate = Term::Iri(self.iri(&property.cim_iri));
            let mut group = Vec::new();
            group.push(if property.is_reverse {
                self.triple(value.clone(), predicate, subject.clone())
            } else {
                self.triple(subject.clone(), predicate, value.clone())
            });
            match shape {
                ResolvedShape::Primitive(_) => {}
                ResolvedShape::SingleClass(target) => {
                    // Nested type triples are optional only for a single candidate.
                    self.class_patterns(&value, target, true, &mut group)?;
                }
                ResolvedShape::Choice(plan) => {
                    let optional_type = plan.candidates.len() == 1;
                    let mut union = Vec::new();
                    for candidate in plan.candidates {
                        let mut branch = Vec::new();
                        self.class_patterns(&value, candidate, optional_type, &mut branch)?;
                        union.push(branch);
                    }
                    group.push(Pattern::Union(union));
                }
            }
            if property.is_optional() {
                out.push(Pattern::Optional(group));
            } else {
                out.extend(group);
            }
        }
        Ok(())
    }
}
