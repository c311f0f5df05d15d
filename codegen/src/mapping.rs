//! Structure Model → XML mapping tables.
//!
//! Deterministic naming functions shared by every generator, so that element
//! names, type names and template names agree across the four artifacts.

use std::collections::{HashMap, HashSet};

use structura_model::iris::*;
use structura_model::{Class, StructureModel};

/// Name of the identity element carried by every non-spliced class.
pub const IRI_ELEMENT: &str = "iri";

/// Name of the reserved language-tagged text type.
pub const LANG_STRING_TYPE: &str = "langString";

/// The XML Schema representation of a primitive datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    /// A built-in `xs:` simple type, by local name.
    Builtin(String),
    /// The reserved [`LANG_STRING_TYPE`] complex type.
    LangString,
}

/// Maps a primitive datatype IRI to its schema type.
///
/// The listed XSD types map to themselves except `dateTime`, which becomes
/// `dateTimeStamp`. Other XSD IRIs keep their local name; anything else is
/// `anySimpleType`.
#[must_use]
pub fn schema_type(iri: &str) -> SchemaType {
    let builtin = |name: &str| SchemaType::Builtin(name.to_string());
    match iri {
        RDF_LANG_STRING => SchemaType::LangString,
        XSD_BOOLEAN => builtin("boolean"),
        XSD_DATE => builtin("date"),
        XSD_TIME => builtin("time"),
        XSD_DATETIME => builtin("dateTimeStamp"),
        XSD_INTEGER => builtin("integer"),
        XSD_DECIMAL => builtin("decimal"),
        XSD_ANY_URI => builtin("anyURI"),
        XSD_STRING => builtin("string"),
        other => match other.strip_prefix(XSD) {
            Some(local) if is_ncname(local) => builtin(local),
            _ => builtin("anySimpleType"),
        },
    }
}

/// Splits an IRI into namespace and local name at the last `#` or `/`.
///
/// Returns `None` when the remainder is not usable both as an XML local name
/// and as a SPARQL prefixed-name local part.
#[must_use]
pub fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let at = iri.rfind(['#', '/'])?;
    let (namespace, local) = iri.split_at(at + 1);
    (is_ncname(local) && !local.ends_with('.')).then_some((namespace, local))
}

/// Returns true if `s` is a non-empty XML NCName (ASCII subset plus any
/// non-ASCII letter).
#[must_use]
pub fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Converts a technical label into an NCName: invalid characters become `_`,
/// and a leading digit, `-` or `.` gets an `_` in front.
#[must_use]
pub fn to_ncname(label: &str) -> String {
    let mut out: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !out.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    out
}

/// Returns the template name of a class in the lifting and lowering
/// stylesheets. Derived from the class `psmIri` so that stylesheets of
/// different specifications can call each other's templates.
#[must_use]
pub fn template_name(psm_iri: &str) -> String {
    let mut out = String::with_capacity(psm_iri.len() + 1);
    out.push('_');
    out.extend(
        psm_iri
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
    );
    out
}

/// Unique XML type names for the classes of one model.
///
/// Names are allocated in class declaration order; a technical label already
/// taken gets the smallest numeric suffix from 2 that is free. The reserved
/// names [`LANG_STRING_TYPE`] and [`IRI_ELEMENT`] are never handed out.
#[derive(Debug, Clone)]
pub struct ClassNames {
    names: HashMap<String, String>,
    taken: HashSet<String>,
}

impl ClassNames {
    /// Allocates names for every class of the model.
    #[must_use]
    pub fn new(model: &StructureModel) -> Self {
        let mut table = Self {
            names: HashMap::new(),
            taken: [LANG_STRING_TYPE, IRI_ELEMENT]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        };
        for class in &model.classes {
            if table.names.contains_key(&class.psm_iri) {
                continue;
            }
            let name = if model.is_foreign(class) {
                // Foreign types are named by their own schema.
                to_ncname(&class.technical_label)
            } else {
                table.reserve(&to_ncname(&class.technical_label))
            };
            table.names.insert(class.psm_iri.clone(), name);
        }
        table
    }

    /// Returns the type name of a class.
    #[must_use]
    pub fn get<'a>(&'a self, class: &'a Class) -> &'a str {
        self.names
            .get(&class.psm_iri)
            .map_or(class.technical_label.as_str(), String::as_str)
    }

    /// Reserves a free name derived from `base` and returns it.
    pub fn reserve(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structura_model::builder::{ClassBuilder, ModelBuilder};

    #[test]
    fn maps_primitive_table() {
        assert_eq!(schema_type(XSD_DATETIME), SchemaType::Builtin("dateTimeStamp".into()));
        assert_eq!(schema_type(XSD_ANY_URI), SchemaType::Builtin("anyURI".into()));
        assert_eq!(schema_type(RDF_LANG_STRING), SchemaType::LangString);
        assert_eq!(
            schema_type("http://www.w3.org/2001/XMLSchema#gYear"),
            SchemaType::Builtin("gYear".into())
        );
        assert_eq!(
            schema_type("https://example.org/dt/money"),
            SchemaType::Builtin("anySimpleType".into())
        );
    }

    #[test]
    fn splits_iris() {
        assert_eq!(
            split_iri("https://schema.org/name"),
            Some(("https://schema.org/", "name"))
        );
        assert_eq!(
            split_iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            Some(("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "type"))
        );
        assert_eq!(split_iri("https://example.org/p/123"), None);
        assert_eq!(split_iri("https://example.org/"), None);
        assert_eq!(split_iri("urn:isbn"), None);
    }

    #[test]
    fn sanitizes_labels() {
        assert_eq!(to_ncname("first name"), "first_name");
        assert_eq!(to_ncname("1st"), "_1st");
        assert_eq!(to_ncname(""), "_");
        assert_eq!(to_ncname("název"), "název");
    }

    #[test]
    fn template_names_are_ncnames() {
        let name = template_name("https://example.org/psm/Person#1");
        assert_eq!(name, "_https___example_org_psm_Person_1");
        assert!(is_ncname(&name));
    }

    #[test]
    fn class_names_are_unique_in_declaration_order() {
        let model = ModelBuilder::new("m", "spec")
            .class(ClassBuilder::new("a", "Thing"))
            .class(ClassBuilder::new("b", "Thing"))
            .class(ClassBuilder::new("c", "langString"))
            .build();
        let names = ClassNames::new(&model);
        let names: Vec<&str> = model.classes.iter().map(|c| names.get(c)).collect();
        assert_eq!(names, vec!["Thing", "Thing2", "langString2"]);
    }
}
