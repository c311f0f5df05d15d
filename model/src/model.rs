//! Core Structure Model types.
//!
//! A [`StructureModel`] is the resolved, language-agnostic tree of classes and
//! properties that every generator consumes. Classes reference each other by
//! their `psmIri`; lookups go through [`StructureModel::find_class`]. The model
//! is read-only to the generators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A display label keyed by language tag (e.g. `{"en": "Person"}`).
pub type LanguageString = BTreeMap<String, String>;

/// The complete Structure Model of one data specification schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureModel {
    /// Identity of the schema. Sibling manifests refer to it as the source model id.
    pub psm_iri: String,
    /// Human-readable label.
    #[serde(default)]
    pub human_label: LanguageString,
    /// Identifier of the specification this schema belongs to.
    pub owning_specification: String,
    /// Target XML namespace, if any.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Prefix bound to [`StructureModel::namespace`].
    #[serde(default)]
    pub namespace_prefix: Option<String>,
    /// Ordered root groups.
    pub roots: Vec<RootGroup>,
    /// Every class reachable from the roots.
    pub classes: Vec<Class>,
}

/// One root of the document: a single class, or several when the root is polymorphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootGroup {
    /// `psmIri`s of the candidate classes, in declaration order.
    pub classes: Vec<String>,
}

/// A structural class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Stable identity.
    pub psm_iri: String,
    /// Semantic interpretation (the RDF class), if any.
    #[serde(default)]
    pub cim_iri: Option<String>,
    /// Human-readable label.
    #[serde(default)]
    pub human_label: LanguageString,
    /// Machine label used as XML element and type name.
    pub technical_label: String,
    /// Codelist classes are referenced by IRI only and never expanded.
    #[serde(default)]
    pub is_codelist: bool,
    /// `psmIri` of the parent class. More than one entry is invalid.
    #[serde(default)]
    pub extends: Vec<String>,
    /// Owning specification; `None` means the model's own specification.
    #[serde(default)]
    pub owning_specification: Option<String>,
    /// Owning schema (source model id); `None` means the model itself.
    #[serde(default)]
    pub owning_schema: Option<String>,
    /// Ordered properties declared directly on this class.
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A property of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Stable identity.
    pub psm_iri: String,
    /// Semantic IRI, used as the RDF predicate.
    pub cim_iri: String,
    /// Machine label used as XML element name.
    pub technical_label: String,
    /// Human-readable label.
    #[serde(default)]
    pub human_label: LanguageString,
    /// Minimum number of occurrences.
    #[serde(default = "default_cardinality_min")]
    pub cardinality_min: u32,
    /// Maximum number of occurrences; `null` in JSON means unbounded.
    #[serde(default)]
    pub cardinality_max: MaxCardinality,
    /// The triple points from the value to the owning instance.
    #[serde(default)]
    pub is_reverse: bool,
    /// Splice the target class content into the parent instead of nesting it.
    #[serde(default)]
    pub dematerialize: bool,
    /// Candidate data types, never empty in a valid model.
    pub data_types: Vec<DataType>,
}

fn default_cardinality_min() -> u32 {
    1
}

impl Property {
    /// Returns true if the property may be absent.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.cardinality_min == 0
    }

    /// Returns true if the property is exactly one.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.cardinality_min == 1 && self.cardinality_max == MaxCardinality::Bounded(1)
    }
}

/// Upper bound of a cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum MaxCardinality {
    /// At most this many occurrences.
    Bounded(u32),
    /// No upper bound.
    Unbounded,
}

impl Default for MaxCardinality {
    fn default() -> Self {
        MaxCardinality::Bounded(1)
    }
}

impl From<Option<u32>> for MaxCardinality {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) => MaxCardinality::Bounded(n),
            None => MaxCardinality::Unbounded,
        }
    }
}

impl From<MaxCardinality> for Option<u32> {
    fn from(value: MaxCardinality) -> Self {
        match value {
            MaxCardinality::Bounded(n) => Some(n),
            MaxCardinality::Unbounded => None,
        }
    }
}

/// One candidate data type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataType {
    /// A literal datatype, identified by its IRI.
    Primitive {
        /// Datatype IRI (e.g. `xsd:string` expanded).
        iri: String,
    },
    /// A value that is an instance of another class.
    Association {
        /// `psmIri` of the target class.
        class: String,
    },
}

impl StructureModel {
    /// Looks up a class by its `psmIri`. Returns `None` if not found.
    #[must_use]
    pub fn find_class(&self, psm_iri: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.psm_iri == psm_iri)
    }

    /// Returns the total number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the total number of properties declared across all classes.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.classes.iter().map(|c| c.properties.len()).sum()
    }

    /// Returns the `psmIri`s of every root candidate, in document order.
    pub fn root_candidates(&self) -> impl Iterator<Item = &str> {
        self.roots
            .iter()
            .flat_map(|group| group.classes.iter().map(String::as_str))
    }

    /// Returns true if `psm_iri` is a candidate of some root group.
    #[must_use]
    pub fn is_root_class(&self, psm_iri: &str) -> bool {
        self.root_candidates().any(|c| c == psm_iri)
    }

    /// Returns the owning specification of a class.
    #[must_use]
    pub fn specification_of<'a>(&'a self, class: &'a Class) -> &'a str {
        class
            .owning_specification
            .as_deref()
            .unwrap_or(&self.owning_specification)
    }

    /// Returns the owning schema (source model id) of a class.
    #[must_use]
    pub fn schema_of<'a>(&'a self, class: &'a Class) -> &'a str {
        class.owning_schema.as_deref().unwrap_or(&self.psm_iri)
    }

    /// Returns true if the class belongs to a different specification.
    #[must_use]
    pub fn is_foreign(&self, class: &Class) -> bool {
        self.specification_of(class) != self.owning_specification
    }
}

/// Standard IRI constants used across all generators.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XSD namespace (as used in datatype IRIs).
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// XML Schema namespace (as used for `xs:` elements).
    pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";
    /// XML Schema instance namespace (`xsi:type`).
    pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// XML Schema versioning namespace (`vc:minVersion`).
    pub const VC_NS: &str = "http://www.w3.org/2007/XMLSchema-versioning";
    /// The `xml:` namespace.
    pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
    /// Location of the schema for the `xml:` namespace.
    pub const XML_NS_SCHEMA_LOCATION: &str = "http://www.w3.org/2001/xml.xsd";
    /// XSLT namespace.
    pub const XSLT_NS: &str = "http://www.w3.org/1999/XSL/Transform";
    /// SPARQL Query Results XML namespace.
    pub const SPARQL_RESULTS_NS: &str = "http://www.w3.org/2005/sparql-results#";

    /// `rdf:type`, the only dispatch predicate.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:langString`, the distinguished language-tagged text type.
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:date`.
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// `xsd:time`.
    pub const XSD_TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:anyURI`.
    pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_cardinality_from_json_null_is_unbounded() -> serde_json::Result<()> {
        let json = r#"{"psmIri":"p","cimIri":"c","technicalLabel":"t","cardinalityMax":null,
            "dataTypes":[{"kind":"primitive","iri":"x"}]}"#;
        let prop: Property = serde_json::from_str(json)?;
        assert_eq!(prop.cardinality_max, MaxCardinality::Unbounded);
        assert_eq!(prop.cardinality_min, 1);
        Ok(())
    }

    #[test]
    fn max_cardinality_absent_defaults_to_one() -> serde_json::Result<()> {
        let json = r#"{"psmIri":"p","cimIri":"c","technicalLabel":"t",
            "dataTypes":[{"kind":"association","class":"k"}]}"#;
        let prop: Property = serde_json::from_str(json)?;
        assert_eq!(prop.cardinality_max, MaxCardinality::Bounded(1));
        assert!(prop.is_single());
        assert_eq!(
            prop.data_types,
            vec![DataType::Association {
                class: "k".to_string()
            }]
        );
        Ok(())
    }

    #[test]
    fn root_group_is_a_plain_array() -> serde_json::Result<()> {
        let group: RootGroup = serde_json::from_str(r#"["a","b"]"#)?;
        assert_eq!(group.classes, vec!["a", "b"]);
        Ok(())
    }
}
