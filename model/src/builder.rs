//! Programmatic construction of Structure Models.
//!
//! ```
//! use structura_model::builder::{ClassBuilder, ModelBuilder, PropertyBuilder};
//! use structura_model::iris::XSD_STRING;
//!
//! let model = ModelBuilder::new("https://example.org/psm/schema", "spec-a")
//!     .namespace("https://example.org/ns", "ex")
//!     .class(
//!         ClassBuilder::new("https://example.org/psm/Person", "Person")
//!             .cim("https://schema.org/Person")
//!             .property(PropertyBuilder::new("name", "https://schema.org/name").primitive(XSD_STRING)),
//!     )
//!     .root(&["https://example.org/psm/Person"])
//!     .build();
//! assert_eq!(model.class_count(), 1);
//! ```

use crate::model::{
    Class, DataType, LanguageString, MaxCardinality, Property, RootGroup, StructureModel,
};

/// Builds a [`StructureModel`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    model: StructureModel,
}

impl ModelBuilder {
    /// Starts a model with the given schema identity and owning specification.
    #[must_use]
    pub fn new(psm_iri: &str, specification: &str) -> Self {
        Self {
            model: StructureModel {
                psm_iri: psm_iri.to_string(),
                human_label: LanguageString::new(),
                owning_specification: specification.to_string(),
                namespace: None,
                namespace_prefix: None,
                roots: Vec::new(),
                classes: Vec::new(),
            },
        }
    }

    /// Sets the target namespace and its prefix.
    #[must_use]
    pub fn namespace(mut self, namespace: &str, prefix: &str) -> Self {
        self.model.namespace = Some(namespace.to_string());
        self.model.namespace_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a display label.
    #[must_use]
    pub fn label(mut self, language: &str, label: &str) -> Self {
        self.model
            .human_label
            .insert(language.to_string(), label.to_string());
        self
    }

    /// Appends a root group.
    #[must_use]
    pub fn root(mut self, candidates: &[&str]) -> Self {
        self.model.roots.push(RootGroup {
            classes: candidates.iter().map(|c| (*c).to_string()).collect(),
        });
        self
    }

    /// Appends a class.
    #[must_use]
    pub fn class(mut self, class: ClassBuilder) -> Self {
        self.model.classes.push(class.build());
        self
    }

    /// Finishes the model.
    #[must_use]
    pub fn build(self) -> StructureModel {
        self.model
    }
}

/// Builds a [`Class`].
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    class: Class,
}

impl ClassBuilder {
    /// Starts a class with the given identity and technical label.
    #[must_use]
    pub fn new(psm_iri: &str, technical_label: &str) -> Self {
        Self {
            class: Class {
                psm_iri: psm_iri.to_string(),
                cim_iri: None,
                human_label: LanguageString::new(),
                technical_label: technical_label.to_string(),
                is_codelist: false,
                extends: Vec::new(),
                owning_specification: None,
                owning_schema: None,
                properties: Vec::new(),
            },
        }
    }

    /// Sets the semantic interpretation.
    #[must_use]
    pub fn cim(mut self, cim_iri: &str) -> Self {
        self.class.cim_iri = Some(cim_iri.to_string());
        self
    }

    /// Marks the class as a codelist.
    #[must_use]
    pub fn codelist(mut self) -> Self {
        self.class.is_codelist = true;
        self
    }

    /// Adds a parent class.
    #[must_use]
    pub fn extends(mut self, parent: &str) -> Self {
        self.class.extends.push(parent.to_string());
        self
    }

    /// Assigns the class to another specification and schema.
    #[must_use]
    pub fn owned_by(mut self, specification: &str, schema: &str) -> Self {
        self.class.owning_specification = Some(specification.to_string());
        self.class.owning_schema = Some(schema.to_string());
        self
    }

    /// Appends a property. An empty property identity is derived from the class.
    #[must_use]
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        let mut property = property.build();
        if property.psm_iri.is_empty() {
            property.psm_iri = format!("{}/{}", self.class.psm_iri, property.technical_label);
        }
        self.class.properties.push(property);
        self
    }

    /// Finishes the class.
    #[must_use]
    pub fn build(self) -> Class {
        self.class
    }
}

/// Builds a [`Property`]. Defaults to cardinality `1..1`.
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    /// Starts a property with the given technical label and predicate.
    #[must_use]
    pub fn new(technical_label: &str, cim_iri: &str) -> Self {
        Self {
            property: Property {
                psm_iri: String::new(),
                cim_iri: cim_iri.to_string(),
                technical_label: technical_label.to_string(),
                human_label: LanguageString::new(),
                cardinality_min: 1,
                cardinality_max: MaxCardinality::Bounded(1),
                is_reverse: false,
                dematerialize: false,
                data_types: Vec::new(),
            },
        }
    }

    /// Sets an explicit identity.
    #[must_use]
    pub fn id(mut self, psm_iri: &str) -> Self {
        self.property.psm_iri = psm_iri.to_string();
        self
    }

    /// Adds a primitive datatype candidate.
    #[must_use]
    pub fn primitive(mut self, iri: &str) -> Self {
        self.property.data_types.push(DataType::Primitive {
            iri: iri.to_string(),
        });
        self
    }

    /// Adds a class candidate.
    #[must_use]
    pub fn association(mut self, class: &str) -> Self {
        self.property.data_types.push(DataType::Association {
            class: class.to_string(),
        });
        self
    }

    /// Sets the cardinality; `None` as maximum means unbounded.
    #[must_use]
    pub fn cardinality(mut self, min: u32, max: Option<u32>) -> Self {
        self.property.cardinality_min = min;
        self.property.cardinality_max = max.into();
        self
    }

    /// Marks the property as reverse.
    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.property.is_reverse = true;
        self
    }

    /// Marks the property as dematerialized.
    #[must_use]
    pub fn dematerialize(mut self) -> Self {
        self.property.dematerialize = true;
        self
    }

    /// Finishes the property.
    #[must_use]
    pub fn build(self) -> Property {
        self.property
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_identity_is_derived_from_class() {
        let class = ClassBuilder::new("https://ex.org/A", "A")
            .property(PropertyBuilder::new("name", "https://ex.org/name").primitive("x"))
            .build();
        assert_eq!(class.properties[0].psm_iri, "https://ex.org/A/name");
    }

    #[test]
    fn cardinality_none_is_unbounded() {
        let prop = PropertyBuilder::new("p", "c")
            .association("k")
            .cardinality(0, None)
            .build();
        assert!(prop.is_optional());
        assert_eq!(prop.cardinality_max, MaxCardinality::Unbounded);
    }
}
