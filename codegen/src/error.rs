//! Generation failures.
//!
//! Every failure is fatal for the artifact being produced and names the model
//! element that caused it.

use structura_model::GeneratorKind;

/// Coarse classification of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The model violates a structural invariant.
    ModelShape,
    /// The model is valid but the requested artifact cannot express it.
    UnsupportedCombination,
    /// A foreign class has no compatible artifact in its specification.
    UnresolvedImport,
    /// The output sink failed.
    Io,
}

/// A fatal generation failure.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A property without any candidate data type.
    #[error("property {property} has no data types")]
    EmptyDataTypes {
        /// Offending property.
        property: String,
    },
    /// Class and primitive data types mixed on one property.
    #[error("property {property} must use either only class types or only primitive types")]
    HeterogeneousDataTypes {
        /// Offending property.
        property: String,
    },
    /// A class with more than one parent.
    #[error("class {class} extends more than one class")]
    MultipleInheritance {
        /// Offending class.
        class: String,
    },
    /// A class whose ancestry loops back to itself.
    #[error("class {class} is its own ancestor")]
    InheritanceCycle {
        /// Offending class.
        class: String,
    },
    /// A choice candidate whose parent is not a candidate of the same choice.
    #[error(
        "class {class} in the choice of property {property} extends {parent}, \
         which is not a candidate of the same choice"
    )]
    ParentOutsideChoice {
        /// Property carrying the choice.
        property: String,
        /// Offending candidate.
        class: String,
        /// Its parent.
        parent: String,
    },
    /// A class reference that does not resolve.
    #[error("unknown class {class} referenced from {referrer}")]
    UnknownClass {
        /// The missing class.
        class: String,
        /// Root group, property or class holding the reference.
        referrer: String,
    },
    /// Two root candidates that would declare the same global element.
    #[error("root classes {other} and {class} would both declare the global element {element}")]
    DuplicateRootElement {
        /// The later candidate.
        class: String,
        /// The candidate declared first.
        other: String,
        /// The shared element name.
        element: String,
    },
    /// A class without semantic IRI used where dispatch needs one.
    #[error("class {class} has no semantic interpretation, required for {purpose}")]
    MissingInterpretation {
        /// Offending class.
        class: String,
        /// What needed the IRI.
        purpose: &'static str,
    },
    /// A transform asked to handle several primitive types on one property.
    #[error("multiple datatypes on a property are not supported (property {property})")]
    MultiplePrimitiveTypes {
        /// Offending property.
        property: String,
    },
    /// A dematerialized property that is not a single local class.
    #[error("dematerialized property {property} must have exactly one local class type")]
    DematerializedNonClass {
        /// Offending property.
        property: String,
    },
    /// Dematerialization that splices a class into itself.
    #[error("dematerialization of property {property} is cyclic")]
    DematerializationCycle {
        /// Property closing the cycle.
        property: String,
    },
    /// A reverse property with a literal value.
    #[error("reverse property {property} must be class-valued")]
    ReversePrimitive {
        /// Offending property.
        property: String,
    },
    /// A predicate without a namespace/local-name split.
    #[error("predicate {iri} of property {property} cannot be written as an RDF/XML element")]
    UnserializablePredicate {
        /// Offending property.
        property: String,
        /// The predicate IRI.
        iri: String,
    },
    /// A cycle in the class graph, fatal for the extraction query.
    #[error("the model is recursive through class {class}; the extraction query cannot be generated")]
    RecursiveModel {
        /// Class re-entered on the walk.
        class: String,
    },
    /// No sibling artifact covers a foreign class.
    #[error("no {generator} artifact of specification {specification} covers class {class}")]
    UnresolvedImport {
        /// Foreign class.
        class: String,
        /// Its owning specification.
        specification: String,
        /// Artifact family searched.
        generator: GeneratorKind,
    },
    /// The sink failed.
    #[error("cannot write artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Returns the taxonomy class of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::EmptyDataTypes { .. }
            | GenerationError::HeterogeneousDataTypes { .. }
            | GenerationError::MultipleInheritance { .. }
            | GenerationError::InheritanceCycle { .. }
            | GenerationError::ParentOutsideChoice { .. }
            | GenerationError::UnknownClass { .. }
            | GenerationError::DuplicateRootElement { .. }
            | GenerationError::MissingInterpretation { .. } => ErrorKind::ModelShape,
            GenerationError::MultiplePrimitiveTypes { .. }
            | GenerationError::DematerializedNonClass { .. }
            | GenerationError::DematerializationCycle { .. }
            | GenerationError::ReversePrimitive { .. }
            | GenerationError::UnserializablePredicate { .. }
            | GenerationError::RecursiveModel { .. } => ErrorKind::UnsupportedCombination,
            GenerationError::UnresolvedImport { .. } => ErrorKind::UnresolvedImport,
            GenerationError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the identity of the offending model element, if any.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self {
            GenerationError::EmptyDataTypes { property }
            | GenerationError::HeterogeneousDataTypes { property }
            | GenerationError::ParentOutsideChoice { property, .. }
            | GenerationError::MultiplePrimitiveTypes { property }
            | GenerationError::DematerializedNonClass { property }
            | GenerationError::DematerializationCycle { property }
            | GenerationError::ReversePrimitive { property }
            | GenerationError::UnserializablePredicate { property, .. } => Some(property),
            GenerationError::MultipleInheritance { class }
            | GenerationError::InheritanceCycle { class }
            | GenerationError::UnknownClass { class, .. }
            | GenerationError::DuplicateRootElement { class, .. }
            | GenerationError::MissingInterpretation { class, .. }
            | GenerationError::RecursiveModel { class }
            | GenerationError::UnresolvedImport { class, .. } => Some(class),
            GenerationError::Io(_) => None,
        }
    }
}

/// Result alias for generation.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heterogeneous_message_names_property() {
        let err = GenerationError::HeterogeneousDataTypes {
            property: "https://ex.org/p".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ModelShape);
        assert_eq!(err.element(), Some("https://ex.org/p"));
        assert_eq!(
            err.to_string(),
            "property https://ex.org/p must use either only class types or only primitive types"
        );
    }

    #[test]
    fn io_errors_have_no_element() {
        let err = GenerationError::from(std::io::Error::other("closed"));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.element().is_none());
    }
}
