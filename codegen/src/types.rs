//! Type Resolver: classifies the candidate data types of a property.
//!
//! Codelist classes are replaced by a plain IRI reference, the remaining
//! candidates must all be primitives or all be classes, and several class
//! candidates become a [`ChoicePlan`]. Resolution is a pure function of the
//! model.

use structura_model::{Class, DataType, Property, StructureModel};

use crate::error::{GenerationError, Result};
use crate::mapping::to_ncname;

/// One primitive candidate after codelist substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive<'m> {
    /// A literal of the given datatype IRI.
    Datatype(&'m str),
    /// An IRI reference to a codelist item, serialized as `anyURI`.
    CodelistReference(&'m Class),
}

/// The resolved shape of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedShape<'m> {
    /// Literal or reference values; never empty.
    Primitive(Vec<Primitive<'m>>),
    /// Instances of exactly one class.
    SingleClass(&'m Class),
    /// Instances of one of several classes.
    Choice(ChoicePlan<'m>),
}

impl<'m> ResolvedShape<'m> {
    /// Returns the single primitive a transform can handle.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MultiplePrimitiveTypes`] for several
    /// primitive candidates.
    pub fn single_primitive(
        primitives: &[Primitive<'m>],
        property: &Property,
    ) -> Result<Primitive<'m>> {
        match primitives {
            [one] => Ok(*one),
            _ => Err(GenerationError::MultiplePrimitiveTypes {
                property: property.psm_iri.clone(),
            }),
        }
    }
}

/// How the candidates of a polymorphic property are represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePlan<'m> {
    /// Candidates in declaration order.
    pub candidates: Vec<&'m Class>,
    /// Base of the plan.
    pub base: ChoiceBase<'m>,
}

/// The base of a [`ChoicePlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceBase<'m> {
    /// Exactly one candidate has no parent in the set; every other candidate
    /// derives from it through its in-set parent chain.
    Rooted {
        /// The candidate without in-set parent.
        root: &'m Class,
        /// The other candidates, in declaration order.
        derived: Vec<Derivation<'m>>,
    },
    /// Zero or several in-set roots: a synthetic type carrying only the
    /// identity reference.
    Placeholder {
        /// Concatenated technical labels of all candidates.
        name: String,
    },
}

/// A derived candidate of a rooted plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation<'m> {
    /// The candidate.
    pub class: &'m Class,
    /// Its in-set parent.
    pub parent: &'m Class,
}

impl<'m> ChoicePlan<'m> {
    /// Returns the candidates that derive from the base.
    #[must_use]
    pub fn derived(&self) -> &[Derivation<'m>] {
        match &self.base {
            ChoiceBase::Rooted { derived, .. } => derived,
            ChoiceBase::Placeholder { .. } => &[],
        }
    }

    /// Returns true if the plan is a placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.base, ChoiceBase::Placeholder { .. })
    }

    /// Returns true if `class` is a derived candidate.
    #[must_use]
    pub fn is_derived(&self, class: &Class) -> bool {
        self.derived()
            .iter()
            .any(|d| d.class.psm_iri == class.psm_iri)
    }
}

/// Resolves classes and property shapes against one model.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'m> {
    model: &'m StructureModel,
}

impl<'m> TypeResolver<'m> {
    /// Creates a resolver over a model.
    #[must_use]
    pub fn new(model: &'m StructureModel) -> Self {
        Self { model }
    }

    /// Returns the model.
    #[must_use]
    pub fn model(&self) -> &'m StructureModel {
        self.model
    }

    /// Looks up a class referenced from `referrer`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UnknownClass`] if the reference dangles.
    pub fn class(&self, psm_iri: &str, referrer: &str) -> Result<&'m Class> {
        self.model
            .find_class(psm_iri)
            .ok_or_else(|| GenerationError::UnknownClass {
                class: psm_iri.to_string(),
                referrer: referrer.to_string(),
            })
    }

    /// Returns the root candidates in document order, each class once.
    ///
    /// # Errors
    ///
    /// Fails on a dangling candidate, or with
    /// [`GenerationError::DuplicateRootElement`] when two distinct candidates
    /// would share a global element name.
    pub fn root_classes(&self) -> Result<Vec<&'m Class>> {
        let mut roots: Vec<&'m Class> = Vec::new();
        for candidate in self.model.root_candidates() {
            let class = self.class(candidate, &self.model.psm_iri)?;
            if roots.iter().any(|r| r.psm_iri == class.psm_iri) {
                continue;
            }
            let element = to_ncname(&class.technical_label);
            if let Some(other) = roots
                .iter()
                .find(|r| to_ncname(&r.technical_label) == element)
            {
                return Err(GenerationError::DuplicateRootElement {
                    class: class.psm_iri.clone(),
                    other: other.psm_iri.clone(),
                    element,
                });
            }
            roots.push(class);
        }
        Ok(roots)
    }

    /// Returns the parent of a class.
    ///
    /// # Errors
    ///
    /// Fails on multiple inheritance or a dangling parent.
    pub fn parent(&self, class: &'m Class) -> Result<Option<&'m Class>> {
        match class.extends.as_slice() {
            [] => Ok(None),
            [parent] => self.class(parent, &class.psm_iri).map(Some),
            _ => Err(GenerationError::MultipleInheritance {
                class: class.psm_iri.clone(),
            }),
        }
    }

    /// Returns the ancestors of a class, nearest first.
    ///
    /// # Errors
    ///
    /// Fails on multiple inheritance, dangling parents or an ancestry loop.
    pub fn ancestors(&self, class: &'m Class) -> Result<Vec<&'m Class>> {
        let mut chain: Vec<&'m Class> = Vec::new();
        let mut current = class;
        while let Some(parent) = self.parent(current)? {
            if parent.psm_iri == class.psm_iri || chain.iter().any(|c| c.psm_iri == parent.psm_iri)
            {
                return Err(GenerationError::InheritanceCycle {
                    class: class.psm_iri.clone(),
                });
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Returns the properties of a class including inherited ones, farthest
    /// ancestor first.
    ///
    /// # Errors
    ///
    /// Fails like [`TypeResolver::ancestors`].
    pub fn effective_properties(&self, class: &'m Class) -> Result<Vec<&'m Property>> {
        let ancestors = self.ancestors(class)?;
        Ok(ancestors
            .into_iter()
            .rev()
            .chain(std::iter::once(class))
            .flat_map(|c| c.properties.iter())
            .collect())
    }

    /// Resolves the shape of a property.
    ///
    /// # Errors
    ///
    /// Returns a model-shape error if the data types are empty, mixed, dangle,
    /// or form an invalid choice hierarchy.
    pub fn resolve(&self, property: &'m Property) -> Result<ResolvedShape<'m>> {
        if property.data_types.is_empty() {
            return Err(GenerationError::EmptyDataTypes {
                property: property.psm_iri.clone(),
            });
        }
        let mut primitives = Vec::new();
        let mut classes: Vec<&'m Class> = Vec::new();
        for data_type in &property.data_types {
            match data_type {
                DataType::Primitive { iri } => primitives.push(Primitive::Datatype(iri)),
                DataType::Association { class } => {
                    let class = self.class(class, &property.psm_iri)?;
                    if class.is_codelist {
                        primitives.push(Primitive::CodelistReference(class));
                    } else if !classes.iter().any(|c| c.psm_iri == class.psm_iri) {
                        classes.push(class);
                    }
                }
            }
        }
        match (primitives.is_empty(), classes.as_slice()) {
            (false, []) => Ok(ResolvedShape::Primitive(primitives)),
            (true, [one]) => Ok(ResolvedShape::SingleClass(*one)),
            (true, _) => self.choice(property, classes).map(ResolvedShape::Choice),
            (false, _) => Err(GenerationError::HeterogeneousDataTypes {
                property: property.psm_iri.clone(),
            }),
        }
    }

    fn choice(&self, property: &Property, candidates: Vec<&'m Class>) -> Result<ChoicePlan<'m>> {
        let in_set = |iri: &str| candidates.iter().copied().find(|c| c.psm_iri == iri);
        let mut roots = Vec::new();
        let mut derived = Vec::new();
        for &class in &candidates {
            match self.parent(class)? {
                None => roots.push(class),
                Some(parent) => match in_set(&parent.psm_iri) {
                    Some(parent) => derived.push(Derivation { class, parent }),
                    None => {
                        return Err(GenerationError::ParentOutsideChoice {
                            property: property.psm_iri.clone(),
                            class: class.psm_iri.clone(),
                            parent: parent.psm_iri.clone(),
                        })
                    }
                },
            }
        }
        let base = match roots.as_slice() {
            [root] => ChoiceBase::Rooted {
                root: *root,
                derived,
            },
            _ => ChoiceBase::Placeholder {
                name: candidates
                    .iter()
                    .map(|c| c.technical_label.as_str())
                    .collect(),
            },
        };
        Ok(ChoicePlan { candidates, base })
    }
}
