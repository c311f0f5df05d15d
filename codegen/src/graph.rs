//! Class-graph walks: recursion detection for the extraction query and
//! dematerialization loops.

use std::collections::HashMap;

use structura_model::{Class, Property};

use crate::error::{GenerationError, Result};
use crate::types::{ResolvedShape, TypeResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

fn association_targets<'m>(
    resolver: &TypeResolver<'m>,
    property: &'m Property,
) -> Result<Vec<&'m Class>> {
    Ok(match resolver.resolve(property)? {
        ResolvedShape::Primitive(_) => Vec::new(),
        ResolvedShape::SingleClass(class) => vec![class],
        ResolvedShape::Choice(plan) => plan.candidates,
    })
}

/// Fails if a class can be re-entered on a walk from the roots over
/// association and parent edges. A class reached twice on different paths
/// (a diamond) is fine.
///
/// # Errors
///
/// Returns [`GenerationError::RecursiveModel`] naming the re-entered class,
/// or any resolution error met on the way.
pub fn check_acyclic(resolver: &TypeResolver<'_>) -> Result<()> {
    let model = resolver.model();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for group in &model.roots {
        for candidate in &group.classes {
            let class = resolver.class(candidate, &model.psm_iri)?;
            visit(resolver, class, &mut marks)?;
        }
    }
    Ok(())
}

fn visit<'m>(
    resolver: &TypeResolver<'m>,
    class: &'m Class,
    marks: &mut HashMap<&'m str, Mark>,
) -> Result<()> {
    match marks.get(class.psm_iri.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::OnPath) => {
            return Err(GenerationError::RecursiveModel {
                class: class.psm_iri.clone(),
            })
        }
        None => {}
    }
    marks.insert(&class.psm_iri, Mark::OnPath);
    let mut next = Vec::new();
    if let Some(parent) = resolver.parent(class)? {
        next.push(parent);
    }
    for property in &class.properties {
        next.extend(association_targets(resolver, property)?);
    }
    for target in next {
        visit(resolver, target, marks)?;
    }
    marks.insert(&class.psm_iri, Mark::Done);
    Ok(())
}

/// Fails if splicing dematerialized content would splice a class into itself.
///
/// # Errors
///
/// Returns [`GenerationError::DematerializationCycle`] naming the property
/// that closes the loop, or [`GenerationError::DematerializedNonClass`] for a
/// dematerialized property that is not single-class.
pub fn check_dematerialization(resolver: &TypeResolver<'_>) -> Result<()> {
    let model = resolver.model();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for class in &model.classes {
        splice(resolver, class, &mut marks)?;
    }
    Ok(())
}

fn splice<'m>(
    resolver: &TypeResolver<'m>,
    class: &'m Class,
    marks: &mut HashMap<&'m str, Mark>,
) -> Result<()> {
    if marks.get(class.psm_iri.as_str()) == Some(&Mark::Done) {
        return Ok(());
    }
    marks.insert(&class.psm_iri, Mark::OnPath);
    for property in resolver.effective_properties(class)? {
        if !property.dematerialize {
            continue;
        }
        let target = dematerialized_target(resolver, property)?;
        if marks.get(target.psm_iri.as_str()) == Some(&Mark::OnPath) {
            return Err(GenerationError::DematerializationCycle {
                property: property.psm_iri.clone(),
            });
        }
        splice(resolver, target, marks)?;
    }
    marks.insert(&class.psm_iri, Mark::Done);
    Ok(())
}

/// Returns the class a dematerialized property splices in.
///
/// # Errors
///
/// Returns [`GenerationError::DematerializedNonClass`] unless the property
/// resolves to exactly one class owned by the model's own specification.
pub fn dematerialized_target<'m>(
    resolver: &TypeResolver<'m>,
    property: &'m Property,
) -> Result<&'m Class> {
    match resolver.resolve(property)? {
        ResolvedShape::SingleClass(class) if !resolver.model().is_foreign(class) => Ok(class),
        _ => Err(GenerationError::DematerializedNonClass {
            property: property.psm_iri.clone(),
        }),
    }
}
