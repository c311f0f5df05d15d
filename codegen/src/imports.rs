//! Import Resolver: locates the artifact of another specification that covers
//! a foreign class, and computes a relative reference to it.

use structura_model::{Class, GeneratorKind, SpecificationManifest, StructureModel};

use crate::error::{GenerationError, Result};

/// Where a class is declared, seen from the artifact being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// Declared by the artifact itself.
    Local,
    /// Declared by a sibling artifact.
    Import(ImportDescriptor),
}

/// A resolved sibling artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDescriptor {
    /// Owning specification of the artifact.
    pub specification: String,
    /// Target namespace declared by the artifact.
    pub namespace: Option<String>,
    /// Prefix the artifact declares for its namespace.
    pub prefix: Option<String>,
    /// Reference relative to the current artifact's public address.
    pub reference: String,
}

/// Resolves foreign classes for one artifact.
#[derive(Debug, Clone)]
pub struct ImportResolver<'a> {
    model: &'a StructureModel,
    manifests: &'a [SpecificationManifest],
    generator: GeneratorKind,
    public_address: String,
}

impl<'a> ImportResolver<'a> {
    /// Creates a resolver for the artifact of `generator` kind published at
    /// `public_address`.
    #[must_use]
    pub fn new(
        model: &'a StructureModel,
        manifests: &'a [SpecificationManifest],
        generator: GeneratorKind,
        public_address: String,
    ) -> Self {
        Self {
            model,
            manifests,
            generator,
            public_address,
        }
    }

    /// Resolves a class.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UnresolvedImport`] if the class is foreign
    /// and no artifact of the same family in its specification was generated
    /// from its owning schema.
    pub fn resolve(&self, class: &Class) -> Result<ImportResolution> {
        if !self.model.is_foreign(class) {
            return Ok(ImportResolution::Local);
        }
        let specification = self.model.specification_of(class);
        let schema = self.model.schema_of(class);
        let artifact = self
            .manifests
            .iter()
            .filter(|m| m.id == specification)
            .find_map(|m| m.find_artifact(self.generator, schema))
            .ok_or_else(|| GenerationError::UnresolvedImport {
                class: class.psm_iri.clone(),
                specification: specification.to_string(),
                generator: self.generator,
            })?;
        Ok(ImportResolution::Import(ImportDescriptor {
            specification: specification.to_string(),
            namespace: artifact.namespace.clone(),
            prefix: artifact.namespace_prefix.clone(),
            reference: relative_reference(&self.public_address, &artifact.public_address),
        }))
    }
}

fn origin(address: &str) -> Option<&str> {
    let scheme_end = address.find("://")? + 3;
    let path_start = address[scheme_end..]
        .find('/')
        .map_or(address.len(), |i| scheme_end + i);
    Some(&address[..path_start])
}

/// Computes the reference to `to` from a document published at `from`.
///
/// Both addresses are split into `/` segments, the longest shared prefix is
/// dropped, one `../` is emitted per remaining directory of `from`, and the
/// remaining segments of `to` are appended (`.` if none remain). A trailing
/// `index.html` is stripped. Absolute addresses on different origins yield
/// `to` unchanged.
#[must_use]
pub fn relative_reference(from: &str, to: &str) -> String {
    let (from_path, to_path) = match (origin(from), origin(to)) {
        (Some(a), Some(b)) if a != b => return to.to_string(),
        (Some(a), Some(b)) => (&from[a.len()..], &to[b.len()..]),
        _ => (from, to),
    };
    let from_segments: Vec<&str> = from_path.split('/').collect();
    let to_segments: Vec<&str> = to_path.split('/').collect();
    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();
    // The file name of `from` is never a shared directory.
    let shared = common.min(from_segments.len() - 1);
    let ups = from_segments.len() - 1 - shared;
    let mut parts: Vec<&str> = vec![".."; ups];
    parts.extend(&to_segments[shared..]);
    let mut reference = parts.join("/");
    let keep = reference
        .strip_suffix("index.html")
        .filter(|rest| rest.is_empty() || rest.ends_with('/'))
        .map(str::len);
    if let Some(keep) = keep {
        reference.truncate(keep);
    }
    if reference.is_empty() {
        reference.push('.');
    }
    reference
}

/// One entry of an [`ImportTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// The resolved artifact.
    pub descriptor: ImportDescriptor,
    /// Prefix bound in the importing document; `None` without a namespace.
    pub prefix: Option<String>,
}

/// The imports of one artifact, in first-use order.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
    taken: Vec<String>,
    next: usize,
}

impl ImportTable {
    /// Creates an empty table; `reserved` prefixes are already bound.
    #[must_use]
    pub fn new(reserved: &[&str]) -> Self {
        Self {
            entries: Vec::new(),
            taken: reserved.iter().map(|p| (*p).to_string()).collect(),
            next: 0,
        }
    }

    /// Registers an import and returns its entry. Registering the same
    /// artifact again returns the existing entry.
    pub fn register(&mut self, descriptor: ImportDescriptor) -> &ImportEntry {
        if let Some(i) = self
            .entries
            .iter()
            .position(|e| e.descriptor.reference == descriptor.reference)
        {
            return &self.entries[i];
        }
        let prefix = match (&descriptor.namespace, &descriptor.prefix) {
            (None, _) => None,
            (Some(_), Some(p)) if !self.taken.contains(p) => Some(p.clone()),
            (Some(_), _) => Some(self.allocate()),
        };
        if let Some(p) = &prefix {
            self.taken.push(p.clone());
        }
        log::debug!(
            "import {} from specification {} as {:?}",
            descriptor.reference,
            descriptor.specification,
            prefix
        );
        self.entries.push(ImportEntry { descriptor, prefix });
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    fn allocate(&mut self) -> String {
        loop {
            let candidate = format!("imp{}", self.next);
            self.next += 1;
            if !self.taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Returns the entries in first-use order.
    #[must_use]
    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }
}
