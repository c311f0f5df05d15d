//! Namespace prefix allocation.

use crate::mapping::split_iri;

/// Namespace → prefix table allocating `{stem}0`, `{stem}1`, … in first-seen order.
///
/// Reserved prefixes (those already bound by the enclosing document) are
/// skipped during allocation.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    stem: &'static str,
    reserved: Vec<String>,
    entries: Vec<(String, String)>,
    next: usize,
}

impl PrefixTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(stem: &'static str) -> Self {
        Self {
            stem,
            reserved: Vec::new(),
            entries: Vec::new(),
            next: 0,
        }
    }

    /// Marks a prefix as unavailable.
    #[must_use]
    pub fn reserving(mut self, prefix: &str) -> Self {
        self.reserved.push(prefix.to_string());
        self
    }

    /// Returns the prefix of a namespace, allocating one on first use.
    pub fn prefix_for(&mut self, namespace: &str) -> &str {
        let index = match self.entries.iter().position(|(ns, _)| ns == namespace) {
            Some(i) => i,
            None => {
                let prefix = loop {
                    let candidate = format!("{}{}", self.stem, self.next);
                    self.next += 1;
                    if !self.reserved.contains(&candidate) {
                        break candidate;
                    }
                };
                self.entries.push((namespace.to_string(), prefix));
                self.entries.len() - 1
            }
        };
        &self.entries[index].1
    }

    /// Shortens an IRI to `prefix:local`, or returns `None` if it has no
    /// usable local name.
    pub fn qualify(&mut self, iri: &str) -> Option<String> {
        let (namespace, local) = split_iri(iri)?;
        let prefix = self.prefix_for(namespace);
        Some(format!("{prefix}:{local}"))
    }

    /// Iterates `(prefix, namespace)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(ns, prefix)| (prefix.as_str(), ns.as_str()))
    }
}
