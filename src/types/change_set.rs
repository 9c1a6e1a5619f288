use std::collections::HashMap;

/// Replacement contents for archive members, keyed by member name.
///
/// Only members whose cleaning actually removed something are recorded, so
/// an empty change set means the input archive is returned untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    parts: HashMap<String, Vec<u8>>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record cleaned bytes for a member, replacing any earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.parts.insert(name.into(), bytes);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Member names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }
}
