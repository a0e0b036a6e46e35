//! Owner-type registry.
//!
//! The set of opaque handle type names known for one API version. One
//! registry instance exists per generation run and is fully populated,
//! append-only, before any classification starts; there is no process-wide
//! shared registry.

/// Append-only set of owner-type names.
#[derive(Debug, Clone, Default)]
pub struct OwnerTypeRegistry {
    names: Vec<String>,
}

impl OwnerTypeRegistry {
    pub fn new() -> Self {
        OwnerTypeRegistry::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = OwnerTypeRegistry::new();
        for name in names {
            registry.register(name);
        }
        registry
    }

    /// Register an owner-type name. Re-registering is a no-op.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The longest registered name that is a leading segment of `text`.
    ///
    /// A match must end on a segment boundary: the remainder is empty or
    /// starts a new camel-case segment. This is what picks "ValueMetadata"
    /// over "Value" for "ValueMetadataKind", while refusing "Value" for
    /// "Values".
    pub fn longest_match<'a>(&'a self, text: &str) -> Option<&'a str> {
        let mut best: Option<&str> = None;
        for name in &self.names {
            if name.is_empty() || !text.starts_with(name.as_str()) {
                continue;
            }
            let rest = &text[name.len()..];
            if !rest.is_empty() {
                let boundary = rest
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_uppercase() || c.is_ascii_digit() || c == '_');
                if !boundary {
                    continue;
                }
            }
            if best.map_or(true, |b| name.len() > b.len()) {
                best = Some(name);
            }
        }
        best
    }
}
