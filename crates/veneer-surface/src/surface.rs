//! The synthesized binding surface.
//!
//! A [`Surface`] is the single source of truth derived from one declaration
//! model: every generated class with its methods, properties, and iteration
//! helpers, plus the global function namespace, enums, and constants. Once
//! built it is immutable, fully serializable, and safe for concurrent
//! read-only use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use veneer_model::{ConstantDecl, EnumDecl, FunctionDecl};

/// One exposed method, backed by a single foreign function.
///
/// The receiver's handle is inserted at argument position 0 at call time;
/// all other arguments forward positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    /// Owning class, or `None` for the global namespace.
    pub owner_type: Option<String>,
    /// Exposed snake-case name.
    pub method_name: String,
    /// The foreign function this method forwards to.
    pub backing: FunctionDecl,
}

/// A property derived from a getter/setter pair (or singleton).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub owner_type: String,
    pub property_name: String,
    /// Read accessor; absent for a write-only property.
    pub getter: Option<FunctionDecl>,
    /// Write accessor; absent for a read-only property.
    pub setter: Option<FunctionDecl>,
}

impl PropertyEntry {
    pub fn is_read_only(&self) -> bool {
        self.getter.is_some() && self.setter.is_none()
    }

    pub fn is_write_only(&self) -> bool {
        self.setter.is_some() && self.getter.is_none()
    }
}

/// A derived sibling-iteration helper.
///
/// The sequence starts at the result of `first_step` applied to the
/// receiver and repeatedly applies `next_step` to the previous element
/// until the null sentinel handle appears. For self-chained traversals
/// (`GetNextFoo` with no distinct first getter) `first_step` and
/// `next_step` are the same function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IteratorEntry {
    pub owner_type: String,
    /// Singular element name ("instruction" yields `iter_instructions`).
    pub iterated_name: String,
    pub first_step: FunctionDecl,
    pub next_step: FunctionDecl,
}

/// All entries generated for one owner type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSurface {
    pub owner_type: String,
    pub methods: Vec<MethodEntry>,
    pub properties: Vec<PropertyEntry>,
    pub iterators: Vec<IteratorEntry>,
}

impl ClassSurface {
    pub fn new(owner_type: impl Into<String>) -> Self {
        ClassSurface {
            owner_type: owner_type.into(),
            methods: Vec::new(),
            properties: Vec::new(),
            iterators: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.method_name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyEntry> {
        self.properties.iter().find(|p| p.property_name == name)
    }

    pub fn iterator(&self, name: &str) -> Option<&IteratorEntry> {
        self.iterators.iter().find(|i| i.iterated_name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty() && self.iterators.is_empty()
    }
}

/// The full generated surface for one API version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    /// Short API name the surface was generated for.
    pub api_name: String,
    /// Generated classes, keyed by owner type. Every registered owner type
    /// has an entry, even if nothing was placed on it.
    pub classes: BTreeMap<String, ClassSurface>,
    /// Functions that fit no class.
    pub globals: Vec<MethodEntry>,
    pub enums: Vec<EnumDecl>,
    pub constants: Vec<ConstantDecl>,
}

impl Surface {
    pub fn class(&self, name: &str) -> Option<&ClassSurface> {
        self.classes.get(name)
    }

    pub fn global(&self, method_name: &str) -> Option<&MethodEntry> {
        self.globals.iter().find(|m| m.method_name == method_name)
    }

    /// Total number of method entries, including globals.
    pub fn method_count(&self) -> usize {
        self.globals.len() + self.classes.values().map(|c| c.methods.len()).sum::<usize>()
    }

    pub fn property_count(&self) -> usize {
        self.classes.values().map(|c| c.properties.len()).sum()
    }

    pub fn iterator_count(&self) -> usize {
        self.classes.values().map(|c| c.iterators.len()).sum()
    }
}
