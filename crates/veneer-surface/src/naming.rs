//! Declaration name classification.
//!
//! Splits a declaration name into its conventional parts: the library
//! prefix, a verb marker (get/set/get-next), an optional owner-type segment,
//! and the bare name. Classification is a pure function of the name, the
//! naming convention, and the registered owner-type set; the same inputs
//! always yield the same result, which is what makes generation reproducible
//! and cacheable.

use serde::{Deserialize, Serialize};
use veneer_model::{NamingConvention, OwnerTypeRegistry};

use crate::case::to_snake_case;

/// What a declaration name says about the declaration's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Plain,
    Getter,
    Setter,
    /// A getter-marker immediately followed by the next-marker: one step of
    /// a sibling traversal ("GetNextInstruction").
    NextIteratorStep,
}

/// Derived view over a declaration name. Computed, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingClassification {
    /// Owner-type segment found at the front of the name, if any.
    pub owner_hint: Option<String>,
    /// The name with prefix, verb marker, and owner segment stripped.
    pub bare_name: String,
    pub role: Role,
}

/// Classify a declaration name against a convention and registry.
pub fn classify(
    name: &str,
    convention: &NamingConvention,
    registry: &OwnerTypeRegistry,
) -> NamingClassification {
    let Some(stripped) = name.strip_prefix(convention.prefix.as_str()) else {
        // Names outside the library prefix carry no convention information.
        return NamingClassification {
            owner_hint: None,
            bare_name: name.to_string(),
            role: Role::Plain,
        };
    };

    let (role, rest) = if let Some(after_get) = stripped.strip_prefix(convention.getter_marker.as_str()) {
        match after_get.strip_prefix(convention.next_marker.as_str()) {
            Some(after_next) => (Role::NextIteratorStep, after_next),
            None => (Role::Getter, after_get),
        }
    } else if let Some(after_set) = stripped.strip_prefix(convention.setter_marker.as_str()) {
        (Role::Setter, after_set)
    } else {
        (Role::Plain, stripped)
    };

    let (owner_hint, bare_name) = match registry.longest_match(rest) {
        Some(owner) => (Some(owner.to_string()), rest[owner.len()..].to_string()),
        None => (None, rest.to_string()),
    };

    NamingClassification {
        owner_hint,
        bare_name,
        role,
    }
}

/// Compute the exposed method name for a declaration placed on `receiver`.
///
/// `stripped` is the declaration name with the library prefix removed. The
/// receiver's own type name is dropped from the method name in the common
/// spellings: `GetValueName` on `Value` becomes `get_name`, `DumpValue`
/// becomes `dump`, `ParseIRInContext` on `Context` becomes `parse_ir`, and a
/// leading receiver segment (`BasicBlockAsValue` on `BasicBlock`) is
/// stripped before conversion.
pub fn method_name(receiver: Option<&str>, stripped: &str) -> String {
    if let Some(class) = receiver {
        if let Some(rest) = stripped.strip_prefix(class) {
            if !rest.is_empty() {
                return method_name(receiver, rest);
            }
        }
    }

    let mut name = to_snake_case(stripped);
    if let Some(class) = receiver {
        let class_snake = to_snake_case(class);
        let prefix_get = format!("get_{class_snake}_");
        let prefix_set = format!("set_{class_snake}_");
        let suffix_in = format!("_in_{class_snake}");
        let suffix = format!("_{class_snake}");

        if let Some(rest) = name.strip_prefix(prefix_get.as_str()) {
            name = format!("get_{rest}");
        } else if let Some(rest) = name.strip_prefix(prefix_set.as_str()) {
            name = format!("set_{rest}");
        } else if let Some(rest) = name.strip_suffix(suffix_in.as_str()) {
            name = rest.to_string();
        } else if let Some(rest) = name.strip_suffix(suffix.as_str()) {
            name = rest.to_string();
        }
    }
    name
}
