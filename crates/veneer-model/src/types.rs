//! Type references for a parsed foreign API surface.

use serde::{Deserialize, Serialize};

/// A primitive (non-pointer, non-handle) foreign type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Void,
    Bool,
    Char,
    Int,
    UInt,
    Float,
    Double,
    Size,
}

/// A reference to a foreign type.
///
/// Two `TypeRef`s are equal iff they are structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(Primitive),
    /// Pointer to another type.
    Pointer(Box<TypeRef>),
    /// An opaque handle type, named after its owner type (e.g. "Value").
    Opaque(String),
    /// A named enumeration, passed across the boundary as an integer.
    Enum(String),
}

impl TypeRef {
    pub const VOID: TypeRef = TypeRef::Primitive(Primitive::Void);

    /// Wrap a type in one pointer level.
    pub fn pointer_to(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    /// Whether this type is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(Primitive::Void))
    }

    /// The pointed-to type, if this is a pointer.
    pub fn pointee(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    /// The owner-type name this reference resolves to: an opaque handle type,
    /// either directly or through a single pointer level.
    pub fn opaque_name(&self) -> Option<&str> {
        match self {
            TypeRef::Opaque(name) => Some(name),
            TypeRef::Pointer(inner) => match inner.as_ref() {
                TypeRef::Opaque(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this is a `char*`-style string reference.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            TypeRef::Pointer(inner) if matches!(inner.as_ref(), TypeRef::Primitive(Primitive::Char))
        )
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Void => write!(f, "void"),
            Primitive::Bool => write!(f, "bool"),
            Primitive::Char => write!(f, "char"),
            Primitive::Int => write!(f, "int"),
            Primitive::UInt => write!(f, "unsigned"),
            Primitive::Float => write!(f, "float"),
            Primitive::Double => write!(f, "double"),
            Primitive::Size => write!(f, "size_t"),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{p}"),
            TypeRef::Pointer(inner) => write!(f, "{inner}*"),
            TypeRef::Opaque(name) => write!(f, "{name}"),
            TypeRef::Enum(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let a = TypeRef::pointer_to(TypeRef::Opaque("Value".to_string()));
        let b = TypeRef::pointer_to(TypeRef::Opaque("Value".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, TypeRef::Opaque("Value".to_string()));
    }

    #[test]
    fn opaque_name_through_pointer() {
        let direct = TypeRef::Opaque("Module".to_string());
        let ptr = TypeRef::pointer_to(TypeRef::Opaque("Module".to_string()));
        let deep = TypeRef::pointer_to(TypeRef::pointer_to(TypeRef::Opaque("Module".to_string())));

        assert_eq!(direct.opaque_name(), Some("Module"));
        assert_eq!(ptr.opaque_name(), Some("Module"));
        // A pointer-to-pointer is an out argument, not a receiver.
        assert_eq!(deep.opaque_name(), None);
    }

    #[test]
    fn string_detection() {
        let s = TypeRef::pointer_to(TypeRef::Primitive(Primitive::Char));
        assert!(s.is_string());
        assert!(!TypeRef::Primitive(Primitive::Char).is_string());
    }

    #[test]
    fn display_c_spelling() {
        let t = TypeRef::pointer_to(TypeRef::Opaque("BasicBlock".to_string()));
        assert_eq!(t.to_string(), "BasicBlock*");
        assert_eq!(TypeRef::Primitive(Primitive::Size).to_string(), "size_t");
    }
}
