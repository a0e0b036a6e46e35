//! Runtime values crossing the foreign call boundary.

use serde::{Deserialize, Serialize};
use veneer_model::{Primitive, TypeRef};

/// An address-sized opaque handle token.
///
/// A handle has no client-side structure. Its only legal operations are
/// storage, comparison against [`Handle::NULL`], and being passed back into
/// another foreign invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    /// The null sentinel, signaling "no object" and iteration end.
    pub const NULL: Handle = Handle(0);

    pub fn new(raw: u64) -> Self {
        Handle(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A value passed to or returned from a foreign call.
///
/// Strings cross the boundary by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(String),
    Handle(Handle),
}

/// Discriminant for [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unit,
    Int,
    UInt,
    Float,
    Bool,
    Str,
    Handle,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Unit => "unit",
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Str => "string",
            ValueKind::Handle => "handle",
        };
        write!(f, "{name}")
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Handle(_) => ValueKind::Handle,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is acceptable for a parameter of the given type.
    pub fn matches(&self, ty: &TypeRef) -> bool {
        self.kind() == expected_kind(ty)
    }
}

/// The value kind a declared parameter or result type expects.
pub fn expected_kind(ty: &TypeRef) -> ValueKind {
    match ty {
        TypeRef::Primitive(p) => match p {
            Primitive::Void => ValueKind::Unit,
            Primitive::Bool => ValueKind::Bool,
            Primitive::Char | Primitive::Int => ValueKind::Int,
            Primitive::UInt | Primitive::Size => ValueKind::UInt,
            Primitive::Float | Primitive::Double => ValueKind::Float,
        },
        // Enums travel as plain integers.
        TypeRef::Enum(_) => ValueKind::Int,
        TypeRef::Opaque(_) => ValueKind::Handle,
        TypeRef::Pointer(_) if ty.is_string() => ValueKind::Str,
        TypeRef::Pointer(_) => ValueKind::Handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sentinel() {
        assert!(Handle::NULL.is_null());
        assert!(!Handle::new(0x1000).is_null());
        assert_eq!(Handle::new(0), Handle::NULL);
    }

    #[test]
    fn kind_matching() {
        let handle_ty = TypeRef::pointer_to(TypeRef::Opaque("Value".to_string()));
        assert!(Value::Handle(Handle::new(1)).matches(&handle_ty));
        assert!(!Value::Int(1).matches(&handle_ty));

        let string_ty = TypeRef::pointer_to(TypeRef::Primitive(Primitive::Char));
        assert!(Value::Str("x".to_string()).matches(&string_ty));

        assert!(Value::Int(3).matches(&TypeRef::Enum("Opcode".to_string())));
        assert!(Value::UInt(3).matches(&TypeRef::Primitive(Primitive::Size)));
    }

    #[test]
    fn no_coercion_between_int_kinds() {
        assert!(!Value::Int(1).matches(&TypeRef::Primitive(Primitive::UInt)));
        assert!(!Value::UInt(1).matches(&TypeRef::Primitive(Primitive::Int)));
    }
}
