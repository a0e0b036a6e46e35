//! Declarations parsed from a foreign API, and the per-version model that
//! collects them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::types::TypeRef;

/// A named function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (may be empty if unnamed in the source declaration).
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
}

/// A foreign function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Full foreign symbol name, including the API prefix.
    pub name: String,
    /// Ordered parameter list.
    pub parameters: Vec<Parameter>,
    /// Return type.
    pub return_type: TypeRef,
}

impl FunctionDecl {
    /// The type of the first parameter, if any.
    pub fn receiver_type(&self) -> Option<&TypeRef> {
        self.parameters.first().map(|p| &p.ty)
    }
}

/// An enumeration declaration with its variant values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    /// Variant names and their integer values, in a stable order.
    pub variants: Vec<(String, i64)>,
}

/// A named integer constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantDecl {
    pub name: String,
    pub value: i64,
}

/// One declaration from a parsed API surface.
///
/// Identity is the declaration name, unique within one API version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declaration {
    Function(FunctionDecl),
    /// An opaque handle type (owner-type candidate).
    Opaque { name: String },
    Enum(EnumDecl),
    Constant(ConstantDecl),
}

/// Discriminant for [`Declaration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Opaque,
    Enum,
    Constant,
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(f) => &f.name,
            Declaration::Opaque { name } => name,
            Declaration::Enum(e) => &e.name,
            Declaration::Constant(c) => &c.name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Function(_) => DeclKind::Function,
            Declaration::Opaque { .. } => DeclKind::Opaque,
            Declaration::Enum(_) => DeclKind::Enum,
            Declaration::Constant(_) => DeclKind::Constant,
        }
    }
}

/// The fully materialized declaration model for one API version.
///
/// Declarations are immutable once pushed and keep their registration order,
/// which downstream synthesis relies on for its documented collision policy.
#[derive(Debug, Clone, Default)]
pub struct ApiModel {
    declarations: Vec<Declaration>,
    by_name: HashMap<String, usize>,
}

impl ApiModel {
    pub fn new() -> Self {
        ApiModel::default()
    }

    /// Add a declaration, rejecting duplicate names.
    pub fn push(&mut self, decl: Declaration) -> Result<()> {
        let name = decl.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(ModelError::DuplicateDeclaration { name });
        }
        self.by_name.insert(name, self.declarations.len());
        self.declarations.push(decl);
        Ok(())
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.by_name.get(name).map(|&i| &self.declarations[i])
    }

    /// All declarations, in registration order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Function declarations, in registration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Names of declared opaque handle types.
    pub fn opaque_types(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Opaque { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstantDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Constant(c) => Some(c),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn func(name: &str) -> Declaration {
        Declaration::Function(FunctionDecl {
            name: name.to_string(),
            parameters: vec![],
            return_type: TypeRef::Primitive(Primitive::Void),
        })
    }

    #[test]
    fn push_and_lookup() {
        let mut model = ApiModel::new();
        model.push(func("LLVMDumpModule")).unwrap();
        model.push(Declaration::Opaque { name: "Module".to_string() }).unwrap();

        assert_eq!(model.len(), 2);
        assert_eq!(model.get("LLVMDumpModule").unwrap().kind(), DeclKind::Function);
        assert_eq!(model.get("Module").unwrap().kind(), DeclKind::Opaque);
        assert!(model.get("Missing").is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut model = ApiModel::new();
        model.push(func("LLVMDumpModule")).unwrap();
        let err = model.push(func("LLVMDumpModule")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn registration_order_preserved() {
        let mut model = ApiModel::new();
        model.push(func("LLVMB")).unwrap();
        model.push(func("LLVMA")).unwrap();
        let names: Vec<_> = model.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["LLVMB", "LLVMA"]);
    }

    #[test]
    fn kind_filters() {
        let mut model = ApiModel::new();
        model.push(func("LLVMDumpModule")).unwrap();
        model.push(Declaration::Opaque { name: "Value".to_string() }).unwrap();
        model
            .push(Declaration::Enum(EnumDecl {
                name: "Opcode".to_string(),
                variants: vec![("Ret".to_string(), 1)],
            }))
            .unwrap();
        model
            .push(Declaration::Constant(ConstantDecl {
                name: "AttributeReturnIndex".to_string(),
                value: 0,
            }))
            .unwrap();

        assert_eq!(model.functions().count(), 1);
        assert_eq!(model.opaque_types().count(), 1);
        assert_eq!(model.enums().count(), 1);
        assert_eq!(model.constants().count(), 1);
    }
}
