//! API manifest (`.api.toml`) parsing.
//!
//! An `.api.toml` file describes one version of a foreign API: its naming
//! convention, opaque handle types, enums, constants, and function
//! signatures. Loading a manifest yields everything one generation run
//! needs: the declaration model, the naming convention, and a freshly
//! populated owner-type registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::convention::NamingConvention;
use crate::declaration::{ApiModel, ConstantDecl, Declaration, EnumDecl};
use crate::error::{ModelError, Result};
use crate::registry::OwnerTypeRegistry;
use crate::signature::{parse_signature, SignatureContext};

/// A fully validated API manifest.
#[derive(Debug, Clone)]
pub struct ApiManifest {
    /// Short API name (e.g. "llvm").
    pub name: String,
    /// API version string, part of the cache fingerprint.
    pub version: String,
    pub convention: NamingConvention,
    pub model: ApiModel,
    pub registry: OwnerTypeRegistry,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    api: RawApi,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    enums: Vec<RawEnum>,
    #[serde(default)]
    constants: Vec<RawConstant>,
    #[serde(default)]
    functions: Vec<RawFunction>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    name: String,
    prefix: String,
    #[serde(default)]
    version: String,
    #[serde(default = "raw_marker_get", alias = "getter-marker")]
    getter_marker: String,
    #[serde(default = "raw_marker_set", alias = "setter-marker")]
    setter_marker: String,
    #[serde(default = "raw_marker_next", alias = "next-marker")]
    next_marker: String,
}

fn raw_marker_get() -> String {
    "Get".to_string()
}

fn raw_marker_set() -> String {
    "Set".to_string()
}

fn raw_marker_next() -> String {
    "Next".to_string()
}

#[derive(Debug, Deserialize)]
struct RawEnum {
    name: String,
    /// Variant name to integer value.
    variants: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
struct RawConstant {
    name: String,
    value: i64,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    signature: String,
}

impl ApiManifest {
    /// Parse an API manifest from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(input)?;

        if raw.api.name.is_empty() {
            return Err(ModelError::InvalidManifest {
                detail: "api.name is required".to_string(),
            });
        }
        if raw.api.prefix.is_empty() {
            return Err(ModelError::InvalidManifest {
                detail: "api.prefix is required".to_string(),
            });
        }

        let convention = NamingConvention {
            prefix: raw.api.prefix,
            getter_marker: raw.api.getter_marker,
            setter_marker: raw.api.setter_marker,
            next_marker: raw.api.next_marker,
        };
        convention.validate()?;

        let mut registry = OwnerTypeRegistry::new();
        let mut ctx = SignatureContext::new();
        let mut model = ApiModel::new();

        for name in &raw.types {
            registry.register(name.clone());
            ctx.add_opaque(name.clone());
            model.push(Declaration::Opaque { name: name.clone() })?;
        }
        for e in raw.enums {
            ctx.add_enum(e.name.clone());
            model.push(Declaration::Enum(EnumDecl {
                name: e.name,
                variants: e.variants.into_iter().collect(),
            }))?;
        }
        for c in raw.constants {
            model.push(Declaration::Constant(ConstantDecl {
                name: c.name,
                value: c.value,
            }))?;
        }
        for f in raw.functions {
            let decl = parse_signature(&f.signature, &ctx)?;
            model.push(Declaration::Function(decl))?;
        }

        Ok(ApiManifest {
            name: raw.api.name,
            version: raw.api.version,
            convention,
            model,
            registry,
        })
    }

    /// Load an API manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml = r#"
[api]
name = "llvm"
prefix = "LLVM"
version = "18.1"

types = ["Context", "Module", "Value"]

[[enums]]
name = "Opcode"
variants = { Ret = 1, Br = 2 }

[[constants]]
name = "LLVMAttributeReturnIndex"
value = 0

[[functions]]
signature = "const char* LLVMGetValueName(Value* v)"

[[functions]]
signature = "void LLVMSetValueName(Value* v, const char* name)"
"#;
        let manifest = ApiManifest::parse(toml).unwrap();
        assert_eq!(manifest.name, "llvm");
        assert_eq!(manifest.version, "18.1");
        assert_eq!(manifest.convention.prefix, "LLVM");
        assert_eq!(manifest.registry.len(), 3);
        assert_eq!(manifest.model.functions().count(), 2);
        assert_eq!(manifest.model.enums().count(), 1);
        assert_eq!(manifest.model.constants().count(), 1);
    }

    #[test]
    fn enum_variants_are_ordered() {
        let toml = r#"
[api]
name = "llvm"
prefix = "LLVM"

[[enums]]
name = "Visibility"
variants = { Hidden = 1, Default = 0 }
"#;
        let manifest = ApiManifest::parse(toml).unwrap();
        let e = manifest.model.enums().next().unwrap();
        // BTreeMap ordering keeps the table stable across runs.
        assert_eq!(e.variants[0].0, "Default");
        assert_eq!(e.variants[1].0, "Hidden");
    }

    #[test]
    fn missing_prefix_rejected() {
        let toml = r#"
[api]
name = "llvm"
prefix = ""
"#;
        assert!(ApiManifest::parse(toml).is_err());
    }

    #[test]
    fn unknown_signature_type_rejected() {
        let toml = r#"
[api]
name = "llvm"
prefix = "LLVM"

[[functions]]
signature = "Widget* LLVMGetWidget(void)"
"#;
        let err = ApiManifest::parse(toml).unwrap_err();
        assert!(matches!(err, ModelError::UnknownType { .. }));
    }

    #[test]
    fn kebab_case_markers() {
        let toml = r#"
[api]
name = "zlib"
prefix = "Zl"
getter-marker = "Read"
setter-marker = "Write"
next-marker = "Succ"
"#;
        let manifest = ApiManifest::parse(toml).unwrap();
        assert_eq!(manifest.convention.getter_marker, "Read");
        assert_eq!(manifest.convention.setter_marker, "Write");
        assert_eq!(manifest.convention.next_marker, "Succ");
    }
}
