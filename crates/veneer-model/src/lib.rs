//! Declaration model for a parsed foreign C API surface.
//!
//! Everything downstream generation consumes lives here: type references,
//! function/enum/constant declarations, the per-version owner-type registry,
//! the naming convention configuration, and the `.api.toml` manifest format
//! that bundles them.
//!
//! ## Modules
//!
//! - [`types`] — primitive and structural type references
//! - [`declaration`] — declarations and the per-version [`ApiModel`]
//! - [`convention`] — naming convention configuration
//! - [`registry`] — append-only owner-type name registry
//! - [`signature`] — C-like declaration signature parser
//! - [`manifest`] — `.api.toml` manifest loading

pub mod convention;
pub mod declaration;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod signature;
pub mod types;

pub use convention::NamingConvention;
pub use declaration::{ApiModel, ConstantDecl, DeclKind, Declaration, EnumDecl, FunctionDecl, Parameter};
pub use error::ModelError;
pub use manifest::ApiManifest;
pub use registry::OwnerTypeRegistry;
pub use signature::{parse_signature, SignatureContext};
pub use types::{Primitive, TypeRef};
