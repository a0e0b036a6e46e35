//! Foreign call boundary and generic dispatch for synthesized surfaces.
//!
//! The surface table says *what* can be called; this crate is *how* a call
//! happens: values and opaque handles, the adapter trait at the foreign
//! boundary, signature checking against registered declarations, and a
//! single polymorphic dispatch layer serving every generated class.
//!
//! ## Modules
//!
//! - [`value`] — runtime values and opaque handles
//! - [`adapter`] — the [`ForeignCallAdapter`] boundary and signature checks
//! - [`dispatch`] — bound objects, properties, and sibling iteration
//! - [`replay`] — a scriptable adapter for exercising surfaces in tests

pub mod adapter;
pub mod dispatch;
pub mod error;
pub mod replay;
pub mod value;

pub use adapter::{check_signature, ForeignCallAdapter};
pub use dispatch::{ApiSurface, BoundObject, HandleIter};
pub use error::CallError;
pub use replay::ReplayAdapter;
pub use value::{expected_kind, Handle, Value, ValueKind};
