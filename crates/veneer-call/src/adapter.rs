//! The foreign call boundary.
//!
//! Everything below this trait is opaque: how an invocation reaches the
//! native library is a collaborator concern. The dispatch layer guarantees
//! that by the time `invoke` runs, the arguments match the registered
//! declaration exactly.

use std::sync::Arc;

use veneer_model::FunctionDecl;

use crate::error::{CallError, Result};
use crate::value::{expected_kind, Value};

/// Converts a resolved call (function name plus typed arguments) into an
/// actual foreign invocation and marshals the result back.
pub trait ForeignCallAdapter {
    fn invoke(&self, function: &str, args: &[Value]) -> Result<Value>;
}

impl<A: ForeignCallAdapter + ?Sized> ForeignCallAdapter for &A {
    fn invoke(&self, function: &str, args: &[Value]) -> Result<Value> {
        (**self).invoke(function, args)
    }
}

impl<A: ForeignCallAdapter + ?Sized> ForeignCallAdapter for Arc<A> {
    fn invoke(&self, function: &str, args: &[Value]) -> Result<Value> {
        (**self).invoke(function, args)
    }
}

impl<A: ForeignCallAdapter + ?Sized> ForeignCallAdapter for Box<A> {
    fn invoke(&self, function: &str, args: &[Value]) -> Result<Value> {
        (**self).invoke(function, args)
    }
}

/// Check argument arity and kinds against a registered declaration.
///
/// A mismatch is fatal for the call; nothing is truncated or coerced.
pub fn check_signature(decl: &FunctionDecl, args: &[Value]) -> Result<()> {
    if args.len() != decl.parameters.len() {
        return Err(CallError::SignatureMismatch {
            function: decl.name.clone(),
            detail: format!(
                "expected {} arguments, got {}",
                decl.parameters.len(),
                args.len()
            ),
        });
    }
    for (index, (param, arg)) in decl.parameters.iter().zip(args).enumerate() {
        let expected = expected_kind(&param.ty);
        if arg.kind() != expected {
            return Err(CallError::SignatureMismatch {
                function: decl.name.clone(),
                detail: format!(
                    "argument {index}: expected {expected}, got {}",
                    arg.kind()
                ),
            });
        }
    }
    Ok(())
}
