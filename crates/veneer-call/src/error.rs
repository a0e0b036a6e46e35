//! Call-time error types.

/// Errors surfaced to the immediate caller of a dispatched foreign call.
///
/// None of these corrupt the surface table, and none are retried
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Argument count or kind does not match the registered declaration.
    #[error("signature mismatch calling '{function}': {detail}")]
    SignatureMismatch { function: String, detail: String },

    /// No global function with this name in the surface.
    #[error("unknown global function '{name}'")]
    UnknownFunction { name: String },

    /// No class with this name in the surface.
    #[error("unknown class '{name}'")]
    UnknownClass { name: String },

    /// No method with this name on the class.
    #[error("unknown method '{method}' on '{class}'")]
    UnknownMethod { class: String, method: String },

    /// No property with this name on the class.
    #[error("unknown property '{property}' on '{class}'")]
    UnknownProperty { class: String, property: String },

    /// The property exists but has no getter.
    #[error("property '{property}' on '{class}' is write-only")]
    PropertyNotReadable { class: String, property: String },

    /// The property exists but has no setter.
    #[error("property '{property}' on '{class}' is read-only")]
    PropertyNotWritable { class: String, property: String },

    /// No iteration helper with this name on the class.
    #[error("unknown iterator '{name}' on '{class}'")]
    UnknownIterator { class: String, name: String },

    /// A method was dispatched on the null sentinel handle.
    #[error("method '{method}' called on a null '{class}' handle")]
    NullReceiver { class: String, method: String },

    /// The foreign call itself failed, or the adapter returned a value
    /// incompatible with the declared result type.
    #[error("foreign call failed: {0}")]
    Foreign(String),
}

/// Result type alias for call operations.
pub type Result<T> = std::result::Result<T, CallError>;
