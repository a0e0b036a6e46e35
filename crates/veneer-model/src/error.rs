//! Declaration model error types.

/// Errors that can occur while building a declaration model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Failed to parse a C-like declaration signature.
    #[error("invalid signature: {detail}")]
    InvalidSignature { detail: String },

    /// A signature referenced a type name that is neither a primitive nor a
    /// registered opaque or enum type.
    #[error("unknown type '{name}' in signature '{signature}'")]
    UnknownType { name: String, signature: String },

    /// Two declarations with the same name in one API version.
    #[error("duplicate declaration '{name}'")]
    DuplicateDeclaration { name: String },

    /// Failed to validate an API manifest.
    #[error("invalid API manifest: {detail}")]
    InvalidManifest { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
