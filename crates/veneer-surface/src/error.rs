//! Surface synthesis error types.

/// Errors that can occur while synthesizing a binding surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Synthesis was attempted with no owner-type names registered while
    /// declarations take opaque handle parameters. A surface with no classes
    /// would be silently useless, so this aborts the whole run.
    #[error("owner-type registry is empty but declarations take opaque handle parameters")]
    RegistryEmpty,

    /// Two declarations synthesize the same method name on the same class
    /// (reported only under [`CollisionPolicy::Fail`]).
    ///
    /// [`CollisionPolicy::Fail`]: crate::synth::CollisionPolicy::Fail
    #[error("method '{method}' on '{owner}' is defined by both '{first}' and '{second}'")]
    MethodCollision {
        owner: String,
        method: String,
        first: String,
        second: String,
    },

    /// Two accessors claim the same property slot (reported only under
    /// [`CollisionPolicy::Fail`]).
    ///
    /// [`CollisionPolicy::Fail`]: crate::synth::CollisionPolicy::Fail
    #[error("property '{property}' on '{owner}' has conflicting accessors")]
    PropertyCollision { owner: String, property: String },

    /// Declaration model error.
    #[error(transparent)]
    Model(#[from] veneer_model::ModelError),
}

/// Result type alias for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
