//! Domain-level error type shared across all crates.

/// Domain errors produced by core logic, repositories, and the pipeline.
///
/// The API layer maps these onto HTTP statuses; messages for the
/// `Internal`, `Render` and `Crypto` variants are never surfaced verbatim
/// to callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity does not exist, or exists outside the caller's tenant.
    /// Cross-tenant rows are reported identically to missing rows so the
    /// error leaks no existence information.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Caller-supplied input failed validation. The message is
    /// field-specific and safe to show to the caller.
    #[error("{0}")]
    Validation(String),

    /// The operation conflicts with current state (duplicate slug,
    /// illegal lifecycle transition).
    #[error("{0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required role or tenant.
    #[error("{0}")]
    Forbidden(String),

    /// Template compilation or PDF rasterization failed. Distinct from
    /// `Internal` so callers can tell a bad template from a broken server.
    #[error("rendering failed: {0}")]
    Render(String),

    /// Encryption or decryption failed. Decryption failures are fatal for
    /// the read; partially decrypted data is never returned.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Anything else: storage, database, infrastructure.
    #[error("{0}")]
    Internal(String),
}

/// Convenience alias used throughout the workspace.
pub type CoreResult<T> = Result<T, CoreError>;
