use thiserror::Error;

/// Top-level error type for the zonetape pipeline.
#[derive(Debug, Error)]
pub enum ZonetapeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors reported by the scene container.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid face: {0}")]
    InvalidFace(String),

    #[error("container operation failed: {0}")]
    Failed(String),
}

/// Errors related to tape construction.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("build failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ZonetapeError`].
pub type Result<T> = std::result::Result<T, ZonetapeError>;

/// Result alias for scene container operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;
