use thiserror::Error;

/// Top-level error type for the building generator.
#[derive(Debug, Error)]
pub enum PlacesmithError {
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors related to place boundary metadata.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("place {place_id} has no boundary data")]
    NoBoundaryData { place_id: String },

    #[error("malformed {field}: {value:?}")]
    Malformed { field: &'static str, value: String },

    #[error("boundary needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("invalid boundary metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to geometric inputs.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} must be positive")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while combining solids.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("synthesis failed: {0}")]
    SynthesisFailure(String),
}

/// Errors related to build configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config value {name} = {value} is out of range")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("search grid has no {0} candidates")]
    EmptyGrid(&'static str),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while exporting a building mesh.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("export write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`PlacesmithError`].
pub type Result<T> = std::result::Result<T, PlacesmithError>;
