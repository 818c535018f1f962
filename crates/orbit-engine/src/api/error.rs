use thiserror::Error;

/// Rejected engine configuration. Raised at construction, never mid-frame.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("scale bounds are inverted: min {min} > max {max}")]
    InvertedScale { min: f64, max: f64 },

    #[error("translate extent is inverted: {min:?} .. {max:?}")]
    InvertedExtent { min: [f64; 2], max: [f64; 2] },

    #[error("overlap resolver needs at least one iteration")]
    ZeroIterations,

    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected entity snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("system at index {index} has an empty id")]
    EmptySystemId { index: usize },

    #[error("system id {id:?} appears more than once")]
    DuplicateSystemId { id: String },

    #[error("system {id:?} has a non-finite position ({x}, {y})")]
    NonFinitePosition { id: String, x: f64, y: f64 },
}
