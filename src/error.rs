use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Degenerate Geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Standard Mismatch: {segments} segments for {strokes} stroke definitions")]
    StandardMismatch { segments: usize, strokes: usize },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type GradeResult<T> = Result<T, GradeError>;
