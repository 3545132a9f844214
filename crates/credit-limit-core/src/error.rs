use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditEngineError {
    #[error("Structural parse error: {0}")]
    StructuralParse(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Compute error: {0}")]
    Compute(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CreditEngineError {
    fn from(e: serde_json::Error) -> Self {
        CreditEngineError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for CreditEngineError {
    fn from(e: csv::Error) -> Self {
        CreditEngineError::StructuralParse(e.to_string())
    }
}
