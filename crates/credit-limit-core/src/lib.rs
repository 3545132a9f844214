pub mod error;
pub mod types;

#[cfg(feature = "statement")]
pub mod statement;

#[cfg(feature = "scoring")]
pub mod kyc;

#[cfg(feature = "scoring")]
pub mod fuzzy;

#[cfg(feature = "scoring")]
pub mod limit;

pub use error::CreditEngineError;
pub use types::*;

/// Standard result type for all engine operations
pub type CreditEngineResult<T> = Result<T, CreditEngineError>;
