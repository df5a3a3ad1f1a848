pub mod comparison;
pub mod error;
pub mod period;
pub mod schedule;
pub mod types;

pub use error::MortgageError;
pub use period::Period;
pub use types::*;

/// Standard result type for all schedule operations
pub type MortgageResult<T> = Result<T, MortgageError>;
