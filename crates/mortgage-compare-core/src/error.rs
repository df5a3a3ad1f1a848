use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid parameter: {field} = {value} ({reason})")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid cadence: {months} months (supported cadences are 1, 3, 6 and 12)")]
    InvalidCadence { months: u32 },

    #[error("Invalid special payment at month {month}: {reason}")]
    InvalidSpecialPayment { month: u32, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
