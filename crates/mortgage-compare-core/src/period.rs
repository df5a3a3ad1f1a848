use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::MortgageResult;

/// Recurrence cadence for extra payments and escrow growth.
///
/// A closed set: only whole-month cycles of 1, 3, 6 or 12 months exist.
/// Used purely as a policy selector; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Month,
    Trimester,
    HalfYear,
    Year,
}

impl Period {
    /// Cycle length in months.
    pub const fn months(self) -> u32 {
        match self {
            Period::Month => 1,
            Period::Trimester => 3,
            Period::HalfYear => 6,
            Period::Year => 12,
        }
    }

    /// Map a raw month count from a user-facing selector onto a cadence.
    ///
    /// Anything outside {1, 3, 6, 12} is rejected before it can reach a
    /// computation.
    pub fn from_months(months: u32) -> MortgageResult<Self> {
        match months {
            1 => Ok(Period::Month),
            3 => Ok(Period::Trimester),
            6 => Ok(Period::HalfYear),
            12 => Ok(Period::Year),
            other => Err(MortgageError::InvalidCadence { months: other }),
        }
    }
}
