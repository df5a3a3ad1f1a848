//! Month-by-month schedule construction: the amortisation engine, the
//! escrow projector, and the composer that joins their output.

pub mod amortization;
pub mod compose;
pub mod escrow;

pub use amortization::{compute_schedule, AmortizationOutput, LoanParameters, PaymentRow};
pub use compose::{build_schedule, compose, ScenarioParameters, Schedule, ScheduleRow};
pub use escrow::{project_escrow, EscrowParameters};
