pub mod compare;
pub mod escrow;
pub mod schedule;
