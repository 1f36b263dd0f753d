//! # evensplit-settlement
//!
//! **Settlement plane**: turns balances into transfers.
//!
//! ## Architecture
//!
//! 1. [`ExpenseSettler`] computes one expense's local balances and pairs
//!    the largest creditor with the largest debtor until one side runs out
//! 2. [`SettlementAggregator`] sums the per-expense maps into a summary
//! 3. [`ConservationCheck`] verifies balances and settled totals add up
//! 4. [`digest`] hashes a result set so repeated runs can be compared
//! 5. [`pipeline`] runs intake, balances, settlement and aggregation
//!
//! ```text
//! compute_results(CalculationInput) -> CalculationResults
//! ```
//!
//! Everything here is pure: the same input always yields the same output.

pub mod aggregator;
pub mod conservation;
pub mod digest;
pub mod pipeline;
pub mod settler;

pub use aggregator::SettlementAggregator;
pub use conservation::ConservationCheck;
pub use digest::{compute_results_digest, results_digest_hex, verify_results_digest};
pub use pipeline::{compute_for_expenses, compute_results};
pub use settler::ExpenseSettler;
