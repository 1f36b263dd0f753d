//! # evensplit-types
//!
//! Shared types, errors, and configuration for **evensplit**.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`ExpenseId`]
//! - **Expense model**: [`ExpenseRecord`] (wire form), [`Expense`], [`SplitMode`]
//! - **Balance model**: [`Balances`]
//! - **Settlement model**: [`SettlementEntry`], [`SettlementMap`], [`TransactionBreakdown`]
//! - **Results**: [`CalculationResults`], [`Rejection`], [`ComputationWarning`]
//! - **Configuration**: [`SettlementConfig`]
//! - **Errors**: [`EvensplitError`] with `ES_ERR_` prefix codes
//! - **Constants**: defaults and limits

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod expense;
pub mod ids;
pub mod results;
pub mod settlement;
pub mod warning;

// Re-export all primary types at crate root for ergonomic imports:
//   use evensplit_types::{Expense, Balances, SettlementMap, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use expense::*;
pub use ids::*;
pub use results::*;
pub use settlement::*;
pub use warning::*;

// Constants are accessed via `evensplit_types::constants::FOO`
// (not re-exported to avoid name collisions).
