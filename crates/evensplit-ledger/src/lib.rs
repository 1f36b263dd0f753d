//! # evensplit-ledger
//!
//! **Intake side**: turns raw expense records into validated expenses and
//! derives every participant's net balance from them.
//!
//! ## Flow
//!
//! ```text
//! participants → Roster
//! ExpenseRecord → Expense::try_from → ExpenseValidator.validate → Intake.expenses
//!                                              └─(error)→ Intake.rejected
//! Intake.expenses → BalanceCalculator::calculate → Balances
//! ```
//!
//! A bad record never blocks the rest: it is rejected with its error code
//! and the remaining records carry on.

pub mod balance_calculator;
pub mod intake;
pub mod roster;
pub mod validator;

pub use balance_calculator::BalanceCalculator;
pub use intake::{Intake, admit};
pub use roster::Roster;
pub use validator::ExpenseValidator;
