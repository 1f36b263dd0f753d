//! Non-fatal findings reported alongside the results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ExpenseId, ParticipantId};

/// Something looked wrong but the computation carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ComputationWarning {
    /// An expense's local balances do not sum to zero. Its balance effect
    /// is kept but no settlement is produced for it.
    UnbalancedExpense {
        expense_id: ExpenseId,
        residual: Decimal,
    },
    /// The global balances do not sum to zero.
    GlobalImbalance { residual: Decimal },
    /// A participant was listed more than once; later copies were ignored.
    DuplicateParticipant { participant: ParticipantId },
}

impl std::fmt::Display for ComputationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedExpense {
                expense_id,
                residual,
            } => write!(f, "{expense_id} is unbalanced by {residual}; settlement skipped"),
            Self::GlobalImbalance { residual } => {
                write!(f, "balances are off by {residual}")
            }
            Self::DuplicateParticipant { participant } => {
                write!(f, "participant {participant} listed more than once")
            }
        }
    }
}
