//! The full output of one computation run.

use serde::{Deserialize, Serialize};

use crate::{
    Balances, ComputationWarning, EvensplitError, ExpenseId, ExpenseRecord, ParticipantId,
    SettlementMap, TransactionBreakdown,
};

/// Everything a caller supplies for one computation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub participants: Vec<ParticipantId>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

/// An expense left out of the computation, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub expense_id: ExpenseId,
    pub code: u16,
    pub reason: String,
}

impl Rejection {
    #[must_use]
    pub fn new(expense_id: ExpenseId, error: &EvensplitError) -> Self {
        Self {
            expense_id,
            code: error.code(),
            reason: error.to_string(),
        }
    }
}

/// Balances, settlements and diagnostics for a set of expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub balances: Balances,
    pub transactions: TransactionBreakdown,
    pub rejected: Vec<Rejection>,
    pub warnings: Vec<ComputationWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_settlement: Option<SettlementMap>,
}

impl CalculationResults {
    /// Whether every expense was accepted and nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }

    /// Copy with every reported amount rounded to `scale` places.
    ///
    /// Balances are quantized so their rounded total matches the exact
    /// one; the transaction summary is re-summed from the rounded
    /// per-expense maps.
    #[must_use]
    pub fn rounded(&self, scale: u32) -> Self {
        Self {
            balances: self.balances.quantized(scale),
            transactions: self.transactions.rounded(scale),
            rejected: self.rejected.clone(),
            warnings: self.warnings.clone(),
            net_settlement: self.net_settlement.as_ref().map(|net| net.rounded(scale)),
        }
    }
}
