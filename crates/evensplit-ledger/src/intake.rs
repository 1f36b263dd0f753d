//! Skip-and-report intake of a whole record list.

use evensplit_types::{
    ComputationWarning, Expense, ExpenseRecord, ParticipantId, Rejection, SettlementConfig,
};

use crate::{ExpenseValidator, Roster};

/// Outcome of admitting a batch of records.
#[derive(Debug, Clone, Default)]
pub struct Intake {
    pub roster: Roster,
    /// Accepted expenses, in input order.
    pub expenses: Vec<Expense>,
    /// Records left out, in input order.
    pub rejected: Vec<Rejection>,
    pub warnings: Vec<ComputationWarning>,
}

/// Validate every record against the roster. Invalid records are rejected
/// individually; the rest are admitted.
#[must_use]
pub fn admit(
    participants: impl IntoIterator<Item = ParticipantId>,
    records: impl IntoIterator<Item = ExpenseRecord>,
    config: &SettlementConfig,
) -> Intake {
    let roster = Roster::new(participants);
    let mut expenses = Vec::new();
    let mut rejected = Vec::new();

    {
        let mut validator = ExpenseValidator::new(&roster, config);
        for record in records {
            let id = record.id.clone();
            match validator.admit(record) {
                Ok(expense) => expenses.push(expense),
                Err(err) => {
                    tracing::warn!(expense = %id, code = err.code(), error = %err, "Expense rejected");
                    rejected.push(Rejection::new(id, &err));
                }
            }
        }
    }

    let warnings = roster.warnings();
    Intake {
        roster,
        expenses,
        rejected,
        warnings,
    }
}
