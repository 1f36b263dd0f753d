//! Net balance calculation.
//!
//! Every expense credits its payer with the full amount and debits each
//! participant their share:
//!
//! ```text
//! Evenly:     share = amount / |involved|, each involved participant -share
//! Manual(c):  each contributor -c[p]
//! both:       payer +amount
//! ```
//!
//! A payer who is also involved ends up at `amount × (n-1)/n` for an even
//! split; a payer outside the split gets the full amount back.

use std::collections::BTreeMap;

use evensplit_types::{Balances, Expense, ParticipantId, Result, SplitMode};
use rust_decimal::Decimal;

/// Derives signed net balances from expenses. Pure and deterministic.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Net balance of every participant across `expenses`, applied in order.
    ///
    /// Every listed participant appears in the result, starting from zero.
    /// Participants that only appear inside an expense are added on first
    /// touch rather than dropped.
    ///
    /// # Errors
    /// [`evensplit_types::EvensplitError::BalanceOverflow`] from the first
    /// expense that would push a running balance out of range.
    pub fn calculate(participants: &[ParticipantId], expenses: &[Expense]) -> Result<Balances> {
        let mut balances = Balances::zeroed(participants);
        for expense in expenses {
            Self::apply(&mut balances, expense)?;
        }

        tracing::debug!(
            participants = balances.len(),
            expenses = expenses.len(),
            total = %balances.total(),
            "Balances calculated"
        );

        Ok(balances)
    }

    /// Apply one expense to a balance table, all or nothing.
    ///
    /// # Errors
    /// [`evensplit_types::EvensplitError::BalanceOverflow`]; `balances` is
    /// left untouched.
    pub fn apply(balances: &mut Balances, expense: &Expense) -> Result<()> {
        balances.merge(&Self::expense_deltas(expense))
    }

    /// The expense's effect on its own participants, each starting at zero.
    ///
    /// Keys are the involved participants, contributors and the payer.
    #[must_use]
    pub fn expense_deltas(expense: &Expense) -> Balances {
        let mut local: BTreeMap<ParticipantId, Decimal> = expense
            .participants()
            .into_iter()
            .map(|p| (p.clone(), Decimal::ZERO))
            .collect();

        match expense.split() {
            SplitMode::Evenly => {
                let share = expense.amount() / Decimal::from(expense.involved().len());
                for participant in expense.involved() {
                    local.insert(participant.clone(), -share);
                }
            }
            SplitMode::Manual(contributions) => {
                for (participant, contribution) in contributions {
                    local.insert(participant.clone(), -*contribution);
                }
            }
        }

        // Amount and shares are capped at MAX_AMOUNT when the expense is built.
        if let Some(payer) = local.get_mut(expense.payer()) {
            *payer += expense.amount();
        }

        local.into_iter().collect()
    }
}
