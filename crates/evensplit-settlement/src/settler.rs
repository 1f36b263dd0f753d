//! Greedy per-expense settlement.
//!
//! For one expense the settler works only with that expense's local
//! balances. It splits them into creditors (owed money) and debtors (owing
//! money) and repeatedly pairs the two largest:
//!
//! ```text
//! while creditors and debtors are both non-empty:
//!     c = largest creditor, d = largest debtor   (ties: lowest id)
//!     x = min(c.remaining, d.remaining)
//!     settlement[d][c] += x
//!     c.remaining -= x; d.remaining -= x
//!     drop whichever side is now within tolerance of zero
//! ```
//!
//! Each step clears at least one participant, so the loop runs at most
//! `|creditors| + |debtors| - 1` times. The greedy pairing keeps the
//! transfer count low but is not guaranteed minimal.

use std::collections::BTreeMap;

use evensplit_ledger::BalanceCalculator;
use evensplit_types::{
    Balances, ComputationWarning, Expense, ParticipantId, SettlementConfig, SettlementMap,
};
use rust_decimal::Decimal;

/// Remaining amounts per participant on one side of the matching.
type Side = BTreeMap<ParticipantId, Decimal>;

/// Produces debtor → creditor transfers that zero out a set of balances.
#[derive(Debug, Clone)]
pub struct ExpenseSettler {
    tolerance: Decimal,
}

impl ExpenseSettler {
    #[must_use]
    pub fn new(config: &SettlementConfig) -> Self {
        Self::with_tolerance(config.tolerance)
    }

    #[must_use]
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Settle a single expense against its own local balances.
    ///
    /// # Errors
    /// Returns [`ComputationWarning::UnbalancedExpense`] instead of a map
    /// when the local balances do not sum to zero within tolerance. That
    /// only happens for manual expenses whose contributions miss the
    /// amount; settling them would invent or lose money.
    pub fn settle(&self, expense: &Expense) -> Result<SettlementMap, ComputationWarning> {
        let local = BalanceCalculator::expense_deltas(expense);
        let residual = local.total();
        if residual.abs() > self.tolerance {
            return Err(ComputationWarning::UnbalancedExpense {
                expense_id: expense.id().clone(),
                residual,
            });
        }

        let settlement = self.settle_balances(&local);

        tracing::debug!(
            expense = %expense.id(),
            transfers = settlement.len(),
            total = %settlement.total(),
            "Expense settled"
        );

        Ok(settlement)
    }

    /// Run the greedy matching over an arbitrary balance table.
    ///
    /// No zero-sum check is made: if the balances do not net out, the
    /// larger side is left partly unsettled.
    #[must_use]
    pub fn settle_balances(&self, balances: &Balances) -> SettlementMap {
        let mut creditors = balances.creditors(self.tolerance);
        let mut debtors = balances.debtors(self.tolerance);
        let max_steps = (creditors.len() + debtors.len()).saturating_sub(1);

        let mut settlement = SettlementMap::new();
        let mut steps = 0usize;

        while let (Some((creditor, owed)), Some((debtor, owing))) =
            (largest(&creditors), largest(&debtors))
        {
            let amount = owed.min(owing);
            settlement.record(&debtor, &creditor, amount);
            steps += 1;

            tracing::trace!(
                debtor = %debtor,
                creditor = %creditor,
                amount = %amount,
                "Transfer matched"
            );

            self.reduce(&mut creditors, creditor, owed - amount);
            self.reduce(&mut debtors, debtor, owing - amount);
        }

        debug_assert!(steps <= max_steps, "greedy loop took {steps} > {max_steps} steps");
        settlement
    }

    fn reduce(&self, side: &mut Side, participant: ParticipantId, remaining: Decimal) {
        if remaining <= self.tolerance {
            side.remove(&participant);
        } else {
            side.insert(participant, remaining);
        }
    }
}

/// Largest remaining amount; among equal amounts, the lowest identifier.
fn largest(side: &Side) -> Option<(ParticipantId, Decimal)> {
    let mut best: Option<(&ParticipantId, Decimal)> = None;
    // Ascending id order, so only a strictly larger amount displaces the current pick.
    for (participant, amount) in side {
        if best.is_none_or(|(_, top)| *amount > top) {
            best = Some((participant, *amount));
        }
    }
    best.map(|(participant, amount)| (participant.clone(), amount))
}
