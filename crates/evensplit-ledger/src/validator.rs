//! Expense validator: the gate between raw records and the calculators.
//!
//! [`Expense`] construction already guarantees a positive amount, exactly
//! one split mode, a non-empty even split and non-negative contributions.
//! The validator adds the checks that need outside context:
//!
//! 1. Expense ids are unique within a run
//! 2. The payer is on the roster
//! 3. Every involved participant and contributor is on the roster
//! 4. Manual contributions add up to the amount (unless the config relaxes it)

use std::collections::BTreeSet;

use evensplit_types::{
    EvensplitError, Expense, ExpenseId, ExpenseRecord, Result, SettlementConfig, SplitMode,
};

use crate::Roster;

/// Validates expenses against a roster and config.
///
/// Stateful: it remembers every expense id it has seen, so a repeated id
/// is rejected even when the first copy was itself invalid.
pub struct ExpenseValidator<'a> {
    roster: &'a Roster,
    config: &'a SettlementConfig,
    seen_ids: BTreeSet<ExpenseId>,
}

impl<'a> ExpenseValidator<'a> {
    #[must_use]
    pub fn new(roster: &'a Roster, config: &'a SettlementConfig) -> Self {
        Self {
            roster,
            config,
            seen_ids: BTreeSet::new(),
        }
    }

    /// Convert and validate a raw record.
    ///
    /// # Errors
    /// Any validation error from [`Expense::try_from`] or [`Self::validate`].
    pub fn admit(&mut self, record: ExpenseRecord) -> Result<Expense> {
        self.claim_id(&record.id)?;
        let expense = Expense::try_from(record)?;
        self.check(&expense)?;
        Ok(expense)
    }

    /// Validate an already-constructed expense.
    ///
    /// # Errors
    /// - `DuplicateExpense` if the id was seen before
    /// - `UnknownPayer` / `UnknownParticipant` for names not on the roster
    /// - `ContributionMismatch` if manual contributions miss the amount
    pub fn validate(&mut self, expense: &Expense) -> Result<()> {
        self.claim_id(expense.id())?;
        self.check(expense)
    }

    fn claim_id(&mut self, id: &ExpenseId) -> Result<()> {
        if !self.seen_ids.insert(id.clone()) {
            return Err(EvensplitError::DuplicateExpense(id.clone()));
        }
        Ok(())
    }

    fn check(&self, expense: &Expense) -> Result<()> {
        if !self.roster.contains(expense.payer()) {
            return Err(EvensplitError::UnknownPayer(expense.payer().clone()));
        }

        if let Some(unknown) = expense
            .participants()
            .into_iter()
            .find(|p| !self.roster.contains(p))
        {
            return Err(EvensplitError::UnknownParticipant(unknown.clone()));
        }

        if let SplitMode::Manual(_) = expense.split() {
            let actual = expense.charged_total();
            if self.config.require_exact_contributions
                && !self.config.is_negligible(actual - expense.amount())
            {
                return Err(EvensplitError::ContributionMismatch {
                    expected: expense.amount(),
                    actual,
                });
            }
        }

        Ok(())
    }
}
