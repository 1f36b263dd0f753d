//! Conservation invariant checks.
//!
//! Money moves between participants but is never created or destroyed:
//! ```text
//! Σ balances                      ≈ 0
//! Σ settlement(expense)           ≈ Σ positive local balances(expense)
//! summary[d][c]                   = Σ_expense byExpense[expense][d][c]
//! ```
//! "≈" means within the configured tolerance.

use evensplit_types::{
    Balances, EvensplitError, Result, SettlementMap, TransactionBreakdown,
};
use rust_decimal::Decimal;

use crate::SettlementAggregator;

/// Tolerance-aware checks over balances and settlements.
#[derive(Debug, Clone, Copy)]
pub struct ConservationCheck {
    tolerance: Decimal,
}

impl ConservationCheck {
    #[must_use]
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Balances must net to zero.
    ///
    /// # Errors
    /// Returns [`EvensplitError::ConservationViolation`] if `|Σ balances|`
    /// exceeds the tolerance.
    pub fn verify_zero_sum(&self, balances: &Balances) -> Result<()> {
        let total = balances.total();
        if total.abs() > self.tolerance {
            return Err(EvensplitError::ConservationViolation {
                reason: format!(
                    "balances sum to {total} across {} participants",
                    balances.len()
                ),
            });
        }
        Ok(())
    }

    /// A settlement must move exactly what its creditors are owed.
    ///
    /// # Errors
    /// Returns [`EvensplitError::ConservationViolation`] if the settled
    /// total differs from the positive balance total by more than the
    /// tolerance.
    pub fn verify_settled_total(&self, balances: &Balances, settlement: &SettlementMap) -> Result<()> {
        let owed = balances.positive_total(self.tolerance);
        let settled = settlement.total();
        if (owed - settled).abs() > self.tolerance {
            return Err(EvensplitError::ConservationViolation {
                reason: format!("settled {settled} but creditors are owed {owed}"),
            });
        }
        Ok(())
    }

    /// The summary must be the pairwise sum of the per-expense maps.
    ///
    /// # Errors
    /// Returns [`EvensplitError::ConservationViolation`] naming the first
    /// pair that differs.
    pub fn verify_summary(&self, breakdown: &TransactionBreakdown) -> Result<()> {
        let expected = SettlementAggregator::aggregate(breakdown.by_expense.values());
        if expected.len() != breakdown.summary.len() {
            return Err(EvensplitError::ConservationViolation {
                reason: format!(
                    "summary has {} pairs, per-expense maps have {}",
                    breakdown.summary.len(),
                    expected.len()
                ),
            });
        }
        for (debtor, creditor, amount) in expected.iter() {
            let reported = breakdown.summary.amount(debtor.as_str(), creditor.as_str());
            if (reported - amount).abs() > self.tolerance {
                return Err(EvensplitError::ConservationViolation {
                    reason: format!(
                        "summary {debtor}→{creditor} is {reported}, per-expense sum is {amount}"
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use evensplit_types::{ExpenseId, ParticipantId};

    use super::*;

    fn check() -> ConservationCheck {
        ConservationCheck::new(Decimal::new(1, 6))
    }

    fn balances(entries: &[(&str, i64)]) -> Balances {
        entries
            .iter()
            .map(|(p, v)| (ParticipantId::from(*p), Decimal::new(*v, 0)))
            .collect()
    }

    #[test]
    fn zero_sum_passes() {
        assert!(check().verify_zero_sum(&balances(&[("A", 60), ("B", -30), ("C", -30)])).is_ok());
        assert!(check().verify_zero_sum(&Balances::new()).is_ok());
    }

    #[test]
    fn imbalance_fails() {
        let err = check()
            .verify_zero_sum(&balances(&[("A", 60), ("B", -30)]))
            .unwrap_err();
        assert!(matches!(err, EvensplitError::ConservationViolation { .. }));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn residual_within_tolerance_passes() {
        let mut table = balances(&[("A", 60), ("B", -60)]);
        table.credit(&ParticipantId::from("A"), Decimal::new(1, 9)).unwrap();
        assert!(check().verify_zero_sum(&table).is_ok());
    }

    #[test]
    fn settled_total_must_match_owed() {
        let table = balances(&[("A", 60), ("B", -30), ("C", -30)]);
        let mut settlement = SettlementMap::new();
        settlement.record(&ParticipantId::from("B"), &ParticipantId::from("A"), Decimal::new(30, 0));
        assert!(check().verify_settled_total(&table, &settlement).is_err());

        settlement.record(&ParticipantId::from("C"), &ParticipantId::from("A"), Decimal::new(30, 0));
        assert!(check().verify_settled_total(&table, &settlement).is_ok());
    }

    #[test]
    fn summary_must_match_breakdown() {
        let mut map = SettlementMap::new();
        map.record(&ParticipantId::from("B"), &ParticipantId::from("A"), Decimal::new(30, 0));
        let mut by_expense = BTreeMap::new();
        by_expense.insert(ExpenseId::from("e1"), map);

        let good = SettlementAggregator::breakdown(by_expense.clone());
        assert!(check().verify_summary(&good).is_ok());

        let mut tampered = good.clone();
        tampered.summary.record(&ParticipantId::from("B"), &ParticipantId::from("A"), Decimal::ONE);
        assert!(check().verify_summary(&tampered).is_err());

        let mut extra = good;
        extra.summary.record(&ParticipantId::from("C"), &ParticipantId::from("A"), Decimal::ONE);
        assert!(check().verify_summary(&extra).is_err());
    }
}
