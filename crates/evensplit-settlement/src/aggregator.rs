//! Aggregation of per-expense settlements into one summary.

use std::collections::BTreeMap;

use evensplit_types::{ExpenseId, SettlementMap, TransactionBreakdown};

/// Sums settlement maps pair by pair.
///
/// Purely additive: no netting of opposite pairs, and the result does not
/// depend on the order the maps are visited in.
pub struct SettlementAggregator;

impl SettlementAggregator {
    /// `summary[d][c] = Σ map[d][c]` over all maps.
    pub fn aggregate<'a>(maps: impl IntoIterator<Item = &'a SettlementMap>) -> SettlementMap {
        let mut summary = SettlementMap::new();
        for map in maps {
            for (debtor, creditor, amount) in map.iter() {
                summary.record(debtor, creditor, amount);
            }
        }
        summary
    }

    /// Wrap per-expense maps together with their summary.
    #[must_use]
    pub fn breakdown(by_expense: BTreeMap<ExpenseId, SettlementMap>) -> TransactionBreakdown {
        let summary = Self::aggregate(by_expense.values());

        tracing::debug!(
            expenses = by_expense.len(),
            pairs = summary.len(),
            total = %summary.total(),
            "Settlements aggregated"
        );

        TransactionBreakdown {
            by_expense,
            summary,
        }
    }
}
