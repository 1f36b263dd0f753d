//! Settlement types: who pays whom, and how much.
//!
//! A [`SettlementMap`] is a nested `debtor → creditor → amount` table. The
//! [`TransactionBreakdown`] holds one map per expense plus their sum.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{ExpenseId, ParticipantId};

/// A single transfer: `debtor` pays `creditor` `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub debtor: ParticipantId,
    pub creditor: ParticipantId,
    pub amount: Decimal,
}

impl std::fmt::Display for SettlementEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} owes {} {}", self.debtor, self.creditor, self.amount)
    }
}

/// Nested `debtor → creditor → amount` table.
///
/// Amounts for the same pair accumulate. Pairs are never netted against
/// each other: `A → B` and `B → A` may both appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementMap(BTreeMap<ParticipantId, BTreeMap<ParticipantId, Decimal>>);

impl SettlementMap {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `amount` to what `debtor` owes `creditor`.
    pub fn record(&mut self, debtor: &ParticipantId, creditor: &ParticipantId, amount: Decimal) {
        *self
            .0
            .entry(debtor.clone())
            .or_default()
            .entry(creditor.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// What `debtor` owes `creditor`; zero if they have no entry.
    #[must_use]
    pub fn amount(&self, debtor: &str, creditor: &str) -> Decimal {
        self.0
            .get(debtor)
            .and_then(|creditors| creditors.get(creditor))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all transfers.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().flat_map(BTreeMap::values).copied().sum()
    }

    /// Number of `(debtor, creditor)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(debtor, creditor, amount)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId, Decimal)> {
        self.0.iter().flat_map(|(debtor, creditors)| {
            creditors
                .iter()
                .map(move |(creditor, amount)| (debtor, creditor, *amount))
        })
    }

    /// Flattened transfer list in key order.
    #[must_use]
    pub fn entries(&self) -> Vec<SettlementEntry> {
        self.iter()
            .map(|(debtor, creditor, amount)| SettlementEntry {
                debtor: debtor.clone(),
                creditor: creditor.clone(),
                amount,
            })
            .collect()
    }

    /// Copy with amounts rounded half away from zero to `scale` places.
    /// Pairs that round to zero are dropped.
    #[must_use]
    pub fn rounded(&self, scale: u32) -> Self {
        let mut out = Self::new();
        for (debtor, creditor, amount) in self.iter() {
            let amount = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
            if !amount.is_zero() {
                out.record(debtor, creditor, amount);
            }
        }
        out
    }
}

impl FromIterator<SettlementEntry> for SettlementMap {
    fn from_iter<I: IntoIterator<Item = SettlementEntry>>(iter: I) -> Self {
        let mut map = Self::new();
        for entry in iter {
            map.record(&entry.debtor, &entry.creditor, entry.amount);
        }
        map
    }
}

/// Per-expense settlements and their global sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBreakdown {
    pub by_expense: BTreeMap<ExpenseId, SettlementMap>,
    pub summary: SettlementMap,
}

impl TransactionBreakdown {
    /// Copy with every per-expense amount rounded to `scale` places.
    ///
    /// The summary is rebuilt from the rounded maps rather than rounded on
    /// its own, so it stays their exact pairwise sum.
    #[must_use]
    pub fn rounded(&self, scale: u32) -> Self {
        let by_expense: BTreeMap<ExpenseId, SettlementMap> = self
            .by_expense
            .iter()
            .map(|(id, map)| (id.clone(), map.rounded(scale)))
            .collect();
        let mut summary = SettlementMap::new();
        for (debtor, creditor, amount) in by_expense.values().flat_map(SettlementMap::iter) {
            summary.record(debtor, creditor, amount);
        }
        Self {
            by_expense,
            summary,
        }
    }
}
