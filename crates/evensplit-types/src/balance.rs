//! Net balance tracking.
//!
//! A balance is signed: positive means the participant **is owed** money,
//! negative means they **owe** money. Across a consistent set of expenses
//! the balances sum to zero.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{EvensplitError, ParticipantId, Result};

/// Signed net balance per participant, in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<ParticipantId, Decimal>);

impl Balances {
    /// Create an empty balance table.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Create a table with every given participant at zero.
    pub fn zeroed<'a>(participants: impl IntoIterator<Item = &'a ParticipantId>) -> Self {
        Self(
            participants
                .into_iter()
                .map(|p| (p.clone(), Decimal::ZERO))
                .collect(),
        )
    }

    /// Increase a participant's balance (they are owed more).
    ///
    /// # Errors
    /// [`EvensplitError::BalanceOverflow`] if the result is out of range;
    /// the balance is left unchanged.
    pub fn credit(&mut self, participant: &ParticipantId, amount: Decimal) -> Result<()> {
        let updated = self
            .get(participant.as_str())
            .checked_add(amount)
            .ok_or_else(|| overflow(participant))?;
        self.0.insert(participant.clone(), updated);
        Ok(())
    }

    /// Decrease a participant's balance (they owe more).
    ///
    /// # Errors
    /// [`EvensplitError::BalanceOverflow`] if the result is out of range;
    /// the balance is left unchanged.
    pub fn debit(&mut self, participant: &ParticipantId, amount: Decimal) -> Result<()> {
        let updated = self
            .get(participant.as_str())
            .checked_sub(amount)
            .ok_or_else(|| overflow(participant))?;
        self.0.insert(participant.clone(), updated);
        Ok(())
    }

    /// Add every entry of `deltas` to this table, all or nothing.
    ///
    /// # Errors
    /// [`EvensplitError::BalanceOverflow`] naming the first participant
    /// whose balance would leave `Decimal`'s range. Nothing is applied.
    pub fn merge(&mut self, deltas: &Balances) -> Result<()> {
        let updated = deltas
            .iter()
            .map(|(participant, delta)| {
                self.get(participant.as_str())
                    .checked_add(*delta)
                    .map(|value| (participant.clone(), value))
                    .ok_or_else(|| overflow(participant))
            })
            .collect::<Result<Vec<_>>>()?;
        self.0.extend(updated);
        Ok(())
    }

    /// Balance for a participant; zero if unknown.
    #[must_use]
    pub fn get(&self, participant: &str) -> Decimal {
        self.0.get(participant).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn contains(&self, participant: &str) -> bool {
        self.0.contains_key(participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &Decimal)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero for a consistent table.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Participants owed more than `tolerance`, with the amount owed to them.
    #[must_use]
    pub fn creditors(&self, tolerance: Decimal) -> BTreeMap<ParticipantId, Decimal> {
        self.0
            .iter()
            .filter(|(_, balance)| **balance > tolerance)
            .map(|(p, balance)| (p.clone(), *balance))
            .collect()
    }

    /// Participants owing more than `tolerance`, with the magnitude they owe.
    #[must_use]
    pub fn debtors(&self, tolerance: Decimal) -> BTreeMap<ParticipantId, Decimal> {
        self.0
            .iter()
            .filter(|(_, balance)| **balance < -tolerance)
            .map(|(p, balance)| (p.clone(), balance.abs()))
            .collect()
    }

    /// Total owed to creditors (sum of positive balances above `tolerance`).
    #[must_use]
    pub fn positive_total(&self, tolerance: Decimal) -> Decimal {
        self.creditors(tolerance).values().copied().sum()
    }

    /// Copy with every balance rounded half away from zero to `scale` places.
    ///
    /// Each value is rounded on its own, so the rounded table may be off
    /// zero by a few units of the last place. See [`Self::quantized`].
    #[must_use]
    pub fn rounded(&self, scale: u32) -> Self {
        Self(
            self.0
                .iter()
                .map(|(p, balance)| (p.clone(), round_half_away(*balance, scale)))
                .collect(),
        )
    }

    /// Copy rounded to `scale` places whose total is the rounded exact total.
    ///
    /// Plain rounding of thirds gives `66.67 / -33.33 / -33.33`, one cent
    /// off. The surplus units are moved one per participant, starting with
    /// whoever rounding favoured most (ties: lowest id), so nobody ends up
    /// more than one unit away from their plainly rounded value.
    #[must_use]
    pub fn quantized(&self, scale: u32) -> Self {
        let mut rounded = self.rounded(scale);
        let Ok(unit) = Decimal::try_new(1, scale) else {
            return rounded;
        };
        let excess = rounded.total() - round_half_away(self.total(), scale);
        let steps = (excess / unit).abs().to_usize().unwrap_or(usize::MAX);
        if steps == 0 || steps > rounded.len() {
            return rounded;
        }

        // Gain from rounding per participant.
        let mut order: Vec<(ParticipantId, Decimal)> = self
            .0
            .iter()
            .map(|(p, exact)| (p.clone(), rounded.get(p.as_str()) - *exact))
            .collect();
        let (adjust, surplus) = if excess.is_sign_positive() {
            (-unit, true)
        } else {
            (unit, false)
        };
        order.sort_by(|(pa, ga), (pb, gb)| {
            let by_gain = if surplus { gb.cmp(ga) } else { ga.cmp(gb) };
            by_gain.then_with(|| pa.cmp(pb))
        });

        for (participant, _) in order.into_iter().take(steps) {
            if let Some(value) = rounded.0.get_mut(&participant) {
                *value = unsigned_zero(*value + adjust);
            }
        }
        rounded
    }
}

fn overflow(participant: &ParticipantId) -> EvensplitError {
    EvensplitError::BalanceOverflow {
        participant: participant.clone(),
    }
}

fn round_half_away(value: Decimal, scale: u32) -> Decimal {
    unsigned_zero(value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
}

/// `-0.00` prints oddly; keep zero unsigned.
fn unsigned_zero(value: Decimal) -> Decimal {
    if value.is_zero() { Decimal::ZERO } else { value }
}

impl FromIterator<(ParticipantId, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a ParticipantId, &'a Decimal);
    type IntoIter = std::collections::btree_map::Iter<'a, ParticipantId, Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
