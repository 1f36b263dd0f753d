//! Expense model.
//!
//! Two shapes live here:
//!
//! - [`ExpenseRecord`] is the loose wire form sent by entry forms and API
//!   handlers: a `splitEvenly` flag plus optional manual contributions.
//! - [`Expense`] is the validated form. Its [`SplitMode`] is a tagged
//!   variant, so "split evenly" and "manual contributions" can never both
//!   apply to one expense.
//!
//! Conversion from record to expense rejects amounts that are not positive
//! or above [`constants::MAX_AMOUNT`], empty even splits, participants listed
//! twice in an even split, negative contributions, contribution totals above
//! the limit, and records that name no (or both) split modes. Checks that need the participant roster or the
//! settlement config live in `evensplit-ledger`.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EvensplitError, ExpenseId, ParticipantId, Result, constants};

/// Manual contribution amounts, keyed by participant.
pub type Contributions = BTreeMap<ParticipantId, Decimal>;

// ---------------------------------------------------------------------------
// ExpenseRecord: wire form
// ---------------------------------------------------------------------------

/// An expense exactly as an entry form submits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    #[serde(default)]
    pub name: String,
    pub payer: ParticipantId,
    pub amount: Decimal,
    #[serde(default)]
    pub involved_participants: Vec<ParticipantId>,
    #[serde(default)]
    pub split_evenly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_contributions: Option<Contributions>,
}

// ---------------------------------------------------------------------------
// SplitMode
// ---------------------------------------------------------------------------

/// How an expense's cost is divided among participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "contributions", rename_all = "snake_case")]
pub enum SplitMode {
    /// Every involved participant owes `amount / n`.
    Evenly,
    /// Each listed participant owes exactly their contribution.
    Manual(Contributions),
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Evenly => write!(f, "EVENLY"),
            Self::Manual(_) => write!(f, "MANUAL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Expense
// ---------------------------------------------------------------------------

/// A validated shared expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    id: ExpenseId,
    name: String,
    payer: ParticipantId,
    amount: Decimal,
    involved: BTreeSet<ParticipantId>,
    split: SplitMode,
}

impl Expense {
    /// An expense split evenly between `involved`.
    ///
    /// The payer need not be one of the involved participants. Listing the
    /// same participant twice is rejected rather than silently merged, since
    /// it would change everyone's share.
    pub fn evenly(
        id: impl Into<ExpenseId>,
        name: impl Into<String>,
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        involved: impl IntoIterator<Item = ParticipantId>,
    ) -> Result<Self> {
        ensure_amount(amount)?;
        let mut set = BTreeSet::new();
        for participant in involved {
            if set.contains(&participant) {
                return Err(EvensplitError::DuplicateInvolvedParticipant(participant));
            }
            set.insert(participant);
        }
        let involved = set;
        if involved.is_empty() {
            return Err(EvensplitError::EmptySplit);
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            payer: payer.into(),
            amount,
            involved,
            split: SplitMode::Evenly,
        })
    }

    /// An expense where each participant owes a stated contribution.
    ///
    /// The contributors become the involved participants. Whether the
    /// contributions add up to `amount` is checked by the ledger, since the
    /// requirement is configurable.
    pub fn manual(
        id: impl Into<ExpenseId>,
        name: impl Into<String>,
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        contributions: Contributions,
    ) -> Result<Self> {
        ensure_amount(amount)?;
        let mut total = Decimal::ZERO;
        for (participant, share) in &contributions {
            if share.is_sign_negative() && !share.is_zero() {
                return Err(EvensplitError::NegativeContribution {
                    participant: participant.clone(),
                    amount: *share,
                });
            }
            total = match total.checked_add(*share) {
                Some(sum) if sum <= constants::MAX_AMOUNT => sum,
                sum => {
                    return Err(EvensplitError::AmountTooLarge {
                        amount: sum.unwrap_or(*share),
                        max: constants::MAX_AMOUNT,
                    });
                }
            };
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            payer: payer.into(),
            amount,
            involved: contributions.keys().cloned().collect(),
            split: SplitMode::Manual(contributions),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub fn involved(&self) -> &BTreeSet<ParticipantId> {
        &self.involved
    }

    #[must_use]
    pub fn split(&self) -> &SplitMode {
        &self.split
    }

    /// Manual contributions, if this is a manual split.
    #[must_use]
    pub fn contributions(&self) -> Option<&Contributions> {
        match &self.split {
            SplitMode::Evenly => None,
            SplitMode::Manual(contributions) => Some(contributions),
        }
    }

    /// Total that participants are charged for this expense.
    ///
    /// Equal to `amount` for even splits; the sum of contributions otherwise.
    /// Both are at most [`constants::MAX_AMOUNT`], so the sum cannot overflow.
    #[must_use]
    pub fn charged_total(&self) -> Decimal {
        match &self.split {
            SplitMode::Evenly => self.amount,
            SplitMode::Manual(contributions) => contributions.values().copied().sum(),
        }
    }

    /// Everyone whose balance this expense touches: involved participants,
    /// contributors and the payer.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<&ParticipantId> {
        let mut all: BTreeSet<&ParticipantId> = self.involved.iter().collect();
        if let Some(contributions) = self.contributions() {
            all.extend(contributions.keys());
        }
        all.insert(&self.payer);
        all
    }

    /// Back to the wire form.
    #[must_use]
    pub fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            payer: self.payer.clone(),
            amount: self.amount,
            involved_participants: self.involved.iter().cloned().collect(),
            split_evenly: matches!(self.split, SplitMode::Evenly),
            manual_contributions: self.contributions().cloned(),
        }
    }
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = EvensplitError;

    fn try_from(record: ExpenseRecord) -> Result<Self> {
        let ExpenseRecord {
            id,
            name,
            payer,
            amount,
            involved_participants,
            split_evenly,
            manual_contributions,
        } = record;

        match (split_evenly, manual_contributions) {
            // Forms often send an empty contributions object alongside the flag.
            (true, Some(contributions)) if !contributions.is_empty() => {
                Err(EvensplitError::ConflictingSplitModes)
            }
            (true, _) => Self::evenly(id, name, payer, amount, involved_participants),
            (false, Some(contributions)) => {
                let mut expense = Self::manual(id, name, payer, amount, contributions)?;
                expense.involved.extend(involved_participants);
                Ok(expense)
            }
            (false, None) => Err(EvensplitError::NoSplitMode),
        }
    }
}

fn ensure_amount(amount: Decimal) -> Result<()> {
    if amount.is_zero() || amount.is_sign_negative() {
        return Err(EvensplitError::NonPositiveAmount { amount });
    }
    if amount > constants::MAX_AMOUNT {
        return Err(EvensplitError::AmountTooLarge {
            amount,
            max: constants::MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Expense {
    pub fn dummy_even(id: &str, payer: &str, amount: i64, involved: &[&str]) -> Self {
        Self::evenly(
            id,
            id,
            payer,
            Decimal::new(amount, 0),
            involved.iter().map(|p| ParticipantId::from(*p)),
        )
        .expect("dummy even expense must be valid")
    }

    pub fn dummy_manual(id: &str, payer: &str, amount: i64, contributions: &[(&str, i64)]) -> Self {
        let contributions = contributions
            .iter()
            .map(|(p, share)| (ParticipantId::from(*p), Decimal::new(*share, 0)))
            .collect();
        Self::manual(id, id, payer, Decimal::new(amount, 0), contributions)
            .expect("dummy manual expense must be valid")
    }
}
