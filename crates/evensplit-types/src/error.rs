//! Error types for evensplit.
//!
//! All errors use the `ES_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Expense validation errors
//! - 2xx: Balance / conservation errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ExpenseId, ParticipantId};

/// Central error enum for all evensplit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvensplitError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The expense amount is zero or negative.
    #[error("ES_ERR_100: Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    /// The payer is not in the participant list.
    #[error("ES_ERR_101: Payer is not a known participant: {0}")]
    UnknownPayer(ParticipantId),

    /// An involved or contributing participant is not in the participant list.
    #[error("ES_ERR_102: Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// An even split with nobody to split between.
    #[error("ES_ERR_103: Even split has no involved participants")]
    EmptySplit,

    /// The record is neither split evenly nor carries manual contributions.
    #[error("ES_ERR_104: Expense has neither an even split nor manual contributions")]
    NoSplitMode,

    /// The record is split evenly but also carries manual contributions.
    #[error("ES_ERR_105: Expense is split evenly but also carries manual contributions")]
    ConflictingSplitModes,

    /// A manual contribution is negative.
    #[error("ES_ERR_106: Negative contribution {amount} from {participant}")]
    NegativeContribution {
        participant: ParticipantId,
        amount: Decimal,
    },

    /// Manual contributions do not add up to the expense amount.
    #[error("ES_ERR_107: Contributions sum to {actual}, expected {expected}")]
    ContributionMismatch { expected: Decimal, actual: Decimal },

    /// Two expenses share the same identifier.
    #[error("ES_ERR_108: Duplicate expense id: {0}")]
    DuplicateExpense(ExpenseId),

    /// The amount, or the sum of manual contributions, is above the limit.
    #[error("ES_ERR_109: Amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    /// An even split lists the same participant more than once.
    #[error("ES_ERR_110: Participant listed twice in an even split: {0}")]
    DuplicateInvolvedParticipant(ParticipantId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Balances or settled totals do not add up.
    #[error("ES_ERR_200: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    /// Applying an expense would push a running balance out of range.
    /// The expense is rejected and the balance left as it was.
    #[error("ES_ERR_201: Balance of {participant} out of range")]
    BalanceOverflow { participant: ParticipantId },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config file, out-of-range values, etc.).
    #[error("ES_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("ES_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("ES_ERR_902: I/O error: {0}")]
    Io(String),
}

impl EvensplitError {
    /// Numeric code, as embedded in the `ES_ERR_` prefix.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount { .. } => 100,
            Self::UnknownPayer(_) => 101,
            Self::UnknownParticipant(_) => 102,
            Self::EmptySplit => 103,
            Self::NoSplitMode => 104,
            Self::ConflictingSplitModes => 105,
            Self::NegativeContribution { .. } => 106,
            Self::ContributionMismatch { .. } => 107,
            Self::DuplicateExpense(_) => 108,
            Self::AmountTooLarge { .. } => 109,
            Self::DuplicateInvolvedParticipant(_) => 110,
            Self::ConservationViolation { .. } => 200,
            Self::BalanceOverflow { .. } => 201,
            Self::Configuration(_) => 900,
            Self::Serialization(_) => 901,
            Self::Io(_) => 902,
        }
    }

    /// Whether this error rejects a single expense rather than the whole run.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        (100..200).contains(&self.code())
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EvensplitError>;

impl From<std::io::Error> for EvensplitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EvensplitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = EvensplitError::UnknownPayer(ParticipantId::from("mallory"));
        let msg = format!("{err}");
        assert!(msg.starts_with("ES_ERR_101"), "Got: {msg}");
        assert!(msg.contains("mallory"));
    }

    #[test]
    fn contribution_mismatch_display() {
        let err = EvensplitError::ContributionMismatch {
            expected: Decimal::new(100, 0),
            actual: Decimal::new(95, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("ES_ERR_107"));
        assert!(msg.contains("100"));
        assert!(msg.contains("95"));
    }

    #[test]
    fn code_matches_prefix() {
        let errors = vec![
            EvensplitError::NonPositiveAmount {
                amount: Decimal::ZERO,
            },
            EvensplitError::EmptySplit,
            EvensplitError::NoSplitMode,
            EvensplitError::ConflictingSplitModes,
            EvensplitError::DuplicateExpense(ExpenseId::from("e1")),
            EvensplitError::AmountTooLarge {
                amount: Decimal::MAX,
                max: Decimal::ONE,
            },
            EvensplitError::DuplicateInvolvedParticipant(ParticipantId::from("A")),
            EvensplitError::BalanceOverflow {
                participant: ParticipantId::from("A"),
            },
            EvensplitError::ConservationViolation {
                reason: "test".into(),
            },
            EvensplitError::Configuration("test".into()),
            EvensplitError::Io("test".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            let expected = format!("ES_ERR_{}", err.code());
            assert!(msg.starts_with(&expected), "{msg} should start with {expected}");
        }
    }

    #[test]
    fn validation_classification() {
        assert!(EvensplitError::EmptySplit.is_validation());
        assert!(EvensplitError::UnknownParticipant(ParticipantId::from("x")).is_validation());
        assert!(!EvensplitError::Configuration("bad".into()).is_validation());
        assert!(
            !EvensplitError::ConservationViolation {
                reason: "off".into()
            }
            .is_validation()
        );
    }

    #[test]
    fn json_error_converts_to_serialization() {
        let err: EvensplitError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.code(), 901);
    }
}
