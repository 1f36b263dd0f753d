//! Configuration for balance and settlement computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EvensplitError, Result, constants};

/// Knobs for a computation run. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettlementConfig {
    /// Magnitudes at or below this are treated as zero: when clearing
    /// creditors/debtors in the matching loop and when checking that
    /// balances sum to zero.
    pub tolerance: Decimal,
    /// Reject manual expenses whose contributions do not add up to the
    /// amount. When `false` they are accepted, their balance effect is
    /// applied, and settlement for them is skipped with a warning.
    pub require_exact_contributions: bool,
    /// Round reported amounts to this many decimal places. Computation is
    /// always exact; rounding applies to the output only.
    pub result_scale: Option<u32>,
    /// Also compute one settlement plan over the global balances.
    pub include_net_settlement: bool,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            tolerance: constants::DEFAULT_TOLERANCE,
            require_exact_contributions: constants::DEFAULT_REQUIRE_EXACT_CONTRIBUTIONS,
            result_scale: None,
            include_net_settlement: constants::DEFAULT_INCLUDE_NET_SETTLEMENT,
        }
    }
}

impl SettlementConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`EvensplitError::Configuration`] for a negative tolerance or
    /// a result scale `rust_decimal` cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_sign_negative() && !self.tolerance.is_zero() {
            return Err(EvensplitError::Configuration(format!(
                "tolerance must not be negative, got {}",
                self.tolerance
            )));
        }
        if let Some(scale) = self.result_scale {
            if scale > constants::MAX_RESULT_SCALE {
                return Err(EvensplitError::Configuration(format!(
                    "resultScale {scale} exceeds maximum {}",
                    constants::MAX_RESULT_SCALE
                )));
            }
        }
        Ok(())
    }

    /// Whether `value` is zero within tolerance.
    #[must_use]
    pub fn is_negligible(&self, value: Decimal) -> bool {
        value.abs() <= self.tolerance
    }
}
