//! System-wide constants for evensplit.

use rust_decimal::Decimal;

/// Default tolerance for zero checks: `0.000001`.
///
/// Balances and remaining amounts whose magnitude is at or below this value
/// are treated as settled.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Largest accepted expense amount or contribution total: `10^15`.
///
/// Keeps every per-expense delta far inside `Decimal`'s range; running
/// balances are still accumulated with checked arithmetic.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Largest scale `rust_decimal` can represent.
pub const MAX_RESULT_SCALE: u32 = 28;

/// Manual contributions must add up to the expense amount by default.
pub const DEFAULT_REQUIRE_EXACT_CONTRIBUTIONS: bool = true;

/// The net settlement plan is not computed unless asked for.
pub const DEFAULT_INCLUDE_NET_SETTLEMENT: bool = false;

/// Domain separator mixed into every result digest.
pub const RESULT_DIGEST_DOMAIN: &[u8] = b"evensplit:results:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "evensplit";
