//! Decimal constants for metric calculations.

use rust_decimal::Decimal;

pub const TWO: Decimal = Decimal::TWO;
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
pub const SECONDS_PER_DAY: Decimal = Decimal::from_parts(86_400, 0, 0, false, 0);
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12); // 0.000000000001
pub const SQRT_MAX_ITERATIONS: usize = 100;
