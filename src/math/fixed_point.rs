//! Integer division and 256-bit intermediate helpers.
//!
//! Bin prices are Q64.64 values in a `u128`, and token amounts are `u128`,
//! so any product of the two needs 256 bits before it is shifted or divided
//! back down.  The helpers here widen to [`ethnum::U256`], apply the
//! requested [`Rounding`] and narrow back, reporting overflow instead of
//! truncating.
//!
//! # Convention
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Output amount | [`Rounding::Down`] |
//! | Input amount | [`Rounding::Up`] |
//! | Fee amount | [`Rounding::Up`] |
//! | Shares minted | [`Rounding::Down`] |
//!
//! # Examples
//!
//! ```
//! use hydra_dlmm::domain::Rounding;
//! use hydra_dlmm::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Ok(u128::MAX / 2));
//! ```

use ethnum::U256;

use crate::domain::Rounding;
use crate::error::{DlmmError, Result};

/// Number of fractional bits in a Q64.64 value.
pub const SCALE_OFFSET: u32 = 64;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q + 1 cannot overflow: a non-zero remainder implies q < u128::MAX.
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// Computes `x * y / denominator` with a 256-bit intermediate.
///
/// # Errors
///
/// - [`DlmmError::DivisionByZero`] if `denominator` is zero.
/// - [`DlmmError::Overflow`] if the result does not fit in `u128`.
pub fn mul_div(x: u128, y: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    if denominator == 0 {
        return Err(DlmmError::DivisionByZero);
    }
    let product = U256::from(x) * U256::from(y);
    narrow(div_round_wide(product, U256::from(denominator), rounding))
}

/// Computes `(x * y) >> shift` with a 256-bit intermediate.
///
/// # Errors
///
/// Returns [`DlmmError::Overflow`] if the result does not fit in `u128`.
pub fn mul_shr(x: u128, y: u128, shift: u32, rounding: Rounding) -> Result<u128> {
    let product = U256::from(x) * U256::from(y);
    let mut result = product >> shift;
    if rounding.is_up() && (result << shift) != product {
        result += U256::ONE;
    }
    narrow(result)
}

/// Computes `(x << shift) / denominator` with a 256-bit intermediate.
///
/// `shift` must be below 128.
///
/// # Errors
///
/// - [`DlmmError::DivisionByZero`] if `denominator` is zero.
/// - [`DlmmError::Overflow`] if the result does not fit in `u128`.
pub fn shl_div(x: u128, shift: u32, denominator: u128, rounding: Rounding) -> Result<u128> {
    if denominator == 0 {
        return Err(DlmmError::DivisionByZero);
    }
    let numerator = U256::from(x) << shift;
    narrow(div_round_wide(numerator, U256::from(denominator), rounding))
}

/// Multiplies two Q64.64 values, rounding down.  Returns `None` when the
/// product leaves the `u128` range.
pub(crate) fn mul_q64(x: u128, y: u128) -> Option<u128> {
    let product = (U256::from(x) * U256::from(y)) >> SCALE_OFFSET;
    (product <= U256::from(u128::MAX)).then(|| product.as_u128())
}

/// Computes `1 / x` for a Q64.64 value, rounding down.  Returns `None` for
/// zero input or when the reciprocal leaves the `u128` range.
pub(crate) fn reciprocal_q64(x: u128) -> Option<u128> {
    if x == 0 {
        return None;
    }
    let one_sq = U256::ONE << (2 * SCALE_OFFSET);
    let inv = one_sq / U256::from(x);
    (inv <= U256::from(u128::MAX)).then(|| inv.as_u128())
}

fn div_round_wide(numerator: U256, denominator: U256, rounding: Rounding) -> U256 {
    let q = numerator / denominator;
    if rounding.is_up() && numerator % denominator != U256::ZERO {
        q + U256::ONE
    } else {
        q
    }
}

fn narrow(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(DlmmError::Overflow("256-bit intermediate exceeds u128"));
    }
    Ok(value.as_u128())
}
