//! Basis-point representation for percentages.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::{DlmmError, Result};

/// Maximum value that represents 100%.
pub(crate) const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for fee rates, slippage tolerances, withdrawal fractions and the
/// active-bin composition split.  All `u32` values can be constructed;
/// [`is_valid_percent`](Self::is_valid_percent) reports whether the value
/// is a meaningful percentage.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, BasisPoints, Rounding};
///
/// let bp = BasisPoints::new(30);
/// assert!(bp.is_valid_percent());
/// let fee = bp.apply(Amount::new(1_000_000), Rounding::Up).expect("no overflow");
/// assert_eq!(fee, Amount::new(3_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 50% expressed in basis points.
    pub const HALF: Self = Self(MAX_BPS / 2);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `100% - self`, saturating at zero.
    #[must_use]
    pub const fn complement(&self) -> Self {
        Self(MAX_BPS.saturating_sub(self.0))
    }

    /// Computes `amount * self / 10_000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if the intermediate product overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(DlmmError::Overflow("basis points apply overflow")),
        };
        match crate::math::div_round(product, MAX_BPS as u128, rounding) {
            Some(v) => Ok(Amount::new(v)),
            None => Err(DlmmError::DivisionByZero),
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
