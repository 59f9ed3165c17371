//! Per-bin liquidity shares.

use core::fmt;

use crate::error::{DlmmError, Result};

/// A provider's proportional claim on one bin's reserves and fees.
///
/// Shares are distinct from [`Amount`](super::Amount): they are minted
/// against a bin's liquidity value `price * x + y` and are only meaningful
/// relative to the bin's total share supply.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::LiquidityShares;
///
/// let a = LiquidityShares::new(1_000);
/// let b = LiquidityShares::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(LiquidityShares::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct LiquidityShares(u128);

impl LiquidityShares {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Creates shares from a raw `u128` value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if there are no shares.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Addition reporting overflow of a bin's share supply.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] on overflow.
    pub const fn try_add(&self, other: &Self) -> Result<Self> {
        match self.checked_add(other) {
            Some(v) => Ok(v),
            None => Err(DlmmError::Overflow("share supply overflow")),
        }
    }

    /// Subtraction reporting a burn larger than the holding.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidQuantity`] if `other > self`.
    pub const fn try_sub(&self, other: &Self) -> Result<Self> {
        match self.checked_sub(other) {
            Some(v) => Ok(v),
            None => Err(DlmmError::InvalidQuantity("burn exceeds share balance")),
        }
    }
}

impl fmt::Display for LiquidityShares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
