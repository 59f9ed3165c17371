//! Raw token amount with checked arithmetic.

use core::fmt;

use crate::error::{DlmmError, Result};

/// A raw token amount in the smallest unit of asset X or asset Y.
///
/// `Amount` never interprets decimals.  All `u128` values are valid; bin
/// reserves, fees and swap sizes are all expressed as `Amount`.
///
/// Arithmetic helpers come in two flavours: `checked_*` returning `Option`
/// (usable in `const` contexts) and `try_*` returning a typed
/// [`DlmmError`] for use with `?`.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::Amount;
///
/// let a = Amount::new(100);
/// let b = Amount::new(200);
/// assert_eq!(a.checked_add(&b), Some(Amount::new(300)));
/// assert_eq!(b.checked_sub(&a), Some(Amount::new(100)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
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

    /// Addition that reports overflow as [`DlmmError::Overflow`].
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] tagged with `context` on overflow.
    pub const fn try_add(&self, other: &Self, context: &'static str) -> Result<Self> {
        match self.checked_add(other) {
            Some(v) => Ok(v),
            None => Err(DlmmError::Overflow(context)),
        }
    }

    /// Subtraction that reports underflow as
    /// [`DlmmError::InsufficientLiquidity`]: in this crate every amount
    /// subtraction draws on a reserve or an accrued balance.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InsufficientLiquidity`] if `other > self`.
    pub const fn try_sub(&self, other: &Self) -> Result<Self> {
        match self.checked_sub(other) {
            Some(v) => Ok(v),
            None => Err(DlmmError::InsufficientLiquidity),
        }
    }

    /// Returns the smaller of two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
