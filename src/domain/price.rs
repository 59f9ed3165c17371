//! Fixed-point bin price.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::{DlmmError, Result};
use crate::math::{mul_shr, shl_div, SCALE_OFFSET};

/// `2^64` as `f64`, the Q64.64 scale.
const SCALE_F64: f64 = 18_446_744_073_709_551_616.0;

/// Price of X in units of Y, as unsigned Q64.64 fixed point.
///
/// The upper 64 bits hold the integer part and the lower 64 bits the
/// fraction, so `BinPrice::ONE` is `1 << 64`.  Conversions between token
/// amounts go through a 256-bit intermediate and take an explicit
/// [`Rounding`].
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, BinPrice, Rounding};
///
/// let two = BinPrice::from_f64(2.0).expect("valid");
/// let y = two.x_to_y(Amount::new(10), Rounding::Down).expect("no overflow");
/// assert_eq!(y, Amount::new(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BinPrice(u128);

impl BinPrice {
    /// Price of exactly 1 Y per X.
    pub const ONE: Self = Self(1 << SCALE_OFFSET);

    /// Wraps a raw Q64.64 value.
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw Q64.64 value.
    #[must_use]
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Converts an `f64` price to fixed point (rounded down).
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidPrice`] if `value` is not finite, not
    /// positive, or too large for Q64.64.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DlmmError::InvalidPrice("price must be finite and positive"));
        }
        let scaled = (value * SCALE_F64).floor();
        if scaled >= u128::MAX as f64 {
            return Err(DlmmError::InvalidPrice("price exceeds Q64.64 range"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let raw = scaled as u128;
        if raw == 0 {
            return Err(DlmmError::InvalidPrice("price below Q64.64 resolution"));
        }
        Ok(Self(raw))
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / SCALE_F64
    }

    /// Value in Y of `amount_x` units of X: `amount_x * price`.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if the result exceeds `u128`.
    pub fn x_to_y(&self, amount_x: Amount, rounding: Rounding) -> Result<Amount> {
        mul_shr(amount_x.get(), self.0, SCALE_OFFSET, rounding).map(Amount::new)
    }

    /// Units of X purchasable with `amount_y` units of Y: `amount_y / price`.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::DivisionByZero`] if the price is zero.
    /// - [`DlmmError::Overflow`] if the result exceeds `u128`.
    pub fn y_to_x(&self, amount_y: Amount, rounding: Rounding) -> Result<Amount> {
        shl_div(amount_y.get(), SCALE_OFFSET, self.0, rounding).map(Amount::new)
    }
}

impl fmt::Display for BinPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.12}", self.to_f64())
    }
}
