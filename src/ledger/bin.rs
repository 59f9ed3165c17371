//! A single liquidity bin.

use core::fmt;

use crate::domain::{Amount, BinPrice, LiquidityShares, Rounding, SwapDirection};
use crate::error::Result;

/// Reserves, accrued fees and share supply of one bin.
///
/// The bin's price is not stored; it is derived from the bin id and the
/// pair's bin step.  Fees are held apart from reserves: `accrued_fee_*`
/// is what providers may still claim, and `fee_growth_*` is the
/// per-share accumulator used to split it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bin {
    reserve_x: Amount,
    reserve_y: Amount,
    accrued_fee_x: Amount,
    accrued_fee_y: Amount,
    total_shares: LiquidityShares,
    fee_growth_x: u128,
    fee_growth_y: u128,
}

impl Bin {
    /// An empty bin.
    pub const EMPTY: Self = Self {
        reserve_x: Amount::ZERO,
        reserve_y: Amount::ZERO,
        accrued_fee_x: Amount::ZERO,
        accrued_fee_y: Amount::ZERO,
        total_shares: LiquidityShares::ZERO,
        fee_growth_x: 0,
        fee_growth_y: 0,
    };

    /// X held.
    pub const fn reserve_x(&self) -> Amount {
        self.reserve_x
    }

    /// Y held.
    pub const fn reserve_y(&self) -> Amount {
        self.reserve_y
    }

    /// Unclaimed X fees.
    pub const fn accrued_fee_x(&self) -> Amount {
        self.accrued_fee_x
    }

    /// Unclaimed Y fees.
    pub const fn accrued_fee_y(&self) -> Amount {
        self.accrued_fee_y
    }

    /// Outstanding shares.
    #[must_use]
    pub const fn total_shares(&self) -> LiquidityShares {
        self.total_shares
    }

    /// X fee growth per share (Q64.64, wrapping).
    #[must_use]
    pub const fn fee_growth_x(&self) -> u128 {
        self.fee_growth_x
    }

    /// Y fee growth per share (Q64.64, wrapping).
    #[must_use]
    pub const fn fee_growth_y(&self) -> u128 {
        self.fee_growth_y
    }

    /// Reserve a swap in `direction` draws from.
    pub const fn reserve_out(&self, direction: SwapDirection) -> Amount {
        match direction {
            SwapDirection::XToY => self.reserve_y,
            SwapDirection::YToX => self.reserve_x,
        }
    }

    /// Returns `true` if the bin holds nothing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reserve_x.is_zero()
            && self.reserve_y.is_zero()
            && self.accrued_fee_x.is_zero()
            && self.accrued_fee_y.is_zero()
            && self.total_shares.is_zero()
    }

    /// Bin liquidity valued in Y: `floor(price * x) + y`.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`](crate::error::DlmmError::Overflow)
    /// if the value exceeds `u128`.
    pub fn liquidity(&self, price: BinPrice) -> Result<u128> {
        let x_value = price.x_to_y(self.reserve_x, Rounding::Down)?;
        x_value.try_add(&self.reserve_y, "bin liquidity overflow").map(|v| v.get())
    }

    pub(crate) fn set_reserves(&mut self, x: Amount, y: Amount) {
        self.reserve_x = x;
        self.reserve_y = y;
    }

    pub(crate) fn set_accrued(&mut self, x: Amount, y: Amount) {
        self.accrued_fee_x = x;
        self.accrued_fee_y = y;
    }

    pub(crate) fn set_total_shares(&mut self, shares: LiquidityShares) {
        self.total_shares = shares;
    }

    pub(crate) fn add_fee_growth(&mut self, x: u128, y: u128) {
        self.fee_growth_x = self.fee_growth_x.wrapping_add(x);
        self.fee_growth_y = self.fee_growth_y.wrapping_add(y);
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bin(x={}, y={}, fee_x={}, fee_y={}, shares={})",
            self.reserve_x, self.reserve_y, self.accrued_fee_x, self.accrued_fee_y, self.total_shares
        )
    }
}
