//! Liquidity management trait extending [`SwapPool`].
//!
//! [`LiquidityPool`] adds position management and fee collection on top
//! of the swap functionality provided by [`SwapPool`].
//!
//! # Share Accounting Invariant
//!
//! A bin's share supply only changes through [`LiquidityPool::deposit`]
//! and [`LiquidityPool::withdraw`].  Swaps move reserves and record fees
//! but never mint or burn shares.
//!
//! For a bin with `n` holders and total supply `T`:
//!
//! ```text
//! T = Σ position[i].shares_in(bin)   for all i
//! ```
//!
//! # Fee Collection Isolation
//!
//! [`LiquidityPool::claim_fees`] pays accrued fees **without** altering
//! reserves or the active bin.  Calling it twice without intermediate
//! swaps returns zero the second time.

use super::SwapPool;
use crate::domain::{
    Amount, BasisPoints, BinRange, ClaimedFees, LiquidityShape, Position, PositionDelta,
    WithdrawResult,
};
use crate::error::Result;

/// Trait for pairs that support liquidity provision and fee collection.
///
/// Positions are owned by the caller and passed in by mutable reference;
/// the pair updates them in step with its own state, and leaves both
/// untouched on error.
pub trait LiquidityPool: SwapPool {
    /// Deposits `amount_x` and `amount_y` over `range` under `shape`.
    ///
    /// Bins above the active bin receive only X, bins below only Y, and
    /// the active bin both.  Shares minted are credited to `position`.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`](crate::error::DlmmError::InvalidQuantity)
    ///   if both amounts are zero or a bin's allocation mints no shares.
    /// - [`DlmmError::InvalidDistribution`](crate::error::DlmmError::InvalidDistribution)
    ///   if the shape cannot place the amounts in `range`.
    fn deposit(
        &mut self,
        position: &mut Position,
        range: BinRange,
        amount_x: Amount,
        amount_y: Amount,
        shape: &LiquidityShape,
    ) -> Result<PositionDelta>;

    /// Burns `fraction` of every bin share `position` holds and pays out
    /// the matching reserves together with all pending fees of the bins
    /// touched.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`](crate::error::DlmmError::InvalidQuantity)
    ///   if `fraction` is zero, above 100%, or returns nothing.
    /// - [`DlmmError::PositionNotFound`](crate::error::DlmmError::PositionNotFound)
    ///   if the position holds nothing.
    fn withdraw(&mut self, position: &mut Position, fraction: BasisPoints)
        -> Result<WithdrawResult>;

    /// Pays every fee `position` has earned so far.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::PositionNotFound`](crate::error::DlmmError::PositionNotFound)
    ///   if the position holds nothing.
    fn claim_fees(&mut self, position: &mut Position) -> Result<ClaimedFees>;

    /// Sum of X and Y reserves over all bins, accrued fees excluded.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`](crate::error::DlmmError::Overflow)
    /// if a total exceeds `u128`.
    fn total_reserves(&self) -> Result<(Amount, Amount)>;
}
