//! Core swap pool trait for executing swaps and querying pair state.
//!
//! [`SwapPool`] is the abstraction a router or settlement layer programs
//! against.  It covers the full lifecycle of a trade:
//!
//! 1. **Quote**: [`SwapPool::quote`] projects a swap without mutating
//!    anything.
//! 2. **Execute**: [`SwapPool::swap`] commits the same walk atomically.
//! 3. **Inspect price**: [`SwapPool::spot_price`] returns the active
//!    bin's price.
//! 4. **Inspect grid**: [`SwapPool::bin_step`] returns the pair's fixed
//!    bin step.
//!
//! # Fee Deduction Invariant
//!
//! Every implementation deducts the fee from the gross input, per bin,
//! before the bin's price is applied:
//!
//! ```text
//! fee        = ceil(amount_in × fee_bps / 10_000)
//! net_input  = amount_in − fee
//! amount_out = floor(net_input × price)        (X → Y)
//! ```
//!
//! # Quote/Swap Equivalence
//!
//! For the same pair state and parameters, `quote` and `swap` report the
//! same `amount_out`, `fee`, `price_impact` and `end_bin`.

use crate::domain::{Amount, BasisPoints, BinPrice, BinStep, Quote, SwapDirection, SwapRequest, SwapResult};
use crate::error::Result;

/// Core trait for bin-based liquidity pairs.
///
/// There are no default implementations: each pair type explicitly
/// handles quoting, execution and state queries.
///
/// # Errors
///
/// Methods that can fail return [`Result<T>`](crate::error::Result).
/// Common error variants include:
///
/// - [`DlmmError::InsufficientLiquidity`](crate::error::DlmmError::InsufficientLiquidity)
///   if the bins cannot absorb the input
/// - [`DlmmError::ExcessiveBinTraversal`](crate::error::DlmmError::ExcessiveBinTraversal)
///   if the walk would exceed the per-swap bin bound
/// - [`DlmmError::SlippageExceeded`](crate::error::DlmmError::SlippageExceeded)
///   if a caller guard rejects the trade
pub trait SwapPool {
    /// Executes a swap.
    ///
    /// The trade is computed against a scratch copy and committed only if
    /// every step and guard succeeds; partial fills are forbidden.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InsufficientLiquidity`](crate::error::DlmmError::InsufficientLiquidity)
    ///   if reserves cannot satisfy the swap.
    /// - [`DlmmError::SlippageExceeded`](crate::error::DlmmError::SlippageExceeded)
    ///   if the output is below `min_amount_out` or the input above
    ///   `max_amount_in`.
    /// - [`DlmmError::Overflow`](crate::error::DlmmError::Overflow) on
    ///   arithmetic overflow.
    fn swap(&mut self, request: &SwapRequest) -> Result<SwapResult>;

    /// Projects an exact-input swap without mutating the pair.
    ///
    /// `slippage` sets the quote's `min_amount_out`.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::swap`], minus the guard violations.
    fn quote(&self, amount_in: Amount, direction: SwapDirection, slippage: BasisPoints)
        -> Result<Quote>;

    /// Price of the active bin, in Y per X.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`](crate::error::DlmmError::OutOfBinRange)
    /// if the active bin is unpriced, which a validated pair never is.
    fn spot_price(&self) -> Result<BinPrice>;

    /// The pair's bin step.  Constant for the lifetime of the pair.
    #[must_use]
    fn bin_step(&self) -> BinStep;
}
