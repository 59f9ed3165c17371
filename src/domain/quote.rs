//! Non-mutating projection of a swap.

use core::fmt;

use super::{Amount, BasisPoints, BinId, SwapDirection};

/// What a swap of `amount_in` would do against the current pair state.
///
/// Produced without touching the ledger.  For the same state and input,
/// executing the swap yields identical `amount_out`, `fee`,
/// `price_impact`, `bins_traversed` and `end_bin`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// Trade direction.
    pub direction: SwapDirection,
    /// Input amount, fee included.
    pub amount_in: Amount,
    /// Projected output.
    pub amount_out: Amount,
    /// Projected fee, in the input asset.
    pub fee: Amount,
    /// Fee rate applied.
    pub fee_rate: BasisPoints,
    /// Projected price impact in `[0, 1]`.
    pub price_impact: f64,
    /// Bins the walk would visit.
    pub bins_traversed: u32,
    /// Active bin after the projected swap.
    pub end_bin: BinId,
    /// Output floor implied by the caller's slippage tolerance, rounded
    /// down.  Pass it as `min_amount_out` when executing.
    pub min_amount_out: Amount,
}

impl Quote {
    /// Price impact as a percentage.
    #[must_use]
    pub fn price_impact_percent(&self) -> f64 {
        self.price_impact * 100.0
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} in={}, out={}, fee={}, impact={:.4}%, min_out={})",
            self.direction,
            self.amount_in,
            self.amount_out,
            self.fee,
            self.price_impact_percent(),
            self.min_amount_out
        )
    }
}
