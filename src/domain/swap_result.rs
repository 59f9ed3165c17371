//! Outcome of an executed swap.

use core::fmt;

use super::{Amount, BasisPoints, BinId, SwapDirection};

/// What a swap did inside one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinFill {
    /// Bin consumed.
    pub bin: BinId,
    /// Gross input charged in this bin, fee included.
    pub amount_in: Amount,
    /// Output paid from this bin's reserve.
    pub amount_out: Amount,
    /// Fee retained by this bin's providers, in the input asset.
    pub fee: Amount,
    /// `true` if the bin's output-side reserve was drained.
    pub depleted: bool,
}

/// The committed result of a swap.
///
/// Carries the same figures a [`Quote`](super::Quote) for the same input
/// reports, plus the per-bin fills.
///
/// # Invariants
///
/// - `fee <= amount_in`.
/// - `amount_in`, `amount_out` and `fee` equal the sums over `fills`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapResult {
    /// Trade direction.
    pub direction: SwapDirection,
    /// Total input charged, fee included.
    pub amount_in: Amount,
    /// Total output paid.
    pub amount_out: Amount,
    /// Total fee, in the input asset.
    pub fee: Amount,
    /// Fee rate applied.
    pub fee_rate: BasisPoints,
    /// Net-input-weighted drift of the fill prices from the start bin, in `[0, 1)`.
    pub price_impact: f64,
    /// Active bin before the swap.
    pub start_bin: BinId,
    /// Active bin after the swap.
    pub end_bin: BinId,
    /// Bins visited, including empty bins crossed.
    pub bins_traversed: u32,
    /// Per-bin breakdown, in walk order.
    pub fills: Vec<BinFill>,
}

impl SwapResult {
    /// Effective rate `amount_out / amount_in` as `f64`.
    #[must_use]
    pub fn effective_rate(&self) -> f64 {
        if self.amount_in.is_zero() {
            return 0.0;
        }
        self.amount_out.get() as f64 / self.amount_in.get() as f64
    }

    /// Returns `true` if the active bin moved.
    #[must_use]
    pub fn crossed_bins(&self) -> bool {
        self.start_bin != self.end_bin
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapResult({} in={}, out={}, fee={}, bins={}..{})",
            self.direction,
            self.amount_in,
            self.amount_out,
            self.fee,
            self.start_bin.get(),
            self.end_bin.get()
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn result(amount_in: u128, amount_out: u128, start: BinId, end: BinId) -> SwapResult {
        SwapResult {
            direction: SwapDirection::XToY,
            amount_in: Amount::new(amount_in),
            amount_out: Amount::new(amount_out),
            fee: Amount::new(1),
            fee_rate: BasisPoints::new(30),
            price_impact: 0.0,
            start_bin: start,
            end_bin: end,
            bins_traversed: 1,
            fills: Vec::new(),
        }
    }

    #[test]
    fn effective_rate() {
        let r = result(200, 100, BinId::ZERO, BinId::ZERO);
        assert!((r.effective_rate() - 0.5).abs() < f64::EPSILON);
        assert!(result(0, 0, BinId::ZERO, BinId::ZERO).effective_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn crossed_bins() {
        let Ok(next) = BinId::new(-1) else {
            panic!("valid bin");
        };
        assert!(!result(1, 1, BinId::ZERO, BinId::ZERO).crossed_bins());
        assert!(result(1, 1, BinId::ZERO, next).crossed_bins());
    }

    #[test]
    fn display() {
        let r = result(10, 9, BinId::ZERO, BinId::ZERO);
        assert_eq!(r.to_string(), "SwapResult(X->Y in=10, out=9, fee=1, bins=0..0)");
    }
}
