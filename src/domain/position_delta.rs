//! Outcomes of deposits, withdrawals and fee claims.

use core::fmt;

use super::{Amount, BinId, BinRange, LiquidityShares};

/// What one deposit did to one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinDeposit {
    /// Target bin.
    pub bin: BinId,
    /// X added to the bin's reserve.
    pub amount_x: Amount,
    /// Y added to the bin's reserve.
    pub amount_y: Amount,
    /// Shares minted to the position.
    pub shares: LiquidityShares,
}

/// Result of a deposit: per-bin allocations and the totals they sum to.
///
/// `amount_x` and `amount_y` always equal the deposited amounts exactly;
/// rounding residue is placed in a bin, never dropped.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, BinRange, PositionDelta};
///
/// let delta = PositionDelta::new(BinRange::new(0, 0).expect("valid"), Vec::new());
/// assert_eq!(delta.amount_x(), Amount::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionDelta {
    range: BinRange,
    bins: Vec<BinDeposit>,
    amount_x: Amount,
    amount_y: Amount,
}

impl PositionDelta {
    /// Builds a delta from per-bin deposits, summing the totals.
    ///
    /// Totals saturate; the ledger has already rejected any deposit whose
    /// reserves would overflow.
    #[must_use]
    pub fn new(range: BinRange, bins: Vec<BinDeposit>) -> Self {
        let (amount_x, amount_y) = bins.iter().fold((0u128, 0u128), |(x, y), b| {
            (
                x.saturating_add(b.amount_x.get()),
                y.saturating_add(b.amount_y.get()),
            )
        });
        Self {
            range,
            bins,
            amount_x: Amount::new(amount_x),
            amount_y: Amount::new(amount_y),
        }
    }

    /// The requested bin range.
    #[must_use]
    pub const fn range(&self) -> BinRange {
        self.range
    }

    /// Bins that received liquidity, ascending.
    #[must_use]
    pub fn bins(&self) -> &[BinDeposit] {
        &self.bins
    }

    /// Total X deposited.
    pub const fn amount_x(&self) -> Amount {
        self.amount_x
    }

    /// Total Y deposited.
    pub const fn amount_y(&self) -> Amount {
        self.amount_y
    }
}

impl fmt::Display for PositionDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PositionDelta(range={}, bins={}, x={}, y={})",
            self.range,
            self.bins.len(),
            self.amount_x,
            self.amount_y
        )
    }
}

/// Fees paid out to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimedFees {
    /// X fees paid.
    pub fee_x: Amount,
    /// Y fees paid.
    pub fee_y: Amount,
}

impl ClaimedFees {
    /// Returns `true` when nothing was paid.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.fee_x.is_zero() && self.fee_y.is_zero()
    }
}

impl fmt::Display for ClaimedFees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClaimedFees(x={}, y={})", self.fee_x, self.fee_y)
    }
}

/// Result of a withdrawal.
///
/// A withdrawal also pays out every fee pending in the bins it touches, so
/// an entry whose shares reach zero leaves nothing behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawResult {
    /// X returned from reserves.
    pub amount_x: Amount,
    /// Y returned from reserves.
    pub amount_y: Amount,
    /// Fees settled and paid alongside.
    pub fees: ClaimedFees,
    /// Bins in which the position's shares reached zero.
    pub bins_closed: u32,
}

impl fmt::Display for WithdrawResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WithdrawResult(x={}, y={}, {})",
            self.amount_x, self.amount_y, self.fees
        )
    }
}
