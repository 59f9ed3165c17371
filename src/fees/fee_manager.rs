//! Fee rate selection and pro-rata fee attribution.

use tracing::trace;

use crate::config::FeeSchedule;
use crate::domain::{Amount, BasisPoints, LiquidityShares, PositionBin, Rounding};
use crate::error::{DlmmError, Result};
use crate::ledger::Bin;
use crate::math::{mul_shr, shl_div, SCALE_OFFSET};

/// Prices swaps and attributes collected fees to liquidity providers.
///
/// # Attribution
///
/// Every bin keeps a fee-growth-per-share accumulator for each asset
/// (Q64.64, wrapping).  Recording a fee `f` in a bin with `T` shares adds
/// `f / T` to it.  A position entry remembers the accumulator value at its
/// last settlement, so it earns `shares * (growth - snapshot)`: exactly its
/// pro-rata part of the fees recorded while it held those shares, and
/// nothing recorded before it joined.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::config::FeeSchedule;
/// use hydra_dlmm::domain::BasisPoints;
/// use hydra_dlmm::fees::FeeManager;
///
/// let manager = FeeManager::new(FeeSchedule::fixed(BasisPoints::new(30)).expect("valid"));
/// assert_eq!(manager.fee_rate(BasisPoints::new(500)), BasisPoints::new(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FeeManager {
    schedule: FeeSchedule,
}

impl FeeManager {
    /// Wraps a validated schedule.
    #[must_use]
    pub const fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Fee rate for a swap given the caller's realised volatility.
    ///
    /// Static schedules ignore `volatility`.  Tiered schedules pick the
    /// highest tier whose threshold does not exceed it, capped at
    /// `max_fee`; the result is non-decreasing in `volatility`.
    #[must_use]
    pub fn fee_rate(&self, volatility: BasisPoints) -> BasisPoints {
        match &self.schedule {
            FeeSchedule::Static { fee } => *fee,
            FeeSchedule::VolatilityTiered { tiers, max_fee } => {
                let tier_fee = tiers
                    .iter()
                    .take_while(|t| t.threshold <= volatility)
                    .last()
                    .map_or(*max_fee, |t| t.fee);
                let fee = tier_fee.min(*max_fee);
                trace!(volatility = volatility.get(), fee = fee.get(), "fee tier selected");
                fee
            }
        }
    }

    /// Growth-per-share increment for recording `fee` against
    /// `total_shares`.  Zero when the bin has no shares.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if `fee / total_shares` does not fit
    /// Q64.64.
    pub fn growth_increment(fee: Amount, total_shares: LiquidityShares) -> Result<u128> {
        if total_shares.is_zero() || fee.is_zero() {
            return Ok(0);
        }
        shl_div(fee.get(), SCALE_OFFSET, total_shares.get(), Rounding::Down)
    }

    /// Fees earned by `shares` while the accumulator moved from `snapshot`
    /// to `growth`, rounded down.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if the product overflows.
    pub fn earned(shares: LiquidityShares, growth: u128, snapshot: u128) -> Result<Amount> {
        let delta = growth.wrapping_sub(snapshot);
        mul_shr(shares.get(), delta, SCALE_OFFSET, Rounding::Down).map(Amount::new)
    }

    /// Moves fees earned since the entry's last settlement into its pending
    /// balance and resets its snapshots to the bin's current growth.
    ///
    /// Must run before the entry's share count changes.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if a pending balance overflows.
    pub fn settle(entry: &mut PositionBin, bin: &Bin) -> Result<()> {
        let earned_x = Self::earned(entry.shares, bin.fee_growth_x(), entry.fee_growth_snapshot_x)?;
        let earned_y = Self::earned(entry.shares, bin.fee_growth_y(), entry.fee_growth_snapshot_y)?;
        entry.pending_fee_x = entry.pending_fee_x.try_add(&earned_x, "pending fee overflow")?;
        entry.pending_fee_y = entry.pending_fee_y.try_add(&earned_y, "pending fee overflow")?;
        entry.fee_growth_snapshot_x = bin.fee_growth_x();
        entry.fee_growth_snapshot_y = bin.fee_growth_y();
        Ok(())
    }
}

impl Default for FeeManager {
    fn default() -> Self {
        Self::new(FeeSchedule::Static {
            fee: BasisPoints::ZERO,
        })
    }
}

/// Rounds a gross amount's fee up, as every fee in the engine is.
///
/// # Errors
///
/// Returns [`DlmmError::Overflow`] on intermediate overflow.
pub(crate) fn fee_on(amount: Amount, rate: BasisPoints) -> Result<Amount> {
    crate::math::mul_div(
        amount.get(),
        u128::from(rate.get()),
        u128::from(crate::domain::MAX_BPS),
        Rounding::Up,
    )
    .map(Amount::new)
}

/// Smallest gross input whose net-of-fee part is at least `net`.
///
/// # Errors
///
/// - [`DlmmError::InvalidFee`] if `rate` is 100% or more.
/// - [`DlmmError::Overflow`] if the gross amount exceeds `u128`.
pub(crate) fn gross_up(net: Amount, rate: BasisPoints) -> Result<Amount> {
    let max = crate::domain::MAX_BPS;
    if rate.get() >= max {
        return Err(DlmmError::InvalidFee("fee must be below 10000 basis points"));
    }
    crate::math::mul_div(
        net.get(),
        u128::from(max),
        u128::from(max - rate.get()),
        Rounding::Up,
    )
    .map(Amount::new)
}
