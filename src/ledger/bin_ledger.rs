//! Sparse bin map and active-bin pointer for one pair.

use std::collections::BTreeMap;

use tracing::debug;

use super::Bin;
use crate::domain::{Amount, BinId, BinPrice, BinStep, LiquidityShares, Rounding, SwapDirection};
use crate::error::{DlmmError, Result};
use crate::fees::FeeManager;
use crate::math::{mul_div, price_of};

/// Owns every bin of one pair and the active-bin pointer.
///
/// The map is sparse: an absent bin holds nothing.  The ledger is the only
/// mutator of reserves, and every mutation is all-or-nothing.
///
/// # Invariants
///
/// - Bins below the active bin hold only Y; bins above hold only X.
/// - No reserve or accrued fee is ever negative.
/// - The active bin always has a representable price.
///
/// Deserialization checks these invariants before handing out a ledger.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{BinId, BinStep, SwapDirection};
/// use hydra_dlmm::ledger::BinLedger;
///
/// let step = BinStep::new(10).expect("valid step");
/// let mut ledger = BinLedger::new(step, BinId::ZERO).expect("priced");
/// ledger.apply_delta(BinId::ZERO, 0, 500, 0, 0).expect("deposit");
/// assert!(ledger.advance_active_bin(SwapDirection::XToY).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BinLedgerRecord")
)]
pub struct BinLedger {
    bin_step: BinStep,
    active_bin: BinId,
    bins: BTreeMap<BinId, Bin>,
}

/// Unvalidated wire form of [`BinLedger`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BinLedgerRecord {
    bin_step: BinStep,
    active_bin: BinId,
    bins: BTreeMap<BinId, Bin>,
}

#[cfg(feature = "serde")]
impl TryFrom<BinLedgerRecord> for BinLedger {
    type Error = DlmmError;

    fn try_from(record: BinLedgerRecord) -> Result<Self> {
        let mut ledger = Self::new(record.bin_step, record.active_bin)?;
        for (id, bin) in &record.bins {
            ledger.price_of(*id)?;
            if *id < ledger.active_bin && !bin.reserve_x().is_zero() {
                return Err(DlmmError::InvalidConfiguration(
                    "bin below the active bin holds X",
                ));
            }
            if *id > ledger.active_bin && !bin.reserve_y().is_zero() {
                return Err(DlmmError::InvalidConfiguration(
                    "bin above the active bin holds Y",
                ));
            }
        }
        ledger.bins = record.bins;
        Ok(ledger)
    }
}

impl BinLedger {
    /// Creates an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] if `active_bin` has no
    /// representable price for `bin_step`.
    pub fn new(bin_step: BinStep, active_bin: BinId) -> Result<Self> {
        price_of(active_bin, bin_step)?;
        Ok(Self {
            bin_step,
            active_bin,
            bins: BTreeMap::new(),
        })
    }

    /// Pair bin step.
    #[must_use]
    pub const fn bin_step(&self) -> BinStep {
        self.bin_step
    }

    /// Current active bin id.
    #[must_use]
    pub const fn active_bin_id(&self) -> BinId {
        self.active_bin
    }

    /// Returns the bin at `id`, or `None` if it holds nothing.
    #[must_use]
    pub fn get_bin(&self, id: BinId) -> Option<&Bin> {
        self.bins.get(&id)
    }

    /// Returns the active bin (empty if it holds nothing).
    #[must_use]
    pub fn active_bin(&self) -> Bin {
        self.bins.get(&self.active_bin).copied().unwrap_or(Bin::EMPTY)
    }

    /// Price of `id` under this pair's bin step.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] if `id` is unpriced.
    pub fn price_of(&self, id: BinId) -> Result<BinPrice> {
        price_of(id, self.bin_step)
    }

    /// Price of the active bin.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] if the active bin is unpriced,
    /// which a ledger built through [`BinLedger::new`] never is.
    pub fn active_price(&self) -> Result<BinPrice> {
        self.price_of(self.active_bin)
    }

    /// Non-empty bins in ascending id order.
    pub fn bins(&self) -> impl Iterator<Item = (BinId, &Bin)> {
        self.bins.iter().map(|(id, bin)| (*id, bin))
    }

    /// Number of non-empty bins.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Sum of reserves over all bins, fees excluded.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::Overflow`] if a total exceeds `u128`.
    pub fn total_reserves(&self) -> Result<(Amount, Amount)> {
        self.bins
            .values()
            .try_fold((Amount::ZERO, Amount::ZERO), |(x, y), bin| {
                Ok((
                    x.try_add(&bin.reserve_x(), "total reserve overflow")?,
                    y.try_add(&bin.reserve_y(), "total reserve overflow")?,
                ))
            })
    }

    /// Returns `true` if any bin at or beyond `from` in `direction` still
    /// holds the asset a swap in that direction buys.
    #[must_use]
    pub fn has_liquidity_towards(&self, from: BinId, direction: SwapDirection) -> bool {
        match direction {
            SwapDirection::XToY => self
                .bins
                .range(..=from)
                .any(|(_, b)| !b.reserve_y().is_zero()),
            SwapDirection::YToX => self
                .bins
                .range(from..)
                .any(|(_, b)| !b.reserve_x().is_zero()),
        }
    }

    /// Applies signed changes to one bin's reserves and fees, atomically.
    ///
    /// A positive fee delta records a new fee: it is added to the accrued
    /// balance and to the bin's fee growth per share, so only the current
    /// share holders earn it.  A negative fee delta pays accrued fees out.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::OutOfBinRange`] if `id` is unpriced.
    /// - [`DlmmError::InsufficientLiquidity`] if a reserve or accrued fee
    ///   would go negative.
    /// - [`DlmmError::Overflow`] on overflow.
    ///
    /// The ledger is unchanged on any error.
    pub fn apply_delta(
        &mut self,
        id: BinId,
        d_reserve_x: i128,
        d_reserve_y: i128,
        d_fee_x: i128,
        d_fee_y: i128,
    ) -> Result<()> {
        self.price_of(id)?;
        let mut bin = self.bins.get(&id).copied().unwrap_or(Bin::EMPTY);

        let x = apply_signed(bin.reserve_x(), d_reserve_x)?;
        let y = apply_signed(bin.reserve_y(), d_reserve_y)?;
        let fee_x = apply_signed(bin.accrued_fee_x(), d_fee_x)?;
        let fee_y = apply_signed(bin.accrued_fee_y(), d_fee_y)?;
        let growth_x = FeeManager::growth_increment(recorded(d_fee_x), bin.total_shares())?;
        let growth_y = FeeManager::growth_increment(recorded(d_fee_y), bin.total_shares())?;

        bin.set_reserves(x, y);
        bin.set_accrued(fee_x, fee_y);
        bin.add_fee_growth(growth_x, growth_y);
        self.store(id, bin);
        Ok(())
    }

    /// Moves the active bin one step in `direction`.
    ///
    /// Allowed only once the active bin's reserve on the side `direction`
    /// buys is exactly zero.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::BinNotDepleted`] if that reserve is non-zero.
    /// - [`DlmmError::OutOfBinRange`] if the next bin is unpriced.
    pub fn advance_active_bin(&mut self, direction: SwapDirection) -> Result<BinId> {
        if !self.active_bin().reserve_out(direction).is_zero() {
            return Err(DlmmError::BinNotDepleted(self.active_bin.get()));
        }
        let next = self.active_bin.step(direction)?;
        self.price_of(next)?;
        debug!(from = self.active_bin.get(), to = next.get(), "active bin advanced");
        self.active_bin = next;
        Ok(next)
    }

    /// Adds `amount_x`/`amount_y` to a bin and mints shares against the
    /// bin's liquidity value.  Returns the shares minted.
    ///
    /// The first deposit into a bin mints shares equal to its liquidity
    /// value; later deposits mint pro rata, rounded down.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if the deposit is worth zero shares.
    /// - [`DlmmError::OutOfBinRange`] if `id` is unpriced.
    /// - [`DlmmError::Overflow`] on overflow.
    pub(crate) fn mint_shares(
        &mut self,
        id: BinId,
        amount_x: Amount,
        amount_y: Amount,
    ) -> Result<LiquidityShares> {
        let price = self.price_of(id)?;
        let mut bin = self.bins.get(&id).copied().unwrap_or(Bin::EMPTY);

        let value_in = price
            .x_to_y(amount_x, Rounding::Down)?
            .try_add(&amount_y, "deposit value overflow")?
            .get();
        let minted = if bin.total_shares().is_zero() {
            value_in
        } else {
            let value_bin = bin.liquidity(price)?;
            if value_bin == 0 {
                return Err(DlmmError::InvalidQuantity(
                    "bin has outstanding shares but no liquidity",
                ));
            }
            mul_div(value_in, bin.total_shares().get(), value_bin, Rounding::Down)?
        };
        if minted == 0 {
            return Err(DlmmError::InvalidQuantity(
                "deposit too small to mint bin shares",
            ));
        }
        let minted = LiquidityShares::new(minted);

        let x = bin.reserve_x().try_add(&amount_x, "bin reserve overflow")?;
        let y = bin.reserve_y().try_add(&amount_y, "bin reserve overflow")?;
        let total = bin.total_shares().try_add(&minted)?;
        bin.set_reserves(x, y);
        bin.set_total_shares(total);
        self.store(id, bin);
        Ok(minted)
    }

    /// Burns `shares` from a bin and removes the matching pro-rata part of
    /// both reserves, rounded down.  Returns the amounts removed.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::PositionNotFound`] if the bin holds no shares.
    /// - [`DlmmError::InvalidQuantity`] if `shares` exceeds the supply.
    pub(crate) fn burn_shares(
        &mut self,
        id: BinId,
        shares: LiquidityShares,
    ) -> Result<(Amount, Amount)> {
        let Some(mut bin) = self.bins.get(&id).copied() else {
            return Err(DlmmError::PositionNotFound("position references an empty bin"));
        };
        let total = bin.total_shares();
        if total.is_zero() {
            return Err(DlmmError::PositionNotFound("position references an empty bin"));
        }
        let remaining = total.try_sub(&shares)?;
        let out_x = Amount::new(mul_div(
            bin.reserve_x().get(),
            shares.get(),
            total.get(),
            Rounding::Down,
        )?);
        let out_y = Amount::new(mul_div(
            bin.reserve_y().get(),
            shares.get(),
            total.get(),
            Rounding::Down,
        )?);
        let x = bin.reserve_x().try_sub(&out_x)?;
        let y = bin.reserve_y().try_sub(&out_y)?;
        bin.set_reserves(x, y);
        bin.set_total_shares(remaining);
        self.store(id, bin);
        Ok((out_x, out_y))
    }

    fn store(&mut self, id: BinId, bin: Bin) {
        if bin.is_empty() {
            self.bins.remove(&id);
        } else {
            self.bins.insert(id, bin);
        }
    }
}

/// Converts an amount into a signed delta.
///
/// # Errors
///
/// Returns [`DlmmError::Overflow`] above `i128::MAX`.
pub(crate) fn signed(amount: Amount) -> Result<i128> {
    i128::try_from(amount.get()).map_err(|_| DlmmError::Overflow("amount exceeds signed delta range"))
}

fn apply_signed(value: Amount, delta: i128) -> Result<Amount> {
    let magnitude = Amount::new(delta.unsigned_abs());
    if delta >= 0 {
        value.try_add(&magnitude, "bin balance overflow")
    } else {
        value.try_sub(&magnitude)
    }
}

/// Positive part of a fee delta: the newly recorded fee.
fn recorded(delta: i128) -> Amount {
    if delta > 0 {
        Amount::new(delta.unsigned_abs())
    } else {
        Amount::ZERO
    }
}
