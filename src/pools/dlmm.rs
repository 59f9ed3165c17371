//! Dynamic Liquidity Market Maker pair (bin-based concentrated liquidity).
//!
//! Liquidity sits in discrete bins, each trading at one fixed price
//! `(1 + bin_step / 10_000) ^ bin_id`.  Within a bin the curve is
//! constant-sum, so a swap that stays inside the active bin has no price
//! impact.
//!
//! # Swap Algorithm
//!
//! 1. Pick the fee rate from the schedule and the caller's volatility.
//! 2. Walk bins from the active bin in the trade direction, consuming each
//!    bin's output-side reserve at its price (see
//!    [`SwapEngine`](crate::engine::SwapEngine)).
//! 3. Check the caller's guards against the planned totals.
//! 4. Apply the plan to a scratch ledger and commit it.
//!
//! # Fee Tracking
//!
//! Each bin keeps fee-growth-per-share accumulators; positions hold
//! per-bin snapshots and settle before their share count changes, so fees
//! are split pro rata among the providers present when they were earned.

use tracing::{info, warn};

use crate::config::DlmmConfig;
use crate::distribution::LiquidityDistributor;
use crate::domain::{
    Amount, BasisPoints, BinDeposit, BinId, BinPrice, BinRange, BinStep, ClaimedFees,
    LiquidityShape, LiquidityShares, Position, PositionBin, PositionDelta, Quote, Rounding,
    SwapDirection, SwapRequest, SwapResult, SwapSpec, WithdrawResult, MAX_BPS,
};
use crate::engine::{QuoteEngine, SwapEngine, SwapPlan};
use crate::error::{DlmmError, ErrorKind, Result};
use crate::fees::FeeManager;
use crate::ledger::{signed, Bin, BinLedger};
use crate::math::mul_div;
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

/// A DLMM pair: the persisted pair state plus its public operations.
///
/// Created from a [`DlmmConfig`] via [`FromConfig`].  The struct itself is
/// the serializable pair-state record: bin step, fee schedule, active
/// bin and the sparse bin map.
///
/// # State
///
/// - `fee_manager`: fee schedule and attribution.
/// - `active_bin_split`: share of the active bin's weight a deposit
///   places on the X side.
/// - `ledger`: bins, reserves and the active-bin pointer.
///
/// Every mutating operation works on scratch copies of the ledger and
/// the caller's position and commits both only on success.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::config::{DlmmConfig, FeeSchedule};
/// use hydra_dlmm::domain::{
///     Amount, BasisPoints, BinId, BinRange, BinStep, LiquidityShape, OwnerId, Position,
///     SwapDirection, SwapRequest,
/// };
/// use hydra_dlmm::pools::DlmmPool;
/// use hydra_dlmm::traits::{FromConfig, LiquidityPool, SwapPool};
///
/// let config = DlmmConfig::new(
///     BinStep::new(10).expect("valid step"),
///     BinId::ZERO,
///     FeeSchedule::fixed(BasisPoints::new(30)).expect("valid fee"),
/// )
/// .expect("valid config");
/// let mut pool = DlmmPool::from_config(&config).expect("valid pool");
///
/// let mut position = Position::new(OwnerId::from_bytes([1u8; 32]), 0);
/// let range = BinRange::new(-5, 5).expect("valid range");
/// pool.deposit(&mut position, range, Amount::new(10_000), Amount::new(10_000), &LiquidityShape::Uniform)
///     .expect("deposit");
///
/// let request = SwapRequest::exact_in(Amount::new(1_000), SwapDirection::XToY).expect("non-zero");
/// let result = pool.swap(&request).expect("swap");
/// assert!(result.amount_out < Amount::new(1_000));
/// ```
///
/// A deserialized pair passes the same checks as
/// [`FromConfig::from_config`]: a valid fee schedule, a split of at most
/// 100%, and a priced active bin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "DlmmPoolRecord")
)]
pub struct DlmmPool {
    fee_manager: FeeManager,
    active_bin_split: BasisPoints,
    ledger: BinLedger,
}

/// Wire form of [`DlmmPool`]; the nested schedule and ledger validate
/// themselves.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct DlmmPoolRecord {
    fee_manager: FeeManager,
    active_bin_split: BasisPoints,
    ledger: BinLedger,
}

#[cfg(feature = "serde")]
impl TryFrom<DlmmPoolRecord> for DlmmPool {
    type Error = DlmmError;

    fn try_from(record: DlmmPoolRecord) -> Result<Self> {
        if !record.active_bin_split.is_valid_percent() {
            return Err(DlmmError::InvalidConfiguration(
                "active bin split must not exceed 10000 basis points",
            ));
        }
        Ok(Self {
            fee_manager: record.fee_manager,
            active_bin_split: record.active_bin_split,
            ledger: record.ledger,
        })
    }
}

impl DlmmPool {
    /// Current active bin id.
    #[must_use]
    pub const fn active_bin_id(&self) -> BinId {
        self.ledger.active_bin_id()
    }

    /// Share of the active bin's weight a deposit places on the X side.
    #[must_use]
    pub const fn active_bin_split(&self) -> BasisPoints {
        self.active_bin_split
    }

    /// Fee schedule and attribution.
    #[must_use]
    pub const fn fee_manager(&self) -> &FeeManager {
        &self.fee_manager
    }

    /// Read access to the bin ledger.
    #[must_use]
    pub const fn ledger(&self) -> &BinLedger {
        &self.ledger
    }

    /// Fee rate a swap at `volatility` pays.
    #[must_use]
    pub fn fee_rate(&self, volatility: BasisPoints) -> BasisPoints {
        self.fee_manager.fee_rate(volatility)
    }

    /// The bin at `id`, or `None` if it holds nothing.
    #[must_use]
    pub fn bin(&self, id: BinId) -> Option<&Bin> {
        self.ledger.get_bin(id)
    }

    /// Non-empty bins in ascending id order.
    pub fn bins(&self) -> impl Iterator<Item = (BinId, &Bin)> {
        self.ledger.bins()
    }

    /// Quotes an exact-input swap at the fee rate for `volatility`.
    ///
    /// A swap request carrying the same volatility executes exactly as
    /// quoted.
    ///
    /// # Errors
    ///
    /// Same as [`QuoteEngine::quote`].
    pub fn quote_with_volatility(
        &self,
        amount_in: Amount,
        direction: SwapDirection,
        slippage: BasisPoints,
        volatility: BasisPoints,
    ) -> Result<Quote> {
        QuoteEngine::quote(
            &self.ledger,
            amount_in,
            direction,
            self.fee_rate(volatility),
            slippage,
        )
    }

    /// Largest exact input whose price impact stays within `max_impact`
    /// (a fraction in `[0, 1]`).
    ///
    /// # Errors
    ///
    /// Same as [`QuoteEngine::find_amount_for_price_impact`].
    pub fn find_amount_for_price_impact(
        &self,
        direction: SwapDirection,
        max_impact: f64,
        volatility: BasisPoints,
    ) -> Result<Amount> {
        QuoteEngine::find_amount_for_price_impact(
            &self.ledger,
            direction,
            self.fee_rate(volatility),
            max_impact,
        )
    }

    fn plan_request(&self, request: &SwapRequest) -> Result<SwapPlan> {
        let fee_rate = self.fee_rate(request.volatility());
        match request.spec() {
            SwapSpec::ExactIn { amount_in } => {
                SwapEngine::plan(&self.ledger, amount_in, request.direction(), fee_rate)
            }
            SwapSpec::ExactOut { amount_out } => {
                QuoteEngine::plan_exact_out(&self.ledger, amount_out, request.direction(), fee_rate)
            }
        }
    }

    fn execute(&mut self, request: &SwapRequest) -> Result<SwapResult> {
        let plan = self.plan_request(request)?;
        let result = plan.result();
        if result.amount_out < request.min_amount_out() {
            return Err(DlmmError::SlippageExceeded {
                bound: request.min_amount_out().get(),
                actual: result.amount_out.get(),
            });
        }
        if result.amount_in > request.max_amount_in() {
            return Err(DlmmError::SlippageExceeded {
                bound: request.max_amount_in().get(),
                actual: result.amount_in.get(),
            });
        }
        SwapEngine::commit(&mut self.ledger, &plan)?;
        Ok(plan.into_result())
    }
}

/// Pays out everything `entry` has settled in `bin`.
fn pay_pending(ledger: &mut BinLedger, bin: BinId, entry: &mut PositionBin) -> Result<ClaimedFees> {
    let paid = ClaimedFees {
        fee_x: entry.pending_fee_x,
        fee_y: entry.pending_fee_y,
    };
    if !paid.is_zero() {
        ledger.apply_delta(bin, 0, 0, -signed(paid.fee_x)?, -signed(paid.fee_y)?)?;
        entry.pending_fee_x = Amount::ZERO;
        entry.pending_fee_y = Amount::ZERO;
    }
    Ok(paid)
}

fn add_fees(total: ClaimedFees, more: ClaimedFees) -> Result<ClaimedFees> {
    Ok(ClaimedFees {
        fee_x: total.fee_x.try_add(&more.fee_x, "claimed fee overflow")?,
        fee_y: total.fee_y.try_add(&more.fee_y, "claimed fee overflow")?,
    })
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

impl FromConfig<DlmmConfig> for DlmmPool {
    /// Creates an empty pair at the configured active bin.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::OutOfBinRange`] if the active bin is unpriced.
    /// - [`DlmmError::InvalidFee`] if the fee schedule is invalid.
    /// - [`DlmmError::InvalidConfiguration`] if the active bin split
    ///   exceeds 100%.
    fn from_config(config: &DlmmConfig) -> Result<Self> {
        config.validate()?;
        let ledger = BinLedger::new(config.bin_step(), config.active_bin())?;
        info!(
            bin_step = config.bin_step().get(),
            active_bin = config.active_bin().get(),
            fee = %config.fee_schedule(),
            "pair created"
        );
        Ok(Self {
            fee_manager: FeeManager::new(config.fee_schedule().clone()),
            active_bin_split: config.active_bin_split(),
            ledger,
        })
    }
}

impl SwapPool for DlmmPool {
    /// Executes the request copy-on-success.
    ///
    /// Exact-out requests are resolved to the smallest exact input that
    /// pays at least `amount_out`, then executed as that exact-in swap.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::SlippageExceeded`] if the output is below
    ///   `min_amount_out` or the input above `max_amount_in`.
    /// - [`DlmmError::InsufficientLiquidity`] if the bins cannot fill it.
    /// - [`DlmmError::ExcessiveBinTraversal`] if the walk is too long.
    fn swap(&mut self, request: &SwapRequest) -> Result<SwapResult> {
        match self.execute(request) {
            Ok(result) => {
                info!(
                    direction = %result.direction,
                    amount_in = result.amount_in.get(),
                    amount_out = result.amount_out.get(),
                    fee = result.fee.get(),
                    bins = result.bins_traversed,
                    active_bin = result.end_bin.get(),
                    "swap committed"
                );
                Ok(result)
            }
            Err(e) => {
                if matches!(e.kind(), ErrorKind::GuardViolation)
                    || matches!(e, DlmmError::ExcessiveBinTraversal { .. })
                {
                    warn!(request = %request, error = %e, "swap rejected");
                }
                Err(e)
            }
        }
    }

    fn quote(
        &self,
        amount_in: Amount,
        direction: SwapDirection,
        slippage: BasisPoints,
    ) -> Result<Quote> {
        self.quote_with_volatility(amount_in, direction, slippage, BasisPoints::ZERO)
    }

    fn spot_price(&self) -> Result<BinPrice> {
        self.ledger.active_price()
    }

    fn bin_step(&self) -> BinStep {
        self.ledger.bin_step()
    }
}

impl LiquidityPool for DlmmPool {
    /// Deposits over `range`, settling the position's fees in every bin it
    /// adds shares to before the share count changes.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if both amounts are zero or a
    ///   bin's allocation is too small to mint a share.
    /// - [`DlmmError::InvalidDistribution`] if the shape cannot place the
    ///   amounts in `range`.
    fn deposit(
        &mut self,
        position: &mut Position,
        range: BinRange,
        amount_x: Amount,
        amount_y: Amount,
        shape: &LiquidityShape,
    ) -> Result<PositionDelta> {
        if amount_x.is_zero() && amount_y.is_zero() {
            return Err(DlmmError::InvalidQuantity(
                "deposit amounts must not both be zero",
            ));
        }
        let allocations = LiquidityDistributor::distribute(
            self.ledger.active_bin_id(),
            range,
            amount_x,
            amount_y,
            shape,
            self.active_bin_split,
        )?;

        let mut ledger = self.ledger.clone();
        let mut updated = position.clone();
        let mut deposits = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let bin = ledger.get_bin(allocation.bin).copied().unwrap_or(Bin::EMPTY);
            let entry = updated.entry_mut(allocation.bin);
            FeeManager::settle(entry, &bin)?;
            let shares = ledger.mint_shares(allocation.bin, allocation.amount_x, allocation.amount_y)?;
            entry.shares = entry.shares.try_add(&shares)?;
            deposits.push(BinDeposit {
                bin: allocation.bin,
                amount_x: allocation.amount_x,
                amount_y: allocation.amount_y,
                shares,
            });
        }

        let delta = PositionDelta::new(range, deposits);
        self.ledger = ledger;
        *position = updated;
        info!(
            owner = %position.owner(),
            range = %range,
            amount_x = delta.amount_x().get(),
            amount_y = delta.amount_y().get(),
            bins = delta.bins().len(),
            active_bin = self.ledger.active_bin_id().get(),
            "liquidity deposited"
        );
        Ok(delta)
    }

    /// Burns `fraction` of each bin share, rounded down per bin, and pays
    /// all pending fees of every bin the position holds.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if `fraction` is zero, above
    ///   100%, or the withdrawal returns nothing.
    /// - [`DlmmError::PositionNotFound`] if the position holds nothing.
    fn withdraw(
        &mut self,
        position: &mut Position,
        fraction: BasisPoints,
    ) -> Result<WithdrawResult> {
        if fraction.get() == 0 || !fraction.is_valid_percent() {
            return Err(DlmmError::InvalidQuantity(
                "withdraw fraction must be within 1..=10000 basis points",
            ));
        }
        if position.is_closed() {
            return Err(DlmmError::PositionNotFound("position holds no liquidity"));
        }

        let mut ledger = self.ledger.clone();
        let mut updated = position.clone();
        let mut amount_x = Amount::ZERO;
        let mut amount_y = Amount::ZERO;
        let mut fees = ClaimedFees::default();
        for id in updated.bin_ids() {
            let bin = ledger.get_bin(id).copied().unwrap_or(Bin::EMPTY);
            let Some(entry) = updated.get_mut(id) else {
                continue;
            };
            FeeManager::settle(entry, &bin)?;
            let burn = LiquidityShares::new(mul_div(
                entry.shares.get(),
                u128::from(fraction.get()),
                u128::from(MAX_BPS),
                Rounding::Down,
            )?);
            if !burn.is_zero() {
                let (x, y) = ledger.burn_shares(id, burn)?;
                entry.shares = entry.shares.try_sub(&burn)?;
                amount_x = amount_x.try_add(&x, "withdrawn amount overflow")?;
                amount_y = amount_y.try_add(&y, "withdrawn amount overflow")?;
            }
            fees = add_fees(fees, pay_pending(&mut ledger, id, entry)?)?;
        }
        if amount_x.is_zero() && amount_y.is_zero() && fees.is_zero() {
            return Err(DlmmError::InvalidQuantity(
                "withdrawal too small to return anything",
            ));
        }

        let before = updated.bin_count();
        updated.prune();
        let bins_closed = u32::try_from(before - updated.bin_count()).unwrap_or(u32::MAX);
        self.ledger = ledger;
        *position = updated;

        let result = WithdrawResult {
            amount_x,
            amount_y,
            fees,
            bins_closed,
        };
        info!(
            owner = %position.owner(),
            fraction = fraction.get(),
            amount_x = amount_x.get(),
            amount_y = amount_y.get(),
            fee_x = fees.fee_x.get(),
            fee_y = fees.fee_y.get(),
            bins_closed,
            "liquidity withdrawn"
        );
        Ok(result)
    }

    /// Settles and pays fees in every bin the position holds.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::PositionNotFound`] if the position holds nothing.
    fn claim_fees(&mut self, position: &mut Position) -> Result<ClaimedFees> {
        if position.is_closed() {
            return Err(DlmmError::PositionNotFound("position holds no liquidity"));
        }

        let mut ledger = self.ledger.clone();
        let mut updated = position.clone();
        let mut claimed = ClaimedFees::default();
        for id in updated.bin_ids() {
            let bin = ledger.get_bin(id).copied().unwrap_or(Bin::EMPTY);
            let Some(entry) = updated.get_mut(id) else {
                continue;
            };
            FeeManager::settle(entry, &bin)?;
            claimed = add_fees(claimed, pay_pending(&mut ledger, id, entry)?)?;
        }
        updated.prune();
        self.ledger = ledger;
        *position = updated;

        info!(
            owner = %position.owner(),
            fee_x = claimed.fee_x.get(),
            fee_y = claimed.fee_y.get(),
            "fees claimed"
        );
        Ok(claimed)
    }

    fn total_reserves(&self) -> Result<(Amount, Amount)> {
        self.ledger.total_reserves()
    }
}
