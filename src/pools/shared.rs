//! Single-writer, many-reader handle around one pair.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::warn;

use super::DlmmPool;
use crate::domain::{
    Amount, BasisPoints, BinRange, ClaimedFees, LiquidityShape, Position, PositionDelta, Quote,
    SwapDirection, SwapRequest, SwapResult, WithdrawResult,
};
use crate::error::{DlmmError, Result};
use crate::traits::{LiquidityPool, SwapPool};

/// Serialises every mutation of one pair and serves quotes from an
/// immutable snapshot.
///
/// Writers go through a [`parking_lot::Mutex`]: the blocking methods
/// queue behind the current writer, the `try_*` methods fail with
/// [`DlmmError::PairBusy`] instead.  A write runs on a copy of the pair
/// that replaces it only on success, and each successful write publishes
/// a fresh `Arc<DlmmPool>` snapshot; readers clone the `Arc` under a short
/// read lock and then run with no lock held, so quotes never wait on a
/// swap and never observe a half-applied one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hydra_dlmm::config::{DlmmConfig, FeeSchedule};
/// use hydra_dlmm::domain::{BasisPoints, BinId, BinStep};
/// use hydra_dlmm::pools::{DlmmPool, SharedPool};
/// use hydra_dlmm::traits::FromConfig;
///
/// let config = DlmmConfig::new(
///     BinStep::new(25).expect("valid step"),
///     BinId::ZERO,
///     FeeSchedule::fixed(BasisPoints::new(25)).expect("valid fee"),
/// )
/// .expect("valid config");
/// let shared = Arc::new(SharedPool::new(DlmmPool::from_config(&config).expect("pool")));
/// assert_eq!(shared.snapshot().active_bin_id(), BinId::ZERO);
/// ```
#[derive(Debug)]
pub struct SharedPool {
    writer: Mutex<DlmmPool>,
    snapshot: RwLock<Arc<DlmmPool>>,
}

impl SharedPool {
    /// Wraps `pool`.
    #[must_use]
    pub fn new(pool: DlmmPool) -> Self {
        let snapshot = Arc::new(pool.clone());
        Self {
            writer: Mutex::new(pool),
            snapshot: RwLock::new(snapshot),
        }
    }

    /// The last committed state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DlmmPool> {
        Arc::clone(&self.snapshot.read())
    }

    /// Quotes against the last committed state.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::quote`].
    pub fn quote(
        &self,
        amount_in: Amount,
        direction: SwapDirection,
        slippage: BasisPoints,
    ) -> Result<Quote> {
        self.snapshot().quote(amount_in, direction, slippage)
    }

    /// Runs `op` as the pair's only writer, waiting for any writer in
    /// progress.
    ///
    /// `op` works on a copy of the pair.  Only when it returns `Ok` does
    /// the copy replace the pair and become the new snapshot, so an `op`
    /// that mutates and then fails leaves no trace.
    ///
    /// # Errors
    ///
    /// Whatever `op` returns.
    pub fn write<T>(&self, op: impl FnOnce(&mut DlmmPool) -> Result<T>) -> Result<T> {
        let mut guard = self.writer.lock();
        self.run(&mut guard, op)
    }

    /// Like [`SharedPool::write`], but fails immediately if another writer
    /// holds the pair.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::PairBusy`] if a write is in progress.
    /// - Whatever `op` returns.
    pub fn try_write<T>(&self, op: impl FnOnce(&mut DlmmPool) -> Result<T>) -> Result<T> {
        let Some(mut guard) = self.writer.try_lock() else {
            warn!("pair busy, write rejected");
            return Err(DlmmError::PairBusy);
        };
        self.run(&mut guard, op)
    }

    /// Executes a swap, queueing behind other writers.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::swap`].
    pub fn swap(&self, request: &SwapRequest) -> Result<SwapResult> {
        self.write(|pool| pool.swap(request))
    }

    /// Executes a swap unless another writer holds the pair.
    ///
    /// # Errors
    ///
    /// [`DlmmError::PairBusy`], or the errors of [`SwapPool::swap`].
    pub fn try_swap(&self, request: &SwapRequest) -> Result<SwapResult> {
        self.try_write(|pool| pool.swap(request))
    }

    /// Deposits liquidity, queueing behind other writers.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::deposit`].
    pub fn deposit(
        &self,
        position: &mut Position,
        range: BinRange,
        amount_x: Amount,
        amount_y: Amount,
        shape: &LiquidityShape,
    ) -> Result<PositionDelta> {
        self.write(|pool| pool.deposit(position, range, amount_x, amount_y, shape))
    }

    /// Withdraws liquidity, queueing behind other writers.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::withdraw`].
    pub fn withdraw(&self, position: &mut Position, fraction: BasisPoints) -> Result<WithdrawResult> {
        self.write(|pool| pool.withdraw(position, fraction))
    }

    /// Claims fees, queueing behind other writers.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::claim_fees`].
    pub fn claim_fees(&self, position: &mut Position) -> Result<ClaimedFees> {
        self.write(|pool| pool.claim_fees(position))
    }

    /// Consumes the handle and returns the pair.
    #[must_use]
    pub fn into_inner(self) -> DlmmPool {
        self.writer.into_inner()
    }

    fn run<T>(
        &self,
        pool: &mut DlmmPool,
        op: impl FnOnce(&mut DlmmPool) -> Result<T>,
    ) -> Result<T> {
        let mut scratch = pool.clone();
        let out = op(&mut scratch)?;
        let snapshot = Arc::new(scratch.clone());
        *pool = scratch;
        *self.snapshot.write() = snapshot;
        Ok(out)
    }
}
