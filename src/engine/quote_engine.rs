//! Read-only projections of the swap walk.

use tracing::debug;

use super::{SwapEngine, SwapPlan};
use crate::domain::{Amount, BasisPoints, Quote, Rounding, SwapDirection};
use crate::error::{DlmmError, Result};
use crate::ledger::BinLedger;

/// Bound on the doubling and bisection rounds of each search.
const MAX_SEARCH_ITERATIONS: u32 = 128;

/// Side-effect-free swap projections over a ledger snapshot.
///
/// Every method takes `&BinLedger` and runs [`SwapEngine::plan`], the same
/// walk a swap commits, so results match execution exactly.  Searches rely
/// on output being non-decreasing in input for a fixed ledger state.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteEngine;

impl QuoteEngine {
    /// Quotes an exact-input swap.
    ///
    /// `slippage` sets [`Quote::min_amount_out`]: the output reduced by
    /// that tolerance, rounded down.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if `slippage` exceeds 100%.
    /// - Any error of [`SwapEngine::plan`].
    pub fn quote(
        ledger: &BinLedger,
        amount_in: Amount,
        direction: SwapDirection,
        fee_rate: BasisPoints,
        slippage: BasisPoints,
    ) -> Result<Quote> {
        if !slippage.is_valid_percent() {
            return Err(DlmmError::InvalidQuantity(
                "slippage must not exceed 10000 basis points",
            ));
        }
        let plan = SwapEngine::plan(ledger, amount_in, direction, fee_rate)?;
        let min_amount_out = slippage.complement().apply(plan.amount_out(), Rounding::Down)?;
        Ok(plan.to_quote(min_amount_out))
    }

    /// Largest input whose quoted price impact does not exceed
    /// `max_impact` (a fraction in `[0, 1]`).
    ///
    /// Doubles an upper bracket until the ledger cannot absorb the input,
    /// then bisects.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if `max_impact` is not in `[0, 1]`.
    /// - [`DlmmError::InsufficientLiquidity`] if no input meets the target.
    /// - [`DlmmError::InvalidFee`] if `fee_rate` is 100% or more.
    pub fn find_amount_for_price_impact(
        ledger: &BinLedger,
        direction: SwapDirection,
        fee_rate: BasisPoints,
        max_impact: f64,
    ) -> Result<Amount> {
        if !(0.0..=1.0).contains(&max_impact) {
            return Err(DlmmError::InvalidQuantity(
                "price impact target must be within [0, 1]",
            ));
        }

        let mut hi = 1u128;
        let mut bracketed = false;
        for _ in 0..MAX_SEARCH_ITERATIONS {
            match SwapEngine::plan(ledger, Amount::new(hi), direction, fee_rate) {
                Ok(_) | Err(DlmmError::InvalidQuantity(_)) => {}
                Err(e) if is_capacity_error(&e) => {
                    bracketed = true;
                    break;
                }
                Err(e) => return Err(e),
            }
            if hi == u128::MAX {
                break;
            }
            hi = hi.saturating_mul(2);
        }
        if !bracketed && within_impact(ledger, hi, direction, fee_rate, max_impact)? {
            return Ok(Amount::new(hi));
        }

        // `lo == 0` stands for "nothing qualifies yet"; `hi` never qualifies.
        let mut lo = 0u128;
        let mut rounds = 0u32;
        while hi - lo > 1 && rounds < MAX_SEARCH_ITERATIONS {
            rounds += 1;
            let mid = lo + (hi - lo) / 2;
            if within_impact(ledger, mid, direction, fee_rate, max_impact)? {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        debug!(amount = lo, rounds, max_impact, "price impact search settled");

        if lo == 0 {
            return Err(DlmmError::InsufficientLiquidity);
        }
        Ok(Amount::new(lo))
    }

    /// Plans the cheapest exact-input swap that pays out at least
    /// `amount_out`.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if `amount_out` is zero.
    /// - [`DlmmError::InsufficientLiquidity`] or
    ///   [`DlmmError::ExcessiveBinTraversal`] if the ledger cannot pay
    ///   `amount_out` in one swap.
    pub fn plan_exact_out(
        ledger: &BinLedger,
        amount_out: Amount,
        direction: SwapDirection,
        fee_rate: BasisPoints,
    ) -> Result<SwapPlan> {
        if amount_out.is_zero() {
            return Err(DlmmError::InvalidQuantity("swap amount must be non-zero"));
        }

        // Doubling: `lo` never pays enough, `hi` pays enough or is too
        // large for the ledger to absorb.
        let mut lo = 0u128;
        let mut hi = 1u128;
        let mut best = None;
        let mut limit = None;
        for _ in 0..MAX_SEARCH_ITERATIONS {
            match SwapEngine::plan(ledger, Amount::new(hi), direction, fee_rate) {
                Ok(plan) if plan.amount_out() >= amount_out => {
                    best = Some(plan);
                    break;
                }
                Ok(_) | Err(DlmmError::InvalidQuantity(_)) => {}
                Err(e) if is_capacity_error(&e) => {
                    limit = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
            if hi == u128::MAX {
                return Err(DlmmError::InsufficientLiquidity);
            }
            lo = hi;
            hi = hi.saturating_mul(2);
        }
        if best.is_none() && limit.is_none() {
            return Err(DlmmError::InsufficientLiquidity);
        }

        // Inputs the ledger can absorb form a prefix, and output grows with
        // input inside it, so any qualifying input lies below every
        // rejected one.
        let mut rounds = 0u32;
        while hi - lo > 1 && rounds < MAX_SEARCH_ITERATIONS {
            rounds += 1;
            let mid = lo + (hi - lo) / 2;
            match SwapEngine::plan(ledger, Amount::new(mid), direction, fee_rate) {
                Ok(plan) if plan.amount_out() >= amount_out => {
                    hi = mid;
                    best = Some(plan);
                }
                Ok(_) | Err(DlmmError::InvalidQuantity(_)) => lo = mid,
                Err(e) if is_capacity_error(&e) => {
                    hi = mid;
                    best = None;
                    limit = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        let Some(best) = best else {
            return Err(limit.unwrap_or(DlmmError::InsufficientLiquidity));
        };
        debug!(
            amount_out = amount_out.get(),
            amount_in = hi,
            rounds,
            "exact-out input resolved"
        );
        Ok(best)
    }
}

fn is_capacity_error(e: &DlmmError) -> bool {
    matches!(
        e,
        DlmmError::InsufficientLiquidity
            | DlmmError::ExcessiveBinTraversal { .. }
            | DlmmError::Overflow(_)
    )
}

fn within_impact(
    ledger: &BinLedger,
    amount: u128,
    direction: SwapDirection,
    fee_rate: BasisPoints,
    max_impact: f64,
) -> Result<bool> {
    match SwapEngine::plan(ledger, Amount::new(amount), direction, fee_rate) {
        Ok(plan) => Ok(plan.result().price_impact <= max_impact),
        Err(DlmmError::InvalidQuantity(_)) => Ok(false),
        Err(e) if is_capacity_error(&e) => Ok(false),
        Err(e) => Err(e),
    }
}
