//! The bin walk behind every swap and quote.
//!
//! A swap starts at the active bin and consumes it at its fixed price.
//! When the bin's output-side reserve is drained the walk crosses to the
//! next bin in the trade direction, skipping empty bins, until the input
//! is exhausted.
//!
//! | Phase | Ledger access | Used by |
//! |-------|---------------|---------|
//! | [`SwapEngine::plan`] | `&BinLedger` | quotes, searches, swaps |
//! | [`SwapEngine::apply`] | `&mut BinLedger` | swaps only |
//!
//! Quotes and swaps share [`SwapEngine::plan`], so a quote reports
//! exactly what executing the same input against the same state does.

use ethnum::U256;
use tracing::{debug, warn};

use crate::domain::{
    Amount, BasisPoints, BinFill, BinId, BinPrice, Quote, Rounding, SwapDirection, SwapResult,
    MAX_BPS,
};
use crate::error::{DlmmError, Result};
use crate::fees::{fee_on, gross_up};
use crate::ledger::{signed, Bin, BinLedger};
use crate::math::reciprocal_q64;

/// Upper bound on bins a single swap may visit, empty bins included.
pub const MAX_BINS_PER_SWAP: u32 = 128;

/// A fully computed swap that has not touched any ledger yet.
///
/// Produced by [`SwapEngine::plan`] from a shared reference, so it can be
/// computed against a snapshot and committed later with
/// [`SwapEngine::apply`] on a ledger in the same state.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPlan {
    result: SwapResult,
}

impl SwapPlan {
    /// The swap outcome this plan describes.
    #[must_use]
    pub const fn result(&self) -> &SwapResult {
        &self.result
    }

    /// Consumes the plan into its outcome.
    #[must_use]
    pub fn into_result(self) -> SwapResult {
        self.result
    }

    /// Total output.
    pub const fn amount_out(&self) -> Amount {
        self.result.amount_out
    }

    /// Projects the plan as a [`Quote`] with the given output floor.
    pub fn to_quote(&self, min_amount_out: Amount) -> Quote {
        Quote {
            direction: self.result.direction,
            amount_in: self.result.amount_in,
            amount_out: self.result.amount_out,
            fee: self.result.fee,
            fee_rate: self.result.fee_rate,
            price_impact: self.result.price_impact,
            bins_traversed: self.result.bins_traversed,
            end_bin: self.result.end_bin,
            min_amount_out,
        }
    }
}

/// Executes exact-input swaps against a [`BinLedger`].
///
/// Within a bin liquidity is constant-sum at the bin price `P` (Y per X),
/// so a bin holding `y` pays out up to `y` for `ceil(y / P)` net X.  Fees
/// are taken from the gross input, rounded up; outputs are rounded down.
/// Both roundings favour the bin.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, BasisPoints, BinId, BinStep, SwapDirection};
/// use hydra_dlmm::engine::SwapEngine;
/// use hydra_dlmm::ledger::BinLedger;
///
/// let step = BinStep::new(10).expect("valid step");
/// let mut ledger = BinLedger::new(step, BinId::ZERO).expect("priced");
/// ledger.apply_delta(BinId::ZERO, 0, 1_000, 0, 0).expect("seed");
///
/// let plan = SwapEngine::plan(&ledger, Amount::new(100), SwapDirection::XToY, BasisPoints::new(30))
///     .expect("liquid");
/// assert_eq!(plan.amount_out(), Amount::new(99));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapEngine;

impl SwapEngine {
    /// Walks the ledger for an exact-input swap without mutating it.
    ///
    /// The active pointer of the resulting plan moves past every bin whose
    /// output-side reserve the swap drains, including the last one when
    /// the input runs out exactly there, unless the next bin is unpriced.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidQuantity`] if `amount_in` is zero or the swap
    ///   would pay out nothing.
    /// - [`DlmmError::InvalidFee`] if `fee_rate` is 100% or more.
    /// - [`DlmmError::InsufficientLiquidity`] if the ledger cannot absorb
    ///   the whole input.
    /// - [`DlmmError::ExcessiveBinTraversal`] if more than
    ///   [`MAX_BINS_PER_SWAP`] bins would be visited.
    /// - [`DlmmError::Overflow`] on arithmetic overflow.
    pub fn plan(
        ledger: &BinLedger,
        amount_in: Amount,
        direction: SwapDirection,
        fee_rate: BasisPoints,
    ) -> Result<SwapPlan> {
        if amount_in.is_zero() {
            return Err(DlmmError::InvalidQuantity("swap amount must be non-zero"));
        }
        if fee_rate.get() >= MAX_BPS {
            return Err(DlmmError::InvalidFee("fee must be below 10000 basis points"));
        }

        let start_bin = ledger.active_bin_id();
        let start_price = ledger.price_of(start_bin)?;
        if !ledger.has_liquidity_towards(start_bin, direction) {
            return Err(DlmmError::InsufficientLiquidity);
        }

        let mut current = start_bin;
        let mut remaining = amount_in;
        let mut amount_out = Amount::ZERO;
        let mut fee = Amount::ZERO;
        let mut fills = Vec::new();
        let mut traversed = 0u32;

        loop {
            traversed += 1;
            if traversed > MAX_BINS_PER_SWAP {
                return Err(DlmmError::ExcessiveBinTraversal {
                    limit: MAX_BINS_PER_SWAP,
                });
            }

            let bin = ledger.get_bin(current).copied().unwrap_or(Bin::EMPTY);
            let reserve = bin.reserve_out(direction);
            if !reserve.is_zero() {
                let price = ledger.price_of(current)?;
                let fill = fill_bin(current, price, reserve, remaining, direction, fee_rate)?;
                remaining = remaining.try_sub(&fill.amount_in)?;
                amount_out = amount_out.try_add(&fill.amount_out, "swap output overflow")?;
                fee = fee.try_add(&fill.fee, "swap fee overflow")?;
                fills.push(fill);
                if !fill.depleted {
                    break;
                }
            }

            // The output side of `current` is empty from here on.
            let next = match current.step(direction) {
                Ok(next) if ledger.price_of(next).is_ok() => Some(next),
                _ => None,
            };
            let Some(next) = next else {
                if remaining.is_zero() {
                    break;
                }
                return Err(DlmmError::InsufficientLiquidity);
            };
            current = next;
            if remaining.is_zero() {
                break;
            }
            if !ledger.has_liquidity_towards(current, direction) {
                return Err(DlmmError::InsufficientLiquidity);
            }
        }

        if amount_out.is_zero() {
            return Err(DlmmError::InvalidQuantity("swap too small to produce output"));
        }
        let price_impact = price_impact(ledger, start_price, &fills, direction)?;

        Ok(SwapPlan {
            result: SwapResult {
                direction,
                amount_in,
                amount_out,
                fee,
                fee_rate,
                price_impact,
                start_bin,
                end_bin: current,
                bins_traversed: traversed,
                fills,
            },
        })
    }

    /// Commits a plan to `ledger`.
    ///
    /// Each fill adds its net input to the bin, pays its output from the
    /// bin and records its fee; the active pointer then advances to the
    /// plan's end bin.  `ledger` must be in the state the plan was
    /// computed against.  On error the ledger may be partially updated,
    /// so callers apply plans to a scratch copy.
    ///
    /// # Errors
    ///
    /// Propagates [`BinLedger::apply_delta`] and
    /// [`BinLedger::advance_active_bin`] errors, which only occur when the
    /// ledger has diverged from the plan.
    pub fn apply(ledger: &mut BinLedger, plan: &SwapPlan) -> Result<()> {
        let result = &plan.result;
        if ledger.active_bin_id() != result.start_bin {
            return Err(DlmmError::InvalidConfiguration(
                "swap plan computed against a different active bin",
            ));
        }
        for fill in &result.fills {
            let net_in = signed(fill.amount_in.try_sub(&fill.fee)?)?;
            let out = signed(fill.amount_out)?;
            let fee = signed(fill.fee)?;
            match result.direction {
                SwapDirection::XToY => ledger.apply_delta(fill.bin, net_in, -out, fee, 0)?,
                SwapDirection::YToX => ledger.apply_delta(fill.bin, -out, net_in, 0, fee)?,
            }
            debug!(
                bin = fill.bin.get(),
                amount_in = fill.amount_in.get(),
                amount_out = fill.amount_out.get(),
                fee = fill.fee.get(),
                depleted = fill.depleted,
                "bin consumed"
            );
        }
        for _ in 0..result.start_bin.distance(result.end_bin) {
            ledger.advance_active_bin(result.direction)?;
        }
        Ok(())
    }

    /// Plans and commits an exact-input swap, copy-on-success.
    ///
    /// The swap is applied to a scratch copy of `ledger`, which replaces
    /// the original only if every step succeeds.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::SlippageExceeded`] if the output is below
    ///   `min_amount_out`.
    /// - Any error of [`SwapEngine::plan`].
    ///
    /// `ledger` is unchanged on any error.
    pub fn execute(
        ledger: &mut BinLedger,
        amount_in: Amount,
        direction: SwapDirection,
        fee_rate: BasisPoints,
        min_amount_out: Amount,
    ) -> Result<SwapResult> {
        let plan = Self::plan(ledger, amount_in, direction, fee_rate)?;
        if plan.amount_out() < min_amount_out {
            warn!(
                amount_in = amount_in.get(),
                amount_out = plan.amount_out().get(),
                min_amount_out = min_amount_out.get(),
                "swap rejected by slippage guard"
            );
            return Err(DlmmError::SlippageExceeded {
                bound: min_amount_out.get(),
                actual: plan.amount_out().get(),
            });
        }
        Self::commit(ledger, &plan)?;
        Ok(plan.into_result())
    }

    /// Applies `plan` to a scratch copy of `ledger` and swaps it in on
    /// success.
    ///
    /// # Errors
    ///
    /// Same as [`SwapEngine::apply`]; `ledger` is unchanged on error.
    pub fn commit(ledger: &mut BinLedger, plan: &SwapPlan) -> Result<()> {
        let mut scratch = ledger.clone();
        Self::apply(&mut scratch, plan)?;
        *ledger = scratch;
        Ok(())
    }
}

/// Consumes one bin with `remaining` gross input.
fn fill_bin(
    bin: BinId,
    price: BinPrice,
    reserve: Amount,
    remaining: Amount,
    direction: SwapDirection,
    fee_rate: BasisPoints,
) -> Result<BinFill> {
    // Net input that buys the whole reserve, rounded up.
    let max_net = match direction {
        SwapDirection::XToY => price.y_to_x(reserve, Rounding::Up)?,
        SwapDirection::YToX => price.x_to_y(reserve, Rounding::Up)?,
    };
    let max_gross = gross_up(max_net, fee_rate)?;

    if remaining >= max_gross {
        return Ok(BinFill {
            bin,
            amount_in: max_gross,
            amount_out: reserve,
            fee: max_gross.try_sub(&max_net)?,
            depleted: true,
        });
    }

    let fee = fee_on(remaining, fee_rate)?;
    let net = remaining.try_sub(&fee)?;
    let out = match direction {
        SwapDirection::XToY => price.x_to_y(net, Rounding::Down)?,
        SwapDirection::YToX => price.y_to_x(net, Rounding::Down)?,
    };
    Ok(BinFill {
        bin,
        amount_in: remaining,
        amount_out: out.min(reserve),
        fee,
        depleted: false,
    })
}

/// Fill-weighted drift of the bin price away from the start bin.
///
/// Every fill's net input is valued once at its own bin rate and once at
/// the start rate (output per input, so Y to X uses reciprocal prices):
/// `1 - Σ(net·rate_fill) / Σ(net·rate_start)`.  Fees and output rounding
/// stay out of it.  A larger input only adds weight to the last, worst
/// priced bin, so the value never decreases as the input grows.
fn price_impact(
    ledger: &BinLedger,
    start_price: BinPrice,
    fills: &[BinFill],
    direction: SwapDirection,
) -> Result<f64> {
    let rate = |price: BinPrice| -> Result<U256> {
        match direction {
            SwapDirection::XToY => Ok(U256::from(price.raw())),
            SwapDirection::YToX => reciprocal_q64(price.raw())
                .map(U256::from)
                .ok_or(DlmmError::Overflow("bin price reciprocal overflow")),
        }
    };
    let start_rate = rate(start_price)?;
    // Rates stay below 2^97 and nets below 2^128, so 128 fills fit in 256 bits.
    let mut at_start = U256::ZERO;
    let mut shortfall = U256::ZERO;
    for fill in fills {
        let net = U256::from(fill.amount_in.try_sub(&fill.fee)?.get());
        let fill_rate = rate(ledger.price_of(fill.bin)?)?;
        at_start += net * start_rate;
        shortfall += net * start_rate.saturating_sub(fill_rate);
    }
    Ok(ratio_to_f64(shortfall, at_start))
}

/// `floor(num / den * 2^53) / 2^53` by long division, for `num <= den`.
///
/// Exact up to the final truncation, so ordered ratios map to ordered
/// floats.
fn ratio_to_f64(num: U256, den: U256) -> f64 {
    if den == U256::ZERO {
        return 0.0;
    }
    let mut rem = num.min(den);
    let mut bits = 0u64;
    for _ in 0..f64::MANTISSA_DIGITS {
        rem <<= 1u32;
        bits <<= 1;
        if rem >= den {
            rem -= den;
            bits |= 1;
        }
    }
    bits as f64 / (1u64 << f64::MANTISSA_DIGITS) as f64
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BinStep;

    fn bin(v: i32) -> BinId {
        let Ok(b) = BinId::new(v) else {
            panic!("valid bin expected");
        };
        b
    }

    fn ledger(seed: &[(i32, i128, i128)]) -> BinLedger {
        let Ok(step) = BinStep::new(10) else {
            panic!("valid step");
        };
        let Ok(mut l) = BinLedger::new(step, BinId::ZERO) else {
            panic!("expected Ok");
        };
        for &(id, x, y) in seed {
            let Ok(()) = l.apply_delta(bin(id), x, y, 0, 0) else {
                panic!("seed failed");
            };
        }
        l
    }

    fn plan(l: &BinLedger, amount: u128, dir: SwapDirection, fee: u32) -> Result<SwapPlan> {
        SwapEngine::plan(l, Amount::new(amount), dir, BasisPoints::new(fee))
    }

    #[test]
    fn partial_fill_stays_in_active_bin() {
        let l = ledger(&[(0, 0, 1_000)]);
        let Ok(p) = plan(&l, 100, SwapDirection::XToY, 30) else {
            panic!("expected Ok");
        };
        let r = p.result();
        assert_eq!(r.fee, Amount::new(1));
        assert_eq!(r.amount_out, Amount::new(99));
        assert_eq!(r.end_bin, BinId::ZERO);
        assert_eq!(r.bins_traversed, 1);
        assert_eq!(r.fills.len(), 1);
        assert!(!r.fills[0].depleted);
    }

    #[test]
    fn depletion_crosses_to_next_bin() {
        let l = ledger(&[(0, 0, 100), (-1, 0, 1_000)]);
        let Ok(p) = plan(&l, 200, SwapDirection::XToY, 0) else {
            panic!("expected Ok");
        };
        let r = p.result();
        // 100 at price 1, then 100 at 1/1.001.
        assert_eq!(r.amount_out, Amount::new(199));
        assert_eq!(r.end_bin, bin(-1));
        assert_eq!(r.bins_traversed, 2);
        assert!(r.fills[0].depleted);
        assert!(!r.fills[1].depleted);
        assert!(r.price_impact > 0.0);
    }

    #[test]
    fn empty_bins_are_crossed_and_counted() {
        let l = ledger(&[(3, 500, 0)]);
        let Ok(p) = plan(&l, 100, SwapDirection::YToX, 0) else {
            panic!("expected Ok");
        };
        let r = p.result();
        assert_eq!(r.end_bin, bin(3));
        assert_eq!(r.bins_traversed, 4);
        assert_eq!(r.fills.len(), 1);
        assert_eq!(r.fills[0].bin, bin(3));
    }

    #[test]
    fn exact_depletion_advances_pointer() {
        let l = ledger(&[(0, 0, 100), (-1, 0, 50)]);
        let Ok(p) = plan(&l, 100, SwapDirection::XToY, 0) else {
            panic!("expected Ok");
        };
        let r = p.result();
        assert_eq!(r.amount_out, Amount::new(100));
        assert_eq!(r.end_bin, bin(-1));
        assert_eq!(r.bins_traversed, 1);
    }

    #[test]
    fn depleting_fill_charges_grossed_up_fee() {
        let l = ledger(&[(0, 0, 997)]);
        // The only bin is drained with 4_000 input left over.
        assert_eq!(
            plan(&l, 5_000, SwapDirection::XToY, 30).map(|p| p.amount_out()),
            Err(DlmmError::InsufficientLiquidity)
        );
        let Ok(p) = plan(&l, 1_000, SwapDirection::XToY, 30) else {
            panic!("expected Ok");
        };
        let r = p.result();
        assert_eq!(r.amount_in, Amount::new(1_000));
        assert_eq!(r.fee, Amount::new(3));
        assert_eq!(r.amount_out, Amount::new(997));
        assert!(r.fills[0].depleted);
    }

    #[test]
    fn insufficient_liquidity() {
        let l = ledger(&[(0, 0, 100)]);
        assert_eq!(
            plan(&l, 500, SwapDirection::XToY, 0).map(|p| p.amount_out()),
            Err(DlmmError::InsufficientLiquidity)
        );
        assert_eq!(
            plan(&l, 5, SwapDirection::YToX, 0).map(|p| p.amount_out()),
            Err(DlmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn sparse_ledger_hits_traversal_limit() {
        let l = ledger(&[(-200, 0, 1_000)]);
        assert_eq!(
            plan(&l, 10, SwapDirection::XToY, 0).map(|p| p.amount_out()),
            Err(DlmmError::ExcessiveBinTraversal {
                limit: MAX_BINS_PER_SWAP
            })
        );
    }

    #[test]
    fn zero_output_and_bad_inputs_rejected() {
        let l = ledger(&[(0, 0, 1_000)]);
        assert!(matches!(
            plan(&l, 1, SwapDirection::XToY, 30),
            Err(DlmmError::InvalidQuantity(_))
        ));
        assert!(matches!(
            plan(&l, 0, SwapDirection::XToY, 30),
            Err(DlmmError::InvalidQuantity(_))
        ));
        assert!(matches!(
            plan(&l, 10, SwapDirection::XToY, 10_000),
            Err(DlmmError::InvalidFee(_))
        ));
    }

    #[test]
    fn no_impact_at_unit_price_without_fee() {
        let l = ledger(&[(0, 0, 1_000)]);
        let Ok(p) = plan(&l, 100, SwapDirection::XToY, 0) else {
            panic!("expected Ok");
        };
        assert!(p.result().price_impact.abs() < f64::EPSILON);
    }

    #[test]
    fn impact_ignores_fee_rounding_and_never_falls() {
        let l = ledger(&[(0, 0, 1_000), (-1, 0, 1_000)]);
        let sizes = [2, 3, 100, 101, 333, 334, 1_004, 1_005, 1_500, 2_000];
        let mut impacts = Vec::new();
        for size in sizes {
            let Ok(p) = plan(&l, size, SwapDirection::XToY, 30) else {
                panic!("expected Ok for {size}");
            };
            impacts.push(p.result().price_impact);
        }
        // Everything up to draining bin 0 fills at the start price.
        for impact in &impacts[..7] {
            assert!(impact.abs() < f64::EPSILON);
        }
        for pair in impacts.windows(2) {
            assert!(pair[1] >= pair[0], "impact decreased: {pair:?}");
        }
        assert!(impacts[9] > 0.0 && impacts[9] < 0.001);
    }

    #[test]
    fn mirrored_walk_measures_impact_in_x() {
        let l = ledger(&[(0, 1_000, 0), (1, 1_000, 0)]);
        let Ok(p) = plan(&l, 1_500, SwapDirection::YToX, 0) else {
            panic!("expected Ok");
        };
        let r = p.result();
        assert_eq!(r.end_bin, bin(1));
        // 1000 net at the start rate, 500 at 1/1.001 of it.
        let expected = 500.0 * (1.0 - 1.0 / 1.001) / 1_500.0;
        assert!((r.price_impact - expected).abs() < 1e-9);
    }

    #[test]
    fn execute_commits_reserves_fees_and_pointer() {
        let mut l = ledger(&[(0, 0, 100), (-1, 0, 1_000)]);
        let Ok(r) = SwapEngine::execute(
            &mut l,
            Amount::new(300),
            SwapDirection::XToY,
            BasisPoints::new(30),
            Amount::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(l.active_bin_id(), bin(-1));
        let Some(b0) = l.get_bin(BinId::ZERO) else {
            panic!("bin expected");
        };
        assert_eq!(b0.reserve_y(), Amount::ZERO);
        assert_eq!(b0.reserve_x(), Amount::new(100));
        assert_eq!(b0.accrued_fee_x(), r.fills[0].fee);

        let Ok((x, y)) = l.total_reserves() else {
            panic!("expected Ok");
        };
        assert_eq!(x.get() + r.fee.get(), 300);
        assert_eq!(y.get() + r.amount_out.get(), 1_100);
    }

    #[test]
    fn slippage_guard_leaves_ledger_untouched() {
        let mut l = ledger(&[(0, 0, 100), (-1, 0, 1_000)]);
        let before = l.clone();
        let result = SwapEngine::execute(
            &mut l,
            Amount::new(300),
            SwapDirection::XToY,
            BasisPoints::new(30),
            Amount::new(1_000),
        );
        assert!(matches!(
            result,
            Err(DlmmError::SlippageExceeded { bound: 1_000, .. })
        ));
        assert_eq!(l, before);
    }

    #[test]
    fn plan_from_another_state_is_refused() {
        let l = ledger(&[(0, 0, 100), (-1, 0, 1_000)]);
        let Ok(p) = plan(&l, 150, SwapDirection::XToY, 0) else {
            panic!("expected Ok");
        };
        let mut moved = l.clone();
        let Ok(()) = SwapEngine::apply(&mut moved, &p) else {
            panic!("expected Ok");
        };
        assert!(matches!(
            SwapEngine::apply(&mut moved, &p),
            Err(DlmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn quote_projection_matches_result() {
        let l = ledger(&[(0, 0, 1_000)]);
        let Ok(p) = plan(&l, 100, SwapDirection::XToY, 30) else {
            panic!("expected Ok");
        };
        let q = p.to_quote(Amount::new(90));
        assert_eq!(q.amount_out, p.result().amount_out);
        assert_eq!(q.fee, p.result().fee);
        assert_eq!(q.end_bin, p.result().end_bin);
        assert_eq!(q.min_amount_out, Amount::new(90));
    }
}
