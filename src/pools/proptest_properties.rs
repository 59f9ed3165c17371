//! Property-based tests using `proptest` for pair invariant validation.
//!
//! 1. **Bin price round-trip**: `bin_of(price_of(b, s), s) == b`.
//! 2. **Quote/swap equivalence**: a quote reports what the swap does.
//! 3. **Conservation**: a swap moves exactly its net input and output
//!    through reserves and its fee into accrued fees.
//! 4. **Monotonicity**: more input never yields less output or less
//!    price impact.
//! 5. **Atomicity**: a rejected swap leaves the pair unchanged.
//! 6. **Distribution sum**: every shape places the exact input amounts.
//! 7. **Liquidity round-trip**: a sole provider withdraws what it put in.

use proptest::prelude::*;

use crate::config::{DlmmConfig, FeeSchedule};
use crate::distribution::LiquidityDistributor;
use crate::domain::{
    Amount, BasisPoints, BinId, BinRange, BinStep, LiquidityShape, OwnerId, Position,
    SwapDirection, SwapRequest,
};
use crate::error::DlmmError;
use crate::math::{bin_of, price_of};
use crate::pools::DlmmPool;
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn make_pool(step: u16, fee: u32) -> DlmmPool {
    let Ok(step) = BinStep::new(step) else {
        panic!("valid step");
    };
    let Ok(schedule) = FeeSchedule::fixed(BasisPoints::new(fee)) else {
        panic!("valid fee");
    };
    let Ok(config) = DlmmConfig::new(step, BinId::ZERO, schedule) else {
        panic!("valid config");
    };
    let Ok(pool) = DlmmPool::from_config(&config) else {
        panic!("valid pool");
    };
    pool
}

/// A pair with one provider spread uniformly over `[-20, 20]`.
fn seeded_pool(step: u16, fee: u32, amount_x: u128, amount_y: u128) -> (DlmmPool, Position) {
    let mut pool = make_pool(step, fee);
    let mut position = Position::new(OwnerId::from_bytes([1u8; 32]), 0);
    let Ok(range) = BinRange::new(-20, 20) else {
        panic!("valid range");
    };
    let Ok(_) = pool.deposit(
        &mut position,
        range,
        Amount::new(amount_x),
        Amount::new(amount_y),
        &LiquidityShape::Uniform,
    ) else {
        panic!("seed deposit failed");
    };
    (pool, position)
}

fn accrued_fees(pool: &DlmmPool) -> (u128, u128) {
    pool.bins().fold((0, 0), |(x, y), (_, b)| {
        (x + b.accrued_fee_x().get(), y + b.accrued_fee_y().get())
    })
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

fn bin_step_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![Just(1u16), Just(10u16), Just(25u16), Just(100u16), 1u16..=10_000u16]
}

/// Deposit sizes in `[1_000_000, 1_000_000_000]`.
fn liquidity_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000u128
}

/// Swap sizes kept well above rounding noise.
fn swap_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=500_000u128
}

fn direction_strategy() -> impl Strategy<Value = SwapDirection> {
    prop_oneof![Just(SwapDirection::XToY), Just(SwapDirection::YToX)]
}

fn fee_strategy() -> impl Strategy<Value = u32> {
    0u32..=300u32
}

fn shape_strategy() -> impl Strategy<Value = LiquidityShape> {
    prop_oneof![
        Just(LiquidityShape::Uniform),
        (5u32..=100u32).prop_map(|v| LiquidityShape::Normal {
            std_dev_bins: f64::from(v) / 10.0
        }),
        (1u32..=200u32).prop_map(|v| LiquidityShape::Exponential {
            lambda: f64::from(v) / 100.0
        }),
    ]
}

// ---------------------------------------------------------------------------
// Property 1: Bin price round-trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_bin_price_round_trip(step in bin_step_strategy(), id in -221_818i32..=221_818i32) {
        let Ok(step) = BinStep::new(step) else {
            return Ok(());
        };
        let Ok(bin) = BinId::new(id) else {
            return Ok(());
        };
        // Ids outside the step's priced window are rejected, not wrapped.
        let Ok(price) = price_of(bin, step) else {
            return Ok(());
        };
        prop_assert_eq!(bin_of(price, step), Ok(bin));
    }

    #[test]
    fn prop_price_strictly_increasing(step in bin_step_strategy(), id in -2_000i32..=2_000i32) {
        let Ok(step) = BinStep::new(step) else {
            return Ok(());
        };
        let (Ok(lo), Ok(hi)) = (BinId::new(id), BinId::new(id + 1)) else {
            return Ok(());
        };
        let (Ok(p_lo), Ok(p_hi)) = (price_of(lo, step), price_of(hi, step)) else {
            return Ok(());
        };
        prop_assert!(p_lo < p_hi, "price({}) >= price({})", id, id + 1);
    }
}

// ---------------------------------------------------------------------------
// Properties 2-5: Swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quote_swap_equivalence(
        step in bin_step_strategy(),
        fee in fee_strategy(),
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
        amount in swap_strategy(),
        direction in direction_strategy(),
    ) {
        let (pool, _) = seeded_pool(step, fee, lx, ly);
        let Ok(quote) = pool.quote(Amount::new(amount), direction, BasisPoints::ZERO) else {
            return Ok(());
        };
        let Ok(request) = SwapRequest::exact_in(Amount::new(amount), direction) else {
            return Ok(());
        };
        let mut live = pool.clone();
        let Ok(result) = live.swap(&request) else {
            return Err(TestCaseError::fail("quoted swap failed to execute"));
        };
        prop_assert_eq!(quote.amount_out, result.amount_out);
        prop_assert_eq!(quote.fee, result.fee);
        prop_assert_eq!(quote.end_bin, result.end_bin);
        prop_assert_eq!(quote.bins_traversed, result.bins_traversed);
        prop_assert_eq!(quote.price_impact.to_bits(), result.price_impact.to_bits());
        prop_assert_eq!(live.active_bin_id(), result.end_bin);
    }

    #[test]
    fn prop_swap_conserves_reserves(
        step in bin_step_strategy(),
        fee in fee_strategy(),
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
        amount in swap_strategy(),
        direction in direction_strategy(),
    ) {
        let (mut pool, _) = seeded_pool(step, fee, lx, ly);
        let Ok((x0, y0)) = pool.total_reserves() else {
            return Ok(());
        };
        let (fx0, fy0) = accrued_fees(&pool);
        let Ok(request) = SwapRequest::exact_in(Amount::new(amount), direction) else {
            return Ok(());
        };
        let Ok(r) = pool.swap(&request) else {
            return Ok(());
        };
        let Ok((x1, y1)) = pool.total_reserves() else {
            return Ok(());
        };
        let (fx1, fy1) = accrued_fees(&pool);
        let net_in = r.amount_in.get() - r.fee.get();
        let sum_in: u128 = r.fills.iter().map(|f| f.amount_in.get()).sum();
        let sum_out: u128 = r.fills.iter().map(|f| f.amount_out.get()).sum();
        prop_assert_eq!(sum_in, r.amount_in.get());
        prop_assert_eq!(sum_out, r.amount_out.get());
        match direction {
            SwapDirection::XToY => {
                prop_assert_eq!(x1.get(), x0.get() + net_in);
                prop_assert_eq!(y1.get() + r.amount_out.get(), y0.get());
                prop_assert_eq!(fx1, fx0 + r.fee.get());
                prop_assert_eq!(fy1, fy0);
            }
            SwapDirection::YToX => {
                prop_assert_eq!(y1.get(), y0.get() + net_in);
                prop_assert_eq!(x1.get() + r.amount_out.get(), x0.get());
                prop_assert_eq!(fy1, fy0 + r.fee.get());
                prop_assert_eq!(fx1, fx0);
            }
        }
    }

    #[test]
    fn prop_output_and_impact_monotonic(
        step in bin_step_strategy(),
        fee in fee_strategy(),
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
        a in 2u128..=500_000u128,
        extra in 1u128..=500_000u128,
        direction in direction_strategy(),
    ) {
        let (pool, _) = seeded_pool(step, fee, lx, ly);
        let Ok(small) = pool.quote(Amount::new(a), direction, BasisPoints::ZERO) else {
            return Ok(());
        };
        let Ok(large) = pool.quote(Amount::new(a + extra), direction, BasisPoints::ZERO) else {
            return Ok(());
        };
        prop_assert!(
            large.amount_out >= small.amount_out,
            "output decreased: {} -> {}",
            small.amount_out, large.amount_out
        );
        prop_assert!(
            large.price_impact >= small.price_impact,
            "impact decreased: {} -> {}",
            small.price_impact, large.price_impact
        );
    }

    #[test]
    fn prop_rejected_swap_is_atomic(
        step in bin_step_strategy(),
        fee in fee_strategy(),
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
        amount in swap_strategy(),
        direction in direction_strategy(),
    ) {
        let (mut pool, _) = seeded_pool(step, fee, lx, ly);
        let Ok(quote) = pool.quote(Amount::new(amount), direction, BasisPoints::ZERO) else {
            return Ok(());
        };
        let Ok(request) = SwapRequest::exact_in(Amount::new(amount), direction) else {
            return Ok(());
        };
        let before = pool.clone();
        let strict = request.with_min_amount_out(Amount::new(quote.amount_out.get() + 1));
        let rejected = matches!(pool.swap(&strict), Err(DlmmError::SlippageExceeded { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(&pool, &before);
    }
}

// ---------------------------------------------------------------------------
// Properties 6-7: Liquidity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_distribution_sums_exactly(
        active in -1_000i32..=1_000i32,
        below in 0i32..=40i32,
        above in 0i32..=40i32,
        amount_x in 0u128..=10_000_000_000u128,
        amount_y in 0u128..=10_000_000_000u128,
        split in 0u32..=10_000u32,
        shape in shape_strategy(),
    ) {
        let (Ok(active_bin), Ok(range)) = (BinId::new(active), BinRange::new(active - below, active + above)) else {
            return Ok(());
        };
        let Ok(allocations) = LiquidityDistributor::distribute(
            active_bin,
            range,
            Amount::new(amount_x),
            Amount::new(amount_y),
            &shape,
            BasisPoints::new(split),
        ) else {
            return Ok(());
        };
        let sum_x: u128 = allocations.iter().map(|a| a.amount_x.get()).sum();
        let sum_y: u128 = allocations.iter().map(|a| a.amount_y.get()).sum();
        prop_assert_eq!(sum_x, amount_x);
        prop_assert_eq!(sum_y, amount_y);
        for a in &allocations {
            prop_assert!(range.contains(a.bin));
            if a.bin > active_bin {
                prop_assert!(a.amount_y.is_zero());
            }
            if a.bin < active_bin {
                prop_assert!(a.amount_x.is_zero());
            }
        }
    }

    #[test]
    fn prop_custom_weights_sum_exactly(
        weights in prop::collection::vec(0u64..=1_000u64, 1..=30),
        amount_x in 1u128..=1_000_000_000u128,
        amount_y in 1u128..=1_000_000_000u128,
    ) {
        let len = i32::try_from(weights.len()).unwrap_or(1);
        let Ok(range) = BinRange::new(-(len / 2), len - 1 - len / 2) else {
            return Ok(());
        };
        let shape = LiquidityShape::Custom { weights, active_x_share: None };
        let Ok(allocations) = LiquidityDistributor::distribute(
            BinId::ZERO,
            range,
            Amount::new(amount_x),
            Amount::new(amount_y),
            &shape,
            BasisPoints::HALF,
        ) else {
            return Ok(());
        };
        let sum_x: u128 = allocations.iter().map(|a| a.amount_x.get()).sum();
        let sum_y: u128 = allocations.iter().map(|a| a.amount_y.get()).sum();
        prop_assert_eq!(sum_x, amount_x);
        prop_assert_eq!(sum_y, amount_y);
    }

    #[test]
    fn prop_sole_provider_withdraws_deposit(
        step in bin_step_strategy(),
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
    ) {
        let (mut pool, mut position) = seeded_pool(step, 30, lx, ly);
        let Ok(w) = pool.withdraw(&mut position, BasisPoints::MAX_PERCENT) else {
            return Err(TestCaseError::fail("full withdrawal failed"));
        };
        prop_assert_eq!(w.amount_x.get(), lx);
        prop_assert_eq!(w.amount_y.get(), ly);
        prop_assert!(position.is_closed());
        prop_assert_eq!(pool.bins().count(), 0);
    }

    #[test]
    fn prop_claims_never_exceed_recorded_fees(
        fee in 1u32..=300u32,
        lx in liquidity_strategy(),
        ly in liquidity_strategy(),
        amounts in prop::collection::vec((swap_strategy(), direction_strategy()), 1..=6),
    ) {
        let (mut pool, mut position) = seeded_pool(10, fee, lx, ly);
        let mut recorded = (0u128, 0u128);
        for (amount, direction) in amounts {
            let Ok(request) = SwapRequest::exact_in(Amount::new(amount), direction) else {
                continue;
            };
            if let Ok(r) = pool.swap(&request) {
                match direction {
                    SwapDirection::XToY => recorded.0 += r.fee.get(),
                    SwapDirection::YToX => recorded.1 += r.fee.get(),
                }
            }
        }
        let Ok(claimed) = pool.claim_fees(&mut position) else {
            return Err(TestCaseError::fail("claim failed"));
        };
        prop_assert!(claimed.fee_x.get() <= recorded.0);
        prop_assert!(claimed.fee_y.get() <= recorded.1);
    }
}
