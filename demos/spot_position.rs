//! Spot liquidity example.
//!
//! Demonstrates opening a pair, placing a single-bin position at the
//! active price, pushing the price out of that bin with swaps, and
//! collecting fees before exiting.
//!
//! # Run
//!
//! ```bash
//! cargo run --example spot_position
//! ```

use hydra_dlmm::config::{DlmmConfig, FeeSchedule};
use hydra_dlmm::domain::{
    Amount, BasisPoints, BinId, BinRange, BinStep, LiquidityShape, OwnerId, Position,
    SwapDirection, SwapRequest,
};
use hydra_dlmm::pools::DlmmPool;
use hydra_dlmm::traits::{FromConfig, LiquidityPool, SwapPool};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Spot position on a 20 bps pair ===\n");

    // ── 1. Configure the pair ──────────────────────────────────────────
    //    Bin 200 at 20 bps per bin prices X at roughly 1.49 Y.
    let active = BinId::new(200)?;
    let config = DlmmConfig::new(
        BinStep::new(20)?,
        active,
        FeeSchedule::fixed(BasisPoints::new(25))?,
    )?;
    let mut pool = DlmmPool::from_config(&config)?;
    println!("Spot price:  {:.6}", pool.spot_price()?.to_f64());

    // ── 2. Place all liquidity in the active bin ───────────────────────
    let mut position = Position::new(OwnerId::from_bytes([1u8; 32]), 0);
    let delta = pool.deposit(
        &mut position,
        BinRange::single(active),
        Amount::new(1_000_000),
        Amount::new(1_500_000),
        &LiquidityShape::Spot,
    )?;
    println!(
        "Deposited:   {} X, {} Y into bin {}",
        delta.amount_x().get(),
        delta.amount_y().get(),
        active.get()
    );

    // ── 3. Quote, then buy X until the bin runs dry ────────────────────
    let quote = pool.quote(Amount::new(400_000), SwapDirection::YToX, BasisPoints::new(50))?;
    println!(
        "Quote:       400 000 Y -> {} X (min {}, impact {:.4}%)",
        quote.amount_out.get(),
        quote.min_amount_out.get(),
        quote.price_impact_percent()
    );

    let reserve_x = pool.bin(active).map_or(0, |b| b.reserve_x().get());
    let drain = SwapRequest::exact_out(Amount::new(reserve_x), SwapDirection::YToX)?;
    let result = pool.swap(&drain)?;
    println!(
        "Drained:     paid {} Y (fee {}) for {} X, active bin {} -> {}",
        result.amount_in.get(),
        result.fee.get(),
        result.amount_out.get(),
        result.start_bin.get(),
        result.end_bin.get()
    );

    // ── 4. Sell some X back, which walks the price down again ─────────
    let back = SwapRequest::exact_in(Amount::new(100_000), SwapDirection::XToY)?;
    let result = pool.swap(&back)?;
    println!(
        "Sold back:   {} X for {} Y, active bin now {}",
        result.amount_in.get(),
        result.amount_out.get(),
        pool.active_bin_id().get()
    );

    // ── 5. Collect fees and exit ───────────────────────────────────────
    let fees = pool.claim_fees(&mut position)?;
    println!(
        "Fees:        {} X, {} Y",
        fees.fee_x.get(),
        fees.fee_y.get()
    );

    let exit = pool.withdraw(&mut position, BasisPoints::MAX_PERCENT)?;
    println!(
        "Withdrawn:   {} X, {} Y from {} bin(s)",
        exit.amount_x.get(),
        exit.amount_y.get(),
        exit.bins_closed
    );

    let (x, y) = pool.total_reserves()?;
    println!("\nPair reserves after exit: {} X, {} Y", x.get(), y.get());
    Ok(())
}
