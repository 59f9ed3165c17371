//! Bin-to-price and price-to-bin conversion.
//!
//! A bin's price is `(1 + bin_step / 10_000)^bin_id`, computed in Q64.64
//! by exponentiation by squaring so the result is identical on every
//! platform.  Negative ids take the reciprocal of the positive power.
//!
//! # Representable range
//!
//! Prices are limited to `[2^-32, 2^32]`.  Inside that window every pair of
//! consecutive bins maps to distinct fixed-point values for any bin step,
//! which keeps [`bin_of`] an exact inverse of [`price_of`].  Which ids fall
//! inside the window depends on the step:
//!
//! | Bin step | Usable ids |
//! |----------|------------|
//! | 1 | `±221_818` |
//! | 10 | `±22_191` |
//! | 100 | `±2_229` |
//! | 10_000 | `±32` |
//!
//! # Examples
//!
//! ```
//! use hydra_dlmm::domain::{BinId, BinStep};
//! use hydra_dlmm::math::{bin_of, price_of};
//!
//! let step = BinStep::new(10).expect("valid step");
//! let id = BinId::new(105).expect("valid bin");
//! let price = price_of(id, step).expect("representable");
//! assert_eq!(bin_of(price, step), Ok(id));
//! ```

use crate::domain::{BinId, BinPrice, BinStep, MAX_BIN_ID, MIN_BIN_ID};
use crate::error::{DlmmError, Result};
use crate::math::fixed_point::{mul_q64, reciprocal_q64, SCALE_OFFSET};

/// Smallest raw Q64.64 price a bin may carry (`2^-32`).
pub const MIN_PRICE_RAW: u128 = 1 << (SCALE_OFFSET - 32);

/// Largest raw Q64.64 price a bin may carry (`2^32`).
pub const MAX_PRICE_RAW: u128 = 1 << (SCALE_OFFSET + 32);

/// Upper bound on correction steps after the floating-point estimate.
const MAX_CORRECTION_STEPS: u32 = 64;

/// Computes the price of `bin_id`: `(1 + bin_step / 10_000)^bin_id`.
///
/// Strictly increasing in `bin_id` for a fixed step.
///
/// # Errors
///
/// Returns [`DlmmError::OutOfBinRange`] if the price falls outside
/// `[MIN_PRICE_RAW, MAX_PRICE_RAW]` for this step.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{BinId, BinPrice, BinStep};
/// use hydra_dlmm::math::price_of;
///
/// let step = BinStep::new(25).expect("valid step");
/// assert_eq!(price_of(BinId::ZERO, step), Ok(BinPrice::ONE));
/// ```
#[must_use = "this returns the computed price and does not modify state"]
pub fn price_of(bin_id: BinId, bin_step: BinStep) -> Result<BinPrice> {
    let raw = saturating_raw_price(bin_id.get(), bin_step);
    if !(MIN_PRICE_RAW..=MAX_PRICE_RAW).contains(&raw) {
        return Err(DlmmError::OutOfBinRange(bin_id.get()));
    }
    Ok(BinPrice::from_raw(raw))
}

/// Returns the largest bin id whose price is `<= price`.
///
/// A floating-point logarithm gives the starting estimate, which is then
/// corrected against [`price_of`] so the answer is exact:
/// `bin_of(price_of(b)) == b` for every representable bin.
///
/// # Errors
///
/// - [`DlmmError::InvalidPrice`] if `price` is outside
///   `[MIN_PRICE_RAW, MAX_PRICE_RAW]`.
/// - [`DlmmError::OutOfBinRange`] if the enclosing bin has no
///   representable price for this step.
#[must_use = "this returns the computed bin and does not modify state"]
pub fn bin_of(price: BinPrice, bin_step: BinStep) -> Result<BinId> {
    let raw = price.raw();
    if !(MIN_PRICE_RAW..=MAX_PRICE_RAW).contains(&raw) {
        return Err(DlmmError::InvalidPrice(
            "price outside the representable bin range",
        ));
    }

    let estimate = (price.to_f64().ln() / bin_step.growth_factor().ln()).floor();
    #[allow(clippy::cast_possible_truncation)]
    let mut candidate = estimate.clamp(f64::from(MIN_BIN_ID), f64::from(MAX_BIN_ID)) as i32;

    for _ in 0..MAX_CORRECTION_STEPS {
        if saturating_raw_price(candidate, bin_step) > raw {
            if candidate == MIN_BIN_ID {
                return Err(DlmmError::OutOfBinRange(candidate));
            }
            candidate -= 1;
        } else if candidate < MAX_BIN_ID && saturating_raw_price(candidate + 1, bin_step) <= raw {
            candidate += 1;
        } else {
            let id = BinId::new(candidate)?;
            // The enclosing bin itself must be priced inside the window.
            price_of(id, bin_step)?;
            return Ok(id);
        }
    }
    Err(DlmmError::InvalidPrice("bin search did not converge"))
}

/// Raw Q64.64 price for any `i32` id, saturating to `0` below the `u128`
/// range and to `u128::MAX` above it.  Monotone non-decreasing in `id`.
fn saturating_raw_price(id: i32, bin_step: BinStep) -> u128 {
    let base = (1u128 << SCALE_OFFSET)
        + (u128::from(bin_step.get()) << SCALE_OFFSET) / 10_000;
    match pow_q64(base, id.unsigned_abs()) {
        Some(p) if id >= 0 => p,
        Some(p) => reciprocal_q64(p).unwrap_or(0),
        None if id >= 0 => u128::MAX,
        None => 0,
    }
}

/// `base^exp` in Q64.64 by squaring, rounding down at each product.
fn pow_q64(base: u128, mut exp: u32) -> Option<u128> {
    let mut result = 1u128 << SCALE_OFFSET;
    let mut square = base;
    loop {
        if exp & 1 == 1 {
            result = mul_q64(result, square)?;
        }
        exp >>= 1;
        if exp == 0 {
            return Some(result);
        }
        square = mul_q64(square, square)?;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn step(v: u16) -> BinStep {
        let Ok(s) = BinStep::new(v) else {
            panic!("valid step expected");
        };
        s
    }

    fn bin(v: i32) -> BinId {
        let Ok(b) = BinId::new(v) else {
            panic!("valid bin expected");
        };
        b
    }

    fn price(id: i32, s: u16) -> BinPrice {
        let Ok(p) = price_of(bin(id), step(s)) else {
            panic!("representable price expected");
        };
        p
    }

    #[test]
    fn bin_zero_is_one() {
        for s in [1, 10, 100, 10_000] {
            assert_eq!(price(0, s), BinPrice::ONE);
        }
    }

    #[test]
    fn bin_one_is_growth_factor() {
        // 1.001 in Q64.64, base rounded down
        assert_eq!(price(1, 10).raw(), 18_465_190_817_783_261_167);
        assert!((price(1, 10).to_f64() - 1.001).abs() < 1e-12);
        assert!((price(-1, 10).to_f64() - 1.0 / 1.001).abs() < 1e-12);
    }

    #[test]
    fn matches_float_reference() {
        let p = price(105, 10).to_f64();
        let expected = 1.001f64.powi(105);
        assert!((p / expected - 1.0).abs() < 1e-12);

        let q = price(-2000, 25).to_f64();
        let expected = 1.0025f64.powi(-2000);
        assert!((q / expected - 1.0).abs() < 1e-10);
    }

    #[test]
    fn strictly_increasing() {
        for s in [1, 7, 100] {
            let mut prev = price(-300, s);
            for id in -299..=300 {
                let next = price(id, s);
                assert!(next > prev, "step {s} bin {id}");
                prev = next;
            }
        }
    }

    #[test]
    fn window_edges_per_step() {
        assert!(price_of(bin(MAX_BIN_ID), step(1)).is_ok());
        assert!(price_of(bin(MIN_BIN_ID), step(1)).is_ok());
        assert!(price_of(bin(22_191), step(10)).is_ok());
        assert_eq!(
            price_of(bin(22_192), step(10)),
            Err(DlmmError::OutOfBinRange(22_192))
        );
        assert!(price_of(bin(-32), step(10_000)).is_ok());
        assert_eq!(
            price_of(bin(-33), step(10_000)),
            Err(DlmmError::OutOfBinRange(-33))
        );
    }

    #[test]
    fn round_trip_exact() {
        for s in [1, 3, 10, 25, 100, 10_000] {
            let limit = match s {
                10_000 => 32,
                100 => 2_229,
                _ => 2_000,
            };
            for id in (-limit..=limit).step_by(7) {
                assert_eq!(bin_of(price(id, s), step(s)), Ok(bin(id)), "step {s}");
            }
        }
    }

    #[test]
    fn round_trip_at_window_edges() {
        for id in [MIN_BIN_ID, MIN_BIN_ID + 1, MAX_BIN_ID - 1, MAX_BIN_ID] {
            assert_eq!(bin_of(price(id, 1), step(1)), Ok(bin(id)));
        }
        for id in [-22_191, 22_191] {
            assert_eq!(bin_of(price(id, 10), step(10)), Ok(bin(id)));
        }
    }

    #[test]
    fn floors_between_bins() {
        let lo = price(50, 10);
        let hi = price(51, 10);
        let mid = BinPrice::from_raw(lo.raw() + (hi.raw() - lo.raw()) / 2);
        assert_eq!(bin_of(mid, step(10)), Ok(bin(50)));
        let just_below = BinPrice::from_raw(hi.raw() - 1);
        assert_eq!(bin_of(just_below, step(10)), Ok(bin(50)));

        let neg = BinPrice::from_raw(price(-50, 10).raw() + 1);
        assert_eq!(bin_of(neg, step(10)), Ok(bin(-50)));
    }

    #[test]
    fn rejects_prices_outside_window() {
        assert!(matches!(
            bin_of(BinPrice::from_raw(0), step(10)),
            Err(DlmmError::InvalidPrice(_))
        ));
        assert!(matches!(
            bin_of(BinPrice::from_raw(MAX_PRICE_RAW + 1), step(10)),
            Err(DlmmError::InvalidPrice(_))
        ));
        assert!(matches!(
            bin_of(BinPrice::from_raw(MIN_PRICE_RAW - 1), step(1)),
            Err(DlmmError::InvalidPrice(_))
        ));
    }

    #[test]
    fn max_price_maps_to_last_usable_bin() {
        assert_eq!(
            bin_of(BinPrice::from_raw(MAX_PRICE_RAW), step(10)),
            Ok(bin(22_191))
        );
    }
}
