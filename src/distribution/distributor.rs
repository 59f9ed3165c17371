//! Splitting a deposit across a bin range.

use tracing::debug;

use crate::domain::{Amount, BasisPoints, BinId, BinRange, LiquidityShape, Rounding, MAX_BPS};
use crate::error::{DlmmError, Result};
use crate::math::mul_div;

/// Integer scale applied to floating-point shape weights.
const WEIGHT_SCALE: f64 = 1e12;

/// Amounts assigned to one bin by a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinAllocation {
    /// Target bin.
    pub bin: BinId,
    /// X assigned.
    pub amount_x: Amount,
    /// Y assigned.
    pub amount_y: Amount,
}

/// Computes how a deposit spreads across bins.
///
/// # Side policy
///
/// | Bin position | Receives |
/// |--------------|----------|
/// | below the active bin | Y only |
/// | the active bin | X and Y, split by `active_x_share` |
/// | above the active bin | X only |
///
/// Each side is divided pro rata to the shape weights, rounded down, and
/// whatever rounding leaves over is added to the bin closest to the active
/// bin on that side.  The emitted amounts therefore sum to the inputs
/// exactly.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::distribution::LiquidityDistributor;
/// use hydra_dlmm::domain::{Amount, BasisPoints, BinId, BinRange, LiquidityShape};
///
/// let range = BinRange::new(100, 110).expect("valid range");
/// let active = BinId::new(105).expect("valid bin");
/// let allocations = LiquidityDistributor::distribute(
///     active,
///     range,
///     Amount::new(1_000),
///     Amount::ZERO,
///     &LiquidityShape::Uniform,
///     BasisPoints::HALF,
/// )
/// .expect("valid distribution");
/// let total: u128 = allocations.iter().map(|a| a.amount_x.get()).sum();
/// assert_eq!(total, 1_000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LiquidityDistributor;

impl LiquidityDistributor {
    /// Splits `amount_x` and `amount_y` over `range` under `shape`.
    ///
    /// `active_x_share` is the fraction of the active bin's weight assigned
    /// to the X side; a [`LiquidityShape::Custom`] override takes
    /// precedence.  Bins that receive nothing are omitted; the rest are
    /// returned in ascending order.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidDistribution`] if the shape parameters are
    ///   invalid, a `Spot` range spans more than one bin, custom weights do
    ///   not match the range length, or a side with a positive amount has
    ///   no bin able to take it.
    /// - [`DlmmError::InvalidConfiguration`] if `active_x_share` exceeds
    ///   100%.
    pub fn distribute(
        active: BinId,
        range: BinRange,
        amount_x: Amount,
        amount_y: Amount,
        shape: &LiquidityShape,
        active_x_share: BasisPoints,
    ) -> Result<Vec<BinAllocation>> {
        shape.validate()?;
        if !active_x_share.is_valid_percent() {
            return Err(DlmmError::InvalidConfiguration(
                "active bin split must not exceed 10000 basis points",
            ));
        }
        let split = shape.active_x_share().unwrap_or(active_x_share);
        let weights = shape_weights(active, range, shape)?;

        let mut x_weights = Vec::with_capacity(weights.len());
        let mut y_weights = Vec::with_capacity(weights.len());
        for (bin, w) in &weights {
            let (wx, wy) = match bin.cmp(&active) {
                core::cmp::Ordering::Greater => (*w, 0),
                core::cmp::Ordering::Less => (0, *w),
                core::cmp::Ordering::Equal => {
                    let wx = mul_div(*w, u128::from(split.get()), u128::from(MAX_BPS), Rounding::Down)?;
                    (wx, *w - wx)
                }
            };
            x_weights.push(wx);
            y_weights.push(wy);
        }

        let bins: Vec<BinId> = weights.iter().map(|(b, _)| *b).collect();
        let xs = split_side(amount_x, &bins, &x_weights, active, "no bin in range can take X")?;
        let ys = split_side(amount_y, &bins, &y_weights, active, "no bin in range can take Y")?;

        let allocations: Vec<BinAllocation> = bins
            .iter()
            .zip(xs.iter().zip(ys.iter()))
            .filter(|(_, (x, y))| !x.is_zero() || !y.is_zero())
            .map(|(bin, (x, y))| BinAllocation {
                bin: *bin,
                amount_x: *x,
                amount_y: *y,
            })
            .collect();

        debug!(
            range = %range,
            shape = %shape,
            bins = allocations.len(),
            "deposit distributed"
        );
        Ok(allocations)
    }
}

/// Raw per-bin weights for the shape, lowest bin first.
fn shape_weights(
    active: BinId,
    range: BinRange,
    shape: &LiquidityShape,
) -> Result<Vec<(BinId, u128)>> {
    let scaled = |f: f64| -> u128 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let w = (f * WEIGHT_SCALE).round() as u128;
        w
    };
    let unit = scaled(1.0);

    let weights = match shape {
        LiquidityShape::Uniform => range.iter().map(|b| (b, unit)).collect(),
        LiquidityShape::Spot => {
            if !range.is_single() {
                return Err(DlmmError::InvalidDistribution(
                    "spot shape needs a single-bin range",
                ));
            }
            vec![(range.lower(), unit)]
        }
        LiquidityShape::Normal { std_dev_bins } => {
            let centre = active.get().clamp(range.lower().get(), range.upper().get());
            let two_var = 2.0 * std_dev_bins * std_dev_bins;
            range
                .iter()
                .map(|b| {
                    let d = f64::from(b.get() - centre);
                    (b, scaled((-(d * d) / two_var).exp()))
                })
                .collect()
        }
        LiquidityShape::Exponential { lambda } => range
            .iter()
            .map(|b| {
                let d = f64::from(b.distance(active));
                (b, scaled((-lambda * d).exp()))
            })
            .collect(),
        LiquidityShape::Custom { weights, .. } => {
            if weights.len() != range.len() as usize {
                return Err(DlmmError::InvalidDistribution(
                    "custom weights must match the range length",
                ));
            }
            range
                .iter()
                .zip(weights.iter())
                .map(|(b, w)| (b, u128::from(*w)))
                .collect()
        }
    };
    Ok(weights)
}

/// Divides `amount` pro rata to `weights`, placing the rounding residual on
/// the positively weighted bin closest to `active`.
fn split_side(
    amount: Amount,
    bins: &[BinId],
    weights: &[u128],
    active: BinId,
    empty_side: &'static str,
) -> Result<Vec<Amount>> {
    if amount.is_zero() {
        return Ok(vec![Amount::ZERO; bins.len()]);
    }
    let total = weights.iter().try_fold(0u128, |acc, w| {
        acc.checked_add(*w)
            .ok_or(DlmmError::Overflow("distribution weight overflow"))
    })?;
    if total == 0 {
        return Err(DlmmError::InvalidDistribution(empty_side));
    }

    let mut out = Vec::with_capacity(bins.len());
    let mut assigned = Amount::ZERO;
    for w in weights {
        let share = Amount::new(mul_div(amount.get(), *w, total, Rounding::Down)?);
        assigned = assigned.try_add(&share, "distribution overflow")?;
        out.push(share);
    }

    let residual = amount.try_sub(&assigned)?;
    if !residual.is_zero() {
        let closest = bins
            .iter()
            .zip(weights)
            .enumerate()
            .filter(|(_, (_, w))| **w > 0)
            .min_by_key(|(_, (b, _))| b.distance(active))
            .map(|(i, _)| i);
        if let Some(slot) = closest.and_then(|i| out.get_mut(i)) {
            *slot = slot.try_add(&residual, "distribution overflow")?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn bin(v: i32) -> BinId {
        let Ok(b) = BinId::new(v) else {
            panic!("valid bin expected");
        };
        b
    }

    fn range(lo: i32, hi: i32) -> BinRange {
        let Ok(r) = BinRange::new(lo, hi) else {
            panic!("valid range expected");
        };
        r
    }

    fn run(
        active: i32,
        r: BinRange,
        x: u128,
        y: u128,
        shape: &LiquidityShape,
    ) -> Vec<BinAllocation> {
        let Ok(a) = LiquidityDistributor::distribute(
            bin(active),
            r,
            Amount::new(x),
            Amount::new(y),
            shape,
            BasisPoints::HALF,
        ) else {
            panic!("expected Ok");
        };
        a
    }

    fn sums(allocs: &[BinAllocation]) -> (u128, u128) {
        allocs.iter().fold((0, 0), |(x, y), a| {
            (x + a.amount_x.get(), y + a.amount_y.get())
        })
    }

    #[test]
    fn uniform_x_above_active() {
        let allocs = run(105, range(100, 110), 1_000, 0, &LiquidityShape::Uniform);
        assert_eq!(sums(&allocs), (1_000, 0));
        // Bins 106..=110 take full weight and 105 takes half: 5.5 units.
        let by_bin = |b: i32| {
            allocs
                .iter()
                .find(|a| a.bin == bin(b))
                .map_or(0, |a| a.amount_x.get())
        };
        assert_eq!(by_bin(106), 181);
        assert_eq!(by_bin(110), 181);
        // 1000 - 5 * 181 = 95 lands on the active bin (90 + residual 5).
        assert_eq!(by_bin(105), 95);
        assert!(allocs.iter().all(|a| a.bin >= bin(105)));
        assert!(allocs.iter().all(|a| a.amount_y.is_zero()));
    }

    #[test]
    fn both_sides_split_at_active() {
        let allocs = run(0, range(-2, 2), 400, 400, &LiquidityShape::Uniform);
        assert_eq!(sums(&allocs), (400, 400));
        for a in &allocs {
            if a.bin < bin(0) {
                assert!(a.amount_x.is_zero());
            }
            if a.bin > bin(0) {
                assert!(a.amount_y.is_zero());
            }
        }
        let Some(active) = allocs.iter().find(|a| a.bin == bin(0)) else {
            panic!("active bin allocated");
        };
        assert!(!active.amount_x.is_zero() && !active.amount_y.is_zero());
    }

    #[test]
    fn spot_single_bin() {
        let allocs = run(200, range(200, 200), 10_000, 0, &LiquidityShape::Spot);
        assert_eq!(allocs.len(), 1);
        assert_eq!(allocs[0].bin, bin(200));
        assert_eq!(allocs[0].amount_x, Amount::new(10_000));
    }

    #[test]
    fn spot_rejects_wide_range() {
        assert!(matches!(
            LiquidityDistributor::distribute(
                bin(0),
                range(0, 1),
                Amount::new(1),
                Amount::ZERO,
                &LiquidityShape::Spot,
                BasisPoints::HALF,
            ),
            Err(DlmmError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn side_without_bins_is_rejected() {
        // X cannot go below the active bin.
        assert_eq!(
            LiquidityDistributor::distribute(
                bin(50),
                range(10, 20),
                Amount::new(100),
                Amount::ZERO,
                &LiquidityShape::Uniform,
                BasisPoints::HALF,
            ),
            Err(DlmmError::InvalidDistribution("no bin in range can take X"))
        );
    }

    #[test]
    fn normal_peaks_at_active() {
        let allocs = run(
            0,
            range(-10, 10),
            0,
            1_000_000,
            &LiquidityShape::Normal { std_dev_bins: 3.0 },
        );
        assert_eq!(sums(&allocs), (0, 1_000_000));
        let y = |b: i32| {
            allocs
                .iter()
                .find(|a| a.bin == bin(b))
                .map_or(0, |a| a.amount_y.get())
        };
        assert!(y(-1) > y(-5));
        assert!(y(-5) > y(-10));
    }

    #[test]
    fn exponential_decays_from_active() {
        let allocs = run(
            0,
            range(0, 20),
            1_000_000,
            0,
            &LiquidityShape::Exponential { lambda: 0.3 },
        );
        assert_eq!(sums(&allocs), (1_000_000, 0));
        let x = |b: i32| {
            allocs
                .iter()
                .find(|a| a.bin == bin(b))
                .map_or(0, |a| a.amount_x.get())
        };
        assert!(x(1) > x(2));
        assert!(x(2) > x(10));
    }

    #[test]
    fn custom_weights_and_override() {
        let shape = LiquidityShape::Custom {
            weights: vec![1, 2, 3],
            active_x_share: Some(BasisPoints::MAX_PERCENT),
        };
        let allocs = run(5, range(5, 7), 600, 0, &shape);
        assert_eq!(sums(&allocs), (600, 0));
        assert_eq!(allocs[0].amount_x, Amount::new(100));
        assert_eq!(allocs[1].amount_x, Amount::new(200));
        assert_eq!(allocs[2].amount_x, Amount::new(300));
    }

    #[test]
    fn custom_weights_length_checked() {
        let shape = LiquidityShape::Custom {
            weights: vec![1, 2],
            active_x_share: None,
        };
        assert!(matches!(
            LiquidityDistributor::distribute(
                bin(0),
                range(0, 2),
                Amount::new(1),
                Amount::ZERO,
                &shape,
                BasisPoints::HALF,
            ),
            Err(DlmmError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn residual_goes_to_bin_nearest_active() {
        let allocs = run(0, range(-3, -1), 0, 10, &LiquidityShape::Uniform);
        assert_eq!(sums(&allocs), (0, 10));
        // 3 each, residual 1 on bin -1.
        assert_eq!(allocs[2].bin, bin(-1));
        assert_eq!(allocs[2].amount_y, Amount::new(4));
        assert_eq!(allocs[0].amount_y, Amount::new(3));
    }

    #[test]
    fn zero_amounts_yield_nothing() {
        assert!(run(0, range(-3, 3), 0, 0, &LiquidityShape::Uniform).is_empty());
    }
}
