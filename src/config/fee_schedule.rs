//! Swap fee schedules.

use core::fmt;

use crate::domain::{BasisPoints, MAX_BPS};
use crate::error::{DlmmError, Result};

/// One step of a volatility-tiered schedule: at or above `threshold`
/// realised volatility, charge `fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatilityTier {
    /// Lowest volatility this tier applies to.
    pub threshold: BasisPoints,
    /// Fee charged within the tier.
    pub fee: BasisPoints,
}

impl VolatilityTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(threshold: BasisPoints, fee: BasisPoints) -> Self {
        Self { threshold, fee }
    }
}

/// How a pair prices its swap fee.
///
/// A closed set of modes: a constant rate, or a monotonic step function of
/// caller-supplied realised volatility capped at `max_fee`.
///
/// # Validation
///
/// - Every fee is strictly below 100%: the swap walk grosses inputs up by
///   `1 / (1 - fee)`.
/// - Tiers are non-empty, start at zero volatility, have strictly
///   increasing thresholds and non-decreasing fees, and never exceed
///   `max_fee`.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::config::{FeeSchedule, VolatilityTier};
/// use hydra_dlmm::domain::BasisPoints;
///
/// let schedule = FeeSchedule::volatility_tiered(
///     vec![
///         VolatilityTier::new(BasisPoints::ZERO, BasisPoints::new(10)),
///         VolatilityTier::new(BasisPoints::new(200), BasisPoints::new(30)),
///     ],
///     BasisPoints::new(100),
/// )
/// .expect("valid tiers");
/// assert!(schedule.validate().is_ok());
/// ```
///
/// Deserialization runs the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FeeScheduleRecord")
)]
pub enum FeeSchedule {
    /// Constant fee.
    Static {
        /// Fee charged on every swap.
        fee: BasisPoints,
    },
    /// Fee chosen by realised volatility.
    VolatilityTiered {
        /// Tiers ordered by threshold.
        tiers: Vec<VolatilityTier>,
        /// Hard cap on the fee.
        max_fee: BasisPoints,
    },
}

impl FeeSchedule {
    /// Static schedule.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidFee`] if `fee` is 100% or more.
    pub fn fixed(fee: BasisPoints) -> Result<Self> {
        let schedule = Self::Static { fee };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Volatility-tiered schedule.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidFee`] if the tiers break any rule listed
    /// on [`FeeSchedule`].
    pub fn volatility_tiered(tiers: Vec<VolatilityTier>, max_fee: BasisPoints) -> Result<Self> {
        let schedule = Self::VolatilityTiered { tiers, max_fee };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Validates the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidFee`] describing the first broken rule.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Static { fee } => check_below_full(*fee),
            Self::VolatilityTiered { tiers, max_fee } => {
                check_below_full(*max_fee)?;
                let Some(first) = tiers.first() else {
                    return Err(DlmmError::InvalidFee("fee schedule needs at least one tier"));
                };
                if first.threshold != BasisPoints::ZERO {
                    return Err(DlmmError::InvalidFee(
                        "first tier must start at zero volatility",
                    ));
                }
                for pair in tiers.windows(2) {
                    let [lo, hi] = pair else { continue };
                    if hi.threshold <= lo.threshold {
                        return Err(DlmmError::InvalidFee(
                            "tier thresholds must be strictly increasing",
                        ));
                    }
                    if hi.fee < lo.fee {
                        return Err(DlmmError::InvalidFee("tier fees must not decrease"));
                    }
                }
                if tiers.iter().any(|t| t.fee > *max_fee) {
                    return Err(DlmmError::InvalidFee("tier fee exceeds the maximum fee"));
                }
                Ok(())
            }
        }
    }

    /// The lowest fee this schedule can charge.
    #[must_use]
    pub fn base_fee(&self) -> BasisPoints {
        match self {
            Self::Static { fee } => *fee,
            Self::VolatilityTiered { tiers, max_fee } => {
                tiers.first().map_or(*max_fee, |t| t.fee)
            }
        }
    }
}

/// Unvalidated wire form of [`FeeSchedule`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
enum FeeScheduleRecord {
    Static {
        fee: BasisPoints,
    },
    VolatilityTiered {
        tiers: Vec<VolatilityTier>,
        max_fee: BasisPoints,
    },
}

#[cfg(feature = "serde")]
impl TryFrom<FeeScheduleRecord> for FeeSchedule {
    type Error = DlmmError;

    fn try_from(record: FeeScheduleRecord) -> Result<Self> {
        match record {
            FeeScheduleRecord::Static { fee } => Self::fixed(fee),
            FeeScheduleRecord::VolatilityTiered { tiers, max_fee } => {
                Self::volatility_tiered(tiers, max_fee)
            }
        }
    }
}

impl fmt::Display for FeeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static { fee } => write!(f, "Static({fee})"),
            Self::VolatilityTiered { tiers, max_fee } => {
                write!(f, "VolatilityTiered({} tiers, max={max_fee})", tiers.len())
            }
        }
    }
}

const fn check_below_full(fee: BasisPoints) -> Result<()> {
    if fee.get() >= MAX_BPS {
        return Err(DlmmError::InvalidFee("fee must be below 10000 basis points"));
    }
    Ok(())
}
