//! Deposit shapes understood by the liquidity distributor.

use core::fmt;

use super::BasisPoints;
use crate::error::{DlmmError, Result};

/// How a deposit spreads across its bin range.
///
/// The set is closed: the distributor matches it exhaustively.
///
/// | Shape | Weight of bin `b` |
/// |-------|-------------------|
/// | `Uniform` | `1` |
/// | `Normal` | `exp(-(b - centre)^2 / (2 * std_dev_bins^2))` |
/// | `Exponential` | `exp(-lambda * |b - active|)` |
/// | `Spot` | `1` on a single-bin range |
/// | `Custom` | caller-supplied, one weight per bin |
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::LiquidityShape;
///
/// assert!(LiquidityShape::Normal { std_dev_bins: 2.0 }.validate().is_ok());
/// assert!(LiquidityShape::Normal { std_dev_bins: 0.0 }.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiquidityShape {
    /// Equal weight on every bin.
    Uniform,
    /// Bell curve centred on the active bin (clamped into the range).
    Normal {
        /// Standard deviation measured in bins.
        std_dev_bins: f64,
    },
    /// Weight decaying with distance from the active bin.
    Exponential {
        /// Decay rate per bin; `0` degenerates to uniform.
        lambda: f64,
    },
    /// Everything in one bin; the range must hold a single bin.
    Spot,
    /// Explicit integer weights, lowest bin first.
    Custom {
        /// One weight per bin in the range.
        weights: Vec<u64>,
        /// Share of the active bin's weight that takes X, overriding the
        /// pair's configured split.
        active_x_share: Option<BasisPoints>,
    },
}

impl LiquidityShape {
    /// Checks the shape parameters that do not depend on the range.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidDistribution`] for a non-finite or
    /// non-positive standard deviation, a negative or non-finite decay rate,
    /// custom weights with a zero total, or an active share above 100%.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Uniform | Self::Spot => Ok(()),
            Self::Normal { std_dev_bins } => {
                if !std_dev_bins.is_finite() || *std_dev_bins <= 0.0 {
                    return Err(DlmmError::InvalidDistribution(
                        "standard deviation must be finite and positive",
                    ));
                }
                Ok(())
            }
            Self::Exponential { lambda } => {
                if !lambda.is_finite() || *lambda < 0.0 {
                    return Err(DlmmError::InvalidDistribution(
                        "decay rate must be finite and non-negative",
                    ));
                }
                Ok(())
            }
            Self::Custom {
                weights,
                active_x_share,
            } => {
                if weights.iter().all(|w| *w == 0) {
                    return Err(DlmmError::InvalidDistribution(
                        "custom weights must sum to a positive total",
                    ));
                }
                if active_x_share.is_some_and(|s| !s.is_valid_percent()) {
                    return Err(DlmmError::InvalidDistribution(
                        "active bin share must not exceed 100%",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the active bin X share this shape forces, if any.
    #[must_use]
    pub fn active_x_share(&self) -> Option<BasisPoints> {
        match self {
            Self::Custom { active_x_share, .. } => *active_x_share,
            _ => None,
        }
    }
}

impl fmt::Display for LiquidityShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "Uniform"),
            Self::Normal { std_dev_bins } => write!(f, "Normal(std_dev={std_dev_bins})"),
            Self::Exponential { lambda } => write!(f, "Exponential(lambda={lambda})"),
            Self::Spot => write!(f, "Spot"),
            Self::Custom { weights, .. } => write!(f, "Custom({} weights)", weights.len()),
        }
    }
}
