//! Configuration for a DLMM pair.

use crate::domain::{BasisPoints, BinId, BinStep};
use crate::error::{DlmmError, Result};
use crate::math::price_of;

use super::FeeSchedule;

/// Immutable parameters of one DLMM pair.
///
/// # Key Relationships
///
/// - Price of bin `i`: `P(i) = (1 + bin_step / 10_000)^i`
/// - Bin liquidity: `L = P * x + y`
///
/// # Validation
///
/// - `active_bin` must have a representable price for `bin_step`.
/// - The fee schedule must pass [`FeeSchedule::validate`].
/// - `active_bin_split` must be a valid percentage.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::config::{DlmmConfig, FeeSchedule};
/// use hydra_dlmm::domain::{BasisPoints, BinId, BinStep};
///
/// let config = DlmmConfig::new(
///     BinStep::new(10).expect("valid step"),
///     BinId::new(105).expect("valid bin"),
///     FeeSchedule::fixed(BasisPoints::new(30)).expect("valid fee"),
/// )
/// .expect("valid config");
/// assert_eq!(config.active_bin_split(), BasisPoints::HALF);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DlmmConfig {
    bin_step: BinStep,
    active_bin: BinId,
    fee_schedule: FeeSchedule,
    active_bin_split: BasisPoints,
}

impl DlmmConfig {
    /// Creates a new `DlmmConfig` with a 50/50 active bin split.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::OutOfBinRange`] if `active_bin` has no representable
    ///   price for `bin_step`.
    /// - [`DlmmError::InvalidFee`] if the fee schedule is invalid.
    pub fn new(bin_step: BinStep, active_bin: BinId, fee_schedule: FeeSchedule) -> Result<Self> {
        let config = Self {
            bin_step,
            active_bin,
            fee_schedule,
            active_bin_split: BasisPoints::HALF,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the share of the active bin's deposit weight that takes X.
    ///
    /// Deposits covering the active bin put `split` of that bin's weight on
    /// the X side and the remainder on the Y side.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidConfiguration`] if `split` exceeds 100%.
    pub fn with_active_bin_split(mut self, split: BasisPoints) -> Result<Self> {
        self.active_bin_split = split;
        self.validate()?;
        Ok(self)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::OutOfBinRange`] if the active bin is unpriced.
    /// - [`DlmmError::InvalidFee`] if the fee schedule is invalid.
    /// - [`DlmmError::InvalidConfiguration`] if the split is above 100%.
    pub fn validate(&self) -> Result<()> {
        price_of(self.active_bin, self.bin_step)?;
        self.fee_schedule.validate()?;
        if !self.active_bin_split.is_valid_percent() {
            return Err(DlmmError::InvalidConfiguration(
                "active bin split must not exceed 10000 basis points",
            ));
        }
        Ok(())
    }

    /// Returns the bin step.
    #[must_use]
    pub const fn bin_step(&self) -> BinStep {
        self.bin_step
    }

    /// Returns the initial active bin.
    #[must_use]
    pub const fn active_bin(&self) -> BinId {
        self.active_bin
    }

    /// Returns the fee schedule.
    #[must_use]
    pub const fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    /// Returns the active bin X share.
    #[must_use]
    pub const fn active_bin_split(&self) -> BasisPoints {
        self.active_bin_split
    }
}
