//! Discrete bin index and bin step.

use core::fmt;

use super::SwapDirection;
use crate::error::{DlmmError, Result};

/// Smallest bin id accepted anywhere in the engine.
pub const MIN_BIN_ID: i32 = -221_818;

/// Largest bin id accepted anywhere in the engine.
pub const MAX_BIN_ID: i32 = 221_818;

/// Largest bin step (in basis points) accepted at pair creation.
pub const MAX_BIN_STEP: u16 = 10_000;

/// Index of a liquidity bin.
///
/// Price increases strictly with the id: `price = (1 + bin_step / 10_000)^id`.
/// Valid ids lie in `[MIN_BIN_ID, MAX_BIN_ID]`; whether a particular id has a
/// representable price also depends on the bin step (see
/// [`price_of`](crate::math::price_of)).
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::BinId;
///
/// let id = BinId::new(105).expect("in range");
/// assert_eq!(id.get(), 105);
/// assert!(BinId::new(1_000_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i32", into = "i32")
)]
pub struct BinId(i32);

impl BinId {
    /// Lowest valid bin.
    pub const MIN: Self = Self(MIN_BIN_ID);

    /// Highest valid bin.
    pub const MAX: Self = Self(MAX_BIN_ID);

    /// Bin whose price is exactly 1.
    pub const ZERO: Self = Self(0);

    /// Creates a new `BinId` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] if `value` is outside
    /// `[MIN_BIN_ID, MAX_BIN_ID]`.
    pub const fn new(value: i32) -> Result<Self> {
        if value < MIN_BIN_ID || value > MAX_BIN_ID {
            return Err(DlmmError::OutOfBinRange(value));
        }
        Ok(Self(value))
    }

    /// Wraps an id the caller has already range-checked.
    pub(crate) const fn from_validated(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the neighbouring bin in the direction a swap walks.
    ///
    /// Selling X walks down (towards cheaper bins holding Y); selling Y
    /// walks up.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] when stepping past either bound.
    pub const fn step(&self, direction: SwapDirection) -> Result<Self> {
        Self::new(self.0 + direction.bin_delta())
    }

    /// Offsets this bin by `delta`, validating the result.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::OutOfBinRange`] if the result is out of range.
    pub const fn offset(&self, delta: i32) -> Result<Self> {
        match self.0.checked_add(delta) {
            Some(v) => Self::new(v),
            None => Err(DlmmError::OutOfBinRange(i32::MAX)),
        }
    }

    /// Absolute distance in bins.
    #[must_use]
    pub const fn distance(&self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<i32> for BinId {
    type Error = DlmmError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BinId> for i32 {
    fn from(id: BinId) -> Self {
        id.0
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bin({})", self.0)
    }
}

/// Fixed price gap between adjacent bins, in basis points.
///
/// Set once at pair creation.  A step of 10 means each bin is priced 0.10%
/// above its lower neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
pub struct BinStep(u16);

impl BinStep {
    /// Creates a validated bin step.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidBinStep`] if `bps` is zero or above
    /// [`MAX_BIN_STEP`].
    pub const fn new(bps: u16) -> Result<Self> {
        if bps == 0 {
            return Err(DlmmError::InvalidBinStep("bin step must be non-zero"));
        }
        if bps > MAX_BIN_STEP {
            return Err(DlmmError::InvalidBinStep(
                "bin step must not exceed 10000 basis points",
            ));
        }
        Ok(Self(bps))
    }

    /// Returns the step in basis points.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns the per-bin growth factor `1 + step / 10_000` as `f64`.
    #[must_use]
    pub fn growth_factor(&self) -> f64 {
        1.0 + f64::from(self.0) / 10_000.0
    }
}

impl TryFrom<u16> for BinStep {
    type Error = DlmmError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BinStep> for u16 {
    fn from(step: BinStep) -> Self {
        step.0
    }
}

impl fmt::Display for BinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
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

    #[test]
    fn range_bounds() {
        assert!(BinId::new(MIN_BIN_ID).is_ok());
        assert!(BinId::new(MAX_BIN_ID).is_ok());
        assert_eq!(
            BinId::new(MAX_BIN_ID + 1),
            Err(DlmmError::OutOfBinRange(MAX_BIN_ID + 1))
        );
        assert_eq!(
            BinId::new(MIN_BIN_ID - 1),
            Err(DlmmError::OutOfBinRange(MIN_BIN_ID - 1))
        );
    }

    #[test]
    fn step_follows_direction() {
        assert_eq!(bin(10).step(SwapDirection::XToY), Ok(bin(9)));
        assert_eq!(bin(10).step(SwapDirection::YToX), Ok(bin(11)));
        assert!(BinId::MAX.step(SwapDirection::YToX).is_err());
        assert!(BinId::MIN.step(SwapDirection::XToY).is_err());
    }

    #[test]
    fn offset_and_distance() {
        assert_eq!(bin(-5).offset(7), Ok(bin(2)));
        assert!(BinId::MAX.offset(i32::MAX).is_err());
        assert_eq!(bin(-5).distance(bin(5)), 10);
    }

    #[test]
    fn ordering_matches_index() {
        assert!(bin(-1) < bin(0));
        assert!(bin(100) > bin(99));
    }

    #[test]
    fn display() {
        assert_eq!(bin(-3).to_string(), "Bin(-3)");
    }

    #[test]
    fn bin_step_validation() {
        assert_eq!(
            BinStep::new(0),
            Err(DlmmError::InvalidBinStep("bin step must be non-zero"))
        );
        assert!(BinStep::new(MAX_BIN_STEP + 1).is_err());
        let Ok(step) = BinStep::new(25) else {
            panic!("valid step");
        };
        assert_eq!(step.get(), 25);
        assert!((step.growth_factor() - 1.0025).abs() < 1e-12);
        assert_eq!(step.to_string(), "25bp");
    }
}
