//! Inclusive range of bins targeted by a deposit.

use core::fmt;

use super::{BinId, MAX_BIN_ID, MIN_BIN_ID};
use crate::error::{DlmmError, Result};

/// Inclusive bin range `[lower, upper]`.
///
/// # Invariants
///
/// - `lower <= upper`; a single-bin range has `lower == upper`.
/// - Both ends lie within `[MIN_BIN_ID, MAX_BIN_ID]`.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::BinRange;
///
/// let range = BinRange::new(100, 110).expect("valid range");
/// assert_eq!(range.len(), 11);
/// assert!(BinRange::new(5, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinRange {
    lower: BinId,
    upper: BinId,
}

impl BinRange {
    /// Creates a range from raw ids.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidRange`] if `lower > upper` or either end
    /// is outside `[MIN_BIN_ID, MAX_BIN_ID]`.
    pub const fn new(lower: i32, upper: i32) -> Result<Self> {
        if lower > upper {
            return Err(DlmmError::InvalidRange("lower bin must not exceed upper bin"));
        }
        if lower < MIN_BIN_ID || upper > MAX_BIN_ID {
            return Err(DlmmError::InvalidRange("range outside the valid bin ids"));
        }
        Ok(Self {
            lower: BinId::from_validated(lower),
            upper: BinId::from_validated(upper),
        })
    }

    /// Single-bin range.
    #[must_use]
    pub const fn single(bin: BinId) -> Self {
        Self {
            lower: bin,
            upper: bin,
        }
    }

    /// Lowest bin in the range.
    #[must_use]
    pub const fn lower(&self) -> BinId {
        self.lower
    }

    /// Highest bin in the range.
    #[must_use]
    pub const fn upper(&self) -> BinId {
        self.upper
    }

    /// Number of bins covered.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> u32 {
        self.lower.distance(self.upper) + 1
    }

    /// Returns `true` if the range covers exactly one bin.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.lower.get() == self.upper.get()
    }

    /// Returns `true` if `bin` lies inside the range.
    #[must_use]
    pub const fn contains(&self, bin: BinId) -> bool {
        bin.get() >= self.lower.get() && bin.get() <= self.upper.get()
    }

    /// Iterates the bins from lower to upper.
    pub fn iter(&self) -> impl Iterator<Item = BinId> {
        (self.lower.get()..=self.upper.get()).map(BinId::from_validated)
    }
}

impl fmt::Display for BinRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower.get(), self.upper.get())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_ranges() {
        let Ok(r) = BinRange::new(-3, 3) else {
            panic!("expected Ok");
        };
        assert_eq!(r.len(), 7);
        assert!(!r.is_single());
        assert!(r.contains(BinId::ZERO));
        assert_eq!(r.iter().count(), 7);
        assert_eq!(r.iter().next(), Some(r.lower()));
        assert_eq!(r.to_string(), "[-3, 3]");

        let single = BinRange::single(BinId::ZERO);
        assert!(single.is_single());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn rejects_inverted() {
        assert_eq!(
            BinRange::new(10, 9),
            Err(DlmmError::InvalidRange("lower bin must not exceed upper bin"))
        );
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(matches!(
            BinRange::new(MIN_BIN_ID - 1, 0),
            Err(DlmmError::InvalidRange(_))
        ));
        assert!(matches!(
            BinRange::new(0, MAX_BIN_ID + 1),
            Err(DlmmError::InvalidRange(_))
        ));
        assert!(BinRange::new(MIN_BIN_ID, MAX_BIN_ID).is_ok());
    }
}
