//! Trade direction across the X/Y pair.

use core::fmt;

/// Which asset a swap sells into the pair.
///
/// Prices are quoted as *units of Y per unit of X*.  Selling X consumes the
/// Y held by the active bin and walks towards lower bin ids; selling Y
/// consumes X and walks towards higher ids.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::SwapDirection;
///
/// assert_eq!(SwapDirection::XToY.bin_delta(), -1);
/// assert_eq!(SwapDirection::YToX.opposite(), SwapDirection::XToY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapDirection {
    /// Sell X, receive Y.  The active bin id decreases on depletion.
    XToY,
    /// Sell Y, receive X.  The active bin id increases on depletion.
    YToX,
}

impl SwapDirection {
    /// Returns the reverse direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::XToY => Self::YToX,
            Self::YToX => Self::XToY,
        }
    }

    /// Returns `-1` or `+1`: how the active bin id moves when the active bin
    /// is depleted.
    #[must_use]
    pub const fn bin_delta(&self) -> i32 {
        match self {
            Self::XToY => -1,
            Self::YToX => 1,
        }
    }

    /// Returns `true` when the input asset is X.
    #[must_use]
    pub const fn is_x_in(&self) -> bool {
        matches!(self, Self::XToY)
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XToY => write!(f, "X->Y"),
            Self::YToX => write!(f, "Y->X"),
        }
    }
}
