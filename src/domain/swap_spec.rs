//! Swap requests: the sizing constraint, the direction and the guards.

use core::fmt;

use super::{Amount, BasisPoints, SwapDirection};
use crate::error::{DlmmError, Result};

/// Which side of a swap is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapType {
    /// The input amount is fixed; output is computed.
    ExactIn,
    /// The output amount is fixed; input is computed.
    ExactOut,
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn => write!(f, "ExactIn"),
            Self::ExactOut => write!(f, "ExactOut"),
        }
    }
}

/// Sizing constraint of a swap.
///
/// # Invariants
///
/// The contained amount is always non-zero.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, SwapSpec};
///
/// assert!(SwapSpec::exact_in(Amount::new(1000)).is_ok());
/// assert!(SwapSpec::exact_in(Amount::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapSpec {
    /// The caller sells exactly this much.
    ExactIn {
        /// Fixed input amount.
        amount_in: Amount,
    },
    /// The caller buys exactly this much.
    ExactOut {
        /// Fixed output amount.
        amount_out: Amount,
    },
}

impl SwapSpec {
    /// Creates an exact-input specification.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidQuantity`] if `amount` is zero.
    pub const fn exact_in(amount: Amount) -> Result<Self> {
        if amount.is_zero() {
            return Err(DlmmError::InvalidQuantity("swap amount must be non-zero"));
        }
        Ok(Self::ExactIn { amount_in: amount })
    }

    /// Creates an exact-output specification.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidQuantity`] if `amount` is zero.
    pub const fn exact_out(amount: Amount) -> Result<Self> {
        if amount.is_zero() {
            return Err(DlmmError::InvalidQuantity("swap amount must be non-zero"));
        }
        Ok(Self::ExactOut { amount_out: amount })
    }

    /// Returns the fixed amount regardless of variant.
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in } => *amount_in,
            Self::ExactOut { amount_out } => *amount_out,
        }
    }

    /// Returns the [`SwapType`] descriptor.
    #[must_use]
    pub const fn swap_type(&self) -> SwapType {
        match self {
            Self::ExactIn { .. } => SwapType::ExactIn,
            Self::ExactOut { .. } => SwapType::ExactOut,
        }
    }
}

impl fmt::Display for SwapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn { amount_in } => write!(f, "ExactIn({amount_in})"),
            Self::ExactOut { amount_out } => write!(f, "ExactOut({amount_out})"),
        }
    }
}

/// A complete swap instruction for [`DlmmPool::swap`](crate::pools::DlmmPool::swap).
///
/// Guards default to "no constraint": `min_amount_out = 0` and
/// `max_amount_in = Amount::MAX`.  `volatility` is the caller's externally
/// measured realised volatility, consulted by volatility-tiered fee
/// schedules.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{Amount, SwapDirection, SwapRequest};
///
/// let request = SwapRequest::exact_in(Amount::new(50), SwapDirection::YToX)
///     .expect("non-zero")
///     .with_min_amount_out(Amount::new(45));
/// assert_eq!(request.min_amount_out(), Amount::new(45));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapRequest {
    spec: SwapSpec,
    direction: SwapDirection,
    min_amount_out: Amount,
    max_amount_in: Amount,
    volatility: BasisPoints,
}

impl SwapRequest {
    /// Builds a request from a spec and direction with no guards.
    #[must_use]
    pub const fn new(spec: SwapSpec, direction: SwapDirection) -> Self {
        Self {
            spec,
            direction,
            min_amount_out: Amount::ZERO,
            max_amount_in: Amount::MAX,
            volatility: BasisPoints::ZERO,
        }
    }

    /// Exact-input request.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidQuantity`] if `amount_in` is zero.
    pub const fn exact_in(amount_in: Amount, direction: SwapDirection) -> Result<Self> {
        match SwapSpec::exact_in(amount_in) {
            Ok(spec) => Ok(Self::new(spec, direction)),
            Err(e) => Err(e),
        }
    }

    /// Exact-output request.
    ///
    /// # Errors
    ///
    /// Returns [`DlmmError::InvalidQuantity`] if `amount_out` is zero.
    pub const fn exact_out(amount_out: Amount, direction: SwapDirection) -> Result<Self> {
        match SwapSpec::exact_out(amount_out) {
            Ok(spec) => Ok(Self::new(spec, direction)),
            Err(e) => Err(e),
        }
    }

    /// Rejects the swap if it would pay out less than `amount`.
    #[must_use]
    pub const fn with_min_amount_out(mut self, amount: Amount) -> Self {
        self.min_amount_out = amount;
        self
    }

    /// Rejects the swap if it would charge more than `amount`.
    #[must_use]
    pub const fn with_max_amount_in(mut self, amount: Amount) -> Self {
        self.max_amount_in = amount;
        self
    }

    /// Sets the realised volatility used for fee tier selection.
    #[must_use]
    pub const fn with_volatility(mut self, volatility: BasisPoints) -> Self {
        self.volatility = volatility;
        self
    }

    /// Sizing constraint.
    #[must_use]
    pub const fn spec(&self) -> SwapSpec {
        self.spec
    }

    /// Trade direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Lower bound on output.
    pub const fn min_amount_out(&self) -> Amount {
        self.min_amount_out
    }

    /// Upper bound on input.
    pub const fn max_amount_in(&self) -> Amount {
        self.max_amount_in
    }

    /// Caller-measured volatility.
    #[must_use]
    pub const fn volatility(&self) -> BasisPoints {
        self.volatility
    }
}

impl fmt::Display for SwapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.spec, self.direction)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn exact_in_valid() {
        let Ok(spec) = SwapSpec::exact_in(Amount::new(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(spec.swap_type(), SwapType::ExactIn);
        assert_eq!(spec.amount(), Amount::new(100));
    }

    #[test]
    fn exact_out_valid() {
        let Ok(spec) = SwapSpec::exact_out(Amount::new(200)) else {
            panic!("expected Ok");
        };
        assert_eq!(spec.swap_type(), SwapType::ExactOut);
        assert_eq!(spec.amount(), Amount::new(200));
    }

    #[test]
    fn zero_amounts_rejected() {
        assert_eq!(
            SwapSpec::exact_in(Amount::ZERO),
            Err(DlmmError::InvalidQuantity("swap amount must be non-zero"))
        );
        assert!(SwapSpec::exact_out(Amount::ZERO).is_err());
        assert!(SwapRequest::exact_in(Amount::ZERO, SwapDirection::XToY).is_err());
    }

    #[test]
    fn request_defaults_are_unguarded() {
        let Ok(req) = SwapRequest::exact_out(Amount::new(9), SwapDirection::XToY) else {
            panic!("expected Ok");
        };
        assert_eq!(req.min_amount_out(), Amount::ZERO);
        assert_eq!(req.max_amount_in(), Amount::MAX);
        assert_eq!(req.volatility(), BasisPoints::ZERO);
        assert_eq!(req.direction(), SwapDirection::XToY);
    }

    #[test]
    fn request_builders() {
        let Ok(req) = SwapRequest::exact_in(Amount::new(10), SwapDirection::YToX) else {
            panic!("expected Ok");
        };
        let req = req
            .with_min_amount_out(Amount::new(8))
            .with_max_amount_in(Amount::new(10))
            .with_volatility(BasisPoints::new(150));
        assert_eq!(req.min_amount_out(), Amount::new(8));
        assert_eq!(req.max_amount_in(), Amount::new(10));
        assert_eq!(req.volatility(), BasisPoints::new(150));
        assert_eq!(req.to_string(), "ExactIn(10) Y->X");
    }

    #[test]
    fn display() {
        let Ok(spec) = SwapSpec::exact_out(Amount::new(99)) else {
            panic!("expected Ok");
        };
        assert_eq!(spec.to_string(), "ExactOut(99)");
        assert_eq!(SwapType::ExactIn.to_string(), "ExactIn");
    }
}
