//! Unified error types for the DLMM engine.
//!
//! Every fallible operation in the crate returns [`DlmmError`].  Variants
//! fall into four families, exposed through [`DlmmError::kind`]:
//!
//! | Kind | Variants | Caller response |
//! |------|----------|-----------------|
//! | [`ErrorKind::InputValidation`] | `InvalidBinStep`, `InvalidRange`, `InvalidDistribution`, `OutOfBinRange`, … | fix the input, never retry as-is |
//! | [`ErrorKind::StateConsistency`] | `InsufficientLiquidity`, `ExcessiveBinTraversal`, … | re-quote smaller or split the trade |
//! | [`ErrorKind::GuardViolation`] | `SlippageExceeded`, `PairBusy` | refresh inputs or back off, then retry |
//! | [`ErrorKind::Arithmetic`] | `Overflow`, `DivisionByZero` | the request exceeds representable bounds |
//!
//! Mutating operations are all-or-nothing: whenever one of these errors is
//! returned, the pair state and the position involved are unchanged.

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DlmmError>;

/// Coarse classification of a [`DlmmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied an invalid parameter.
    InputValidation,
    /// The ledger cannot satisfy the request in its current state.
    StateConsistency,
    /// A caller-side guard (slippage, exclusivity) rejected the request.
    GuardViolation,
    /// An intermediate value left the representable range.
    Arithmetic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValidation => write!(f, "input validation"),
            Self::StateConsistency => write!(f, "state consistency"),
            Self::GuardViolation => write!(f, "guard violation"),
            Self::Arithmetic => write!(f, "arithmetic"),
        }
    }
}

/// Errors produced by the DLMM engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DlmmError {
    /// Bin step is zero or otherwise unusable.
    #[error("invalid bin step: {0}")]
    InvalidBinStep(&'static str),

    /// A bin range is inverted, malformed or outside the engine bounds.
    #[error("invalid bin range: {0}")]
    InvalidRange(&'static str),

    /// A liquidity shape cannot produce a valid distribution.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(&'static str),

    /// A bin id lies outside `[MIN_BIN_ID, MAX_BIN_ID]` or its price is not
    /// representable for the bin step in use.
    #[error("bin {0} is outside the supported bin range")]
    OutOfBinRange(i32),

    /// The ledger does not hold enough reserves to satisfy the request.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A swap would walk more than `limit` bins.
    #[error("swap would traverse more than {limit} bins")]
    ExcessiveBinTraversal {
        /// The traversal bound that was hit.
        limit: u32,
    },

    /// The swap output is below the caller's minimum (or, for exact-out
    /// swaps, the input is above the caller's maximum).
    #[error("slippage exceeded: bound {bound}, actual {actual}")]
    SlippageExceeded {
        /// Caller-supplied bound.
        bound: u128,
        /// Amount the swap would actually produce or require.
        actual: u128,
    },

    /// Another writer currently holds the pair.
    #[error("pair is busy with another mutating operation")]
    PairBusy,

    /// A quantity is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A fee value or schedule is invalid.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A price is zero, negative or not finite.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// The active bin cannot be advanced while it still holds reserves on
    /// the side being consumed.
    #[error("active bin {0} is not depleted")]
    BinNotDepleted(i32),

    /// The position holds no shares in the referenced bin(s).
    #[error("position not found: {0}")]
    PositionNotFound(&'static str),

    /// Arithmetic overflow or underflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl DlmmError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBinStep(_)
            | Self::InvalidRange(_)
            | Self::InvalidDistribution(_)
            | Self::OutOfBinRange(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidFee(_)
            | Self::InvalidConfiguration(_)
            | Self::InvalidPrice(_)
            | Self::PositionNotFound(_) => ErrorKind::InputValidation,
            Self::InsufficientLiquidity
            | Self::ExcessiveBinTraversal { .. }
            | Self::BinNotDepleted(_) => ErrorKind::StateConsistency,
            Self::SlippageExceeded { .. } | Self::PairBusy => ErrorKind::GuardViolation,
            Self::Overflow(_) | Self::DivisionByZero => ErrorKind::Arithmetic,
        }
    }

    /// Returns `true` if retrying after refreshing inputs or backing off
    /// can succeed without the caller changing its request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::GuardViolation)
    }
}
