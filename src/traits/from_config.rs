//! Generic construction trait for pair instantiation from configuration.
//!
//! [`FromConfig`] provides a uniform interface for creating a pair from
//! its configuration struct.
//!
//! # Validation Contract
//!
//! Implementations **must** validate all configuration invariants during
//! construction, including configs that were deserialized rather than
//! built through their validating constructor.  A successfully
//! constructed pair is guaranteed to be in a valid initial state:
//!
//! - Bin step is within `1..=10_000` basis points
//! - The initial active bin has a representable price
//! - The fee schedule is well formed and below 100%
//!
//! # No Generic Blanket Implementation
//!
//! There is no `impl<T> FromConfig<T>` blanket; each pair type
//! explicitly implements the trait for its config type.

use crate::error::Result;

/// Generic construction trait for building a pair from a configuration.
///
/// # Type Parameters
///
/// - `C`: the configuration type that fully describes the pair's
///   immutable parameters.
///
/// # Implementors
///
/// - `impl FromConfig<DlmmConfig> for DlmmPool`
pub trait FromConfig<C> {
    /// Creates a new pair from the given configuration.
    ///
    /// # Errors
    ///
    /// - [`DlmmError::InvalidConfiguration`](crate::error::DlmmError::InvalidConfiguration)
    ///   if any parameter is out of range or inconsistent.
    /// - [`DlmmError::InvalidFee`](crate::error::DlmmError::InvalidFee) if
    ///   the fee schedule is invalid.
    /// - [`DlmmError::OutOfBinRange`](crate::error::DlmmError::OutOfBinRange)
    ///   if the initial active bin is unpriced.
    fn from_config(config: &C) -> Result<Self>
    where
        Self: Sized;
}
