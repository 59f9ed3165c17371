//! Explicit rounding direction for arithmetic operations.

/// Rounding direction for every division in the engine.
///
/// The engine always rounds against the trader and in favour of the bin:
/// outputs round [`Down`](Self::Down), required inputs and fees round
/// [`Up`](Self::Up).
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(!Rounding::Down.is_up());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
