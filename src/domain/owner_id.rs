//! Opaque position owner reference.

use core::fmt;

/// Opaque identifier of a position owner.
///
/// Typically a 32-byte public key, but the engine never interprets it; it is
/// carried on [`Position`](super::Position) so callers can persist and look
/// up positions by owner.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::OwnerId;
///
/// let owner = OwnerId::from_bytes([1u8; 32]);
/// assert_eq!(owner.as_bytes(), [1u8; 32]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnerId([u8; 32]);

impl OwnerId {
    /// Creates an `OwnerId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for OwnerId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for OwnerId {
    /// Short hex form: first four bytes followed by an ellipsis.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}
