//! Liquidity provider position.

use std::collections::BTreeMap;

use core::fmt;

use super::{Amount, BinId, LiquidityShares, OwnerId};

/// A provider's holding in one bin.
///
/// `fee_growth_snapshot_*` record the bin's fee-growth-per-share at the last
/// settlement; fees earned since then are `shares * (growth - snapshot)`.
/// Settled but unclaimed fees sit in `pending_fee_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionBin {
    /// Shares held in the bin.
    pub shares: LiquidityShares,
    /// Bin fee growth for X at the last settlement (Q64.64, wrapping).
    pub fee_growth_snapshot_x: u128,
    /// Bin fee growth for Y at the last settlement (Q64.64, wrapping).
    pub fee_growth_snapshot_y: u128,
    /// Settled, unclaimed X fees.
    pub pending_fee_x: Amount,
    /// Settled, unclaimed Y fees.
    pub pending_fee_y: Amount,
}

impl PositionBin {
    /// Returns `true` when the entry holds neither shares nor pending fees.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shares.is_zero() && self.pending_fee_x.is_zero() && self.pending_fee_y.is_zero()
    }
}

/// A provider's claim across bins of one pair.
///
/// Bins are referenced by id only, so the ledger may create or drop bins
/// without leaving a position dangling.  A position is created empty,
/// filled by deposits and drained by withdrawals; once
/// [`is_closed`](Self::is_closed) it holds nothing and can be discarded.
///
/// # Examples
///
/// ```
/// use hydra_dlmm::domain::{OwnerId, Position};
///
/// let position = Position::new(OwnerId::from_bytes([7u8; 32]), 1_700_000_000);
/// assert!(position.is_closed());
/// assert_eq!(position.created_at(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    owner: OwnerId,
    created_at: u64,
    bins: BTreeMap<BinId, PositionBin>,
}

impl Position {
    /// Creates an empty position.
    ///
    /// `created_at` is a caller-supplied timestamp; the engine stores it
    /// without reading a clock.
    #[must_use]
    pub const fn new(owner: OwnerId, created_at: u64) -> Self {
        Self {
            owner,
            created_at,
            bins: BTreeMap::new(),
        }
    }

    /// Returns the owner reference.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns the entry for `bin`, if any.
    #[must_use]
    pub fn bin(&self, bin: BinId) -> Option<&PositionBin> {
        self.bins.get(&bin)
    }

    /// Shares held in `bin` (zero when absent).
    #[must_use]
    pub fn shares_in(&self, bin: BinId) -> LiquidityShares {
        self.bins.get(&bin).map_or(LiquidityShares::ZERO, |e| e.shares)
    }

    /// Iterates `(bin, entry)` pairs in ascending bin order.
    pub fn bins(&self) -> impl Iterator<Item = (BinId, &PositionBin)> {
        self.bins.iter().map(|(id, entry)| (*id, entry))
    }

    /// Number of bins the position has an entry in.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` when no shares or pending fees remain.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.bins.is_empty()
    }

    /// Mutable entry for `bin`, created empty if missing.
    pub(crate) fn entry_mut(&mut self, bin: BinId) -> &mut PositionBin {
        self.bins.entry(bin).or_default()
    }

    /// Mutable access to an existing entry.
    pub(crate) fn get_mut(&mut self, bin: BinId) -> Option<&mut PositionBin> {
        self.bins.get_mut(&bin)
    }

    /// Ids of all bins with an entry.
    pub(crate) fn bin_ids(&self) -> Vec<BinId> {
        self.bins.keys().copied().collect()
    }

    /// Drops entries that hold neither shares nor pending fees.
    pub(crate) fn prune(&mut self) {
        self.bins.retain(|_, entry| !entry.is_empty());
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(owner={}, bins={})", self.owner, self.bins.len())
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
    fn new_position_is_closed() {
        let p = Position::new(OwnerId::default(), 5);
        assert!(p.is_closed());
        assert_eq!(p.bin_count(), 0);
        assert_eq!(p.shares_in(bin(1)), LiquidityShares::ZERO);
    }

    #[test]
    fn prune_keeps_entries_with_pending_fees() {
        let mut p = Position::new(OwnerId::default(), 0);
        p.entry_mut(bin(1)).shares = LiquidityShares::new(10);
        p.entry_mut(bin(2)).pending_fee_y = Amount::new(3);
        let _ = p.entry_mut(bin(3));
        p.prune();
        assert_eq!(p.bin_ids(), vec![bin(1), bin(2)]);
        assert!(!p.is_closed());
        assert_eq!(p.shares_in(bin(1)), LiquidityShares::new(10));
    }

    #[test]
    fn iteration_is_ordered() {
        let mut p = Position::new(OwnerId::default(), 0);
        p.entry_mut(bin(5)).shares = LiquidityShares::new(1);
        p.entry_mut(bin(-5)).shares = LiquidityShares::new(1);
        let ids: Vec<BinId> = p.bins().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![bin(-5), bin(5)]);
    }

    #[test]
    fn display() {
        let p = Position::new(OwnerId::from_bytes([0xff; 32]), 0);
        assert_eq!(p.to_string(), "Position(owner=ffffffff.., bins=0)");
    }
}
