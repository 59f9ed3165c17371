//! Bin storage for one pair.
//!
//! [`BinLedger`] owns the sparse `BinId -> Bin` map and the active-bin
//! pointer, and is the single mutator of reserves.

mod bin;
mod bin_ledger;

pub use bin::Bin;
pub use bin_ledger::BinLedger;
pub(crate) use bin_ledger::signed;
