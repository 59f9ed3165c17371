//! Pair implementations.
//!
//! | Type | Role |
//! |------|------|
//! | [`DlmmPool`] | One pair: configuration, fee policy and bin ledger behind the [`SwapPool`](crate::traits::SwapPool) and [`LiquidityPool`](crate::traits::LiquidityPool) traits |
//! | [`SharedPool`] | Single-writer, snapshot-reader handle for sharing a pair across threads |

mod dlmm;
#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;
mod shared;

pub use dlmm::DlmmPool;
pub use shared::SharedPool;
