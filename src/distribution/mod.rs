//! Deposit distribution across bin ranges.
//!
//! [`LiquidityDistributor`] turns `(amount_x, amount_y, range, shape)` into
//! per-bin allocations that sum exactly to the inputs.

mod distributor;

pub use distributor::{BinAllocation, LiquidityDistributor};
