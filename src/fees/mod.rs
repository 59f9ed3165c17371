//! Swap fee pricing and attribution to liquidity providers.

mod fee_manager;

pub use fee_manager::FeeManager;
pub(crate) use fee_manager::{fee_on, gross_up};
