//! Core trait abstractions for pair operations.
//!
//! This module defines the traits a pair implementation satisfies:
//! [`SwapPool`] for quoting and executing swaps, [`LiquidityPool`] for
//! managing positions, and [`FromConfig`] for configuration-driven
//! construction.

mod from_config;
mod liquidity_pool;
mod swap_pool;

pub use from_config::FromConfig;
pub use liquidity_pool::LiquidityPool;
pub use swap_pool::SwapPool;
