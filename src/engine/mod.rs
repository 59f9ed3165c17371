//! Swap execution and quoting.
//!
//! [`SwapEngine`] walks bins from the active bin outward and commits the
//! result copy-on-success; [`QuoteEngine`] runs the same walk against an
//! immutable ledger for quotes, price-impact targets and exact-out sizing.

mod quote_engine;
mod swap_engine;

pub use quote_engine::QuoteEngine;
pub use swap_engine::{SwapEngine, SwapPlan, MAX_BINS_PER_SWAP};
