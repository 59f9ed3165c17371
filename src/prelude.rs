//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use hydra_dlmm::prelude::*;
//! ```

pub use crate::domain::{
    Amount, BasisPoints, BinId, BinPrice, BinRange, BinStep, ClaimedFees, LiquidityShape,
    OwnerId, Position, PositionDelta, Quote, Rounding, SwapDirection, SwapRequest, SwapResult,
    WithdrawResult,
};

pub use crate::traits::{FromConfig, LiquidityPool, SwapPool};

pub use crate::config::{DlmmConfig, FeeSchedule, VolatilityTier};

pub use crate::error::{DlmmError, ErrorKind, Result};

pub use crate::pools::{DlmmPool, SharedPool};
