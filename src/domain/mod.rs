//! Fundamental domain value types used throughout the engine.
//!
//! Amounts, basis points, bin ids and prices, positions, swap requests and
//! their results.  All types are newtypes or plain records with validated
//! constructors where an invariant exists.

mod amount;
mod basis_points;
mod bin_id;
mod bin_range;
mod liquidity_shape;
mod liquidity_shares;
mod owner_id;
mod position;
mod position_delta;
mod price;
mod quote;
mod rounding;
mod swap_direction;
mod swap_result;
mod swap_spec;

pub use amount::Amount;
pub use basis_points::BasisPoints;
pub(crate) use basis_points::MAX_BPS;
pub use bin_id::{BinId, BinStep, MAX_BIN_ID, MAX_BIN_STEP, MIN_BIN_ID};
pub use bin_range::BinRange;
pub use liquidity_shape::LiquidityShape;
pub use liquidity_shares::LiquidityShares;
pub use owner_id::OwnerId;
pub use position::{Position, PositionBin};
pub use position_delta::{BinDeposit, ClaimedFees, PositionDelta, WithdrawResult};
pub use price::BinPrice;
pub use quote::Quote;
pub use rounding::Rounding;
pub use swap_direction::SwapDirection;
pub use swap_result::{BinFill, SwapResult};
pub use swap_spec::{SwapRequest, SwapSpec, SwapType};
