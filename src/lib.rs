//! # Hydra DLMM
//!
//! Bin-based concentrated liquidity engine: a pair's price axis is cut
//! into discrete bins, each trading at one fixed price, and swaps walk
//! from bin to bin as they drain them.
//!
//! This crate provides the pricing math, the per-pair bin ledger,
//! liquidity distribution shapes, the swap walker and quote searches, a
//! fee-growth accounting model for liquidity providers, and a pair type
//! that ties them together behind the [`SwapPool`](traits::SwapPool) and
//! [`LiquidityPool`](traits::LiquidityPool) traits.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | yes | `Serialize`/`Deserialize` on domain, config and pair types |
//!
//! ## Create a pair, add liquidity and swap
//!
//! ```rust
//! use hydra_dlmm::config::{DlmmConfig, FeeSchedule};
//! use hydra_dlmm::domain::{
//!     Amount, BasisPoints, BinId, BinRange, BinStep, LiquidityShape, OwnerId, Position,
//!     SwapDirection, SwapRequest,
//! };
//! use hydra_dlmm::pools::DlmmPool;
//! use hydra_dlmm::traits::{FromConfig, LiquidityPool, SwapPool};
//!
//! // 1. A pair with 25 bps bins, starting at price 1.0, charging 0.25%
//! let config = DlmmConfig::new(
//!     BinStep::new(25).expect("valid step"),
//!     BinId::ZERO,
//!     FeeSchedule::fixed(BasisPoints::new(25)).expect("valid fee"),
//! )
//! .expect("valid config");
//! let mut pool = DlmmPool::from_config(&config).expect("pair created");
//!
//! // 2. Spread both tokens evenly over eleven bins around the price
//! let mut position = Position::new(OwnerId::from_bytes([7u8; 32]), 0);
//! pool.deposit(
//!     &mut position,
//!     BinRange::new(-5, 5).expect("valid range"),
//!     Amount::new(1_000_000),
//!     Amount::new(1_000_000),
//!     &LiquidityShape::Uniform,
//! )
//! .expect("deposit accepted");
//!
//! // 3. Sell 10 000 X for Y
//! let request = SwapRequest::exact_in(Amount::new(10_000), SwapDirection::XToY)
//!     .expect("non-zero");
//! let result = pool.swap(&request).expect("swap succeeded");
//!
//! assert!(result.amount_out.get() > 0);
//! assert!(result.fee.get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  SharedPool   │  one writer, snapshot readers
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   DlmmPool    │  SwapPool + LiquidityPool
//! └──────┬───────┘
//!        │ plan / apply            distribute
//!        ▼                              ▼
//! ┌──────────────┐            ┌──────────────────┐
//! │ SwapEngine /  │            │ LiquidityDistrib. │
//! │ QuoteEngine   │            └──────────────────┘
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐   ┌────────────┐
//! │  BinLedger    │──▶│ FeeManager  │
//! └──────┬───────┘   └────────────┘
//!        ▼
//! ┌──────────────┐
//! │ math / domain │  Q64.64 prices, Amount, BinId, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`BinId`](domain::BinId), [`BinPrice`](domain::BinPrice), [`Position`](domain::Position), swap requests and results |
//! | [`math`] | Rounded 256-bit intermediates and bin price math |
//! | [`config`] | [`DlmmConfig`](config::DlmmConfig) and [`FeeSchedule`](config::FeeSchedule) |
//! | [`ledger`] | [`Bin`](ledger::Bin) state and the per-pair [`BinLedger`](ledger::BinLedger) |
//! | [`fees`] | [`FeeManager`](fees::FeeManager): fee rates and fee-growth accounting |
//! | [`distribution`] | [`LiquidityDistributor`](distribution::LiquidityDistributor) shapes |
//! | [`engine`] | [`SwapEngine`](engine::SwapEngine) and [`QuoteEngine`](engine::QuoteEngine) |
//! | [`pools`] | [`DlmmPool`](pools::DlmmPool) and [`SharedPool`](pools::SharedPool) |
//! | [`traits`] | [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`FromConfig`](traits::FromConfig) |
//! | [`error`] | [`DlmmError`](error::DlmmError) and its [`ErrorKind`](error::ErrorKind) |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod distribution;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
