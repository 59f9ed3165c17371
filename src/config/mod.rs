//! Pair configuration.
//!
//! [`DlmmConfig`] is the declarative blueprint a [`DlmmPool`] is built from
//! via [`FromConfig`]; [`FeeSchedule`] selects static or
//! volatility-tiered fee pricing.
//!
//! [`DlmmPool`]: crate::pools::DlmmPool
//! [`FromConfig`]: crate::traits::FromConfig

mod dlmm;
mod fee_schedule;

pub use dlmm::DlmmConfig;
pub use fee_schedule::{FeeSchedule, VolatilityTier};
