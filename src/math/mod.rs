//! Fixed-point arithmetic and bin price math.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`div_round`], [`mul_div`], [`mul_shr`], [`shl_div`] | Rounded integer division with 256-bit intermediates |
//! | [`price_of`], [`bin_of`] | Bin id to Q64.64 price and back |
//! | [`MIN_PRICE_RAW`], [`MAX_PRICE_RAW`] | Representable price window |

mod bin_math;
mod fixed_point;

pub use bin_math::{bin_of, price_of, MAX_PRICE_RAW, MIN_PRICE_RAW};
pub use fixed_point::{div_round, mul_div, mul_shr, shl_div, SCALE_OFFSET};

pub(crate) use fixed_point::{mul_q64, reciprocal_q64};
