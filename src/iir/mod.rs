//! IIR filters, coefficients and cascades

mod biquad;
pub use biquad::*;
mod coefficients;
pub use coefficients::*;
mod cascade;
pub use cascade::*;
