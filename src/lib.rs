#![doc = include_str!("../README.md")]

mod process;
pub use process::*;
mod square;
pub use square::*;
pub mod iir;
mod error;
pub use error::*;
mod config;
pub use config::*;
mod sink;
pub use sink::*;
mod bench;
pub use bench::*;

#[cfg(test)]
pub mod testing;
