#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! Provide utilities for crafting and inspecting IPv6 headers.
//!
//! The header types are views over caller-owned bytes: map one onto a
//! buffer, fill it with defaults or explicit values, then read fields back,
//! render a summary or dump the raw bytes.

#[macro_use]
mod macros;

mod endian;

mod error;
pub use error::{Error, Result};

pub mod ether;
pub mod field;
pub mod frame;
pub mod hexdump;
pub mod ipv6;

pub use frame::{FrameOptions, Ipv6Frame};
