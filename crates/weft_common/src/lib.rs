//! Shared foundational types used across the Weft FPGA router.
//!
//! This crate provides core types including interned identifiers, content
//! hashing, and common result types shared by the device model, the netlist,
//! and the router itself.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, WeftResult};
