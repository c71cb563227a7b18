//! Bit-exact client wire formats: manual little-endian packed structs with
//! explicit encode/decode, per the Design Notes' "do not rely on memory
//! representation matching the wire layout" guidance.

pub mod assets;
pub mod ball;
pub mod billing;
pub mod brick;
pub mod security;
pub mod support;

pub use support::{SizedRead, SizedWrite, WirePacket};
