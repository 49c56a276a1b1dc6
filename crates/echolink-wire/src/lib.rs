//! Echo Link Wire Protocol - Binary packet format
//!
//! This crate implements the narrowband packet:
//! - Fixed header (2 bytes, protocol magic)
//! - Quantized latent vector (Z_SIZE bytes)
//! - Quantized energy floor (E_SIZE bytes)
//!
//! Every field is a plain unsigned byte, so the layout has no endianness.

pub mod encoder;
pub mod header;
pub mod packet;
pub mod quantize;

pub use encoder::*;
pub use header::*;
pub use packet::*;
pub use quantize::*;
