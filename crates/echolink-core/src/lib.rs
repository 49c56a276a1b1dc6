//! Echo Link Core - Fundamental types and primitives
//!
//! This crate defines the types shared by the transmitter and receiver:
//! - Link configuration and protocol constants
//! - Spectrogram, energy map and safety mask buffers
//! - Error types

pub mod config;
pub mod error;
pub mod signal;
pub mod spectrogram;

pub use config::*;
pub use error::*;
pub use signal::*;
pub use spectrogram::*;
