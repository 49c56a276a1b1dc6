//! Echo Link Test Harness - Link simulation and protocol validation
//!
//! This crate provides:
//! - Seeded frame generation (latent, energy floor, generated spectrogram)
//! - Lossy channel simulation (random and burst loss, header corruption)
//! - End-to-end transmitter → channel → receiver runs with statistics

pub mod channel;
pub mod generator;
pub mod simulator;

pub use channel::*;
pub use generator::*;
pub use simulator::*;
