//! Echo Link PFC - Posterior Feature Correction
//!
//! The generative decoder on the receiver dreams a spectrogram from the
//! latent vector. The energy floor carried next to it is what the real
//! microphone measured. PFC forces the generated frame to obey it:
//!
//! - Decode the E_SIZE energy bytes and stretch them to the spectrogram's
//!   time resolution (linear interpolation)
//! - Build a binary safety mask (energy below threshold → silence)
//! - Zero every frequency bin of each silenced time step
//!
//! Nothing here constrains generation itself; correction happens after the
//! fact and is fully deterministic.

pub mod corrector;
pub mod floor;

pub use corrector::*;
pub use floor::*;
