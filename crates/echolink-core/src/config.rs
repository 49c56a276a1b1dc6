//! Link configuration and protocol constants
//!
//! Both ends of a link must be built from the same packet layout
//! (`z_size`, `e_size`). Frame rate and silence threshold only affect the
//! local side.

use std::time::Duration;

use crate::{EchoError, EchoResult};

/// Header size in bytes
pub const HEADER_SIZE: usize = 2;

/// Default latent field size (Z_SIZE)
pub const DEFAULT_Z_SIZE: usize = 64;

/// Default energy floor field size (E_SIZE)
pub const DEFAULT_E_SIZE: usize = 32;

/// Default upstream frame rate
pub const DEFAULT_FRAME_RATE_HZ: u32 = 12;

/// Default silence floor for posterior correction
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.05;

/// Maximum packet size (MTU-friendly)
pub const MAX_PACKET_SIZE: usize = 1400;

/// Echo Link configuration
#[derive(Clone, Debug, PartialEq)]
pub struct LinkConfig {
    /// Latent field length in bytes
    pub z_size: usize,
    /// Energy floor field length in bytes
    pub e_size: usize,
    /// Packets per second produced upstream
    pub frame_rate_hz: u32,
    /// Energy below this value is treated as silence
    pub silence_threshold: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            z_size: DEFAULT_Z_SIZE,
            e_size: DEFAULT_E_SIZE,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
        }
    }
}

impl LinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sizes(mut self, z_size: usize, e_size: usize) -> Self {
        self.z_size = z_size;
        self.e_size = e_size;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate_hz: u32) -> Self {
        self.frame_rate_hz = frame_rate_hz;
        self
    }

    pub fn with_silence_threshold(mut self, threshold: f32) -> Self {
        self.silence_threshold = threshold;
        self
    }

    /// Check that the configuration describes a usable link
    pub fn validate(&self) -> EchoResult<()> {
        if self.z_size == 0 {
            return Err(EchoError::invalid("z_size must be positive"));
        }
        if self.e_size == 0 {
            return Err(EchoError::invalid("e_size must be positive"));
        }
        if self.packet_len() > MAX_PACKET_SIZE {
            return Err(EchoError::InvalidInput(format!(
                "Packet too large: {} > {}",
                self.packet_len(),
                MAX_PACKET_SIZE
            )));
        }
        if self.frame_rate_hz == 0 {
            return Err(EchoError::invalid("frame_rate_hz must be positive"));
        }
        if !self.silence_threshold.is_finite() || !(0.0..=1.0).contains(&self.silence_threshold) {
            return Err(EchoError::InvalidInput(format!(
                "silence_threshold must lie in [0.0, 1.0], got {}",
                self.silence_threshold
            )));
        }
        Ok(())
    }

    /// Total packet length: header + latent + energy
    #[inline]
    pub fn packet_len(&self) -> usize {
        HEADER_SIZE + self.z_size + self.e_size
    }

    /// Offset of the energy field inside a packet
    #[inline]
    pub fn energy_offset(&self) -> usize {
        HEADER_SIZE + self.z_size
    }

    /// Link throughput in bits per second
    pub fn bitrate_bps(&self) -> u64 {
        self.packet_len() as u64 * 8 * self.frame_rate_hz as u64
    }

    /// Duration covered by a single packet
    pub fn frame_duration(&self) -> Duration {
        if self.frame_rate_hz == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(1_000_000_000 / self.frame_rate_hz as u64)
    }

    /// Fail if `other` uses a different packet layout
    pub fn ensure_compatible(&self, other: &LinkConfig) -> EchoResult<()> {
        if self.z_size != other.z_size {
            return Err(EchoError::ConfigurationMismatch {
                field: "z_size",
                expected: self.z_size,
                actual: other.z_size,
            });
        }
        if self.e_size != other.e_size {
            return Err(EchoError::ConfigurationMismatch {
                field: "e_size",
                expected: self.e_size,
                actual: other.e_size,
            });
        }
        Ok(())
    }
}
