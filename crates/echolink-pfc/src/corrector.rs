//! Posterior feature corrector (receiver side)
//!
//! THE CLAMP: if the side channel says "silence" for a time step, every
//! frequency bin of the generated spectrogram at that step becomes exactly
//! 0.0, whatever the generator produced there.

use echolink_core::{EchoError, EchoResult, EnergyMap, LinkConfig, SafetyMask, Spectrogram};
use echolink_wire::Packet;

use crate::decode_energy_floor;

/// Result of a correction pass
#[derive(Clone, Debug, PartialEq)]
pub struct Correction {
    /// Spectrogram with silenced steps zeroed
    pub spectrogram: Spectrogram,
    /// Per-step gate that was applied
    pub mask: SafetyMask,
}

impl Correction {
    pub fn silenced_steps(&self) -> usize {
        self.mask.silenced_count()
    }

    pub fn into_parts(self) -> (Spectrogram, SafetyMask) {
        (self.spectrogram, self.mask)
    }
}

/// Masks generated spectrograms against the transmitted energy floor
#[derive(Clone, Debug)]
pub struct PosteriorCorrector {
    config: LinkConfig,
}

impl PosteriorCorrector {
    /// Create a corrector for a validated configuration
    pub fn new(config: LinkConfig) -> EchoResult<Self> {
        config.validate()?;
        Ok(PosteriorCorrector { config })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Default silence threshold
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.config.silence_threshold
    }

    /// Decode the energy floor at `target_resolution` time steps
    pub fn decode_energy_floor(
        &self,
        energy_bytes: &[u8],
        target_resolution: usize,
    ) -> EchoResult<EnergyMap> {
        decode_energy_floor(energy_bytes, self.config.e_size, target_resolution)
    }

    /// Build the safety mask for a decoded energy map
    pub fn safety_mask(&self, energy: &[f32], threshold: f32) -> EchoResult<SafetyMask> {
        check_threshold(threshold)?;
        Ok(SafetyMask::from_energy(energy, threshold))
    }

    /// Correct a copy of `spectrogram`
    pub fn apply_correction(
        &self,
        spectrogram: &Spectrogram,
        energy_bytes: &[u8],
        threshold: f32,
    ) -> EchoResult<Correction> {
        let mut corrected = spectrogram.clone();
        let mask = self.apply_correction_in_place(&mut corrected, energy_bytes, threshold)?;
        Ok(Correction {
            spectrogram: corrected,
            mask,
        })
    }

    /// Correct using the configured threshold
    pub fn correct(&self, spectrogram: &Spectrogram, energy_bytes: &[u8]) -> EchoResult<Correction> {
        self.apply_correction(spectrogram, energy_bytes, self.threshold())
    }

    /// Correct against the energy field of a received packet
    pub fn correct_packet(
        &self,
        spectrogram: &Spectrogram,
        packet: &Packet,
    ) -> EchoResult<Correction> {
        if packet.e_size() != self.config.e_size {
            return Err(EchoError::ConfigurationMismatch {
                field: "e_size",
                expected: self.config.e_size,
                actual: packet.e_size(),
            });
        }
        self.correct(spectrogram, packet.energy_bytes())
    }

    /// Zero silenced steps of `spectrogram` and return the mask.
    ///
    /// Silenced rows are overwritten, not multiplied, so the result is exactly
    /// 0.0 even where the generator emitted NaN or infinity.
    pub fn apply_correction_in_place(
        &self,
        spectrogram: &mut Spectrogram,
        energy_bytes: &[u8],
        threshold: f32,
    ) -> EchoResult<SafetyMask> {
        check_threshold(threshold)?;
        let time_steps = spectrogram.time_steps();
        if time_steps == 0 {
            return Err(EchoError::invalid("Spectrogram has no time steps"));
        }

        let energy = self.decode_energy_floor(energy_bytes, time_steps)?;
        let mask = SafetyMask::from_energy(&energy, threshold);

        for step in (0..time_steps).filter(|&t| mask.is_silenced(t)) {
            if let Some(row) = spectrogram.row_mut(step) {
                row.fill(0.0);
            }
        }

        tracing::debug!(
            "PFC: {} of {} steps silenced (threshold {}, mean floor {:.3})",
            mask.silenced_count(),
            time_steps,
            threshold,
            energy.mean()
        );

        Ok(mask)
    }
}

fn check_threshold(threshold: f32) -> EchoResult<()> {
    if !threshold.is_finite() {
        return Err(EchoError::InvalidInput(format!(
            "Silence threshold must be finite, got {}",
            threshold
        )));
    }
    Ok(())
}
