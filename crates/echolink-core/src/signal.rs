//! Per-time-step signals: energy floor and safety mask

use std::ops::Deref;

/// Mask value for a silenced time step
pub const MASK_SILENCE: f32 = 0.0;

/// Mask value for a passing time step
pub const MASK_PASS: f32 = 1.0;

/// Normalized energy per time step, values in [0.0, 1.0]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyMap(Vec<f32>);

impl EnergyMap {
    pub fn new(values: Vec<f32>) -> Self {
        EnergyMap(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Mean energy (0.0 when empty)
    pub fn mean(&self) -> f32 {
        if self.0.is_empty() {
            0.0
        } else {
            self.0.iter().sum::<f32>() / self.0.len() as f32
        }
    }
}

impl Deref for EnergyMap {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for EnergyMap {
    fn from(values: Vec<f32>) -> Self {
        EnergyMap(values)
    }
}

/// Binary per-time-step gate: 0.0 forces silence, 1.0 passes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SafetyMask(Vec<f32>);

impl SafetyMask {
    /// Build a mask from an energy profile.
    ///
    /// A step is silenced when its energy is strictly below `threshold`.
    pub fn from_energy(energy: &[f32], threshold: f32) -> Self {
        SafetyMask(
            energy
                .iter()
                .map(|&e| if e < threshold { MASK_SILENCE } else { MASK_PASS })
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn is_silenced(&self, step: usize) -> bool {
        self.0.get(step).map_or(false, |&m| m == MASK_SILENCE)
    }

    /// Number of silenced steps
    pub fn silenced_count(&self) -> usize {
        self.0.iter().filter(|&&m| m == MASK_SILENCE).count()
    }

    /// Number of passing steps
    pub fn pass_count(&self) -> usize {
        self.0.len() - self.silenced_count()
    }
}

impl Deref for SafetyMask {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}
