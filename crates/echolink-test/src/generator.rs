//! Seeded frame generation
//!
//! Stands in for the upstream generative encoder/decoder: produces latent
//! vectors, measured energy maps and the spectrogram a decoder might "dream"
//! for them. Silent frames deliberately come with a noisy spectrogram so the
//! corrector has a hallucination to suppress.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use echolink_core::{LinkConfig, Spectrogram};

/// What the microphone side measured for a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Room is silent; energy floor is all zero
    Silence,
    /// Continuous speech; energy stays well above the silence floor
    Speech,
    /// Speech with pauses; random energy per bin
    Mixed,
}

/// Generator configuration
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Time steps of each generated spectrogram
    pub time_steps: usize,
    /// Frequency bins of each generated spectrogram
    pub frequency_bins: usize,
    /// Probability that a frame is silent
    pub silence_prob: f64,
    /// Probability that a non-silent frame is mixed
    pub mixed_prob: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            time_steps: 100,
            frequency_bins: 80,
            silence_prob: 0.3,
            mixed_prob: 0.5,
        }
    }
}

/// One frame of upstream output
#[derive(Clone, Debug)]
pub struct SourceFrame {
    pub kind: FrameKind,
    /// Latent vector (Z_SIZE values in [0, 255))
    pub latent: Vec<f32>,
    /// Measured energy (E_SIZE values in [0, 1))
    pub energy: Vec<f32>,
    /// Spectrogram produced by the generative decoder
    pub spectrogram: Spectrogram,
}

/// Deterministic frame generator
pub struct FrameGenerator {
    link: LinkConfig,
    config: GeneratorConfig,
    rng: StdRng,
}

impl FrameGenerator {
    pub fn new(link: LinkConfig, config: GeneratorConfig, seed: u64) -> Self {
        FrameGenerator {
            link,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator with default sizes
    pub fn with_seed(seed: u64) -> Self {
        Self::new(LinkConfig::default(), GeneratorConfig::default(), seed)
    }

    /// Next frame, kind drawn from the configured probabilities
    pub fn next_frame(&mut self) -> SourceFrame {
        let kind = if self.rng.gen::<f64>() < self.config.silence_prob {
            FrameKind::Silence
        } else if self.rng.gen::<f64>() < self.config.mixed_prob {
            FrameKind::Mixed
        } else {
            FrameKind::Speech
        };
        self.frame(kind)
    }

    /// Frame of a specific kind
    pub fn frame(&mut self, kind: FrameKind) -> SourceFrame {
        let latent = (0..self.link.z_size)
            .map(|_| self.rng.gen::<f32>() * 255.0)
            .collect();

        let energy = (0..self.link.e_size)
            .map(|_| match kind {
                FrameKind::Silence => 0.0,
                FrameKind::Speech => self.rng.gen_range(0.3..1.0),
                FrameKind::Mixed => self.rng.gen::<f32>(),
            })
            .collect();

        SourceFrame {
            kind,
            latent,
            energy,
            spectrogram: self.dream(),
        }
    }

    /// Spectrogram of uniform noise in [0, 1)
    pub fn dream(&mut self) -> Spectrogram {
        let (steps, bins) = (self.config.time_steps, self.config.frequency_bins);
        let mut spec = Spectrogram::zeros(steps, bins);
        for step in 0..steps {
            if let Some(row) = spec.row_mut(step) {
                for v in row.iter_mut() {
                    *v = self.rng.gen::<f32>();
                }
            }
        }
        spec
    }

    pub fn link_config(&self) -> &LinkConfig {
        &self.link
    }
}
