//! End-to-end link simulator
//!
//! Transmitter → lossy channel → receiver, one frame per step:
//! the transmitter encodes the frame's latent and energy into a packet, the
//! channel may drop or corrupt it, and the receiver parses whatever arrives
//! and corrects the locally generated spectrogram against its energy floor.

use echolink_core::{EchoError, EchoResult, LinkConfig};
use echolink_pfc::PosteriorCorrector;
use echolink_wire::{Header, Packet, PacketEncoder};

use crate::{
    ChannelStats, FrameGenerator, FrameKind, GeneratorConfig, LinkConditions, LossyChannel,
    SourceFrame,
};

/// Aggregate statistics of a simulation run
#[derive(Clone, Debug, Default)]
pub struct LinkStats {
    pub frames_sent: u64,
    pub frames_corrected: u64,
    /// Delivered packets the receiver refused
    pub packets_rejected: u64,
    /// Rejected packets whose magic did not survive the channel
    pub packets_foreign: u64,
    pub steps_total: u64,
    pub steps_silenced: u64,
    /// Silent frames whose output was not fully suppressed
    pub hallucinations_leaked: u64,
    /// Spectrogram energy before correction (delivered frames)
    pub energy_before: f64,
    /// Spectrogram energy after correction
    pub energy_after: f64,
    pub bytes_sent: u64,
}

impl LinkStats {
    pub fn silenced_ratio(&self) -> f64 {
        if self.steps_total == 0 {
            0.0
        } else {
            self.steps_silenced as f64 / self.steps_total as f64
        }
    }

    /// Fraction of generated energy removed by correction
    pub fn suppression_ratio(&self) -> f64 {
        if self.energy_before == 0.0 {
            0.0
        } else {
            1.0 - self.energy_after / self.energy_before
        }
    }
}

/// Outcome of a single simulated frame
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    /// Lost in the channel
    Lost,
    /// Delivered but rejected by the receiver
    Rejected(EchoError),
    /// Delivered and corrected
    Corrected { silenced_steps: usize },
}

/// Transmitter/receiver pair connected by a lossy channel
pub struct LinkSimulator {
    encoder: PacketEncoder,
    receiver_config: LinkConfig,
    corrector: PosteriorCorrector,
    channel: LossyChannel,
    generator: FrameGenerator,
    stats: LinkStats,
}

impl LinkSimulator {
    /// Both ends share `config`
    pub fn new(config: LinkConfig, conditions: LinkConditions, seed: u64) -> EchoResult<Self> {
        Self::with_configs(config.clone(), config, conditions, GeneratorConfig::default(), seed)
    }

    /// Separate transmitter and receiver configurations
    pub fn with_configs(
        transmitter: LinkConfig,
        receiver: LinkConfig,
        conditions: LinkConditions,
        generator: GeneratorConfig,
        seed: u64,
    ) -> EchoResult<Self> {
        tracing::debug!(
            "Link simulator: loss {:.3}, bursts up to {:.2}s at {} Hz",
            conditions.loss_rate,
            conditions.max_burst_secs(transmitter.frame_rate_hz),
            transmitter.frame_rate_hz
        );
        Ok(LinkSimulator {
            encoder: PacketEncoder::new(transmitter.clone())?,
            corrector: PosteriorCorrector::new(receiver.clone())?,
            receiver_config: receiver,
            channel: LossyChannel::new(conditions, seed),
            generator: FrameGenerator::new(transmitter, generator, seed.wrapping_add(1)),
            stats: LinkStats::default(),
        })
    }

    /// Simulate one frame drawn from the generator
    pub fn step(&mut self) -> EchoResult<FrameOutcome> {
        let frame = self.generator.next_frame();
        self.process(&frame)
    }

    /// Simulate one frame of a specific kind
    pub fn step_kind(&mut self, kind: FrameKind) -> EchoResult<FrameOutcome> {
        let frame = self.generator.frame(kind);
        self.process(&frame)
    }

    /// Run `frames` steps and return the accumulated statistics
    pub fn run(&mut self, frames: usize) -> EchoResult<&LinkStats> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(&self.stats)
    }

    /// Transmitter errors are returned; receiver errors are counted as rejections
    pub fn process(&mut self, frame: &SourceFrame) -> EchoResult<FrameOutcome> {
        let packet = self.encoder.encode_packet(&frame.latent, &frame.energy)?;
        self.stats.frames_sent += 1;
        self.stats.bytes_sent += packet.len() as u64;

        let Some(received) = self.channel.transmit(packet.as_bytes()) else {
            return Ok(FrameOutcome::Lost);
        };

        if !Header::matches(&received) {
            self.stats.packets_foreign += 1;
        }

        let corrected = Packet::parse(&received, &self.receiver_config)
            .and_then(|p| self.corrector.correct_packet(&frame.spectrogram, &p));

        let correction = match corrected {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Receiver rejected packet: {}", e);
                self.stats.packets_rejected += 1;
                return Ok(FrameOutcome::Rejected(e));
            }
        };

        let silenced = correction.silenced_steps();
        let energy_after = correction.spectrogram.total_energy();

        self.stats.frames_corrected += 1;
        self.stats.steps_total += frame.spectrogram.time_steps() as u64;
        self.stats.steps_silenced += silenced as u64;
        self.stats.energy_before += frame.spectrogram.total_energy();
        self.stats.energy_after += energy_after;
        if frame.kind == FrameKind::Silence && energy_after != 0.0 {
            self.stats.hallucinations_leaked += 1;
        }

        Ok(FrameOutcome::Corrected {
            silenced_steps: silenced,
        })
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn channel_stats(&self) -> &ChannelStats {
        self.channel.stats()
    }

    /// Configured link throughput
    pub fn bitrate_bps(&self) -> u64 {
        self.encoder.config().bitrate_bps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_link_suppresses_silence() {
        let mut sim = LinkSimulator::new(LinkConfig::default(), LinkConditions::perfect(), 42)
            .unwrap();

        for _ in 0..20 {
            match sim.step_kind(FrameKind::Silence).unwrap() {
                FrameOutcome::Corrected { silenced_steps } => assert_eq!(silenced_steps, 100),
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        let stats = sim.stats();
        assert_eq!(stats.frames_corrected, 20);
        assert_eq!(stats.hallucinations_leaked, 0);
        assert_eq!(stats.energy_after, 0.0);
        assert!(stats.energy_before > 0.0);
    }

    #[test]
    fn test_speech_passes_through() {
        let mut sim = LinkSimulator::new(LinkConfig::default(), LinkConditions::perfect(), 5)
            .unwrap();
        for _ in 0..10 {
            sim.step_kind(FrameKind::Speech).unwrap();
        }
        let stats = sim.stats();
        assert_eq!(stats.steps_silenced, 0);
        assert_eq!(stats.energy_before, stats.energy_after);
    }

    #[test]
    fn test_hostile_link_never_leaks() {
        let mut sim = LinkSimulator::new(LinkConfig::default(), LinkConditions::hostile(), 9)
            .unwrap();
        let stats = sim.run(500).unwrap().clone();

        assert_eq!(stats.frames_sent, 500);
        assert_eq!(stats.hallucinations_leaked, 0);
        assert!(sim.channel_stats().packets_lost > 0);
        assert_eq!(
            sim.channel_stats().packets_delivered,
            stats.frames_corrected + stats.packets_rejected
        );
    }

    #[test]
    fn test_layout_mismatch_is_rejected() {
        let tx = LinkConfig::default().with_sizes(64, 16);
        let rx = LinkConfig::default();
        let mut sim = LinkSimulator::with_configs(
            tx,
            rx,
            LinkConditions::perfect(),
            GeneratorConfig::default(),
            1,
        )
        .unwrap();

        match sim.step().unwrap() {
            FrameOutcome::Rejected(EchoError::ConfigurationMismatch { .. }) => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_header_counts_as_foreign() {
        let conditions = LinkConditions {
            corruption_prob: 1.0,
            ..LinkConditions::perfect()
        };
        let mut sim = LinkSimulator::new(LinkConfig::default(), conditions, 4).unwrap();

        for _ in 0..5 {
            match sim.step().unwrap() {
                FrameOutcome::Rejected(EchoError::InvalidInput(_)) => {}
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(sim.stats().packets_foreign, 5);
        assert_eq!(sim.stats().packets_rejected, 5);
    }

    #[test]
    fn test_layout_mismatch_is_not_foreign() {
        let tx = LinkConfig::default().with_sizes(64, 16);
        let mut sim = LinkSimulator::with_configs(
            tx,
            LinkConfig::default(),
            LinkConditions::perfect(),
            GeneratorConfig::default(),
            2,
        )
        .unwrap();
        sim.step().unwrap();
        assert_eq!(sim.stats().packets_rejected, 1);
        assert_eq!(sim.stats().packets_foreign, 0);
    }

    #[test]
    fn test_bitrate() {
        let sim = LinkSimulator::new(LinkConfig::default(), LinkConditions::good(), 0).unwrap();
        assert_eq!(sim.bitrate_bps(), 9408);
    }
}
