//! Lossy channel simulation
//!
//! Simulates a hostile narrowband link between transmitter and receiver:
//! - Random packet loss
//! - Burst loss
//! - Header corruption (the receiver must reject, not misread)
//!
//! Delivery is in order and instantaneous; timing is not modelled. The link
//! carries one packet per frame, so burst lengths count frames: at the
//! default 12 Hz a burst of 12 is one second of dead air.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use echolink_core::HEADER_SIZE;

/// Channel loss configuration
#[derive(Clone, Debug)]
pub struct LinkConditions {
    /// Packet loss rate (0.0 - 1.0)
    pub loss_rate: f64,
    /// Burst loss probability
    pub burst_loss_prob: f64,
    /// Burst loss length range, in frames
    pub burst_length: (u32, u32),
    /// Probability of a corrupted header byte
    pub corruption_prob: f64,
}

impl Default for LinkConditions {
    fn default() -> Self {
        LinkConditions {
            loss_rate: 0.02,
            burst_loss_prob: 0.005,
            burst_length: (3, 6),
            corruption_prob: 0.005,
        }
    }
}

impl LinkConditions {
    /// Lossless link
    pub fn perfect() -> Self {
        LinkConditions {
            loss_rate: 0.0,
            burst_loss_prob: 0.0,
            burst_length: (0, 0),
            corruption_prob: 0.0,
        }
    }

    /// Clear line of sight, rare single-frame drops
    pub fn good() -> Self {
        LinkConditions {
            loss_rate: 0.002,
            burst_loss_prob: 0.005,
            burst_length: (1, 3),
            corruption_prob: 0.0005,
        }
    }

    /// Fading link, half-second to one-second dropouts
    pub fn poor() -> Self {
        LinkConditions {
            loss_rate: 0.06,
            burst_loss_prob: 0.015,
            burst_length: (6, 12),
            corruption_prob: 0.01,
        }
    }

    /// Edge of range, dropouts of several seconds
    pub fn hostile() -> Self {
        LinkConditions {
            loss_rate: 0.12,
            burst_loss_prob: 0.02,
            burst_length: (12, 36),
            corruption_prob: 0.03,
        }
    }

    /// Longest burst in seconds at `frame_rate_hz`
    pub fn max_burst_secs(&self, frame_rate_hz: u32) -> f64 {
        if frame_rate_hz == 0 {
            0.0
        } else {
            self.burst_length.1 as f64 / frame_rate_hz as f64
        }
    }
}

/// Channel statistics
#[derive(Clone, Debug, Default)]
pub struct ChannelStats {
    pub packets_sent: u64,
    pub packets_delivered: u64,
    pub packets_lost: u64,
    pub packets_corrupted: u64,
    pub bytes_delivered: u64,
}

impl ChannelStats {
    pub fn loss_rate(&self) -> f64 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_lost as f64 / self.packets_sent as f64
        }
    }
}

/// Lossy channel
pub struct LossyChannel {
    conditions: LinkConditions,
    rng: StdRng,
    /// Burst loss counter
    burst_remaining: u32,
    stats: ChannelStats,
}

impl LossyChannel {
    pub fn new(conditions: LinkConditions, seed: u64) -> Self {
        LossyChannel {
            conditions,
            rng: StdRng::seed_from_u64(seed),
            burst_remaining: 0,
            stats: ChannelStats::default(),
        }
    }

    /// Push a packet through the channel; `None` if it was lost
    pub fn transmit(&mut self, data: &[u8]) -> Option<Vec<u8>> {
        self.stats.packets_sent += 1;

        if self.should_drop() {
            self.stats.packets_lost += 1;
            return None;
        }

        let mut delivered = data.to_vec();
        if !delivered.is_empty() && self.rng.gen::<f64>() < self.conditions.corruption_prob {
            let idx = self.rng.gen_range(0..HEADER_SIZE.min(delivered.len()));
            delivered[idx] ^= 0xFF;
            self.stats.packets_corrupted += 1;
        }

        self.stats.packets_delivered += 1;
        self.stats.bytes_delivered += delivered.len() as u64;
        Some(delivered)
    }

    fn should_drop(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }

        if self.rng.gen::<f64>() < self.conditions.burst_loss_prob {
            let (min, max) = self.conditions.burst_length;
            self.burst_remaining = self.rng.gen_range(min..=max);
            return true;
        }

        self.rng.gen::<f64>() < self.conditions.loss_rate
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ChannelStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_channel_delivers_everything() {
        let mut channel = LossyChannel::new(LinkConditions::perfect(), 1);
        for i in 0..100u8 {
            assert_eq!(channel.transmit(&[0xEC, 0x4C, i]), Some(vec![0xEC, 0x4C, i]));
        }
        assert_eq!(channel.stats().packets_delivered, 100);
        assert_eq!(channel.stats().loss_rate(), 0.0);
    }

    #[test]
    fn test_hostile_channel_loses_packets() {
        let mut channel = LossyChannel::new(LinkConditions::hostile(), 12345);
        for _ in 0..1000 {
            channel.transmit(&[0u8; 98]);
        }
        let stats = channel.stats();
        assert!(stats.loss_rate() > 0.05);
        assert_eq!(stats.packets_sent, stats.packets_delivered + stats.packets_lost);
    }

    #[test]
    fn test_presets_scale_with_frame_rate() {
        assert_eq!(LinkConditions::perfect().max_burst_secs(12), 0.0);
        assert_eq!(LinkConditions::poor().max_burst_secs(12), 1.0);
        assert_eq!(LinkConditions::hostile().max_burst_secs(12), 3.0);
        assert_eq!(LinkConditions::hostile().max_burst_secs(0), 0.0);

        let presets = [
            LinkConditions::good(),
            LinkConditions::default(),
            LinkConditions::poor(),
            LinkConditions::hostile(),
        ];
        for pair in presets.windows(2) {
            assert!(pair[0].loss_rate < pair[1].loss_rate);
            assert!(pair[0].burst_length.1 < pair[1].burst_length.1);
        }
    }

    #[test]
    fn test_corruption_only_touches_header() {
        let conditions = LinkConditions {
            corruption_prob: 1.0,
            ..LinkConditions::perfect()
        };
        let mut channel = LossyChannel::new(conditions, 3);
        let sent = vec![0xEC, 0x4C, 1, 2, 3];
        let got = channel.transmit(&sent).unwrap();
        assert_ne!(got[..2], sent[..2]);
        assert_eq!(got[2..], sent[2..]);
    }
}
