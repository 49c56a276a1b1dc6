//! Packet encoder (transmitter side)

use bytes::{BufMut, BytesMut};
use echolink_core::{EchoError, EchoResult, LinkConfig};

use crate::{clipped_count, quantize, Header, Packet, ENERGY_SCALE, LATENT_SCALE};

/// Quantizes latent vectors and energy maps into fixed-size packets
#[derive(Clone, Debug)]
pub struct PacketEncoder {
    config: LinkConfig,
    header: Header,
}

impl PacketEncoder {
    /// Create an encoder for a validated configuration
    pub fn new(config: LinkConfig) -> EchoResult<Self> {
        config.validate()?;
        Ok(PacketEncoder {
            config,
            header: Header::new(),
        })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Size of every packet produced by this encoder
    #[inline]
    pub fn packet_len(&self) -> usize {
        self.config.packet_len()
    }

    /// Quantize the latent vector to the latent field
    pub fn quantize_latent(&self, latent: &[f32]) -> EchoResult<Vec<u8>> {
        quantize(latent, self.config.z_size, LATENT_SCALE)
    }

    /// Quantize the energy map to the energy floor field
    pub fn quantize_energy(&self, energy: &[f32]) -> EchoResult<Vec<u8>> {
        quantize(energy, self.config.e_size, ENERGY_SCALE)
    }

    /// Build a packet: header, latent field, energy field
    pub fn encode_packet(&self, latent: &[f32], energy: &[f32]) -> EchoResult<Packet> {
        if latent.is_empty() {
            return Err(EchoError::invalid("Latent vector is empty"));
        }
        if energy.is_empty() {
            return Err(EchoError::invalid("Energy map is empty"));
        }

        let z = self.quantize_latent(latent)?;
        let e = self.quantize_energy(energy)?;

        let mut buf = BytesMut::with_capacity(self.packet_len());
        buf.put_slice(&self.header.to_bytes());
        buf.put_slice(&z);
        buf.put_slice(&e);

        tracing::debug!(
            "Encoded packet: {} bytes, clipped latent={} energy={}",
            buf.len(),
            clipped_count(latent, LATENT_SCALE),
            clipped_count(energy, ENERGY_SCALE)
        );

        Ok(Packet::from_parts(
            buf.freeze(),
            self.config.z_size,
            self.config.e_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAGIC;

    fn ramp(n: usize, step: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * step).collect()
    }

    #[test]
    fn test_packet_layout() {
        let encoder = PacketEncoder::new(LinkConfig::default()).unwrap();
        let packet = encoder
            .encode_packet(&ramp(64, 2.0), &ramp(32, 1.0 / 31.0))
            .unwrap();

        assert_eq!(packet.len(), 98);
        assert_eq!(&packet.as_bytes()[..2], &MAGIC);
        assert_eq!(packet.latent_bytes()[0], 0);
        assert_eq!(packet.latent_bytes()[63], 126);
        assert_eq!(packet.energy_bytes()[0], 0);
        assert_eq!(packet.energy_bytes()[31], 255);
    }

    #[test]
    fn test_encode_then_parse() {
        let config = LinkConfig::default();
        let encoder = PacketEncoder::new(config.clone()).unwrap();
        let packet = encoder
            .encode_packet(&ramp(64, 3.0), &ramp(32, 0.03))
            .unwrap();

        let parsed = Packet::parse(packet.as_bytes(), &config).unwrap();
        assert_eq!(parsed, packet);
    }

    #[test]
    fn test_custom_sizes() {
        let config = LinkConfig::default().with_sizes(16, 8);
        let encoder = PacketEncoder::new(config).unwrap();
        let packet = encoder.encode_packet(&[1.0; 16], &[0.5; 8]).unwrap();
        assert_eq!(packet.len(), 2 + 16 + 8);
        assert_eq!(packet.z_size(), 16);
        assert_eq!(packet.e_size(), 8);
    }

    #[test]
    fn test_mismatched_lengths_are_normalized() {
        let encoder = PacketEncoder::new(LinkConfig::default()).unwrap();
        let packet = encoder.encode_packet(&[9.0; 10], &[1.0; 40]).unwrap();
        assert_eq!(packet.len(), 98);
        assert!(packet.latent_bytes().iter().all(|&b| b == 9));
        assert!(packet.energy_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let encoder = PacketEncoder::new(LinkConfig::default()).unwrap();
        assert!(encoder.encode_packet(&[], &[0.5; 32]).is_err());
        assert!(encoder.encode_packet(&[1.0; 64], &[]).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let encoder = PacketEncoder::new(LinkConfig::default()).unwrap();
        let mut latent = vec![1.0; 64];
        latent[5] = f32::NAN;
        let err = encoder.encode_packet(&latent, &[0.5; 32]).unwrap_err();
        assert!(err.is_invalid_input());

        let mut energy = vec![0.5; 32];
        energy[0] = f32::INFINITY;
        assert!(encoder.encode_packet(&[1.0; 64], &energy).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = LinkConfig::default().with_sizes(0, 32);
        assert!(PacketEncoder::new(config).is_err());
    }
}
