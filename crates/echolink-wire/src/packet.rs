//! Complete packet structure
//!
//! Packet = Header + Latent field + Energy floor field

use bytes::Bytes;
use echolink_core::{EchoError, EchoResult, EnergyMap, LinkConfig, HEADER_SIZE};

use crate::{Header, ENERGY_SCALE, LATENT_SCALE};

/// Immutable Echo Link packet
///
/// Always exactly `HEADER_SIZE + z_size + e_size` bytes long, starting with
/// the protocol magic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    bytes: Bytes,
    z_size: usize,
    e_size: usize,
}

impl Packet {
    /// Wrap bytes already laid out by the encoder
    pub(crate) fn from_parts(bytes: Bytes, z_size: usize, e_size: usize) -> Self {
        debug_assert_eq!(bytes.len(), HEADER_SIZE + z_size + e_size);
        Packet {
            bytes,
            z_size,
            e_size,
        }
    }

    /// Parse a received buffer (copies the data)
    pub fn parse(buf: &[u8], config: &LinkConfig) -> EchoResult<Self> {
        Self::from_bytes(Bytes::copy_from_slice(buf), config)
    }

    /// Parse a received buffer without copying
    pub fn from_bytes(bytes: Bytes, config: &LinkConfig) -> EchoResult<Self> {
        Header::parse(&bytes)?;

        // The magic matched, so a length difference means the peer was
        // built with a different Z_SIZE/E_SIZE
        let expected = config.packet_len();
        if bytes.len() != expected {
            return Err(EchoError::ConfigurationMismatch {
                field: "packet_len",
                expected,
                actual: bytes.len(),
            });
        }

        tracing::trace!("Parsed packet: {} bytes", bytes.len());

        Ok(Packet {
            bytes,
            z_size: config.z_size,
            e_size: config.e_size,
        })
    }

    pub fn header(&self) -> Header {
        Header {
            magic: [self.bytes[0], self.bytes[1]],
        }
    }

    /// Quantized latent field
    pub fn latent_bytes(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..HEADER_SIZE + self.z_size]
    }

    /// Quantized energy floor field
    pub fn energy_bytes(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE + self.z_size..]
    }

    /// Latent field mapped back to floats
    pub fn latent(&self) -> Vec<f32> {
        self.latent_bytes()
            .iter()
            .map(|&b| b as f32 / LATENT_SCALE)
            .collect()
    }

    /// Energy field at its native (coarse) resolution
    pub fn energy(&self) -> EnergyMap {
        self.energy_bytes()
            .iter()
            .map(|&b| b as f32 / ENERGY_SCALE)
            .collect::<Vec<_>>()
            .into()
    }

    #[inline]
    pub fn z_size(&self) -> usize {
        self.z_size
    }

    #[inline]
    pub fn e_size(&self) -> usize {
        self.e_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
