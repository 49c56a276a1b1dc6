//! Fixed header for Echo Link packets
//!
//! Header is 2 bytes:
//! - Byte 0: 0xEC
//! - Byte 1: 0x4C ('L')

use echolink_core::{EchoError, EchoResult, HEADER_SIZE};

/// Protocol magic identifying Echo Link packets
pub const MAGIC: [u8; HEADER_SIZE] = [0xEC, 0x4C];

/// Packet header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; HEADER_SIZE],
}

impl Header {
    pub fn new() -> Self {
        Header { magic: MAGIC }
    }

    /// Check whether `buf` starts with the Echo Link magic
    #[inline]
    pub fn matches(buf: &[u8]) -> bool {
        buf.len() >= HEADER_SIZE && buf[..HEADER_SIZE] == MAGIC
    }

    /// Parse header from bytes
    pub fn parse(buf: &[u8]) -> EchoResult<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(EchoError::InvalidInput(format!(
                "Buffer too short for header: expected {}, got {}",
                HEADER_SIZE,
                buf.len()
            )));
        }

        let magic = [buf[0], buf[1]];
        if magic != MAGIC {
            return Err(EchoError::InvalidInput(format!(
                "Unknown packet magic {:02X}{:02X}",
                magic[0], magic[1]
            )));
        }

        Ok(Header { magic })
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        self.magic
    }
}

impl Default for Header {
    fn default() -> Self {
        Header::new()
    }
}
