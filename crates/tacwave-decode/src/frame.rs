use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::framer::TERMINATOR;

/// Bytes before the taxel values: length, address, 4-byte timestamp.
pub const HEADER_LEN: usize = 6;

/// Smallest declared length a frame can carry; corresponds to zero taxels.
pub const MIN_LENGTH: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame body too short to carry an address ({0} bytes)")]
    Truncated(usize),
    #[error("declared length {0} is below the minimum of 7")]
    LengthUnderflow(u8),
    #[error("declared length {0} leaves an odd number of taxel bytes")]
    OddPayload(u8),
    #[error("declared length {declared} implies a {expected}-byte body, got {actual}")]
    LengthMismatch {
        declared: u8,
        expected: usize,
        actual: usize,
    },
}

/// One decoded sensor reading.
///
/// Wire layout of the body: `[length:1][address:1][timestamp:4 LE]`
/// followed by `(length - 7) / 2` little-endian `u16` taxel values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub length: u8,
    pub address: u8,
    pub timestamp: u32,
    pub taxels: Vec<u16>,
}

impl Frame {
    /// Builds a frame, deriving `length` from the taxel count.
    ///
    /// # Panics
    ///
    /// Panics if more than 124 taxels are given, since the derived length
    /// must fit in one byte.
    pub fn new(address: u8, timestamp: u32, taxels: Vec<u16>) -> Self {
        let length = u8::try_from(usize::from(MIN_LENGTH) + 2 * taxels.len())
            .expect("taxel count exceeds one-byte length field");
        Self {
            length,
            address,
            timestamp,
            taxels,
        }
    }

    /// Decodes one frame body (terminator already stripped).
    pub fn decode(body: &[u8]) -> Result<Self, FrameError> {
        if body.len() < 2 {
            return Err(FrameError::Truncated(body.len()));
        }
        let length = body[0];
        let address = body[1];
        if length < MIN_LENGTH {
            return Err(FrameError::LengthUnderflow(length));
        }
        if (length - MIN_LENGTH) % 2 != 0 {
            return Err(FrameError::OddPayload(length));
        }
        let count = usize::from(length - MIN_LENGTH) / 2;
        let expected = HEADER_LEN + 2 * count;
        if body.len() != expected {
            return Err(FrameError::LengthMismatch {
                declared: length,
                expected,
                actual: body.len(),
            });
        }
        let timestamp = u32::from_le_bytes([body[2], body[3], body[4], body[5]]);
        let taxels = body[HEADER_LEN..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self {
            length,
            address,
            timestamp,
            taxels,
        })
    }

    /// Encodes the full wire image, terminator included.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + 2 * self.taxels.len() + TERMINATOR.len());
        out.push(self.length);
        out.push(self.address);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        for taxel in &self.taxels {
            out.extend_from_slice(&taxel.to_le_bytes());
        }
        out.extend_from_slice(&TERMINATOR);
        out
    }
}
