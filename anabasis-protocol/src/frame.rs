//! Frame encoding and incremental parsing for the panel link
//!
//! Layout: START (0x7E) | TYPE | LENGTH | PAYLOAD (0..=16) | CHECKSUM,
//! checksum = XOR of TYPE, LENGTH and all payload bytes.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes
///
/// Everything this link carries fits in two bytes; the headroom exists so a
/// firmware update can add a message without a framing change.
pub const MAX_PAYLOAD_LEN: usize = 16;

/// Maximum complete frame size (START + TYPE + LENGTH + payload + CHECKSUM)
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + 4;

/// Errors surfaced while parsing or encoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
    /// Declared length exceeds [`MAX_PAYLOAD_LEN`]
    LengthOutOfRange,
    /// Checksum mismatch; the frame was dropped
    ChecksumMismatch,
    /// Destination buffer too small for encoding
    BufferTooSmall,
    /// Frame carries a type this endpoint does not understand
    UnknownType,
    /// Payload shorter than the message type requires
    ShortPayload,
}

/// One parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload bytes
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Frame {
    /// Build a frame with the given type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut bytes = Vec::new();
        bytes
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            msg_type,
            payload: bytes,
        })
    }

    /// Build a payload-less frame
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(msg_type: u8, length: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(msg_type ^ length, |sum, &byte| sum ^ byte)
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let total = self.payload.len() + 4;
        if buffer.len() < total {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        buffer[0] = FRAME_START;
        buffer[1] = self.msg_type;
        buffer[2] = length;
        buffer[3..3 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[3 + self.payload.len()] = Self::checksum(self.msg_type, length, &self.payload);
        Ok(total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for the START byte
    Start,
    /// Expecting the TYPE byte
    Type,
    /// Expecting the LENGTH byte
    Length,
    /// Collecting payload bytes
    Payload,
    /// Expecting the CHECKSUM byte
    Checksum,
}

/// Incremental frame parser
///
/// Feed it one byte at a time as they arrive; it hands back a frame when a
/// complete, checksum-valid one has been seen. Any error resets it to
/// hunting for the next START byte.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    msg_type: u8,
    expected_len: u8,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser hunting for a frame start
    pub fn new() -> Self {
        Self {
            state: ParseState::Start,
            msg_type: 0,
            expected_len: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and hunt for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.msg_type = 0;
        self.expected_len = 0;
        self.payload.clear();
    }

    /// Consume one byte from the wire
    ///
    /// Returns `Ok(Some(frame))` on a completed frame, `Ok(None)` while
    /// more bytes are needed, `Err` when the frame in progress was dropped
    /// (the parser has already resynchronized).
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Start => {
                if byte == FRAME_START {
                    self.state = ParseState::Type;
                }
                // Anything else is line noise between frames
                Ok(None)
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.state = ParseState::Length;
                Ok(None)
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_LEN {
                    self.reset();
                    return Err(FrameError::LengthOutOfRange);
                }
                self.expected_len = byte;
                self.payload.clear();
                self.state = if byte == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
                Ok(None)
            }
            ParseState::Payload => {
                // Cannot overflow: expected_len was bounds-checked
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected_len as usize {
                    self.state = ParseState::Checksum;
                }
                Ok(None)
            }
            ParseState::Checksum => {
                let expected = Frame::checksum(self.msg_type, self.expected_len, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::ChecksumMismatch);
                }
                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: self.payload.clone(),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Consume a run of bytes, returning the first completed frame
    pub fn feed_slice(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
