//! Message types for the panel link
//!
//! Two directions of traffic:
//! - Panel → cabin: floor calls, heartbeat requests
//! - Cabin → panel: status snapshots, heartbeat responses, fault reports

use crate::frame::{Frame, FrameError};

// Message type IDs: panel → cabin
pub const MSG_CALL: u8 = 0x01;
pub const MSG_PING: u8 = 0x02;

// Message type IDs: cabin → panel
pub const MSG_STATUS: u8 = 0x10;
pub const MSG_PONG: u8 = 0x11;
pub const MSG_FAULT: u8 = 0x12;

/// Commands arriving from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelCommand {
    /// Request the cabin at a floor
    ///
    /// The floor byte is carried as-is: range checking belongs to the
    /// request table, which ignores floors the shaft does not serve.
    Call {
        /// Requested floor index
        floor: u8,
    },
    /// Heartbeat request
    Ping,
}

impl PanelCommand {
    /// Parse a command from a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_CALL => match frame.payload.first() {
                Some(&floor) => Ok(PanelCommand::Call { floor }),
                None => Err(FrameError::ShortPayload),
            },
            MSG_PING => Ok(PanelCommand::Ping),
            _ => Err(FrameError::UnknownType),
        }
    }

    /// Encode this command into a frame (panel side, and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            PanelCommand::Call { floor } => Frame::new(MSG_CALL, &[*floor]),
            PanelCommand::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Reports sent from the cabin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CabinReport {
    /// Periodic position + request snapshot
    ///
    /// Payload layout: byte 0 = current floor, byte 1 = request bitmap
    /// (bit i = floor i, LSB = ground). A snapshot, not a transaction: the
    /// two bytes are read together under the cabin lock but may be a tick
    /// stale by the time the panel renders them.
    Status {
        /// Last confirmed cabin floor
        floor: u8,
        /// Outstanding request bitmap
        requested: u8,
    },
    /// Heartbeat response
    Pong,
    /// A destination was abandoned after the stall retry budget
    Fault {
        /// The floor that was never reached
        destination: u8,
    },
}

impl CabinReport {
    /// Encode this report into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            CabinReport::Status { floor, requested } => {
                Frame::new(MSG_STATUS, &[*floor, *requested])
            }
            CabinReport::Pong => Ok(Frame::empty(MSG_PONG)),
            CabinReport::Fault { destination } => Frame::new(MSG_FAULT, &[*destination]),
        }
    }

    /// Parse a report from a frame (panel side, and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_STATUS => match frame.payload.as_slice() {
                [floor, requested, ..] => Ok(CabinReport::Status {
                    floor: *floor,
                    requested: *requested,
                }),
                _ => Err(FrameError::ShortPayload),
            },
            MSG_PONG => Ok(CabinReport::Pong),
            MSG_FAULT => match frame.payload.first() {
                Some(&destination) => Ok(CabinReport::Fault { destination }),
                None => Err(FrameError::ShortPayload),
            },
            _ => Err(FrameError::UnknownType),
        }
    }
}
