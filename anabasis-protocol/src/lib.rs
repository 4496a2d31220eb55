//! Panel Link Protocol
//!
//! This crate defines the byte protocol between the cabin controller and
//! the call panel (or any other transport endpoint: the wire is opaque to
//! the controller). The protocol carries exactly two kinds of traffic:
//! floor calls inbound, and periodic cabin status outbound.
//!
//! # Frame format
//!
//! ```text
//! ┌───────┬──────┬────────┬─────────────┬──────────┐
//! │ START │ TYPE │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B   │ 1B     │ 0–16B       │ 1B       │
//! └───────┴──────┴────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of TYPE, LENGTH and every payload byte. The
//! parser resynchronizes on the START byte after garbage or a bad
//! checksum, so a half-seen frame costs one frame, never the link.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_LEN, MAX_PAYLOAD_LEN};
pub use messages::{CabinReport, PanelCommand};
