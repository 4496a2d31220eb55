//! Board-agnostic control core for the Anabasis elevator firmware
//!
//! This crate contains all cabin logic that does not depend on specific
//! hardware implementations:
//!
//! - Half-step phase sequencer for the four-coil cabin motor
//! - Shared floor-request table
//! - SCAN floor scheduler (direction arbitration, arrival detection,
//!   stall give-up)
//! - Configuration type definitions and startup validation
//!
//! Everything here runs identically on the target and on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod requests;
pub mod scheduler;
pub mod stepper;
pub mod traits;
