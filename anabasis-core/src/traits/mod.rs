//! Abstraction seams between the control core and the board

pub mod sensors;

pub use sensors::{FloorSensorBank, SensorArray};
