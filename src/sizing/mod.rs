//! Risk-based position sizing
//!
//! Turns a percentage-of-equity risk tolerance and a stop distance into a
//! volume the broker will accept, given the instrument's tick economics.

mod position_sizer;

pub use position_sizer::{PositionSizer, SizedVolume, SizingResult, VolumeAdjustment};
