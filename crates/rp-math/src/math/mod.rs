//! Core math modules.

pub mod describe;
pub mod isolation;
pub mod round;
