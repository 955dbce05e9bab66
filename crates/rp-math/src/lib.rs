//! Revenue Pulse math utilities.

pub mod math;

pub use math::describe::*;
pub use math::isolation::*;
pub use math::round::*;
