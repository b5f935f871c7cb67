pub mod units;

pub use units::*;

// Re-export nalgebra
pub use nalgebra as na;
