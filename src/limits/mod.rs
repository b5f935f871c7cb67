pub mod soft_limits;

pub use soft_limits::*;
