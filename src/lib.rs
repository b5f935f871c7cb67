pub mod types;
pub mod kinematics;
pub mod limits;
pub mod equipment;
pub mod machine;
pub mod config;

pub use types::*;
