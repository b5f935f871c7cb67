pub mod pose;
pub mod transforms;

pub use pose::*;
pub use transforms::*;
