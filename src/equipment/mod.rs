pub mod head;
pub mod tool;

pub use head::*;
pub use tool::*;
