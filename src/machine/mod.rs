pub mod driver;
pub mod observer;
pub mod resolver;

pub use driver::*;
pub use observer::*;
pub use resolver::*;
