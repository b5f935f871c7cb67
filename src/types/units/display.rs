use std::fmt;

use uom::si::length::{inch, millimeter};

use crate::types::units::*;

#[derive(Debug)]
pub struct DisplayLength(pub Length);

impl fmt::Display for DisplayLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mm = self.0.get::<millimeter>();
        let inches = self.0.get::<inch>();
        write!(f, "{:.3}mm ({:.4}\")", mm, inches)
    }
}
