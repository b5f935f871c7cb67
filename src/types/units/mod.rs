mod display;
mod explicit_unit_values;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use uom::si::f64::Length;
pub use uom::si::length::{centimeter, foot, inch, meter, micrometer, mil, millimeter};

pub use display::DisplayLength;
pub use explicit_unit_values::{LengthValue, UnitError};

/// Length unit a coordinate is expressed in.
///
/// Rotation is not covered here: rotational axes are always degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Millimeters,
    Centimeters,
    Meters,
    Microns,
    Inches,
    Feet,
    Mils,
}

impl LengthUnit {
    /// Wrap a raw value in this unit as a `uom` length
    pub fn length(self, value: f64) -> Length {
        match self {
            LengthUnit::Millimeters => Length::new::<millimeter>(value),
            LengthUnit::Centimeters => Length::new::<centimeter>(value),
            LengthUnit::Meters => Length::new::<meter>(value),
            LengthUnit::Microns => Length::new::<micrometer>(value),
            LengthUnit::Inches => Length::new::<inch>(value),
            LengthUnit::Feet => Length::new::<foot>(value),
            LengthUnit::Mils => Length::new::<mil>(value),
        }
    }

    /// Read a `uom` length back out as a raw value in this unit
    pub fn value_of(self, length: Length) -> f64 {
        match self {
            LengthUnit::Millimeters => length.get::<millimeter>(),
            LengthUnit::Centimeters => length.get::<centimeter>(),
            LengthUnit::Meters => length.get::<meter>(),
            LengthUnit::Microns => length.get::<micrometer>(),
            LengthUnit::Inches => length.get::<inch>(),
            LengthUnit::Feet => length.get::<foot>(),
            LengthUnit::Mils => length.get::<mil>(),
        }
    }

    /// Convert `value` from this unit into `to`.
    ///
    /// Same-unit conversion returns `value` untouched so that exact
    /// coordinates never pick up rounding from the SI round trip.
    pub fn convert(self, value: f64, to: LengthUnit) -> f64 {
        if self == to {
            value
        } else {
            to.value_of(self.length(value))
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Microns => "um",
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
            LengthUnit::Mils => "mil",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
