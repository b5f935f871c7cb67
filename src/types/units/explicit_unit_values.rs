use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Length, LengthUnit};

/// A length as it appears in configuration files: a bare number plus the
/// unit spelled out as text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LengthValue {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown length unit: {0}")]
    UnknownLengthUnit(String),
}

impl LengthValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn length_unit(&self) -> Result<LengthUnit, UnitError> {
        self.unit.parse()
    }

    pub fn to_length(&self) -> Result<Length, UnitError> {
        Ok(self.length_unit()?.length(self.value))
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(unit: &str) -> Result<Self, Self::Err> {
        match unit.trim().to_lowercase().as_str() {
            "mm"
            | "millimeter" | "millimeters"
            | "millimetre" | "millimetres" => Ok(LengthUnit::Millimeters),
            "cm"
            | "centimeter" | "centimeters"
            | "centimetre" | "centimetres" => Ok(LengthUnit::Centimeters),
            "m"
            | "meter" | "meters"
            | "metre" | "metres" => Ok(LengthUnit::Meters),
            "um" | "µm" | "μm"
            | "micron" | "microns"
            | "micrometer" | "micrometers"
            | "micrometre" | "micrometres" => Ok(LengthUnit::Microns),
            "in" | "\""
            | "inch" | "inches" => Ok(LengthUnit::Inches),
            "ft" | "'"
            | "foot" | "feet" => Ok(LengthUnit::Feet),
            "mil" | "mils"
            | "thou" => Ok(LengthUnit::Mils),
            _ => Err(UnitError::UnknownLengthUnit(unit.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::millimeter;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_common_spellings() {
        assert_eq!("mm".parse::<LengthUnit>().unwrap(), LengthUnit::Millimeters);
        assert_eq!("Millimetres".parse::<LengthUnit>().unwrap(), LengthUnit::Millimeters);
        assert_eq!("INCHES".parse::<LengthUnit>().unwrap(), LengthUnit::Inches);
        assert_eq!("thou".parse::<LengthUnit>().unwrap(), LengthUnit::Mils);
        assert_eq!(" um ".parse::<LengthUnit>().unwrap(), LengthUnit::Microns);
    }

    #[test]
    fn test_parse_unknown_unit() {
        let err = "furlong".parse::<LengthUnit>().unwrap_err();
        assert_eq!(err, UnitError::UnknownLengthUnit("furlong".into()));
    }

    #[test]
    fn test_length_value_conversion() {
        let value = LengthValue::new(2.0, "in");
        assert_eq!(value.length_unit().unwrap(), LengthUnit::Inches);
        assert_relative_eq!(
            value.to_length().unwrap().get::<millimeter>(),
            50.8,
            epsilon = 1e-9
        );
    }
}
