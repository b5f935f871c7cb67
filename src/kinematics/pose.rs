use std::fmt;
use std::ops::{Add, Sub};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Which physical point a pose describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// Working point of the tool being moved
    #[default]
    Tool,
    /// Working point of the head's reference tool (normally the default camera)
    Reference,
    /// Fixed displacement of a tool from the reference tool, not a position
    Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    Rotation,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::Rotation => "Rotation",
        };
        f.write_str(name)
    }
}

/// An immutable point with three linear axes and one rotational axis.
///
/// Linear axes are in `units`; rotation is always degrees. Arithmetic
/// converts the right-hand side into the left-hand side's units and keeps
/// the left-hand side's frame: frame changes only happen through
/// [`Pose::with_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    units: LengthUnit,
    x: f64,
    y: f64,
    z: f64,
    rotation: f64,
    #[serde(default)]
    frame: Frame,
}

impl Pose {
    /// Create a pose in the tool frame
    pub fn new(units: LengthUnit, x: f64, y: f64, z: f64, rotation: f64) -> Self {
        Self {
            units,
            x,
            y,
            z,
            rotation,
            frame: Frame::Tool,
        }
    }

    /// All-zero pose, the offset of the reference tool from itself
    pub fn zero(units: LengthUnit) -> Self {
        Self::new(units, 0.0, 0.0, 0.0, 0.0)
    }

    /// Build an offset pose from `[x, y, z, rotation]`
    pub fn offset(units: LengthUnit, values: [f64; 4]) -> Self {
        Self::from_array(units, values).with_frame(Frame::Offset)
    }

    pub fn from_array(units: LengthUnit, [x, y, z, rotation]: [f64; 4]) -> Self {
        Self::new(units, x, y, z, rotation)
    }

    pub fn units(&self) -> LengthUnit {
        self.units
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Rotation => self.rotation,
        }
    }

    pub fn coords(&self) -> na::Vector4<f64> {
        na::Vector4::new(self.x, self.y, self.z, self.rotation)
    }

    fn from_coords(units: LengthUnit, frame: Frame, coords: na::Vector4<f64>) -> Self {
        Self {
            units,
            x: coords.x,
            y: coords.y,
            z: coords.z,
            rotation: coords.w,
            frame,
        }
    }

    pub fn with_frame(self, frame: Frame) -> Self {
        Self { frame, ..self }
    }

    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }

    /// Same point with its linear axes expressed in `units`
    pub fn convert_to_units(&self, units: LengthUnit) -> Self {
        if self.units == units {
            return *self;
        }
        Self {
            units,
            x: self.units.convert(self.x, units),
            y: self.units.convert(self.y, units),
            z: self.units.convert(self.z, units),
            rotation: self.rotation,
            frame: self.frame,
        }
    }
}

impl Add for Pose {
    type Output = Pose;

    fn add(self, rhs: Pose) -> Pose {
        let rhs = rhs.convert_to_units(self.units);
        Pose::from_coords(self.units, self.frame, self.coords() + rhs.coords())
    }
}

impl Sub for Pose {
    type Output = Pose;

    fn sub(self, rhs: Pose) -> Pose {
        let rhs = rhs.convert_to_units(self.units);
        Pose::from_coords(self.units, self.frame, self.coords() - rhs.coords())
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}, {:.3} {})",
            self.x, self.y, self.z, self.rotation, self.units
        )
    }
}
