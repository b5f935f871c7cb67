//! Software travel limits for a head
//!
//! Bounds are captured in the reference tool's frame, usually by jogging
//! the default camera to the corners of the usable area. Only X and Y are
//! enforced; Z and rotation are kept so the box round-trips through
//! configuration but are guarded elsewhere (safe Z).

use serde::{Deserialize, Serialize};

use crate::kinematics::{Axis, Frame, Pose};
use crate::types::LengthUnit;

/// Axes the policy actually enforces
pub const CHECKED_AXES: [Axis; 2] = [Axis::X, Axis::Y];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftLimits {
    pub enabled: bool,
    pub min: Pose,
    pub max: Pose,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LimitViolation {
    #[error("{axis} = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{axis} minimum {min} is greater than maximum {max}")]
    Malformed { axis: Axis, min: f64, max: f64 },
}

impl Default for SoftLimits {
    fn default() -> Self {
        Self::disabled(LengthUnit::Millimeters)
    }
}

impl SoftLimits {
    /// Enabled box spanning `min..=max`
    pub fn new(min: Pose, max: Pose) -> Self {
        Self {
            enabled: true,
            min: min.with_frame(Frame::Reference),
            max: max.with_frame(Frame::Reference),
        }
    }

    pub fn disabled(units: LengthUnit) -> Self {
        Self {
            enabled: false,
            min: Pose::zero(units).with_frame(Frame::Reference),
            max: Pose::zero(units).with_frame(Frame::Reference),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check a reference-frame pose against the box.
    ///
    /// Bounds are inclusive. The box is validated on every checked axis
    /// before the pose is looked at, so a box with `min > max` or a NaN
    /// bound is always reported as malformed whatever the target. A NaN
    /// coordinate in the pose is out of bounds.
    pub fn check(&self, reference: &Pose) -> Result<(), LimitViolation> {
        if !self.enabled {
            return Ok(());
        }

        let min = self.min.convert_to_units(reference.units());
        let max = self.max.convert_to_units(reference.units());

        for axis in CHECKED_AXES {
            let (lo, hi) = (min.axis(axis), max.axis(axis));
            if !(lo <= hi) {
                return Err(LimitViolation::Malformed { axis, min: lo, max: hi });
            }
        }

        for axis in CHECKED_AXES {
            let (lo, hi) = (min.axis(axis), max.axis(axis));
            let value = reference.axis(axis);
            if !(lo <= value && value <= hi) {
                return Err(LimitViolation::OutOfBounds {
                    axis,
                    value,
                    min: lo,
                    max: hi,
                });
            }
        }

        Ok(())
    }
}
