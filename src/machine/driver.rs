use std::sync::{Mutex, MutexGuard};

use crate::equipment::{Head, Tool};
use crate::kinematics::{Frame, Pose};
use crate::types::LengthUnit;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriverError {
    #[error("Driver fault: {0}")]
    Fault(String),

    #[error("Communication with motion controller failed: {0}")]
    Communication(String),

    #[error("Machine has not been homed")]
    NotHomed,
}

/// Performs physical motion for a head.
///
/// Calls block until the controller acknowledges the command. The driver
/// serializes motion; the coordinator does no locking of its own.
pub trait MotionDriver: Send + Sync {
    fn home(&self, head: &Head) -> Result<(), DriverError>;

    /// Move `tool`'s working point to `target`. A `speed` of 0 means the
    /// controller's maximum, 1 the normal rate.
    fn move_to(&self, tool: &dyn Tool, target: &Pose, speed: f64) -> Result<(), DriverError>;

    /// Last known position of `tool`'s working point
    fn location(&self, tool: &dyn Tool) -> Result<Pose, DriverError>;
}

/// A command as received by [`NullDriver`]
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    Home { head: String },
    MoveTo { tool: String, target: Pose, speed: f64 },
}

#[derive(Debug, Default)]
struct NullDriverState {
    homed: bool,
    /// Head reference point implied by the last command
    head_position: Option<Pose>,
    commands: Vec<DriverCommand>,
    pending_failure: Option<DriverError>,
}

/// Driver that moves nothing.
///
/// Tracks the head position implied by each command so that `location`
/// answers consistently for every tool, and records everything it was
/// asked to do.
#[derive(Debug)]
pub struct NullDriver {
    units: LengthUnit,
    require_homing: bool,
    state: Mutex<NullDriverState>,
}

impl Default for NullDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl NullDriver {
    pub fn new() -> Self {
        Self {
            units: LengthUnit::Millimeters,
            require_homing: false,
            state: Mutex::new(NullDriverState::default()),
        }
    }

    /// Reject moves until the head has been homed
    pub fn requiring_homing(mut self) -> Self {
        self.require_homing = true;
        self
    }

    /// Make the next `home` or `move_to` fail with `error`
    pub fn fail_next(&self, error: DriverError) {
        self.lock().pending_failure = Some(error);
    }

    pub fn commands(&self) -> Vec<DriverCommand> {
        self.lock().commands.clone()
    }

    pub fn moves(&self) -> Vec<(String, Pose, f64)> {
        self.lock()
            .commands
            .iter()
            .filter_map(|c| match c {
                DriverCommand::MoveTo { tool, target, speed } => {
                    Some((tool.clone(), *target, *speed))
                }
                DriverCommand::Home { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, NullDriverState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn head_position(&self, state: &NullDriverState) -> Pose {
        state
            .head_position
            .unwrap_or_else(|| Pose::zero(self.units))
    }
}

impl MotionDriver for NullDriver {
    fn home(&self, head: &Head) -> Result<(), DriverError> {
        let mut state = self.lock();
        if let Some(error) = state.pending_failure.take() {
            return Err(error);
        }
        state.commands.push(DriverCommand::Home {
            head: head.name().to_string(),
        });
        state.homed = true;
        state.head_position = Some(Pose::zero(self.units));
        Ok(())
    }

    fn move_to(&self, tool: &dyn Tool, target: &Pose, speed: f64) -> Result<(), DriverError> {
        let mut state = self.lock();
        if let Some(error) = state.pending_failure.take() {
            return Err(error);
        }
        if self.require_homing && !state.homed {
            return Err(DriverError::NotHomed);
        }
        state.commands.push(DriverCommand::MoveTo {
            tool: tool.name().to_string(),
            target: *target,
            speed,
        });
        let head = (target.convert_to_units(self.units) - tool.offset()).with_frame(Frame::Offset);
        state.head_position = Some(head);
        Ok(())
    }

    fn location(&self, tool: &dyn Tool) -> Result<Pose, DriverError> {
        let state = self.lock();
        Ok((self.head_position(&state) + tool.offset()).with_frame(Frame::Tool))
    }
}
