pub mod motion;

use std::fmt;
use std::sync::Arc;

use crate::equipment::tool::{Tool, ToolError, ToolRegistry};
use crate::kinematics::{Axis, Pose};
use crate::limits::{LimitViolation, SoftLimits};
use crate::machine::{DriverError, MachineResolver, MotionDriver};
use crate::types::*;

/// Which mounted tool defines the frame soft limits are authored in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceTool {
    /// First mounted camera
    #[default]
    DefaultCamera,
    Named(String),
}

impl fmt::Display for ReferenceTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTool::DefaultCamera => f.write_str("default camera"),
            ReferenceTool::Named(name) => write!(f, "tool {}", name),
        }
    }
}

/// Collaborator a head could not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collaborator {
    MotionDriver,
    ReferenceTool(ReferenceTool),
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::MotionDriver => f.write_str("Motion driver"),
            Collaborator::ReferenceTool(selector) => write!(f, "Reference tool ({})", selector),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HeadError {
    #[error("Can't move {tool} to {target}, outside of soft limits on head {head}: {violation}")]
    OutOfSoftLimits {
        tool: String,
        target: Pose,
        head: String,
        violation: LimitViolation,
    },

    #[error("Soft limits on head {head} are malformed: {axis} minimum {min} exceeds maximum {max}")]
    MalformedLimitPolicy {
        head: String,
        axis: Axis,
        min: f64,
        max: f64,
    },

    #[error("{collaborator} is not available on head {head}")]
    Unresolved {
        head: String,
        collaborator: Collaborator,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// A head carrying tools that move together.
///
/// The head owns its soft limits and tool list. The driver and observers
/// belong to the machine and are looked up on every call.
pub struct Head {
    name: String,
    reference_tool: ReferenceTool,
    soft_limits: SoftLimits,
    safe_z: Length,
    tools: ToolRegistry,
    machine: Arc<dyn MachineResolver>,
}

impl Head {
    pub fn new(name: impl Into<String>, machine: Arc<dyn MachineResolver>) -> Self {
        Self {
            name: name.into(),
            reference_tool: ReferenceTool::DefaultCamera,
            soft_limits: SoftLimits::default(),
            safe_z: Length::new::<millimeter>(0.0),
            tools: ToolRegistry::new(),
            machine,
        }
    }

    pub fn with_reference_tool(mut self, reference_tool: ReferenceTool) -> Self {
        self.reference_tool = reference_tool;
        self
    }

    pub fn with_soft_limits(mut self, soft_limits: SoftLimits) -> Self {
        self.soft_limits = soft_limits;
        self
    }

    pub fn with_safe_z(mut self, safe_z: Length) -> Self {
        self.safe_z = safe_z;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn soft_limits(&self) -> &SoftLimits {
        &self.soft_limits
    }

    /// Replace the limit policy. Only call with no motion in flight.
    pub fn apply_soft_limits(&mut self, soft_limits: SoftLimits) {
        self.soft_limits = soft_limits;
    }

    pub fn safe_z(&self) -> Length {
        self.safe_z
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        self.tools.add(tool)
    }

    pub fn remove_tool(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Tool whose frame the soft limits are expressed in
    pub fn reference_tool(&self) -> Result<&Arc<dyn Tool>, HeadError> {
        let tool = match &self.reference_tool {
            ReferenceTool::DefaultCamera => self.tools.default_camera(),
            ReferenceTool::Named(name) => self.tools.get(name),
        };
        tool.ok_or_else(|| self.unresolved(Collaborator::ReferenceTool(self.reference_tool.clone())))
    }

    pub(crate) fn driver(&self) -> Result<Arc<dyn MotionDriver>, HeadError> {
        self.machine
            .driver()
            .ok_or_else(|| self.unresolved(Collaborator::MotionDriver))
    }

    fn unresolved(&self, collaborator: Collaborator) -> HeadError {
        HeadError::Unresolved {
            head: self.name.clone(),
            collaborator,
        }
    }
}

impl fmt::Debug for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Head")
            .field("name", &self.name)
            .field("reference_tool", &self.reference_tool)
            .field("soft_limits", &self.soft_limits)
            .field("safe_z", &self.safe_z)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
