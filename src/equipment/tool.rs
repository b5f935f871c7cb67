use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::kinematics::{Frame, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Nozzle,
    Camera,
    Actuator,
    PasteDispenser,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolKind::Nozzle => "nozzle",
            ToolKind::Camera => "camera",
            ToolKind::Actuator => "actuator",
            ToolKind::PasteDispenser => "paste dispenser",
        };
        f.write_str(name)
    }
}

/// Anything mounted on a head that can be moved to a position
pub trait Tool: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ToolKind;

    /// Displacement of this tool's working point from the reference tool's
    fn offset(&self) -> Pose;
}

/// Plain-data tool with a fixed offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountedTool {
    pub name: String,
    pub kind: ToolKind,
    offset: Pose,
}

impl MountedTool {
    pub fn new(name: impl Into<String>, kind: ToolKind, offset: Pose) -> Self {
        Self {
            name: name.into(),
            kind,
            offset: offset.with_frame(Frame::Offset),
        }
    }

    pub fn nozzle(name: impl Into<String>, offset: Pose) -> Self {
        Self::new(name, ToolKind::Nozzle, offset)
    }

    pub fn camera(name: impl Into<String>, offset: Pose) -> Self {
        Self::new(name, ToolKind::Camera, offset)
    }

    pub fn actuator(name: impl Into<String>, offset: Pose) -> Self {
        Self::new(name, ToolKind::Actuator, offset)
    }
}

impl Tool for MountedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn offset(&self) -> Pose {
        self.offset
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("A tool named {0} is already mounted")]
    DuplicateTool(String),
}

/// Tools mounted on a head, in mounting order
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Mount a tool. Names are unique per head.
    pub fn add(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        let index = self.tools.iter().position(|t| t.name() == name)?;
        Some(self.tools.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn offset_of(&self, name: &str) -> Option<Pose> {
        self.get(name).map(|t| t.offset())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn of_kind(&self, kind: ToolKind) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter().filter(move |t| t.kind() == kind)
    }

    pub fn nozzles(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.of_kind(ToolKind::Nozzle)
    }

    pub fn cameras(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.of_kind(ToolKind::Camera)
    }

    pub fn actuators(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.of_kind(ToolKind::Actuator)
    }

    pub fn paste_dispensers(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.of_kind(ToolKind::PasteDispenser)
    }

    /// First mounted camera
    pub fn default_camera(&self) -> Option<&Arc<dyn Tool>> {
        self.cameras().next()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
