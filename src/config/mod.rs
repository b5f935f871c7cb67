//! Head configuration files
//!
//! A head is described in TOML or JSON:
//!
//! ```toml
//! name = "H1"
//! reference_tool = "default-camera"
//! safe_z = { value = 0.0, unit = "mm" }
//!
//! [soft_limits]
//! enabled = true
//! unit = "mm"
//! min = [0.0, 0.0, -100.0, -180.0]
//! max = [400.0, 400.0, 0.0, 180.0]
//!
//! [[tools]]
//! name = "N1"
//! kind = "nozzle"
//! unit = "mm"
//! offset = [-10.0, 0.0, 0.0, 0.0]
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::equipment::{Head, MountedTool, ReferenceTool, ToolError, ToolKind};
use crate::kinematics::Pose;
use crate::limits::SoftLimits;
use crate::machine::MachineResolver;
use crate::types::*;

/// Selector value meaning "first mounted camera"
pub const DEFAULT_CAMERA: &str = "default-camera";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid unit: {0}")]
    Unit(#[from] UnitError),

    #[error("Invalid tool: {0}")]
    Tool(#[from] ToolError),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadConfig {
    pub name: String,

    #[serde(default = "default_reference_tool")]
    pub reference_tool: String,

    #[serde(default)]
    pub safe_z: Option<LengthValue>,

    #[serde(default)]
    pub soft_limits: Option<SoftLimitsConfig>,

    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftLimitsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_unit")]
    pub unit: String,

    /// `[x, y, z, rotation]` in the reference tool's frame
    pub min: [f64; 4],

    pub max: [f64; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,

    pub kind: ToolKind,

    #[serde(default = "default_unit")]
    pub unit: String,

    /// `[x, y, z, rotation]` from the reference tool
    #[serde(default)]
    pub offset: [f64; 4],
}

fn default_reference_tool() -> String {
    DEFAULT_CAMERA.to_string()
}

fn default_unit() -> String {
    "mm".to_string()
}

impl HeadConfig {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn reference_tool(&self) -> ReferenceTool {
        if self.reference_tool == DEFAULT_CAMERA {
            ReferenceTool::DefaultCamera
        } else {
            ReferenceTool::Named(self.reference_tool.clone())
        }
    }

    /// Limit policy, disabled when the section is absent
    pub fn soft_limits(&self) -> Result<SoftLimits, ConfigError> {
        let Some(limits) = &self.soft_limits else {
            return Ok(SoftLimits::default());
        };
        let units: LengthUnit = limits.unit.parse()?;
        let mut policy = SoftLimits::new(
            Pose::from_array(units, limits.min),
            Pose::from_array(units, limits.max),
        );
        policy.enabled = limits.enabled;
        Ok(policy)
    }

    pub fn safe_z(&self) -> Result<Length, ConfigError> {
        match &self.safe_z {
            Some(value) => Ok(value.to_length()?),
            None => Ok(Length::new::<millimeter>(0.0)),
        }
    }

    /// Build the head with its tools mounted. Collaborators come from
    /// `machine` whenever they become available.
    pub fn build(&self, machine: Arc<dyn MachineResolver>) -> Result<Head, ConfigError> {
        let mut head = Head::new(&self.name, machine)
            .with_reference_tool(self.reference_tool())
            .with_soft_limits(self.soft_limits()?)
            .with_safe_z(self.safe_z()?);

        for tool in &self.tools {
            head.add_tool(Arc::new(tool.build()?))?;
        }
        Ok(head)
    }
}

impl ToolConfig {
    pub fn build(&self) -> Result<MountedTool, ConfigError> {
        let units: LengthUnit = self.unit.parse()?;
        Ok(MountedTool::new(&self.name, self.kind, Pose::offset(units, self.offset)))
    }
}
