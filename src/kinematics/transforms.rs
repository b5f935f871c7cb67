//! Conversions between a tool's working-point frame and the reference frame.
//!
//! Every tool is mounted at a fixed offset from the head's reference tool.
//! Subtracting a tool's offset from its target gives the head position;
//! adding the reference tool's offset to that gives where the reference
//! tool lands. Offsets are converted into the target's units first.

use crate::kinematics::pose::{Frame, Pose};

/// Where the reference tool lands when `target` is reached by the tool with
/// `tool_offset`
pub fn tool_to_reference(target: &Pose, tool_offset: &Pose, reference_offset: &Pose) -> Pose {
    (*target - *tool_offset + *reference_offset).with_frame(Frame::Reference)
}

/// Inverse of [`tool_to_reference`]
pub fn reference_to_tool(reference: &Pose, tool_offset: &Pose, reference_offset: &Pose) -> Pose {
    (*reference - *reference_offset + *tool_offset).with_frame(Frame::Tool)
}
