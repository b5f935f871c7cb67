//! Motion requests for a head
//!
//! Targets are given in the moving tool's own frame. Soft limits are
//! authored in the reference tool's frame, so the target is projected into
//! that frame for checking only: the driver always receives the target
//! exactly as the caller gave it.

use tracing::{debug, trace, warn};

use crate::equipment::head::{Head, HeadError};
use crate::equipment::tool::Tool;
use crate::kinematics::{Pose, tool_to_reference};
use crate::limits::LimitViolation;
use crate::types::DisplayLength;

impl Head {
    /// Home the head, then report the activity
    pub fn home(&self) -> Result<(), HeadError> {
        debug!(head = %self.name, "home");
        let driver = self.driver()?;
        driver.home(self)?;
        self.fire_head_activity();
        Ok(())
    }

    /// Move `tool`'s working point to `target` at `speed`.
    ///
    /// With soft limits enabled the move is rejected outright, before the
    /// driver sees anything, when the reference tool would land outside the
    /// box on X or Y. Nothing is clamped.
    pub fn move_to(&self, tool: &dyn Tool, target: &Pose, speed: f64) -> Result<(), HeadError> {
        debug!(head = %self.name, tool = tool.name(), %target, speed, "move_to");
        let driver = self.driver()?;

        if self.soft_limits.is_enabled() {
            self.check_soft_limits(tool, target)?;
        }

        driver.move_to(tool, target, speed)?;
        self.fire_head_activity();
        Ok(())
    }

    /// Raise every nozzle, camera and actuator to the head's safe Z,
    /// keeping X, Y and rotation where they are
    pub fn move_to_safe_z(&self, speed: f64) -> Result<(), HeadError> {
        debug!(head = %self.name, speed, safe_z = %DisplayLength(self.safe_z), "move_to_safe_z");
        let driver = self.driver()?;

        let tools = self
            .tools
            .nozzles()
            .chain(self.tools.cameras())
            .chain(self.tools.actuators());
        for tool in tools {
            let current = driver.location(tool.as_ref())?;
            let safe_z = current.units().value_of(self.safe_z);
            self.move_to(tool.as_ref(), &current.with_z(safe_z), speed)?;
        }
        Ok(())
    }

    fn check_soft_limits(&self, tool: &dyn Tool, target: &Pose) -> Result<(), HeadError> {
        let reference_offset = self.reference_tool()?.offset();
        let projected = tool_to_reference(target, &tool.offset(), &reference_offset);
        trace!(head = %self.name, tool = tool.name(), %projected, "reference frame target");

        self.soft_limits.check(&projected).map_err(|violation| match violation {
            LimitViolation::Malformed { axis, min, max } => {
                warn!(head = %self.name, %axis, min, max, "malformed soft limits");
                HeadError::MalformedLimitPolicy {
                    head: self.name.clone(),
                    axis,
                    min,
                    max,
                }
            }
            violation @ LimitViolation::OutOfBounds { .. } => {
                warn!(head = %self.name, tool = tool.name(), %target, %violation, "outside soft limits");
                HeadError::OutOfSoftLimits {
                    tool: tool.name().to_string(),
                    target: *target,
                    head: self.name.clone(),
                    violation,
                }
            }
        })
    }

    fn fire_head_activity(&self) {
        for observer in self.machine.observers() {
            if let Err(e) = observer.head_activity(self) {
                warn!(head = %self.name, error = %e, "head activity notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::equipment::{MountedTool, ReferenceTool};
    use crate::kinematics::Axis;
    use crate::limits::SoftLimits;
    use crate::machine::*;
    use crate::types::*;
    use approx::assert_relative_eq;

    fn mm(x: f64, y: f64, z: f64, r: f64) -> Pose {
        Pose::new(LengthUnit::Millimeters, x, y, z, r)
    }

    struct FailingObserver;

    impl ActivityObserver for FailingObserver {
        fn head_activity(&self, _head: &Head) -> Result<(), ObserverError> {
            Err(ObserverError("listener went away".into()))
        }
    }

    struct Rig {
        head: Head,
        driver: Arc<NullDriver>,
        log: Arc<ActivityLog>,
        bindings: Arc<MachineBindings>,
    }

    impl Rig {
        fn nozzle(&self) -> Arc<dyn Tool> {
            self.head.tool("N1").unwrap().clone()
        }
    }

    fn rig(limits: SoftLimits) -> Rig {
        let driver = Arc::new(NullDriver::new());
        let log = Arc::new(ActivityLog::new());
        let bindings = Arc::new(MachineBindings::with_driver(driver.clone()));
        bindings.add_observer(log.clone());

        let mut head = Head::new("H1", bindings.clone()).with_soft_limits(limits);
        head.add_tool(Arc::new(MountedTool::camera("Top", mm(0.0, 0.0, 0.0, 0.0)))).unwrap();
        head.add_tool(Arc::new(MountedTool::nozzle("N1", mm(-10.0, 0.0, 0.0, 0.0)))).unwrap();
        Rig { head, driver, log, bindings }
    }

    fn board_limits() -> SoftLimits {
        SoftLimits::new(mm(0.0, 0.0, -100.0, -180.0), mm(100.0, 100.0, 0.0, 180.0))
    }

    #[test]
    fn test_home_notifies() {
        let rig = rig(board_limits());
        rig.head.home().unwrap();

        assert_eq!(
            rig.driver.commands(),
            vec![DriverCommand::Home { head: "H1".into() }]
        );
        assert_eq!(rig.log.events(), vec!["H1".to_string()]);
    }

    #[test]
    fn test_home_failure_skips_notification() {
        let rig = rig(board_limits());
        rig.driver.fail_next(DriverError::Fault("limit switch stuck".into()));

        let err = rig.head.home().unwrap_err();

        assert!(matches!(err, HeadError::Driver(DriverError::Fault(ref m)) if m == "limit switch stuck"));
        assert_eq!(rig.log.count(), 0);
    }

    #[test]
    fn test_home_without_driver() {
        let rig = rig(board_limits());
        rig.bindings.unbind();

        let err = rig.head.home().unwrap_err();
        assert!(matches!(err, HeadError::Unresolved { .. }));
    }

    #[test]
    fn test_move_within_limits() {
        let rig = rig(board_limits());
        let nozzle = rig.nozzle();

        rig.head.move_to(nozzle.as_ref(), &mm(85.0, 50.0, -10.0, 0.0), 1.0).unwrap();

        assert_eq!(
            rig.driver.moves(),
            vec![("N1".to_string(), mm(85.0, 50.0, -10.0, 0.0), 1.0)]
        );
        assert_eq!(rig.log.count(), 1);
    }

    #[test]
    fn test_move_outside_limits_never_reaches_driver() {
        let rig = rig(board_limits());
        let nozzle = rig.nozzle();

        let err = rig
            .head
            .move_to(nozzle.as_ref(), &mm(95.0, 50.0, -10.0, 0.0), 1.0)
            .unwrap_err();

        match err {
            HeadError::OutOfSoftLimits { tool, target, head, violation } => {
                assert_eq!(tool, "N1");
                assert_eq!(target, mm(95.0, 50.0, -10.0, 0.0));
                assert_eq!(head, "H1");
                assert!(matches!(violation, LimitViolation::OutOfBounds { axis: Axis::X, value, .. } if value == 105.0));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(rig.driver.commands().is_empty());
        assert_eq!(rig.log.count(), 0);
    }

    #[test]
    fn test_error_message_names_tool_target_and_head() {
        let rig = rig(board_limits());
        let nozzle = rig.nozzle();

        let err = rig
            .head
            .move_to(nozzle.as_ref(), &mm(50.0, 150.0, 0.0, 0.0), 1.0)
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Can't move N1 to (50.000, 150.000, 0.000, 0.000 mm)"));
        assert!(message.contains("head H1"));
    }

    #[test]
    fn test_disabled_limits_skip_reference_lookup() {
        let rig = rig(SoftLimits::disabled(LengthUnit::Millimeters));
        let mut head = rig.head;
        head.remove_tool("Top");
        let nozzle = head.tool("N1").unwrap().clone();

        head.move_to(nozzle.as_ref(), &mm(-5000.0, 9000.0, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(rig.driver.moves().len(), 1);
    }

    #[test]
    fn test_missing_reference_tool_with_limits() {
        let rig = rig(board_limits());
        let head = rig.head.with_reference_tool(ReferenceTool::Named("Bottom".into()));
        let nozzle = head.tool("N1").unwrap().clone();

        let err = head.move_to(nozzle.as_ref(), &mm(50.0, 50.0, 0.0, 0.0), 1.0).unwrap_err();

        assert!(matches!(err, HeadError::Unresolved { .. }));
        assert!(rig.driver.commands().is_empty());
    }

    #[test]
    fn test_malformed_limits_reject_move() {
        let rig = rig(SoftLimits::new(mm(100.0, 0.0, 0.0, 0.0), mm(0.0, 100.0, 0.0, 0.0)));
        let nozzle = rig.nozzle();

        let err = rig.head.move_to(nozzle.as_ref(), &mm(40.0, 50.0, 0.0, 0.0), 1.0).unwrap_err();

        assert!(matches!(err, HeadError::MalformedLimitPolicy { axis: Axis::X, .. }));
        assert!(rig.driver.commands().is_empty());
    }

    #[test]
    fn test_inverted_y_limits_reject_any_target() {
        let rig = rig(SoftLimits::new(mm(0.0, 100.0, 0.0, 0.0), mm(100.0, 0.0, 0.0, 0.0)));
        let nozzle = rig.nozzle();

        // Out of bounds on X too; the broken Y box still wins
        let err = rig.head.move_to(nozzle.as_ref(), &mm(500.0, 50.0, 0.0, 0.0), 1.0).unwrap_err();

        match err {
            HeadError::MalformedLimitPolicy { head, axis, min, max } => {
                assert_eq!(head, "H1");
                assert_eq!(axis, Axis::Y);
                assert_eq!(min, 100.0);
                assert_eq!(max, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(rig.driver.commands().is_empty());
        assert_eq!(rig.log.count(), 0);
    }

    #[test]
    fn test_nan_limit_is_malformed() {
        let rig = rig(SoftLimits::new(mm(0.0, 0.0, 0.0, 0.0), mm(f64::NAN, 100.0, 0.0, 0.0)));
        let nozzle = rig.nozzle();

        let err = rig.head.move_to(nozzle.as_ref(), &mm(500.0, 50.0, 0.0, 0.0), 1.0).unwrap_err();

        assert!(matches!(err, HeadError::MalformedLimitPolicy { axis: Axis::X, .. }));
        assert!(rig.driver.commands().is_empty());
    }

    #[test]
    fn test_driver_error_passes_through_unchanged() {
        let rig = rig(board_limits());
        let nozzle = rig.nozzle();
        rig.driver.fail_next(DriverError::Communication("timeout on /dev/ttyUSB0".into()));

        let err = rig.head.move_to(nozzle.as_ref(), &mm(50.0, 50.0, 0.0, 0.0), 1.0).unwrap_err();

        match err {
            HeadError::Driver(e) => {
                assert_eq!(e, DriverError::Communication("timeout on /dev/ttyUSB0".into()))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(rig.log.count(), 0);
    }

    #[test]
    fn test_observer_failure_is_swallowed() {
        let rig = rig(board_limits());
        rig.bindings.add_observer(Arc::new(FailingObserver));
        let nozzle = rig.nozzle();

        rig.head.move_to(nozzle.as_ref(), &mm(50.0, 50.0, 0.0, 0.0), 1.0).unwrap();

        assert_eq!(rig.driver.moves().len(), 1);
        assert_eq!(rig.log.count(), 1);
    }

    #[test]
    fn test_home_observer_failure_is_swallowed() {
        let rig = rig(board_limits());
        // Failing observer first, so the log is only reached if the failure is swallowed
        rig.bindings.unbind();
        rig.bindings.bind_driver(rig.driver.clone());
        rig.bindings.add_observer(Arc::new(FailingObserver));
        rig.bindings.add_observer(rig.log.clone());

        rig.head.home().unwrap();

        assert_eq!(
            rig.driver.commands(),
            vec![DriverCommand::Home { head: "H1".into() }]
        );
        assert_eq!(rig.log.events(), vec!["H1".to_string()]);
    }

    #[test]
    fn test_move_to_safe_z_raises_every_tool() {
        let rig = rig(SoftLimits::disabled(LengthUnit::Millimeters));
        let head = rig.head.with_safe_z(Length::new::<millimeter>(5.0));
        let nozzle = head.tool("N1").unwrap().clone();
        head.move_to(nozzle.as_ref(), &mm(40.0, 30.0, -12.0, 90.0), 1.0).unwrap();

        head.move_to_safe_z(0.5).unwrap();

        let moves = rig.driver.moves();
        // Nozzles first, then cameras
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[1].0, "N1");
        assert_relative_eq!(moves[1].1.x(), 40.0);
        assert_relative_eq!(moves[1].1.y(), 30.0);
        assert_relative_eq!(moves[1].1.z(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(moves[1].1.rotation(), 90.0);
        assert_eq!(moves[1].2, 0.5);
        assert_eq!(moves[2].0, "Top");
        assert_relative_eq!(moves[2].1.z(), 5.0, epsilon = 1e-9);
        assert_eq!(rig.log.count(), 3);
    }

    #[test]
    fn test_move_to_safe_z_stops_on_driver_error() {
        let rig = rig(SoftLimits::disabled(LengthUnit::Millimeters));
        rig.driver.fail_next(DriverError::Fault("z stall".into()));

        let err = rig.head.move_to_safe_z(1.0).unwrap_err();

        assert!(matches!(err, HeadError::Driver(DriverError::Fault(_))));
        assert!(rig.driver.moves().is_empty());
    }
}
