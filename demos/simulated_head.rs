use std::sync::Arc;

use head_core::config::HeadConfig;
use head_core::kinematics::Pose;
use head_core::machine::{ActivityLog, MachineBindings, MotionDriver, NullDriver};
use head_core::types::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const HEAD: &str = r#"
name = "H1"
safe_z = { value = 0.0, unit = "mm" }

[soft_limits]
enabled = true
unit = "mm"
min = [0.0, 0.0, -100.0, -180.0]
max = [100.0, 100.0, 0.0, 180.0]

[[tools]]
name = "Top"
kind = "camera"

[[tools]]
name = "N1"
kind = "nozzle"
offset = [-10.0, 0.0, 0.0, 0.0]
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Head exists before the machine is configured
    let bindings = Arc::new(MachineBindings::new());
    let config = match std::env::args().nth(1) {
        Some(path) => HeadConfig::load(path)?,
        None => HeadConfig::from_toml_str(HEAD)?,
    };
    let head = config.build(bindings.clone())?;

    if let Err(e) = head.home() {
        info!("Before configuration load: {}", e);
    }

    let driver = Arc::new(NullDriver::new());
    let log = Arc::new(ActivityLog::new());
    bindings.bind_driver(driver.clone());
    bindings.add_observer(log.clone());

    head.home()?;

    let Some(nozzle) = head.tools().nozzles().next().cloned() else {
        info!("Head {} has no nozzles", head);
        return Ok(());
    };

    for target in [
        Pose::new(LengthUnit::Millimeters, 85.0, 50.0, -10.0, 0.0),
        Pose::new(LengthUnit::Millimeters, 95.0, 50.0, -10.0, 0.0),
        Pose::new(LengthUnit::Inches, 2.0, 2.0, -0.25, 45.0),
    ] {
        match head.move_to(nozzle.as_ref(), &target, 1.0) {
            Ok(()) => info!("Moved {} to {}", nozzle.name(), target),
            Err(e) => info!("Rejected: {}", e),
        }
    }

    head.move_to_safe_z(1.0)?;

    for tool in head.tools().iter() {
        info!("{} ({}) at {}", tool.name(), tool.kind(), driver.location(tool.as_ref())?);
    }
    info!("{} driver commands, {} activity notifications", driver.commands().len(), log.count());
    Ok(())
}
