use std::sync::Mutex;

use crate::equipment::Head;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Activity observer failed: {0}")]
pub struct ObserverError(pub String);

/// Told about every completed homing or move on a head.
///
/// Notification happens after the motion already took place, so a failing
/// observer never fails the motion.
pub trait ActivityObserver: Send + Sync {
    fn head_activity(&self, head: &Head) -> Result<(), ObserverError>;
}

/// Observer that remembers which heads had activity, in order
#[derive(Debug, Default)]
pub struct ActivityLog {
    events: Mutex<Vec<String>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }
}

impl ActivityObserver for ActivityLog {
    fn head_activity(&self, head: &Head) -> Result<(), ObserverError> {
        self.events
            .lock()
            .map_err(|_| ObserverError("activity log poisoned".into()))?
            .push(head.name().to_string());
        Ok(())
    }
}
