use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::machine::{ActivityObserver, MotionDriver};

/// Late-bound access to the machine a head belongs to.
///
/// Heads exist before configuration finishes loading, so every lookup may
/// come back empty.
pub trait MachineResolver: Send + Sync {
    fn driver(&self) -> Option<Arc<dyn MotionDriver>>;

    fn observers(&self) -> Vec<Arc<dyn ActivityObserver>>;
}

#[derive(Default)]
struct Bindings {
    driver: Option<Arc<dyn MotionDriver>>,
    observers: Vec<Arc<dyn ActivityObserver>>,
}

/// Resolver filled in once configuration has loaded.
///
/// Rebinding while a move is in flight is the caller's problem; the lock
/// only keeps the swap itself sound.
#[derive(Default)]
pub struct MachineBindings {
    inner: RwLock<Bindings>,
}

impl MachineBindings {
    /// Nothing bound yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound to `driver` with no observers
    pub fn with_driver(driver: Arc<dyn MotionDriver>) -> Self {
        let bindings = Self::new();
        bindings.bind_driver(driver);
        bindings
    }

    pub fn bind_driver(&self, driver: Arc<dyn MotionDriver>) {
        self.write().driver = Some(driver);
    }

    pub fn add_observer(&self, observer: Arc<dyn ActivityObserver>) {
        self.write().observers.push(observer);
    }

    /// Drop every binding, as before configuration load
    pub fn unbind(&self) {
        *self.write() = Bindings::default();
    }

    pub fn is_bound(&self) -> bool {
        self.read().driver.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Bindings> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Bindings> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MachineResolver for MachineBindings {
    fn driver(&self) -> Option<Arc<dyn MotionDriver>> {
        self.read().driver.clone()
    }

    fn observers(&self) -> Vec<Arc<dyn ActivityObserver>> {
        self.read().observers.clone()
    }
}
