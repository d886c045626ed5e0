use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scheduler state for the periodic listing sync. Transitions are
/// `Idle -> Running -> Idle`; a concurrent start is a typed error rather
/// than a racy module-level boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Running,
}

#[derive(Debug, thiserror::Error)]
#[error("a sync pass is already running")]
pub struct SyncAlreadyRunning;

/// Mutual exclusion for full sync passes plus the pacing delay applied
/// between calls to the same external service within a pass.
#[derive(Debug, Clone)]
pub struct SyncCoordinator {
    phase: Arc<Mutex<SyncPhase>>,
    item_delay: Duration,
}

impl SyncCoordinator {
    pub fn new(item_delay: Duration) -> Self {
        Self {
            phase: Arc::new(Mutex::new(SyncPhase::Idle)),
            item_delay,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().expect("sync phase mutex poisoned")
    }

    pub fn item_delay(&self) -> Duration {
        self.item_delay
    }

    /// Guarded start: succeeds only from `Idle`. The returned permit holds
    /// the `Running` state and restores `Idle` when dropped, so an early
    /// return or panic in the sync body cannot wedge the coordinator.
    pub fn try_begin(&self) -> Result<SyncPermit, SyncAlreadyRunning> {
        let mut phase = self.phase.lock().expect("sync phase mutex poisoned");
        match *phase {
            SyncPhase::Running => Err(SyncAlreadyRunning),
            SyncPhase::Idle => {
                *phase = SyncPhase::Running;
                Ok(SyncPermit {
                    phase: Arc::clone(&self.phase),
                })
            }
        }
    }
}

#[derive(Debug)]
pub struct SyncPermit {
    phase: Arc<Mutex<SyncPhase>>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        if let Ok(mut phase) = self.phase.lock() {
            *phase = SyncPhase::Idle;
        }
    }
}
