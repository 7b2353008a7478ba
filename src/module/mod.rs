//! Module Lifecycle - Teardown contract for externally-registered services.
//!
//! A module moves `Active → Invalidating → Invalidated` exactly once.
//! `invalidate()` is idempotent - calling it again while tearing down or
//! after teardown is a no-op, not an error. Work attempted against a
//! module that has left `Active` fails with [`StaleModuleError`]; the
//! caller recovers by re-acquiring the module, it does not retry the
//! handle.

use std::cell::Cell;

use thiserror::Error;

pub mod device_metrics;

pub use device_metrics::DeviceMetrics;

// =============================================================================
// State Machine
// =============================================================================

/// Lifecycle state of a module handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Accepting work.
    Active,
    /// `invalidate()` called; cleanup in progress.
    Invalidating,
    /// Cleanup complete. Terminal.
    Invalidated,
}

/// Operation attempted against a module that is no longer active.
/// Recoverable: the caller must re-acquire the module.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("module '{module}' is {state:?}")]
pub struct StaleModuleError {
    pub module: &'static str,
    pub state: ModuleState,
}

// =============================================================================
// Handle
// =============================================================================

/// Lifecycle guard owned by a module implementation.
///
/// `Cell`-based: state checks and transitions happen on the UI-affinity
/// thread like everything else in this crate.
#[derive(Debug)]
pub struct ModuleHandle {
    name: &'static str,
    state: Cell<ModuleState>,
}

impl ModuleHandle {
    pub fn new(name: &'static str) -> Self {
        Self { name, state: Cell::new(ModuleState::Active) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> ModuleState {
        self.state.get()
    }

    /// Gate an operation on the handle still being active.
    pub fn check_active(&self) -> Result<(), StaleModuleError> {
        match self.state.get() {
            ModuleState::Active => Ok(()),
            state => Err(StaleModuleError { module: self.name, state }),
        }
    }

    /// Begin teardown. Idempotent: a handle already invalidating or
    /// invalidated is left as it is.
    pub fn invalidate(&self) {
        if self.state.get() == ModuleState::Active {
            log::debug!("invalidating module '{}'", self.name);
            self.state.set(ModuleState::Invalidating);
        }
    }

    /// Mark cleanup complete. Only transitions `Invalidating →
    /// Invalidated`; calling it in any other state is a no-op.
    pub fn finish_invalidation(&self) {
        if self.state.get() == ModuleState::Invalidating {
            self.state.set(ModuleState::Invalidated);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let handle = ModuleHandle::new("test");
        assert_eq!(handle.state(), ModuleState::Active);
        assert!(handle.check_active().is_ok());

        handle.invalidate();
        assert_eq!(handle.state(), ModuleState::Invalidating);

        handle.finish_invalidation();
        assert_eq!(handle.state(), ModuleState::Invalidated);
    }

    #[test]
    fn test_invalidate_idempotent() {
        let handle = ModuleHandle::new("test");
        handle.invalidate();
        handle.invalidate();
        assert_eq!(handle.state(), ModuleState::Invalidating);

        handle.finish_invalidation();
        handle.invalidate();
        assert_eq!(handle.state(), ModuleState::Invalidated);
    }

    #[test]
    fn test_operations_fail_once_invalidating() {
        let handle = ModuleHandle::new("metrics");
        handle.invalidate();

        let err = handle.check_active().unwrap_err();
        assert_eq!(err.module, "metrics");
        assert_eq!(err.state, ModuleState::Invalidating);

        handle.finish_invalidation();
        let err = handle.check_active().unwrap_err();
        assert_eq!(err.state, ModuleState::Invalidated);
    }

    #[test]
    fn test_finish_without_invalidate_is_noop() {
        let handle = ModuleHandle::new("test");
        handle.finish_invalidation();
        assert_eq!(handle.state(), ModuleState::Active);
    }
}
