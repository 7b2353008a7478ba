//! Device metrics - screen dimensions behind the module lifecycle gate.

use crossterm::terminal;

use super::{ModuleHandle, StaleModuleError};
use crate::types::Size;

/// Fallback when the terminal size cannot be queried.
const DEFAULT_SIZE: Size = Size { width: 80, height: 24 };

// =============================================================================
// DeviceMetrics
// =============================================================================

/// Reports the host screen size.
///
/// Queries go through [`ModuleHandle::check_active`] first; once the
/// module is invalidated every query fails with [`StaleModuleError`]
/// until a fresh instance is acquired.
#[derive(Debug)]
pub struct DeviceMetrics {
    handle: ModuleHandle,
    override_size: Option<Size>,
}

impl DeviceMetrics {
    pub fn new() -> Self {
        Self { handle: ModuleHandle::new("device-metrics"), override_size: None }
    }

    /// Metrics instance that reports a fixed size instead of querying the
    /// terminal. Deterministic, for tests and headless hosts.
    pub fn with_fixed_size(size: Size) -> Self {
        Self { handle: ModuleHandle::new("device-metrics"), override_size: Some(size) }
    }

    pub fn handle(&self) -> &ModuleHandle {
        &self.handle
    }

    /// Current screen size in cells. Falls back to 80x24 when the
    /// terminal cannot be queried.
    pub fn screen_size(&self) -> Result<Size, StaleModuleError> {
        self.handle.check_active()?;

        if let Some(size) = self.override_size {
            return Ok(size);
        }

        match terminal::size() {
            Ok((width, height)) => Ok(Size { width, height }),
            Err(_) => Ok(DEFAULT_SIZE),
        }
    }

    /// Tear down. The instance answers no further queries.
    pub fn invalidate(&self) {
        self.handle.invalidate();
        self.handle.finish_invalidation();
    }
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
