//! Surface - Binding between one native view subtree and one
//! remotely-computed description.
//!
//! A surface owns its view exclusively; the view holds only a non-owning
//! back edge (a registry table entry) that is cleared on unmount. Remote
//! commits flow in through [`deliver_commit`]; native events flow through
//! [`deliver_key`]; both are dropped silently once the surface is gone.

pub mod registry;

pub use registry::{
    deliver_commit, deliver_key, is_mounted, mount, mounted_count, mounted_surfaces,
    reset_surfaces, root_id, surface_for_view, unmount, view_for, with_view, MountError,
};

use crate::types::{Selection, Size, StyledText};

// =============================================================================
// Surface Handle
// =============================================================================

/// Handle to one mounted surface.
///
/// Cheap to copy; identity only. Whether the surface is still live is a
/// registry question ([`is_mounted`]), not a property of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Surface {
    index: usize,
}

impl Surface {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    /// The arena index of this surface.
    pub fn index(&self) -> usize {
        self.index
    }
}

// =============================================================================
// Commit
// =============================================================================

/// One immutable snapshot of remotely-computed state for a root.
///
/// Delivered asynchronously, at most once per counter value, and not
/// necessarily in counter order - ordering is restored by the event-count
/// comparison at the point of application.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// The description root this commit belongs to.
    pub root_id: String,
    /// Computed attributed text.
    pub text: StyledText,
    /// Selection to apply atomically with the text.
    pub selection: Selection,
    /// The latest local event count the remote layer had observed when it
    /// computed this commit.
    pub event_count: u64,
    /// Computed frame geometry for the view.
    pub size: Size,
}
