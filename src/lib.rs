//! # surface-host
//!
//! Host runtime for remotely-computed UIs: surface mounting and text
//! input reconciliation.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A remote layer computes UI descriptions asynchronously and delivers
//! them as counter-tagged commits. The host owns the native controls the
//! user actually edits. Because delivery is asynchronous, a commit can
//! arrive after the user has typed past the state it was computed from;
//! the event-count comparison at the point of application decides, and
//! local edits always win:
//! ```text
//! Commit (remote) → Surface registry → TextStateView → staleness check → control
//! Key event ──────────────────────────→ TextStateView → sequencer.next() → callbacks
//! ```
//!
//! Everything runs on one UI-affinity thread. Counter comparison is the
//! only ordering mechanism; there are no locks.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Selection, StyledText, Size, EdgeInsets)
//! - [`state`] - Event sequencer and the staleness predicate
//! - [`input`] - Text state reconciliation, key handling, callbacks
//! - [`surface`] - Mount/unmount registry and commit delivery
//! - [`bridge`] - Property sets onto native control state
//! - [`module`] - Module lifecycle and device metrics

pub mod bridge;
pub mod input;
pub mod module;
pub mod state;
pub mod surface;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use state::{is_stale, EventSequencer};

pub use input::{
    apply_key, ensure_caret_visible, BackedTextInput, BufferedTextInput, InputBehavior,
    TextInputCallbacks, TextInputDelta, TextStateView,
};

pub use surface::{
    deliver_commit, deliver_key, is_mounted, mount, mounted_count, mounted_surfaces,
    reset_surfaces, root_id, surface_for_view, unmount, view_for, with_view, Commit,
    MountError, Surface,
};

pub use bridge::{apply_props, TextInputProps};

pub use module::{
    DeviceMetrics, ModuleHandle, ModuleState, StaleModuleError,
};
