//! Text Input Events - Callback sinks emitted by `TextStateView`.
//!
//! Each callback is a one-shot notification, not a subscription stream.
//! Hosts treat the `event_count` carried by `on_change` as opaque and
//! non-decreasing; the remote layer must echo it back with later commits
//! so stale ones can be dropped.

use std::rc::Rc;

use crate::types::{ScrollOffset, Selection, Size};

// =============================================================================
// Callback Types
// =============================================================================

/// Text change callback, carrying the new text and its event count.
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows cloning callbacks
/// into closures without ownership issues.
pub type ChangeCallback = Rc<dyn Fn(&str, u64)>;

/// Selection change callback.
pub type SelectionCallback = Rc<dyn Fn(Selection)>;

/// Content size change callback.
pub type ContentSizeCallback = Rc<dyn Fn(Size)>;

/// Incremental text input callback (the delta of one edit).
pub type TextInputCallback = Rc<dyn Fn(&TextInputDelta)>;

/// Scroll callback with the current offsets.
pub type ScrollCallback = Rc<dyn Fn(ScrollOffset)>;

/// Submit callback with the text at submission time.
pub type SubmitCallback = Rc<dyn Fn(&str)>;

// =============================================================================
// Text Input Delta
// =============================================================================

/// The incremental payload of one local edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputDelta {
    /// Text that was inserted (empty for pure deletions).
    pub text: String,
    /// Full text before the edit.
    pub previous_text: String,
    /// The range of the previous text that the edit replaced.
    pub range: Selection,
}

// =============================================================================
// Callback Set
// =============================================================================

/// Event sinks for one text input view. All optional.
///
/// Emission order within one operation is fixed: `on_change`, then
/// `on_text_input`, then `on_content_size_change`.
#[derive(Clone, Default)]
pub struct TextInputCallbacks {
    pub on_change: Option<ChangeCallback>,
    pub on_selection_change: Option<SelectionCallback>,
    pub on_content_size_change: Option<ContentSizeCallback>,
    pub on_text_input: Option<TextInputCallback>,
    pub on_scroll: Option<ScrollCallback>,
    pub on_submit: Option<SubmitCallback>,
}

impl TextInputCallbacks {
    pub fn new() -> Self {
        Self::default()
    }
}
