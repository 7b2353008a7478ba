//! Text State View - Reconciliation between remote commits and local edits.
//!
//! The hard part of the protocol lives here. Two independently-clocked
//! writers mutate one value: remote commits (computed off-thread, marshalled
//! in asynchronously, possibly stale on arrival) and local edits (native
//! input, synchronous, authoritative). The event counter is the only
//! ordering mechanism - it is checked synchronously at the point of
//! application, with no suspension in between, and there are no locks.
//!
//! Rules:
//! - A remote update older than the last acknowledged count is dropped
//!   entirely. No mutation, no event. Silent drop is policy, not an error.
//! - A local edit is always accepted unless it exceeds `max_length`, in
//!   which case the state stays bit-for-bit unchanged and nothing fires.
//! - Every accepted local edit bumps the counter; the remote layer must
//!   echo that counter back before its commits are applied again.

use spark_signals::{signal, Signal};

use crate::input::backed::BackedTextInput;
use crate::input::events::{TextInputCallbacks, TextInputDelta};
use crate::state::sequencer::{is_stale, EventSequencer};
use crate::types::{EdgeInsets, ScrollOffset, Selection, Size, StyledText};

// =============================================================================
// Behavior Flags
// =============================================================================

bitflags::bitflags! {
    /// Policy flags read at the moments their names describe.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputBehavior: u8 {
        const NONE = 0;
        const BLUR_ON_SUBMIT = 1 << 0;
        const SELECT_TEXT_ON_FOCUS = 1 << 1;
        const CLEAR_TEXT_ON_FOCUS = 1 << 2;
    }
}

// =============================================================================
// Caret Visibility
// =============================================================================

/// Default visible width when the host has not supplied a frame yet.
const DEFAULT_VISIBLE_WIDTH: u16 = 40;

/// Adjust horizontal scroll so the caret stays within the visible width.
///
/// # Arguments
/// * `caret` - Caret position in characters
/// * `scroll_x` - Current horizontal scroll offset
/// * `visible_width` - Width of the visible area in characters (0 = default)
///
/// # Returns
/// New scroll offset that keeps the caret visible
pub fn ensure_caret_visible(caret: usize, scroll_x: u16, visible_width: u16) -> u16 {
    let visible_width = if visible_width == 0 {
        DEFAULT_VISIBLE_WIDTH
    } else {
        visible_width
    };

    let view_start = scroll_x as usize;
    let view_end = view_start + visible_width as usize;

    if caret < view_start {
        // Caret is before the visible area - scroll left
        caret.min(u16::MAX as usize) as u16
    } else if caret >= view_end {
        // Caret is after the visible area - scroll right
        (caret.saturating_sub(visible_width as usize) + 1).min(u16::MAX as usize) as u16
    } else {
        scroll_x
    }
}

// =============================================================================
// Text State View
// =============================================================================

/// The editable-text component.
///
/// Owns one backing control exclusively; nothing else may mutate the
/// control's text or selection except through `apply_remote_update` and
/// `handle_local_edit`. Text and selection are mirrored into signals so
/// host deriveds can react to either path without extra wiring.
pub struct TextStateView<B: BackedTextInput> {
    control: B,
    text: Signal<StyledText>,
    selection: Signal<Selection>,

    sequencer: EventSequencer,
    most_recent_event_count: u64,

    max_length: Option<usize>,
    behavior: InputBehavior,
    callbacks: TextInputCallbacks,

    padding_insets: EdgeInsets,
    border_insets: EdgeInsets,
    frame: Size,
    scroll_offset: ScrollOffset,
    last_content_size: Size,

    input_accessory_id: Option<String>,
}

impl<B: BackedTextInput> TextStateView<B> {
    /// Wrap a backing control. The control's current content becomes the
    /// initial state; the counter starts at the baseline (0).
    pub fn new(control: B) -> Self {
        let text = control.text().clone();
        let selection = control.selection();
        let last_content_size = text.content_size();
        Self {
            control,
            text: signal(text),
            selection: signal(selection),
            sequencer: EventSequencer::new(),
            most_recent_event_count: 0,
            max_length: None,
            behavior: InputBehavior::NONE,
            callbacks: TextInputCallbacks::new(),
            padding_insets: EdgeInsets::ZERO,
            border_insets: EdgeInsets::ZERO,
            frame: Size::ZERO,
            scroll_offset: ScrollOffset::default(),
            last_content_size,
            input_accessory_id: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current text (reactive read - creates a dependency inside deriveds).
    pub fn text(&self) -> StyledText {
        self.text.get()
    }

    /// Current selection (reactive read).
    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    /// The last event count the remote layer is known to have observed
    /// or this view has produced. Non-decreasing.
    pub fn most_recent_event_count(&self) -> u64 {
        self.most_recent_event_count
    }

    /// The backing control (read-only).
    pub fn control(&self) -> &B {
        &self.control
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
    }

    pub fn behavior(&self) -> InputBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: InputBehavior) {
        self.behavior = behavior;
    }

    pub fn set_callbacks(&mut self, callbacks: TextInputCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn padding_insets(&self) -> EdgeInsets {
        self.padding_insets
    }

    pub fn set_padding_insets(&mut self, insets: EdgeInsets) {
        self.padding_insets = insets;
    }

    pub fn border_insets(&self) -> EdgeInsets {
        self.border_insets
    }

    pub fn set_border_insets(&mut self, insets: EdgeInsets) {
        self.border_insets = insets;
    }

    /// Host-assigned frame. Determines the visible width used to keep the
    /// caret on-screen while editing.
    pub fn set_frame(&mut self, frame: Size) {
        self.frame = frame;
    }

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.scroll_offset
    }

    pub fn input_accessory_id(&self) -> Option<&str> {
        self.input_accessory_id.as_deref()
    }

    pub fn set_input_accessory_id(&mut self, id: Option<String>) {
        self.input_accessory_id = id;
    }

    /// Width available for text after borders and padding.
    fn visible_width(&self) -> u16 {
        self.border_insets
            .inset(self.padding_insets.inset(self.frame))
            .width
    }

    // =========================================================================
    // Remote Path
    // =========================================================================

    /// Apply a remote commit's text and selection.
    ///
    /// Stale commits (counter below the last acknowledged one) are dropped
    /// entirely: no mutation, no event. This is what prevents a slow remote
    /// recompute from overwriting text the user has since edited. Equal
    /// counters are applied; re-application with the same payload is
    /// idempotent.
    pub fn apply_remote_update(
        &mut self,
        text: StyledText,
        selection: Selection,
        event_count: u64,
    ) {
        if is_stale(event_count, self.most_recent_event_count) {
            log::trace!(
                "dropping stale remote update ({} < {})",
                event_count,
                self.most_recent_event_count
            );
            return;
        }

        self.sequencer.observe(event_count);
        self.most_recent_event_count = event_count;

        let selection = selection.clamped(text.char_count());

        self.control.set_text(text.clone());
        self.control.set_selection(selection);
        self.text.set(text.clone());
        self.selection.set(selection);

        self.emit_content_size_if_changed(&text);
    }

    // =========================================================================
    // Local Path
    // =========================================================================

    /// Apply a local edit from the native control. Always authoritative.
    ///
    /// Rejected entirely (state bit-for-bit unchanged, no events) when the
    /// new text exceeds `max_length` - enforced before mutation, never by
    /// truncating after.
    pub fn handle_local_edit(&mut self, new_text: StyledText, new_selection: Selection) {
        let new_len = new_text.char_count();
        if let Some(max) = self.max_length {
            if new_len > max {
                log::trace!("rejecting over-length edit ({} > {})", new_len, max);
                return;
            }
        }

        let previous = self.text.get();
        let count = self.sequencer.next();
        self.most_recent_event_count = count;

        let selection = new_selection.clamped(new_len);

        self.control.set_text(new_text.clone());
        self.control.set_selection(selection);
        self.text.set(new_text.clone());
        self.selection.set(selection);

        // Keep the caret on-screen as the user types
        let new_scroll =
            ensure_caret_visible(selection.end, self.scroll_offset.x, self.visible_width());
        self.scroll_offset.x = new_scroll;

        if let Some(ref on_change) = self.callbacks.on_change {
            on_change(new_text.text(), count);
        }
        if let Some(ref on_text_input) = self.callbacks.on_text_input {
            let delta = compute_delta(previous.text(), new_text.text());
            on_text_input(&delta);
        }
        self.emit_content_size_if_changed(&new_text);
    }

    /// Validate and store a new selection. Invalid ranges are clamped
    /// rather than rejected. Fires `on_selection_change` only when the
    /// stored selection actually changes.
    pub fn handle_selection_change(&mut self, new_selection: Selection) {
        let selection = new_selection.clamped(self.text.get().char_count());
        if selection == self.selection.get() {
            return;
        }

        self.control.set_selection(selection);
        self.selection.set(selection);

        if let Some(ref on_selection_change) = self.callbacks.on_selection_change {
            on_selection_change(selection);
        }
    }

    /// Focus gained. `SELECT_TEXT_ON_FOCUS` selects everything;
    /// `CLEAR_TEXT_ON_FOCUS` clears the content as a local edit (it bumps
    /// the counter so a commit computed against the old text is stale).
    pub fn handle_focus(&mut self) {
        self.control.focus();

        if self.behavior.contains(InputBehavior::SELECT_TEXT_ON_FOCUS) {
            let len = self.text.get().char_count();
            self.handle_selection_change(Selection::new(0, len));
        }
        if self.behavior.contains(InputBehavior::CLEAR_TEXT_ON_FOCUS) {
            self.handle_local_edit(StyledText::plain(""), Selection::caret(0));
        }
    }

    /// Submit. Emits the submit callback with the current text, then
    /// releases focus iff `BLUR_ON_SUBMIT`.
    pub fn handle_submit(&mut self) {
        let text = self.text.get();
        if let Some(ref on_submit) = self.callbacks.on_submit {
            on_submit(text.text());
        }
        if self.behavior.contains(InputBehavior::BLUR_ON_SUBMIT) {
            self.control.blur();
        }
    }

    /// Scroll notification. Stores the offset and reports it; never
    /// mutates text or selection.
    pub fn handle_scroll(&mut self, offset: ScrollOffset) {
        self.scroll_offset = offset;
        if let Some(ref on_scroll) = self.callbacks.on_scroll {
            on_scroll(offset);
        }
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn emit_content_size_if_changed(&mut self, text: &StyledText) {
        let size = text.content_size();
        if size == self.last_content_size {
            return;
        }
        self.last_content_size = size;
        if let Some(ref on_content_size_change) = self.callbacks.on_content_size_change {
            on_content_size_change(size);
        }
    }
}

// =============================================================================
// Delta Computation
// =============================================================================

/// Compute the incremental delta of one edit: the replaced range of the
/// previous text and the text inserted in its place. Char-based
/// prefix/suffix trim, so a single keystroke produces a single-char delta.
fn compute_delta(previous: &str, current: &str) -> TextInputDelta {
    let prev: Vec<char> = previous.chars().collect();
    let curr: Vec<char> = current.chars().collect();

    let mut prefix = 0;
    while prefix < prev.len() && prefix < curr.len() && prev[prefix] == curr[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < prev.len() - prefix
        && suffix < curr.len() - prefix
        && prev[prev.len() - 1 - suffix] == curr[curr.len() - 1 - suffix]
    {
        suffix += 1;
    }

    TextInputDelta {
        text: curr[prefix..curr.len() - suffix].iter().collect(),
        previous_text: previous.to_string(),
        range: Selection::new(prefix, prev.len() - suffix),
    }
}

// =============================================================================
// Tests
// =============================================================================
