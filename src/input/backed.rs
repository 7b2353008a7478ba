//! Backed Text Input - Capability interface for native editing controls.
//!
//! `TextStateView` never talks to a concrete control directly. It depends
//! only on this small capability set, and concrete adapters wrap whatever
//! the host actually renders with. `BufferedTextInput` is the in-process
//! adapter used by the surface registry and by tests.

use crate::types::{Selection, StyledText};

// =============================================================================
// Capability Interface
// =============================================================================

/// What a native editing control must be able to do.
///
/// Setters are plain writes: the control displays what it is told and does
/// not second-guess the caller. All reconciliation policy lives above this
/// interface, in `TextStateView`.
pub trait BackedTextInput {
    /// Current displayed text.
    fn text(&self) -> &StyledText;

    /// Replace the displayed text.
    fn set_text(&mut self, text: StyledText);

    /// Current selection.
    fn selection(&self) -> Selection;

    /// Replace the selection. Callers pass already-clamped selections.
    fn set_selection(&mut self, selection: Selection);

    /// Whether the control holds input focus.
    fn is_focused(&self) -> bool;

    /// Acquire input focus.
    fn focus(&mut self);

    /// Release input focus.
    fn blur(&mut self);
}

// =============================================================================
// Buffered Adapter
// =============================================================================

/// In-memory editing control.
///
/// Holds exactly the state the capability interface names. The terminal
/// host routes key events against it; tests inspect it directly.
#[derive(Debug, Default)]
pub struct BufferedTextInput {
    text: StyledText,
    selection: Selection,
    focused: bool,
}

impl BufferedTextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial content, caret at the end.
    pub fn with_text(text: impl Into<StyledText>) -> Self {
        let text = text.into();
        let caret = Selection::caret(text.char_count());
        Self { text, selection: caret, focused: false }
    }
}

impl BackedTextInput for BufferedTextInput {
    fn text(&self) -> &StyledText {
        &self.text
    }

    fn set_text(&mut self, text: StyledText) {
        self.text = text;
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_roundtrip() {
        let mut control = BufferedTextInput::new();
        assert!(control.text().is_empty());

        control.set_text(StyledText::plain("abc"));
        control.set_selection(Selection::new(1, 2));

        assert_eq!(control.text().text(), "abc");
        assert_eq!(control.selection(), Selection::new(1, 2));
    }

    #[test]
    fn test_buffered_focus() {
        let mut control = BufferedTextInput::new();
        assert!(!control.is_focused());

        control.focus();
        assert!(control.is_focused());

        control.blur();
        assert!(!control.is_focused());
    }

    #[test]
    fn test_with_text_places_caret_at_end() {
        let control = BufferedTextInput::with_text("hello");
        assert_eq!(control.selection(), Selection::caret(5));
    }
}
