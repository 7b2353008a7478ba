//! Key Translation - Native key events into the local-edit path.
//!
//! Bridges crossterm's event system with the text input view. Every key
//! that edits funnels through `handle_local_edit`, every key that moves
//! through `handle_selection_change`, and Enter through `handle_submit`,
//! so counter bumps and max-length rejection apply uniformly no matter
//! which key produced the edit.
//!
//! # Example
//!
//! ```ignore
//! use surface_host::input::keys::apply_key;
//!
//! if let Event::Key(key) = crossterm::event::read()? {
//!     apply_key(&mut view, &key);
//! }
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::backed::BackedTextInput;
use crate::input::text_state::TextStateView;
use crate::types::{Selection, StyledText};

// =============================================================================
// Editing Helpers
// =============================================================================

/// Replace `range` of `text` with `insert`, returning the new string and
/// the caret position after the insertion. Char-based.
fn splice(text: &str, range: Selection, insert: &str) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let range = range.clamped(chars.len());

    let mut out: Vec<char> = Vec::with_capacity(chars.len() - range.len() + insert.len());
    out.extend(&chars[..range.start]);
    out.extend(insert.chars());
    out.extend(&chars[range.end..]);

    let caret = range.start + insert.chars().count();
    (out.into_iter().collect(), caret)
}

// =============================================================================
// Key Application
// =============================================================================

/// Apply one crossterm key event to a text input view.
///
/// Returns true if the key was handled. Release/repeat events and keys
/// with Alt held are left for the host.
pub fn apply_key<B: BackedTextInput>(view: &mut TextStateView<B>, event: &KeyEvent) -> bool {
    if event.kind != KeyEventKind::Press {
        return false;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        return false;
    }

    let text = view.text();
    let plain = text.text().to_string();
    let len = text.char_count();
    let sel = view.selection();
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    match event.code {
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
            let (new_text, caret) = splice(&plain, sel, &c.to_string());
            view.handle_local_edit(StyledText::plain(new_text), Selection::caret(caret));
            true
        }
        KeyCode::Backspace => {
            let range = if !sel.is_collapsed() {
                sel
            } else if sel.start > 0 {
                Selection::new(sel.start - 1, sel.start)
            } else {
                return true; // At the start - nothing to delete
            };
            let (new_text, caret) = splice(&plain, range, "");
            view.handle_local_edit(StyledText::plain(new_text), Selection::caret(caret));
            true
        }
        KeyCode::Delete => {
            let range = if !sel.is_collapsed() {
                sel
            } else if sel.end < len {
                Selection::new(sel.end, sel.end + 1)
            } else {
                return true; // At the end - nothing to delete
            };
            let (new_text, caret) = splice(&plain, range, "");
            view.handle_local_edit(StyledText::plain(new_text), Selection::caret(caret));
            true
        }
        KeyCode::Left => {
            let next = if shift {
                if sel.start > 0 {
                    Selection::new(sel.start - 1, sel.end)
                } else {
                    sel
                }
            } else if !sel.is_collapsed() {
                Selection::caret(sel.start)
            } else {
                Selection::caret(sel.start.saturating_sub(1))
            };
            view.handle_selection_change(next);
            true
        }
        KeyCode::Right => {
            let next = if shift {
                if sel.end < len {
                    Selection::new(sel.start, sel.end + 1)
                } else {
                    sel
                }
            } else if !sel.is_collapsed() {
                Selection::caret(sel.end)
            } else {
                Selection::caret((sel.end + 1).min(len))
            };
            view.handle_selection_change(next);
            true
        }
        KeyCode::Home => {
            let next = if shift {
                Selection::new(0, sel.end)
            } else {
                Selection::caret(0)
            };
            view.handle_selection_change(next);
            true
        }
        KeyCode::End => {
            let next = if shift {
                Selection::new(sel.start, len)
            } else {
                Selection::caret(len)
            };
            view.handle_selection_change(next);
            true
        }
        KeyCode::Enter => {
            view.handle_submit();
            true
        }
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
