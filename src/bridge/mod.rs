//! Property Bridge - Configuration props onto native control state.
//!
//! Pure translation: each recognized option is applied to the owning view
//! independently, except `text` + `selection` (+ `event_count`) which are
//! applied as one atomic remote update so there is never an observable
//! intermediate state with mismatched text and selection.

use crate::input::backed::BackedTextInput;
use crate::input::text_state::{InputBehavior, TextStateView};
use crate::types::{EdgeInsets, Selection, StyledText};

// =============================================================================
// Props
// =============================================================================

/// Configuration-style property set for a text input view.
///
/// Every field is optional; absent fields leave the current value alone.
/// Build with struct update syntax: `TextInputProps { max_length:
/// Some(10), ..TextInputProps::new() }`.
#[derive(Clone, Default)]
pub struct TextInputProps {
    /// Content inset from the control edge.
    pub padding: Option<EdgeInsets>,
    /// Border thickness per edge.
    pub border: Option<EdgeInsets>,
    /// Attributed text to display. Applied atomically with `selection`
    /// through the remote-update path (staleness check included).
    pub text: Option<StyledText>,
    /// Selection to apply. With `text` it joins the atomic update;
    /// alone it goes through the selection-change path.
    pub selection: Option<Selection>,
    /// Event count tagging the staged `text`/`selection`. Defaults to the
    /// view's current count (a tie, which is fresh) when absent.
    pub event_count: Option<u64>,
    /// Maximum content length in characters.
    pub max_length: Option<usize>,
    pub blur_on_submit: Option<bool>,
    pub select_text_on_focus: Option<bool>,
    pub clear_text_on_focus: Option<bool>,
    /// Identifier of the accessory bar to show while this input is
    /// focused. Resolved by the host.
    pub input_accessory_id: Option<String>,
}

impl TextInputProps {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Application
// =============================================================================

/// Apply a property set to a view.
///
/// Styling and policy options first, then the staged text/selection as a
/// single remote update. A staged update that is stale against a local
/// edit the user made in the meantime is dropped by the view like any
/// other remote update.
pub fn apply_props<B: BackedTextInput>(view: &mut TextStateView<B>, props: TextInputProps) {
    if let Some(padding) = props.padding {
        view.set_padding_insets(padding);
    }
    if let Some(border) = props.border {
        view.set_border_insets(border);
    }
    if let Some(max_length) = props.max_length {
        view.set_max_length(Some(max_length));
    }

    let mut behavior = view.behavior();
    if let Some(blur) = props.blur_on_submit {
        behavior.set(InputBehavior::BLUR_ON_SUBMIT, blur);
    }
    if let Some(select) = props.select_text_on_focus {
        behavior.set(InputBehavior::SELECT_TEXT_ON_FOCUS, select);
    }
    if let Some(clear) = props.clear_text_on_focus {
        behavior.set(InputBehavior::CLEAR_TEXT_ON_FOCUS, clear);
    }
    view.set_behavior(behavior);

    if let Some(id) = props.input_accessory_id {
        view.set_input_accessory_id(Some(id));
    }

    match (props.text, props.selection) {
        (Some(text), selection) => {
            let selection = selection.unwrap_or_else(|| view.selection());
            let event_count = props.event_count.unwrap_or(view.most_recent_event_count());
            view.apply_remote_update(text, selection, event_count);
        }
        (None, Some(selection)) => {
            view.handle_selection_change(selection);
        }
        (None, None) => {}
    }
}

// =============================================================================
// Tests
// =============================================================================
